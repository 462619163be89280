use clap::error::ErrorKind;
use clap::Parser;
use pchk_probe::Verdict;
use std::path::PathBuf;
use std::process::ExitCode;

mod check;

#[derive(Parser)]
#[command(name = "check_puppet")]
#[command(version, about = "Nagios check for Puppet agent run age and failures", long_about = None)]
struct Cli {
    /// Critical threshold, time or failed resources
    #[arg(short = 'c', long, value_name = "CRIT", allow_negative_numbers = true)]
    critical: Option<i64>,

    /// Warning threshold, time or failed resources
    #[arg(short = 'w', long, value_name = "WARN", allow_negative_numbers = true)]
    warn: Option<i64>,

    /// Check for failed resources instead of time since run
    #[arg(short = 'f', long, default_value_t = false)]
    check_failures: bool,

    /// Only alert if Puppet is enabled
    #[arg(short = 'e', long, default_value_t = false)]
    only_enabled: bool,

    /// Location of the lock file [default: /var/lib/puppet/state/puppetdlock]
    #[arg(short = 'l', long, value_name = "FILE")]
    lock_file: Option<PathBuf>,

    /// Location of the state file [default: /var/lib/puppet/state/state.yaml]
    #[arg(short = 't', long, value_name = "FILE")]
    state_file: Option<PathBuf>,

    /// Location of the summary file [default: /var/lib/puppet/state/last_run_summary.yaml]
    #[arg(short = 's', long, value_name = "FILE")]
    summary_file: Option<PathBuf>,

    /// YAML config files in merge order; command-line values override them
    #[arg(long = "config", value_name = "FILE")]
    config_paths: Vec<String>,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // clap exits 2 on bad usage, which a monitoring system reads as
            // CRITICAL. Usage problems are UNKNOWN, with the result line on
            // stdout and clap's diagnostics on stderr.
            let _ = e.print();
            if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
                return ExitCode::SUCCESS;
            }
            println!("{}", Verdict::usage(check::INVALID_ARGUMENTS));
            return ExitCode::from(check::EXIT_USAGE);
        }
    };

    init_tracing();

    let verdict = check::run(check::CheckArgs {
        config_paths: cli.config_paths,
        overrides: pchk_config::CliOverrides {
            warn: cli.warn,
            critical: cli.critical,
            check_failures: cli.check_failures,
            only_enabled: cli.only_enabled,
            lock_file: cli.lock_file,
            state_file: cli.state_file,
            summary_file: cli.summary_file,
        },
    });

    println!("{verdict}");
    ExitCode::from(verdict.severity as u8)
}

/// Logs go to stderr; stdout carries only the result line.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .init();
}
