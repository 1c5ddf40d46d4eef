//! Check how much of its open file limit a process is using

use structopt::StructOpt;

use proc_checks::check::{CheckError, CheckRunner};
use proc_checks::cli::{self, PidArgs};
use proc_checks::collect::OpenFds;

/// Check open file descriptors of a process against its limit
///
/// Counts the entries in /proc/<pid>/fd and compares them to the soft "Max
/// open files" limit in /proc/<pid>/limits. Thresholds are Nagios ranges over
/// the percentage of the limit that is in use. A process with an unlimited
/// limit is always at 0%.
#[derive(StructOpt, Debug)]
#[structopt(
    name = "check-proc-fds (part of proc-checks)",
    setting = structopt::clap::AppSettings::ColoredHelp
)]
struct Args {
    #[structopt(
        short = "W",
        long = "warning",
        default_value = "75",
        help = "Percent of the open files limit to warn at, as a Nagios range"
    )]
    warning: String,
    #[structopt(
        short = "C",
        long = "critical",
        default_value = "85",
        help = "Percent of the open files limit to go critical at, as a Nagios range"
    )]
    critical: String,
    #[structopt(flatten)]
    pid: PidArgs,
}

fn main() -> Result<(), CheckError> {
    let args: Args = cli::parse_args();
    cli::init_logging(args.pid.debug);

    let config = args.pid.into_config(args.warning, args.critical);
    let result = CheckRunner::new(config, OpenFds).execute()?;
    println!("{}", result);
    result.status.exit();
}
