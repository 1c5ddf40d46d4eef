//! Check the cpu usage of a process

use structopt::StructOpt;

use proc_checks::check::{CheckError, CheckRunner};
use proc_checks::cli::{self, PidArgs};
use proc_checks::collect::CpuUsage;

/// Check the cpu usage of a process
///
/// Samples the user and system time of the process in /proc/<pid>/stat one
/// second apart. Usage is a percentage of a single cpu, so a process keeping
/// four cores busy is at 400%. Thresholds are Nagios ranges over that
/// percentage.
///
/// Always takes at least a second to run.
#[derive(StructOpt, Debug)]
#[structopt(
    name = "check-proc-cpu (part of proc-checks)",
    setting = structopt::clap::AppSettings::ColoredHelp
)]
struct Args {
    #[structopt(
        short = "W",
        long = "warning",
        help = "Cpu percentage to warn at, as a Nagios range"
    )]
    warning: String,
    #[structopt(
        short = "C",
        long = "critical",
        help = "Cpu percentage to go critical at, as a Nagios range"
    )]
    critical: String,
    #[structopt(flatten)]
    pid: PidArgs,
}

fn main() -> Result<(), CheckError> {
    let args: Args = cli::parse_args();
    cli::init_logging(args.pid.debug);

    let config = args.pid.into_config(args.warning, args.critical);
    let result = CheckRunner::new(config, CpuUsage::new()).execute()?;
    println!("{}", result);
    result.status.exit();
}
