//! Check the number of threads in a process

use structopt::StructOpt;

use proc_checks::check::{CheckError, CheckRunner};
use proc_checks::cli::{self, PidArgs};
use proc_checks::collect::Threads;

/// Check the number of threads a process is running
///
/// Reads the thread count from /proc/<pid>/stat. Thresholds are Nagios ranges
/// over the thread count, so `-W 100 -C 200` warns above 100 threads.
#[derive(StructOpt, Debug)]
#[structopt(
    name = "check-proc-threads (part of proc-checks)",
    setting = structopt::clap::AppSettings::ColoredHelp
)]
struct Args {
    #[structopt(
        short = "W",
        long = "warning",
        help = "Thread count to warn at, as a Nagios range"
    )]
    warning: String,
    #[structopt(
        short = "C",
        long = "critical",
        help = "Thread count to go critical at, as a Nagios range"
    )]
    critical: String,
    #[structopt(flatten)]
    pid: PidArgs,
}

fn main() -> Result<(), CheckError> {
    let args: Args = cli::parse_args();
    cli::init_logging(args.pid.debug);

    let config = args.pid.into_config(args.warning, args.critical);
    let result = CheckRunner::new(config, Threads).execute()?;
    println!("{}", result);
    result.status.exit();
}

#[cfg(test)]
mod test {
    use structopt::StructOpt;

    use super::Args;

    #[test]
    fn parses_all_args() {
        let args = Args::from_iter(vec![
            "check-proc-threads",
            "-W",
            "85",
            "-C",
            "95",
            "--pid-cmd",
            "systemctl show nginx --property=MainPID --value",
            "--pid-timeout",
            "2",
        ]);
        assert_eq!(args.warning, "85");
        assert_eq!(args.critical, "95");
        assert_eq!(args.pid.pid_timeout, 2);
        assert!(!args.pid.debug);
    }

    #[test]
    fn thresholds_are_required() {
        let res = Args::from_iter_safe(vec!["check-proc-threads", "-P", "echo 1"]);
        assert!(res.is_err());
        let res = Args::from_iter_safe(vec!["check-proc-threads", "-W", "1", "-P", "echo 1"]);
        assert!(res.is_err());
    }
}
