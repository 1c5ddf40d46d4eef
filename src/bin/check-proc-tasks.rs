//! Check how much of its cgroup's task limit a process is using

use structopt::StructOpt;

use proc_checks::check::{CheckError, CheckRunner};
use proc_checks::cli::{self, PidArgs};
use proc_checks::collect::Tasks;

/// Check the tasks in a process's cgroup against the cgroup's limit
///
/// Finds the cgroup with task accounting in /proc/<pid>/cgroup and compares
/// its pids.current to pids.max. For a systemd service that is TasksCurrent
/// and TasksMax of the unit. Thresholds are Nagios ranges over the percentage
/// of the limit that is in use. A cgroup without a limit is always at 0%.
#[derive(StructOpt, Debug)]
#[structopt(
    name = "check-proc-tasks (part of proc-checks)",
    setting = structopt::clap::AppSettings::ColoredHelp
)]
struct Args {
    #[structopt(
        short = "W",
        long = "warning",
        default_value = "75",
        help = "Percent of the task limit to warn at, as a Nagios range"
    )]
    warning: String,
    #[structopt(
        short = "C",
        long = "critical",
        default_value = "85",
        help = "Percent of the task limit to go critical at, as a Nagios range"
    )]
    critical: String,
    #[structopt(flatten)]
    pid: PidArgs,
}

fn main() -> Result<(), CheckError> {
    let args: Args = cli::parse_args();
    cli::init_logging(args.pid.debug);

    let config = args.pid.into_config(args.warning, args.critical);
    let result = CheckRunner::new(config, Tasks).execute()?;
    println!("{}", result);
    result.status.exit();
}

#[cfg(test)]
mod test {
    use structopt::StructOpt;

    use super::Args;

    #[test]
    fn thresholds_have_defaults() {
        let args = Args::from_iter(vec![
            "check-proc-tasks",
            "-P",
            "systemctl show apache2 --property=MainPID --value",
        ]);
        assert_eq!(args.warning, "75");
        assert_eq!(args.critical, "85");
        assert!(!args.pid.debug);
    }

    #[test]
    fn pid_command_is_required() {
        assert!(Args::from_iter_safe(vec!["check-proc-tasks", "-W", "50"]).is_err());
    }
}
