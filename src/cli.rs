//! Command line handling shared by all of the checks

use std::ffi::OsString;
use std::io;
use std::time::Duration;

use structopt::clap::{Error as ClapError, ErrorKind};
use structopt::StructOpt;
use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

use crate::check::CheckConfig;
use crate::Status;

/// How to find the process, and what to do when something goes wrong
#[derive(StructOpt, Debug)]
pub struct PidArgs {
    #[structopt(
        short = "P",
        long = "pid-cmd",
        help = "A shell command that prints the PID of the process to check, e.g. \
                \"systemctl show nginx --property=MainPID --value\""
    )]
    pub pid_cmd: String,
    #[structopt(
        long = "pid-timeout",
        value_name = "SECONDS",
        default_value = "10",
        help = "Kill the pid command if it runs longer than this"
    )]
    pub pid_timeout: u64,
    #[structopt(
        short = "D",
        long = "debug",
        help = "Log to stderr, and exit with the error instead of an UNKNOWN status"
    )]
    pub debug: bool,
}

impl PidArgs {
    /// Combine these with a check's thresholds
    pub fn into_config(self, warning: String, critical: String) -> CheckConfig {
        CheckConfig {
            warning,
            critical,
            pid_cmd: self.pid_cmd,
            pid_timeout: Duration::from_secs(self.pid_timeout),
            debug: self.debug,
        }
    }
}

/// Parse the command line, exiting the way a plugin should if it's wrong
///
/// `--help` and `--version` exit with 0, anything else that can't be parsed
/// exits `UNKNOWN`.
pub fn parse_args<T: StructOpt>() -> T {
    match try_parse_args(std::env::args_os()) {
        Ok(args) => args,
        Err(e) => match e.kind {
            ErrorKind::HelpDisplayed | ErrorKind::VersionDisplayed => e.exit(),
            _ => {
                println!("{}", bad_arguments(&e));
                Status::Unknown.exit()
            }
        },
    }
}

fn try_parse_args<T, I>(argv: I) -> Result<T, ClapError>
where
    T: StructOpt,
    I: IntoIterator,
    I::Item: Into<OsString> + Clone,
{
    T::from_iter_safe(argv)
}

/// The plugin line for a command line clap didn't like
///
/// clap's message runs over several lines and ends with usage, only the
/// first paragraph is kept.
pub fn bad_arguments(err: &ClapError) -> String {
    let reason = err
        .message
        .lines()
        .map(str::trim)
        .take_while(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    let reason = reason.strip_prefix("error: ").unwrap_or(&reason);
    format!("{}: Bad arguments (see --help): {}", Status::Unknown, reason)
}

/// Send logs to stderr, keeping stdout for the plugin line
///
/// Only warnings get through unless `debug` is set. `RUST_LOG` is ignored,
/// the checks are run by monitoring systems with whatever environment they
/// happen to have.
pub fn init_logging(debug: bool) {
    let _ = tracing::subscriber::set_global_default(subscriber(debug, io::stderr));
}

/// Plain text, monitoring agents often capture stderr along with stdout
fn subscriber<W>(debug: bool, writer: W) -> impl Subscriber + Send + Sync
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let level = if debug { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(level))
        .with_writer(writer)
        .with_target(false)
        .with_ansi(false)
        .without_time()
        .finish()
}

#[cfg(test)]
mod unit {
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use structopt::StructOpt;
    use tracing::{debug, warn};

    use super::{bad_arguments, subscriber, try_parse_args, PidArgs};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn logged(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn log_with(debug: bool) -> String {
        let captured = Captured::default();
        let writer = captured.clone();
        tracing::subscriber::with_default(subscriber(debug, move || writer.clone()), || {
            debug!(pid = 42, "resolved pid");
            warn!(operation = "collect_metric", "check failed");
        });
        captured.logged()
    }

    #[test]
    fn logs_are_plain_text() {
        let logged = log_with(false);
        assert!(logged.contains("WARN"), "{}", logged);
        assert!(logged.contains("check failed"), "{}", logged);
        assert!(!logged.contains('\x1b'), "{:?}", logged);
        assert!(!logged.contains("resolved pid"), "{}", logged);
    }

    #[test]
    fn debug_turns_up_logging() {
        let logged = log_with(true);
        assert!(logged.contains("resolved pid"), "{}", logged);
        assert!(!logged.contains('\x1b'), "{:?}", logged);
    }

    #[derive(StructOpt, Debug)]
    struct Args {
        #[structopt(short = "W", long = "warning")]
        warning: String,
        #[structopt(flatten)]
        pid: PidArgs,
    }

    #[test]
    fn pid_args_defaults() {
        let args: Args = try_parse_args(vec!["check", "-W", "10", "-P", "echo 1"]).unwrap();
        assert_eq!(args.pid.pid_cmd, "echo 1");
        assert_eq!(args.pid.pid_timeout, 10);
        assert!(!args.pid.debug);

        let config = args.pid.into_config(args.warning, "20".into());
        assert_eq!(config.warning, "10");
        assert_eq!(config.critical, "20");
        assert_eq!(config.pid_timeout, Duration::from_secs(10));
    }

    #[test]
    fn pid_args_long_forms() {
        let args: Args = try_parse_args(vec![
            "check",
            "--warning=10",
            "--pid-cmd=pgrep -o sshd",
            "--pid-timeout=3",
            "--debug",
        ])
        .unwrap();
        assert_eq!(args.pid.pid_cmd, "pgrep -o sshd");
        assert!(args.pid.debug);
        let config = args.pid.into_config(args.warning, "1".into());
        assert_eq!(config.pid_timeout, Duration::from_secs(3));
    }

    #[test]
    fn missing_pid_command_is_a_bad_argument() {
        let err = try_parse_args::<Args, _>(vec!["check", "-W", "10"]).unwrap_err();
        let line = bad_arguments(&err);
        assert!(
            line.starts_with("UNKNOWN: Bad arguments (see --help): "),
            "{}",
            line
        );
        assert!(line.contains("--pid-cmd"), "{}", line);
        assert!(!line.contains('\n'));
    }

    #[test]
    fn non_numeric_timeout_is_a_bad_argument() {
        let err = try_parse_args::<Args, _>(vec![
            "check",
            "-W",
            "1",
            "-P",
            "echo 1",
            "--pid-timeout",
            "soon",
        ])
        .unwrap_err();
        assert!(bad_arguments(&err).starts_with("UNKNOWN: Bad arguments (see --help): "));
    }
}
