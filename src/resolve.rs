//! Find the process to check by running a command that prints its pid

use std::fmt;
use std::io::{self, Read};
use std::process::{Command, ExitStatus, Stdio};
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use lazy_static::lazy_static;
use nix::unistd::Pid;
use regex::Regex;
use tracing::debug;

/// How long to wait for the pid command when nobody says otherwise
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const POLL_INTERVAL: Duration = Duration::from_millis(10);

lazy_static! {
    static ref IS_DIGITS: Regex = Regex::new(r"^[0-9]+$").unwrap();
}

#[derive(Debug)]
pub enum PidResolutionError {
    /// The shell couldn't be started
    Spawn(io::Error),
    /// We lost track of the child
    Wait(io::Error),
    Failed {
        status: ExitStatus,
        stdout: String,
        stderr: String,
    },
    TimedOut(Duration),
    EmptyOutput,
    /// The output was something other than a positive integer
    NotAPid(String),
}

impl fmt::Display for PidResolutionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use self::PidResolutionError::*;
        match self {
            Spawn(e) => write!(f, "unable to run command: {}", e),
            Wait(e) => write!(f, "unable to wait for command: {}", e),
            Failed {
                status,
                stdout,
                stderr,
            } => {
                write!(f, "command failed ({})", status)?;
                let output = [stdout.trim(), stderr.trim()]
                    .iter()
                    .filter(|out| !out.is_empty())
                    .cloned()
                    .collect::<Vec<_>>();
                if !output.is_empty() {
                    write!(f, ": output: {}", output.join(" "))?;
                }
                Ok(())
            }
            TimedOut(timeout) => write!(
                f,
                "command did not finish within {}s",
                timeout.as_secs_f64()
            ),
            EmptyOutput => write!(f, "command printed nothing, expected a PID"),
            NotAPid(out) => write!(
                f,
                "command printed '{}' which cannot be converted to a PID",
                out
            ),
        }
    }
}

impl std::error::Error for PidResolutionError {}

/// Runs a shell command and reads a pid from its output
///
/// There are no retries, a command that fails once fails the check.
#[derive(Clone, Debug)]
pub struct PidResolver {
    command: String,
    timeout: Duration,
}

impl PidResolver {
    pub fn new<S: Into<String>>(command: S, timeout: Duration) -> PidResolver {
        PidResolver {
            command: command.into(),
            timeout,
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    /// Run the command through `/bin/sh -c` and parse what it prints
    ///
    /// The command is killed if it runs past the timeout.
    pub fn resolve(&self) -> Result<Pid, PidResolutionError> {
        let deadline = Instant::now() + self.timeout;
        debug!(command = %self.command, timeout = ?self.timeout, "running pid command");
        let mut child = Command::new("/bin/sh")
            .arg("-c")
            .arg(&self.command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(PidResolutionError::Spawn)?;

        // Drain the pipes on the side so a chatty command can't block on a
        // full pipe while we wait for it.
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = loop {
            match child.try_wait().map_err(PidResolutionError::Wait)? {
                Some(status) => break status,
                None if Instant::now() >= deadline => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(PidResolutionError::TimedOut(self.timeout));
                }
                None => thread::sleep(POLL_INTERVAL),
            }
        };

        // Something the shell backgrounded can keep the pipe open after the
        // shell itself has exited.
        let stdout =
            collect(&stdout, deadline).ok_or(PidResolutionError::TimedOut(self.timeout))?;
        debug!(%status, stdout = %stdout.trim(), "pid command finished");
        if !status.success() {
            let stderr = collect(&stderr, deadline).unwrap_or_default();
            return Err(PidResolutionError::Failed {
                status,
                stdout,
                stderr,
            });
        }
        parse_pid(&stdout)
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Receiver<String> {
    let (tx, rx) = channel();
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        let _ = tx.send(String::from_utf8_lossy(&buf).into_owned());
    });
    rx
}

fn collect(rx: &Receiver<String>, deadline: Instant) -> Option<String> {
    let remaining = deadline.saturating_duration_since(Instant::now());
    match rx.recv_timeout(remaining) {
        Ok(out) => Some(out),
        Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
    }
}

/// Parse the output of a pid command
///
/// Surrounding whitespace is ignored, anything else that is not a positive
/// integer is an error. `systemctl show --property=MainPID` prints `0` for a
/// stopped unit, so zero gets rejected too.
pub fn parse_pid(output: &str) -> Result<Pid, PidResolutionError> {
    let output = output.trim();
    if output.is_empty() {
        return Err(PidResolutionError::EmptyOutput);
    }
    if !IS_DIGITS.is_match(output) {
        return Err(PidResolutionError::NotAPid(output.to_owned()));
    }
    match output.parse::<i32>() {
        Ok(pid) if pid > 0 => Ok(Pid::from_raw(pid)),
        _ => Err(PidResolutionError::NotAPid(output.to_owned())),
    }
}

#[cfg(test)]
mod unit {
    use assert_matches::assert_matches;
    use nix::unistd::Pid;

    use super::{parse_pid, PidResolutionError};

    #[test]
    fn parses_padded_pids() {
        assert_eq!(parse_pid("15136\n").unwrap(), Pid::from_raw(15136));
        assert_eq!(parse_pid("  42  ").unwrap(), Pid::from_raw(42));
    }

    #[test]
    fn rejects_things_that_are_not_pids() {
        assert_matches!(parse_pid(""), Err(PidResolutionError::EmptyOutput));
        assert_matches!(parse_pid(" \n"), Err(PidResolutionError::EmptyOutput));
        for bad in &["0", "-5", "+5", "12ab", "MainPID=123", "1 2", "99999999999"] {
            assert_matches!(
                parse_pid(bad),
                Err(PidResolutionError::NotAPid(_)),
                "{:?} should not be a pid",
                bad
            );
        }
    }
}
