//! Proc checks: Nagios compatible health checks for a single process
//!
//! Each check finds its process by running a command that prints a pid, for
//! example `systemctl show nginx --property=MainPID --value`, measures one
//! thing about it and compares that to a warning and a critical threshold:
//!
//! ```plain
//! $ check-proc-fds -P 'cat /run/nginx.pid'
//! OK: Open FDs 3% (35/1024) for PID 15136 is inside limits (warning 75, critical 85)|used_percent=3%;75;85;; open_fds=35;;;0;1024
//! ```
//!
//! See the [`scripts`](scripts/index.html) module for the individual checks.
//! The library half is a small pipeline that the binaries share:
//!
//! * [`threshold`] parses Nagios ranges like `10:20` or `@~:5`
//! * [`resolve`] runs the pid command
//! * [`collect`] reads a metric out of `/proc` (or `/sys` for cgroups)
//! * [`check`] ties those together and decides on a [`Status`]
//! * [`report`] renders the one line of output

use std::fmt;
use std::process;

pub mod check;
pub mod cli;
pub mod collect;
pub mod linux;
pub mod procfs;
pub mod report;
pub mod resolve;
pub mod scripts;
pub mod sys;
pub mod threshold;

/// The outcome of a check, as understood by Nagios
///
/// Ok, Warning and Critical are increasingly bad. Unknown means the check
/// itself couldn't tell.
#[must_use]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Ok,
    Warning,
    Critical,
    Unknown,
}

impl Status {
    /// The plugin exit code for this status
    pub fn code(self) -> i32 {
        match self {
            Status::Ok => 0,
            Status::Warning => 1,
            Status::Critical => 2,
            Status::Unknown => 3,
        }
    }

    pub fn exit(self) -> ! {
        process::exit(self.code())
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Status::Ok => "OK",
            Status::Warning => "WARNING",
            Status::Critical => "CRITICAL",
            Status::Unknown => "UNKNOWN",
        };
        f.write_str(name)
    }
}
