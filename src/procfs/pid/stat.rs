use std::fmt;
use std::str::FromStr;

use nix::unistd::Pid;
use scan_fmt::scan_fmt_some;

use crate::linux::Jiffies;
use crate::procfs::{read_file, ParseStatError, ParseStateError, ProcFsError, Result};

/// The status of a `Process`
///
/// This represents the parts of `/proc/[pid]/stat` that the checks need,
/// and is commonly accessed via a [`Process`](../struct.Process.html)
#[derive(Clone, Debug)]
pub struct Stat {
    /// The process ID
    pub pid: Pid,
    /// The state of the process
    pub state: State,
    /// Time scheduled in user mode
    pub utime: Jiffies,
    /// Time scheduled in kernel mode
    pub stime: Jiffies,
    pub num_threads: i64,
    /// Jiffies after boot that the process started
    ///
    /// Together with the pid this identifies a process, pids get reused.
    pub starttime: u64,
}

impl Stat {
    pub fn from_pid<P: fmt::Display>(pid: P) -> Result<Stat> {
        read_file(format!("/proc/{}/stat", pid))?.parse()
    }

    /// CPU time spent by the process itself, children excluded
    pub fn cpu_time(&self) -> Jiffies {
        self.utime + self.stime
    }
}

fn field<T>(val: Option<T>, field_name: &'static str, row: &str, position: u8) -> Result<T> {
    val.ok_or_else(|| {
        ParseStatError {
            line: row.to_string(),
            field_name,
            position,
        }
        .into()
    })
}

impl FromStr for Stat {
    type Err = ProcFsError;
    /// Parse the results of /proc/[pid]/stat into a `Stat`
    ///
    /// The executable name sits in parens in the second field and may itself
    /// contain spaces and parens, so the line is split around the last `) `
    /// before scanning the fixed-width tail.
    fn from_str(s: &str) -> Result<Stat> {
        let (pid, rest) = match s.split_once(" (") {
            Some((pid, rest)) => (pid.trim().parse::<i32>().ok(), rest),
            None => (None, ""),
        };
        let pid = field(pid, "pid", s, 0)?;
        let tail = field(rest.rsplit_once(") ").map(|(_, tail)| tail), "comm", s, 1)?;
        let (
            state,
            _ppid,
            _pgrp,
            _session,
            _tty_nr,
            _tpgid,
            _flags,
            _minflt,
            _cminflt,
            _majflt,
            _cmajflt,
            utime,
            stime,
            _cutime,
            _cstime,
            _priority,
            _nice,
            num_threads,
            starttime,
        ) = scan_fmt_some!(
            tail,
            "{} {} {} {} {} {} {d} {d} {d} {d} {d} {d} {d} {} {} {} {} {} 0 {d}",
            State,  // state
            i32,    // ppid
            i32,    // pgrp
            i32,    // session
            i32,    // tty_nr
            i32,    // tpgid
            u32,    // flags
            u64,    // minflt
            u64,    // cminflt
            u64,    // majflt
            u64,    // cmajflt
            u64,    // utime
            u64,    // stime
            i64,    // cutime (children usertime)
            i64,    // cstime
            i64,    // priority
            i64,    // nice
            i64,    // num_threads
            // itrealvalue (always 0)
            u64 // starttime
        );
        Ok(Stat {
            pid: Pid::from_raw(pid),
            state: field(state, "state", s, 2)?,
            utime: field(utime, "utime", s, 13)?.into(),
            stime: field(stime, "stime", s, 14)?.into(),
            num_threads: field(num_threads, "num_threads", s, 19)?,
            starttime: field(starttime, "starttime", s, 21)?,
        })
    }
}

/// The state of the process
///
/// See `man 5 proc` for details
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    /// `R`: Currently using the CPU
    Running,
    /// `S`: Sleeping on an interruptible wait
    Sleeping,
    /// `D`: Sleeping on an uninterruptible or disk sleep
    UninterruptibleSleep,
    /// `W`: Paging (before 2.6) or waking
    Waiting,
    /// `T`: Stopped on a signal
    Stopped,
    /// `t`: Stopped by a debugger
    TracingStop,
    /// `Z`: No parent process has reaped this
    Zombie,
    /// `X` or `x`: Exiting, should never be visible
    Dead,
    /// `I`: Idle kernel thread
    Idle,
    /// `K` or `P`: Wakekill or parked, only on some kernels
    Parked,
}

impl State {
    /// Whether the process is still able to do anything
    pub fn is_alive(self) -> bool {
        match self {
            State::Zombie | State::Dead => false,
            _ => true,
        }
    }
}

impl FromStr for State {
    type Err = ProcFsError;

    fn from_str(s: &str) -> Result<State> {
        use self::State::*;
        match s {
            "R" => Ok(Running),
            "S" => Ok(Sleeping),
            "D" => Ok(UninterruptibleSleep),
            "W" => Ok(Waiting),
            "T" => Ok(Stopped),
            "t" => Ok(TracingStop),
            "Z" => Ok(Zombie),
            "X" | "x" => Ok(Dead),
            "I" => Ok(Idle),
            "K" | "P" => Ok(Parked),
            _ => Err(ParseStateError {
                state: s.to_string(),
            }
            .into()),
        }
    }
}
