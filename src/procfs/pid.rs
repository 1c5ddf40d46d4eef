//! Data structures related to the /proc/<pid>/* files

use std::fs;

use nix::unistd::Pid;

use crate::procfs::Result;

mod cgroup;
mod limits;
mod stat;

pub use self::cgroup::{CGroup, CGroups};
pub use self::limits::{Limit, Limits};
pub use self::stat::{Stat, State};

/// A single process, as seen through `/proc/[pid]`
///
/// Only `stat` is loaded up front, everything else is read on demand so
/// that each reading is as fresh as possible.
#[derive(Clone, Debug)]
pub struct Process {
    pub pid: Pid,
    pub stat: Stat,
}

impl Process {
    pub fn from_pid(pid: Pid) -> Result<Process> {
        Ok(Process {
            pid,
            stat: Stat::from_pid(pid)?,
        })
    }

    /// False for zombies and processes that are on their way out
    pub fn is_running(&self) -> bool {
        self.stat.state.is_alive()
    }

    /// Re-read `/proc/[pid]/stat`
    pub fn refresh(&self) -> Result<Stat> {
        Stat::from_pid(self.pid)
    }

    /// Whether `stat` describes this very process, and not a different one
    /// that got its pid after this one exited
    pub fn is_same_process(&self, stat: &Stat) -> bool {
        stat.pid == self.pid && stat.starttime == self.stat.starttime
    }

    pub fn limits(&self) -> Result<Limits> {
        Limits::from_pid(self.pid)
    }

    pub fn cgroups(&self) -> Result<CGroups> {
        CGroups::from_pid(self.pid)
    }

    /// The number of entries in `/proc/[pid]/fd`
    ///
    /// Reading another user's fd directory needs privileges, this is a
    /// `PermissionDenied` io error when we don't have them.
    pub fn open_fds(&self) -> Result<u64> {
        let mut count = 0;
        for entry in fs::read_dir(format!("/proc/{}/fd", self.pid))? {
            entry?;
            count += 1;
        }
        Ok(count)
    }
}

#[cfg(test)]
mod unit {
    use super::{Process, Stat};

    fn stat(pid: i32, starttime: u64) -> Stat {
        format!(
            "{} (worker) S 1 1 1 0 -1 4194624 81 0 0 0 605 198 0 0 20 0 10 0 {} 1230417920",
            pid, starttime
        )
        .parse()
        .unwrap()
    }

    #[test]
    fn reused_pids_are_a_different_process() {
        let first = stat(15136, 71025);
        let process = Process {
            pid: first.pid,
            stat: first.clone(),
        };
        assert!(process.is_same_process(&first));
        assert!(!process.is_same_process(&stat(15136, 99000)));
        assert!(!process.is_same_process(&stat(15137, 71025)));
    }
}
