use std::fmt;
use std::str::FromStr;

use crate::procfs::{read_file, ProcFsError, Result};

/// One line of `/proc/[pid]/cgroup`
///
/// ```text
/// 5:pids:/system.slice/nginx.service
/// 0::/system.slice/nginx.service
/// ```
///
/// The second form is the unified (v2) hierarchy, it has no controllers
/// listed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CGroup {
    pub hierarchy: u32,
    pub controllers: Vec<String>,
    /// Relative to the root of the hierarchy
    pub path: String,
}

impl CGroup {
    /// True for the line of the unified hierarchy
    pub fn is_unified(&self) -> bool {
        self.hierarchy == 0 && self.controllers.is_empty()
    }
}

impl FromStr for CGroup {
    type Err = ProcFsError;

    fn from_str(line: &str) -> Result<CGroup> {
        let mut parts = line.splitn(3, ':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(hierarchy), Some(controllers), Some(path)) => Ok(CGroup {
                hierarchy: hierarchy.parse()?,
                controllers: controllers
                    .split(',')
                    .filter(|c| !c.is_empty())
                    .map(str::to_owned)
                    .collect(),
                path: path.to_owned(),
            }),
            _ => Err(ProcFsError::InsufficientData(format!(
                "malformed cgroup line: '{}'",
                line
            ))),
        }
    }
}

/// Every cgroup a process belongs to, one per hierarchy
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CGroups(pub Vec<CGroup>);

impl CGroups {
    pub fn from_pid<P: fmt::Display>(pid: P) -> Result<CGroups> {
        read_file(format!("/proc/{}/cgroup", pid))?.parse()
    }

    /// The group that does task accounting
    ///
    /// That's the v1 `pids` controller if it is mounted, otherwise the
    /// unified hierarchy.
    pub fn pids(&self) -> Option<&CGroup> {
        self.0
            .iter()
            .find(|group| group.controllers.iter().any(|c| c == "pids"))
            .or_else(|| self.0.iter().find(|group| group.is_unified()))
    }
}

impl FromStr for CGroups {
    type Err = ProcFsError;

    fn from_str(contents: &str) -> Result<CGroups> {
        contents
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(str::parse)
            .collect::<Result<Vec<_>>>()
            .map(CGroups)
    }
}
