use std::fmt;
use std::str::FromStr;

use crate::procfs::{read_file, ProcFsError, Result};

/// One resource limit, `None` meaning `unlimited`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Limit {
    pub soft: Option<u64>,
    pub hard: Option<u64>,
}

/// The limits from `/proc/[pid]/limits` that we care about
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Limits {
    /// `RLIMIT_NOFILE`, the "Max open files" row
    pub open_files: Limit,
}

impl Limits {
    pub fn from_pid<P: fmt::Display>(pid: P) -> Result<Limits> {
        read_file(format!("/proc/{}/limits", pid))?.parse()
    }
}

fn limit_value(value: &str) -> Result<Option<u64>> {
    if value == "unlimited" {
        Ok(None)
    } else {
        Ok(Some(value.parse()?))
    }
}

impl FromStr for Limits {
    type Err = ProcFsError;

    /// The file is a table with a header line:
    ///
    /// ```text
    /// Limit                     Soft Limit           Hard Limit           Units
    /// Max open files            1024                 4096                 files
    /// ```
    fn from_str(contents: &str) -> Result<Limits> {
        let row = contents
            .lines()
            .find_map(|line| line.strip_prefix("Max open files"))
            .ok_or_else(|| {
                ProcFsError::InsufficientData("no 'Max open files' row in limits".to_owned())
            })?;
        let mut values = row.split_whitespace();
        match (values.next(), values.next()) {
            (Some(soft), Some(hard)) => Ok(Limits {
                open_files: Limit {
                    soft: limit_value(soft)?,
                    hard: limit_value(hard)?,
                },
            }),
            _ => Err(ProcFsError::InsufficientData(format!(
                "'Max open files' row is missing a limit: '{}'",
                row.trim()
            ))),
        }
    }
}
