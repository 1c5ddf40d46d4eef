//! Structs and impls for the various files from the /proc filesystem
//!
//! Each file gets a struct or function to represent its data, with a
//! `from_pid` or `load` constructor that reads it and a `FromStr` impl that
//! does the parsing, so the parsing can be tested without a live process.

use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::num;
use std::path::Path;
use std::result::Result as StdResult;

use derive_more::From;

pub mod pid;

/// ProcFs errors
///
/// Every error from in this module can be converted into a `ProcFsError`
#[derive(Debug, From)]
pub enum ProcFsError {
    /// Errors originating in IO
    Io(io::Error),
    /// Error pulling all required data out of procfs
    InsufficientData(String),
    /// Happens when we try to parse an int from something in procfs
    InvalidInt(num::ParseIntError),
    /// Happens when we try to parse a line from /proc/<pid>/stat and got an error
    ParseStatError(ParseStatError),
    /// Happens when we get an invalid process state
    ParseStateError(ParseStateError),
}

impl ProcFsError {
    /// The kind of the underlying io error, if this came from reading a file
    pub fn io_kind(&self) -> Option<io::ErrorKind> {
        match self {
            ProcFsError::Io(e) => Some(e.kind()),
            _ => None,
        }
    }
}

impl fmt::Display for ProcFsError {
    fn fmt(&self, f: &mut fmt::Formatter) -> StdResult<(), fmt::Error> {
        use self::ProcFsError::*;
        match self {
            Io(e) => write!(f, "{}", e),
            InsufficientData(e) => write!(f, "{}", e),
            InvalidInt(e) => write!(f, "{}", e),
            ParseStatError(e) => write!(f, "{}", e),
            ParseStateError(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ProcFsError {}

#[derive(Debug)]
pub struct ParseStatError {
    pub line: String,
    pub field_name: &'static str,
    pub position: u8,
}

impl fmt::Display for ParseStatError {
    fn fmt(&self, f: &mut fmt::Formatter) -> StdResult<(), fmt::Error> {
        write!(
            f,
            "unable to parse '{}' at position {} from line '{}'",
            self.field_name, self.position, self.line
        )
    }
}

#[derive(Debug)]
pub struct ParseStateError {
    state: String,
}

impl fmt::Display for ParseStateError {
    fn fmt(&self, f: &mut fmt::Formatter) -> StdResult<(), fmt::Error> {
        write!(
            f,
            "String '{}' was not a valid state, expected one of R, S, D, W, T, t, X, Z",
            self.state
        )
    }
}

/// All the results are results with `ProcFsError`s
pub type Result<T> = StdResult<T, ProcFsError>;

/// Read a whole pseudo-file into a string
pub(crate) fn read_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let mut fh = File::open(path)?;
    let mut contents = String::new();
    fh.read_to_string(&mut contents)?;
    Ok(contents)
}

// ////////////////////////////////////////////////////////////////////////////
// System-Level totals

/// The number of CPUs the kernel is accounting time for
///
/// Read from the per-cpu lines of /proc/stat.
pub fn cpu_count() -> Result<usize> {
    let contents = read_file("/proc/stat")?;
    count_cpus(&contents)
}

/// Count the `cpuN` lines in the contents of /proc/stat
///
/// The first line is the `cpu` total, which we skip.
fn count_cpus(contents: &str) -> Result<usize> {
    let count = contents
        .lines()
        .filter(|line| {
            line.strip_prefix("cpu")
                .map_or(false, |rest| rest.starts_with(|c: char| c.is_ascii_digit()))
        })
        .count();
    if count == 0 {
        return Err(ProcFsError::InsufficientData(
            "/proc/stat does not list any cpus".to_owned(),
        ));
    }
    Ok(count)
}

// ////////////////////////////////////////////////////////////////////////////
// Testing
