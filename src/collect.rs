//! Measure a single metric of a running process

use std::fmt;
use std::io;
use std::thread::sleep;
use std::time::{Duration, Instant};

use nix::unistd::Pid;
use tracing::debug;

use crate::procfs::pid::Process;
use crate::procfs::{self, ProcFsError};
use crate::sys::fs::cgroup::pids::Pids;

/// How long the cpu collector watches the process for
pub const CPU_SAMPLE_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Unit {
    Percent,
    Count,
}

impl Unit {
    /// The unit of measurement as it appears in performance data
    pub fn uom(self) -> &'static str {
        match self {
            Unit::Percent => "%",
            Unit::Count => "",
        }
    }
}

/// What a `Metric` measures
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MetricKind {
    OpenFds,
    Threads,
    CpuUsage,
    Tasks,
}

impl MetricKind {
    /// The performance data label
    pub fn label(self) -> &'static str {
        match self {
            MetricKind::OpenFds => "used_percent",
            MetricKind::Threads => "threads",
            MetricKind::CpuUsage => "cpu_percentage",
            MetricKind::Tasks => "tasks_percent",
        }
    }

    /// The performance data label for the raw count behind a percentage
    pub fn count_label(self) -> Option<&'static str> {
        match self {
            MetricKind::OpenFds => Some("open_fds"),
            MetricKind::Tasks => Some("tasks"),
            MetricKind::Threads | MetricKind::CpuUsage => None,
        }
    }

    pub fn unit(self) -> Unit {
        match self {
            MetricKind::OpenFds | MetricKind::CpuUsage | MetricKind::Tasks => Unit::Percent,
            MetricKind::Threads => Unit::Count,
        }
    }
}

/// A single sample, `value` is what thresholds get compared to
///
/// Metrics that are a percentage of a limit keep the raw `count`, and the
/// limit as their `capacity`. For the others `capacity` is the largest
/// `value` can get, if there is such a thing.
#[derive(Clone, Debug, PartialEq)]
pub struct Metric {
    pub kind: MetricKind,
    pub value: f64,
    pub capacity: Option<f64>,
    pub count: Option<u64>,
}

/// `used` as a rounded percentage of `limit`
///
/// An unlimited (or zero) limit can never be reached, so it reads as 0%.
fn percent_of(used: u64, limit: Option<u64>) -> f64 {
    match limit {
        Some(limit) if limit > 0 => (used as f64 * 100.0 / limit as f64).round(),
        _ => 0.0,
    }
}

impl Metric {
    pub fn unit(&self) -> Unit {
        self.kind.unit()
    }

    /// Open fds as a percentage of the soft limit
    pub fn open_fds(used: u64, limit: Option<u64>) -> Metric {
        Metric {
            kind: MetricKind::OpenFds,
            value: percent_of(used, limit),
            capacity: limit.map(|limit| limit as f64),
            count: Some(used),
        }
    }

    pub fn threads(count: u64) -> Metric {
        Metric {
            kind: MetricKind::Threads,
            value: count as f64,
            capacity: None,
            count: None,
        }
    }

    /// Percent of a single cpu, rounded to one decimal
    pub fn cpu_usage(percent: f64, cpus: usize) -> Metric {
        Metric {
            kind: MetricKind::CpuUsage,
            value: (percent * 10.0).round() / 10.0,
            capacity: Some(cpus as f64 * 100.0),
            count: None,
        }
    }

    /// Tasks in the process's cgroup as a percentage of the cgroup's limit
    pub fn tasks(used: u64, limit: Option<u64>) -> Metric {
        Metric {
            kind: MetricKind::Tasks,
            value: percent_of(used, limit),
            capacity: limit.map(|limit| limit as f64),
            count: Some(used),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self.kind {
            MetricKind::OpenFds => "Open FDs",
            MetricKind::Tasks => "Tasks",
            MetricKind::Threads => return write!(f, "{} threads", self.value),
            MetricKind::CpuUsage => return write!(f, "{}% CPU usage", self.value),
        };
        match (self.count, self.capacity) {
            (Some(used), Some(limit)) => write!(f, "{} {}% ({}/{})", name, self.value, used, limit),
            (Some(used), None) => write!(f, "{} {}% ({}/unlimited)", name, self.value, used),
            (None, _) => write!(f, "{} {}%", name, self.value),
        }
    }
}

#[derive(Debug)]
pub enum MetricCollectionError {
    /// There is no such process, or it exited while we were looking at it
    NoSuchProcess { pid: Pid },
    /// We are not allowed to look at the process
    AccessDenied { pid: Pid },
    /// procfs had something we couldn't make sense of
    ProcFs { pid: Pid, err: ProcFsError },
}

impl MetricCollectionError {
    /// Sort a procfs failure into the process being gone, off limits, or weird
    pub fn from_procfs(pid: Pid, err: ProcFsError) -> MetricCollectionError {
        match err.io_kind() {
            Some(io::ErrorKind::NotFound) => MetricCollectionError::NoSuchProcess { pid },
            Some(io::ErrorKind::PermissionDenied) => MetricCollectionError::AccessDenied { pid },
            _ => MetricCollectionError::ProcFs { pid, err },
        }
    }

    /// A short name for the kind of failure
    pub fn kind(&self) -> &'static str {
        match self {
            MetricCollectionError::NoSuchProcess { .. } => "NoSuchProcess",
            MetricCollectionError::AccessDenied { .. } => "AccessDenied",
            MetricCollectionError::ProcFs { .. } => "ProcFsError",
        }
    }
}

impl fmt::Display for MetricCollectionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MetricCollectionError::NoSuchProcess { pid } => {
                write!(f, "no process found (pid={})", pid)
            }
            MetricCollectionError::AccessDenied { pid } => {
                write!(f, "access denied reading process (pid={})", pid)
            }
            MetricCollectionError::ProcFs { pid, err } => {
                write!(f, "unable to read process (pid={}): {}", pid, err)
            }
        }
    }
}

impl std::error::Error for MetricCollectionError {}

/// Something that can take a measurement of a process
pub trait MetricCollector {
    fn collect(&self, pid: Pid) -> Result<Metric, MetricCollectionError>;
}

/// Load a process, insisting that it is actually running
fn running_process(pid: Pid) -> Result<Process, MetricCollectionError> {
    let process =
        Process::from_pid(pid).map_err(|e| MetricCollectionError::from_procfs(pid, e))?;
    if !process.is_running() {
        debug!(%pid, state = ?process.stat.state, "process is not running");
        return Err(MetricCollectionError::NoSuchProcess { pid });
    }
    Ok(process)
}

/// Open file descriptors compared to the soft `RLIMIT_NOFILE`
#[derive(Clone, Copy, Debug, Default)]
pub struct OpenFds;

impl MetricCollector for OpenFds {
    fn collect(&self, pid: Pid) -> Result<Metric, MetricCollectionError> {
        let process = running_process(pid)?;
        let fail = |e| MetricCollectionError::from_procfs(pid, e);
        let limit = process.limits().map_err(fail)?.open_files.soft;
        let used = process.open_fds().map_err(fail)?;
        debug!(%pid, used, ?limit, "counted open fds");
        Ok(Metric::open_fds(used, limit))
    }
}

/// The number of threads in the process
#[derive(Clone, Copy, Debug, Default)]
pub struct Threads;

impl MetricCollector for Threads {
    fn collect(&self, pid: Pid) -> Result<Metric, MetricCollectionError> {
        let process = running_process(pid)?;
        let count = process.stat.num_threads.max(0) as u64;
        debug!(%pid, count, "counted threads");
        Ok(Metric::threads(count))
    }
}

/// Percent of one cpu used by the process over `CPU_SAMPLE_INTERVAL`
///
/// Cpu usage is a rate, so this has to look twice: it blocks for the whole
/// interval.
#[derive(Clone, Copy, Debug)]
pub struct CpuUsage {
    interval: Duration,
}

impl Default for CpuUsage {
    fn default() -> CpuUsage {
        CpuUsage {
            interval: CPU_SAMPLE_INTERVAL,
        }
    }
}

impl CpuUsage {
    pub fn new() -> CpuUsage {
        CpuUsage::default()
    }
}

impl MetricCollector for CpuUsage {
    fn collect(&self, pid: Pid) -> Result<Metric, MetricCollectionError> {
        let fail = |e| MetricCollectionError::from_procfs(pid, e);
        let cpus = procfs::cpu_count().map_err(fail)?;

        let process = running_process(pid)?;
        let start = Instant::now();
        sleep(self.interval);
        let end = process.refresh().map_err(fail)?;
        let elapsed = start.elapsed();

        if !process.is_same_process(&end) || !end.state.is_alive() {
            debug!(%pid, "process exited while sampling cpu");
            return Err(MetricCollectionError::NoSuchProcess { pid });
        }

        let used = end.cpu_time() - process.stat.cpu_time();
        let percent = used.as_secs_f64() / elapsed.as_secs_f64() * 100.0;
        debug!(%pid, jiffies = %used, ?elapsed, percent, "sampled cpu");
        Ok(Metric::cpu_usage(percent, cpus))
    }
}

/// Tasks in the process's cgroup compared to the cgroup's `pids.max`
///
/// For a systemd service these are the unit's `TasksCurrent` and `TasksMax`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Tasks;

impl MetricCollector for Tasks {
    fn collect(&self, pid: Pid) -> Result<Metric, MetricCollectionError> {
        let process = running_process(pid)?;
        let fail = |e| MetricCollectionError::from_procfs(pid, e);
        let cgroups = process.cgroups().map_err(fail)?;
        let group = cgroups.pids().ok_or_else(|| {
            fail(ProcFsError::InsufficientData(
                "process is in no cgroup with task accounting".to_owned(),
            ))
        })?;
        let pids = Pids::load(group).map_err(fail)?;
        debug!(%pid, cgroup = %group.path, used = pids.current, max = ?pids.max, "counted tasks");
        Ok(Metric::tasks(pids.current, pids.max))
    }
}

#[cfg(test)]
mod unit {
    use std::io;

    use assert_matches::assert_matches;
    use nix::unistd::Pid;

    use super::*;

    #[test]
    fn fd_percent_is_rounded() {
        let metric = Metric::open_fds(8188, Some(8192));
        assert_eq!(metric.value, 100.0);
        assert_eq!(metric.to_string(), "Open FDs 100% (8188/8192)");
        assert_eq!(metric.capacity, Some(8192.0));
        assert_eq!(metric.count, Some(8188));

        assert_eq!(Metric::open_fds(1, Some(3)).value, 33.0);
        assert_eq!(Metric::open_fds(2, Some(3)).value, 67.0);
    }

    #[test]
    fn unlimited_fds_are_never_used_up() {
        let metric = Metric::open_fds(5000, None);
        assert_eq!(metric.value, 0.0);
        assert_eq!(metric.to_string(), "Open FDs 0% (5000/unlimited)");
        assert_eq!(metric.capacity, None);
        assert_eq!(Metric::open_fds(3, Some(0)).value, 0.0);
    }

    #[test]
    fn tasks_are_a_percentage_of_the_cgroup_limit() {
        let metric = Metric::tasks(24, Some(32));
        assert_eq!(metric.value, 75.0);
        assert_eq!(metric.unit(), Unit::Percent);
        assert_eq!(metric.kind.count_label(), Some("tasks"));
        assert_eq!(metric.to_string(), "Tasks 75% (24/32)");
        assert_eq!(Metric::tasks(7, None).to_string(), "Tasks 0% (7/unlimited)");
    }

    #[test]
    fn cpu_has_capacity_per_cpu() {
        let metric = Metric::cpu_usage(12.34, 4);
        assert_eq!(metric.value, 12.3);
        assert_eq!(metric.capacity, Some(400.0));
        assert_eq!(metric.unit(), Unit::Percent);
        assert_eq!(metric.to_string(), "12.3% CPU usage");
    }

    #[test]
    fn threads_are_counts() {
        let metric = Metric::threads(40);
        assert_eq!(metric.unit(), Unit::Count);
        assert_eq!(metric.capacity, None);
        assert_eq!(metric.to_string(), "40 threads");
    }

    #[test]
    fn procfs_errors_are_sorted() {
        let pid = Pid::from_raw(1234);
        let gone = ProcFsError::Io(io::Error::from(io::ErrorKind::NotFound));
        assert_matches!(
            MetricCollectionError::from_procfs(pid, gone),
            MetricCollectionError::NoSuchProcess { .. }
        );

        let denied = ProcFsError::Io(io::Error::from(io::ErrorKind::PermissionDenied));
        let err = MetricCollectionError::from_procfs(pid, denied);
        assert_eq!(err.kind(), "AccessDenied");
        assert_eq!(err.to_string(), "access denied reading process (pid=1234)");
        assert_eq!(
            MetricCollectionError::NoSuchProcess { pid }.to_string(),
            "no process found (pid=1234)"
        );

        let weird = ProcFsError::InsufficientData("huh".into());
        assert_eq!(MetricCollectionError::from_procfs(pid, weird).kind(), "ProcFsError");
    }
}
