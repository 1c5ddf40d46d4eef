//! Run a check from start to finish
//!
//! Every check goes through the same steps: parse the thresholds, resolve
//! the pid, collect the metric, compare it to the thresholds. Any of the
//! first three can fail, and a failure is turned into an `UNKNOWN` result
//! here and nowhere else.

use std::fmt;
use std::time::Duration;

use derive_more::From;
use nix::unistd::Pid;
use tracing::{debug, warn};

use crate::collect::{Metric, MetricCollectionError, MetricCollector};
use crate::report::{self, CheckResult};
use crate::resolve::{PidResolutionError, PidResolver};
use crate::threshold::{ThresholdParseError, ThresholdRange};
use crate::Status;

/// Everything a check needs to know to run once
#[derive(Clone, Debug)]
pub struct CheckConfig {
    /// Nagios range for the warning threshold
    pub warning: String,
    /// Nagios range for the critical threshold
    pub critical: String,
    /// Shell command that prints the pid of the process to check
    pub pid_cmd: String,
    pub pid_timeout: Duration,
    /// Return errors instead of converting them into `UNKNOWN`
    pub debug: bool,
}

/// A failure in one of the steps of a check
#[derive(Debug, From)]
pub enum CheckError {
    Threshold(ThresholdParseError),
    PidResolution(PidResolutionError),
    MetricCollection(MetricCollectionError),
}

impl CheckError {
    /// The step that failed
    pub fn operation(&self) -> &'static str {
        match self {
            CheckError::Threshold(_) => "parse_thresholds",
            CheckError::PidResolution(_) => "resolve_pid",
            CheckError::MetricCollection(_) => "collect_metric",
        }
    }

    /// A name for what went wrong
    pub fn kind(&self) -> &'static str {
        match self {
            CheckError::Threshold(_) => "ThresholdParseError",
            CheckError::PidResolution(_) => "PidResolutionError",
            CheckError::MetricCollection(e) => e.kind(),
        }
    }
}

impl fmt::Display for CheckError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CheckError::Threshold(e) => write!(f, "{}", e),
            CheckError::PidResolution(e) => write!(f, "{}", e),
            CheckError::MetricCollection(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CheckError {}

impl From<&CheckError> for CheckResult {
    fn from(err: &CheckError) -> CheckResult {
        CheckResult {
            status: Status::Unknown,
            message: format!(
                "Got exception while running {}: {}: {}",
                err.operation(),
                err.kind(),
                err
            ),
            perf_data: Vec::new(),
        }
    }
}

/// Runs one check of one process with a specific collector
pub struct CheckRunner<C> {
    config: CheckConfig,
    collector: C,
}

impl<C: MetricCollector> CheckRunner<C> {
    pub fn new(config: CheckConfig, collector: C) -> CheckRunner<C> {
        CheckRunner { config, collector }
    }

    /// Run the check, returning the first error encountered
    pub fn run(&self) -> Result<CheckResult, CheckError> {
        let warning: ThresholdRange = self.config.warning.parse()?;
        let critical: ThresholdRange = self.config.critical.parse()?;
        debug!(%warning, %critical, "parsed thresholds");

        let resolver = PidResolver::new(self.config.pid_cmd.as_str(), self.config.pid_timeout);
        let pid = resolver.resolve()?;
        debug!(%pid, "resolved pid");

        let metric = self.collector.collect(pid)?;
        debug!(?metric, "collected metric");

        let result = evaluate(pid, &metric, &warning, &critical);
        debug!(status = %result.status, "evaluated thresholds");
        Ok(result)
    }

    /// Run the check, turning errors into an `UNKNOWN` result
    ///
    /// In debug mode errors are returned as-is instead, so that they can be
    /// inspected.
    pub fn execute(&self) -> Result<CheckResult, CheckError> {
        match self.run() {
            Ok(result) => Ok(result),
            Err(err) if self.config.debug => Err(err),
            Err(err) => {
                warn!(operation = err.operation(), error = %err, "check failed");
                Ok(CheckResult::from(&err))
            }
        }
    }
}

/// Compare a metric to its thresholds
///
/// Critical is checked first, so it wins when both thresholds fire.
pub fn evaluate(
    pid: Pid,
    metric: &Metric,
    warning: &ThresholdRange,
    critical: &ThresholdRange,
) -> CheckResult {
    let value = metric.value;
    let breach = |status: Status, range: &ThresholdRange| {
        let (side, violation) = match range.violation(value) {
            Some(v) if range.is_inverted() => ("inside", v),
            Some(v) => ("outside", v),
            None => ("outside", String::new()),
        };
        let level = if status == Status::Critical {
            "critical"
        } else {
            "warning"
        };
        format!(
            "{} for PID {} is {} {} limits ({})",
            metric, pid, side, level, violation
        )
    };

    let (status, message) = if critical.evaluate(value) {
        (Status::Critical, breach(Status::Critical, critical))
    } else if warning.evaluate(value) {
        (Status::Warning, breach(Status::Warning, warning))
    } else {
        (
            Status::Ok,
            format!(
                "{} for PID {} is inside limits (warning {}, critical {})",
                metric, pid, warning, critical
            ),
        )
    };

    CheckResult {
        status,
        message,
        perf_data: report::perf_data(metric, warning, critical),
    }
}
