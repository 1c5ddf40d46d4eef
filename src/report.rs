//! Render check results in the Nagios plugin output format
//!
//! ```text
//! CRITICAL: Open FDs 100% (8188/8192) for PID 15136 is outside critical limits (100>85)|used_percent=100%;75;85;; open_fds=8188;;;0;8192
//! ```

use std::fmt;

use crate::collect::Metric;
use crate::threshold::ThresholdRange;
use crate::Status;

/// One `label=value[UOM];warn;crit;min;max` performance data field
#[derive(Clone, Debug, PartialEq)]
pub struct PerfData {
    pub label: &'static str,
    pub value: f64,
    pub uom: &'static str,
    pub warn: Option<String>,
    pub crit: Option<String>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl PerfData {
    pub fn new(label: &'static str, value: f64) -> PerfData {
        PerfData {
            label,
            value,
            uom: "",
            warn: None,
            crit: None,
            min: None,
            max: None,
        }
    }
}

fn opt<T: fmt::Display>(val: &Option<T>) -> String {
    val.as_ref().map_or_else(String::new, |v| v.to_string())
}

impl fmt::Display for PerfData {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}={}{};{};{};{};{}",
            self.label,
            self.value,
            self.uom,
            opt(&self.warn),
            opt(&self.crit),
            opt(&self.min),
            opt(&self.max)
        )
    }
}

/// Performance data for a metric checked against `warning` and `critical`
///
/// The thresholds are echoed back exactly as they were given. Metrics that
/// are a percentage of a limit get a second, unthresholded field for the raw
/// count, bounded by the limit.
pub fn perf_data(
    metric: &Metric,
    warning: &ThresholdRange,
    critical: &ThresholdRange,
) -> Vec<PerfData> {
    let main = PerfData {
        uom: metric.unit().uom(),
        warn: Some(warning.to_string()),
        crit: Some(critical.to_string()),
        ..PerfData::new(metric.kind.label(), metric.value)
    };
    match (metric.kind.count_label(), metric.count) {
        (Some(label), Some(count)) => vec![
            main,
            PerfData {
                min: Some(0.0),
                max: metric.capacity,
                ..PerfData::new(label, count as f64)
            },
        ],
        _ => vec![PerfData {
            min: metric.capacity.map(|_| 0.0),
            max: metric.capacity,
            ..main
        }],
    }
}

/// The outcome of a single run of a check
#[derive(Clone, Debug, PartialEq)]
pub struct CheckResult {
    pub status: Status,
    pub message: String,
    pub perf_data: Vec<PerfData>,
}

impl CheckResult {
    /// The exit code for the plugin
    pub fn exit_code(&self) -> i32 {
        self.status.code()
    }
}

/// Render a result as a single line of plugin output
///
/// The `|` is left off when there is no performance data.
pub fn format(result: &CheckResult) -> String {
    let mut line = format!("{}: {}", result.status, result.message);
    if !result.perf_data.is_empty() {
        let fields = result
            .perf_data
            .iter()
            .map(|field| field.to_string())
            .collect::<Vec<_>>();
        line.push('|');
        line.push_str(&fields.join(" "));
    }
    line
}

impl fmt::Display for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&format(self))
    }
}
