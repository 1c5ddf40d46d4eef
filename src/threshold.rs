//! Nagios threshold ranges
//!
//! The format is described in the [Nagios plugin guidelines][guidelines]:
//!
//! ```text
//! 10        alert if < 0 or > 10, (outside the range of {0 .. 10})
//! 10:       alert if < 10, (outside {10 .. ∞})
//! ~:10      alert if > 10, (outside the range of {-∞ .. 10})
//! 10:20     alert if < 10 or > 20, (outside the range of {10 .. 20})
//! @10:20    alert if ≥ 10 and ≤ 20, (inside the range of {10 .. 20})
//! ```
//!
//! [guidelines]: https://nagios-plugins.org/doc/guidelines.html#THRESHOLDFORMAT

use std::fmt;
use std::str::FromStr;

/// A warning or critical threshold
///
/// Keeps the text it was parsed from, which is what gets echoed back in
/// performance data.
#[derive(Clone, Debug, PartialEq)]
pub struct ThresholdRange {
    raw: String,
    lower: f64,
    upper: f64,
    inverted: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ThresholdParseError {
    Empty,
    /// A colon with nothing usable on either side of it, like `:` or `@:`
    MissingBounds { spec: String },
    InvalidNumber { spec: String, bound: String },
    /// The lower bound is greater than the upper bound
    InvertedBounds { spec: String, lower: f64, upper: f64 },
}

impl fmt::Display for ThresholdParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use self::ThresholdParseError::*;
        match self {
            Empty => write!(f, "threshold cannot be empty"),
            MissingBounds { spec } => write!(f, "threshold '{}' has no bounds", spec),
            InvalidNumber { spec, bound } => write!(
                f,
                "threshold '{}' has bound '{}' which is not a number",
                spec, bound
            ),
            InvertedBounds { spec, lower, upper } => write!(
                f,
                "threshold '{}' has a start ({}) greater than its end ({})",
                spec, lower, upper
            ),
        }
    }
}

impl std::error::Error for ThresholdParseError {}

impl ThresholdRange {
    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }

    /// True when the range was prefixed with `@`
    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    /// The text this range was parsed from
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Whether `value` should raise an alert
    ///
    /// A plain range alerts when the value is outside of it, an inverted one
    /// when the value is inside. Bounds are part of the range either way.
    pub fn evaluate(&self, value: f64) -> bool {
        let inside = self.lower <= value && value <= self.upper;
        inside == self.inverted
    }

    /// Describe the comparison that made `evaluate` fire, if it did
    ///
    /// Something like `100>85` or `10<=15<=20`.
    pub fn violation(&self, value: f64) -> Option<String> {
        if !self.evaluate(value) {
            None
        } else if self.inverted {
            Some(format!("{}<={}<={}", self.lower, value, self.upper))
        } else if value < self.lower {
            Some(format!("{}<{}", value, self.lower))
        } else {
            Some(format!("{}>{}", value, self.upper))
        }
    }
}

fn parse_bound(spec: &str, bound: &str) -> Result<f64, ThresholdParseError> {
    match bound.parse::<f64>() {
        Ok(val) if val.is_finite() => Ok(val),
        _ => Err(ThresholdParseError::InvalidNumber {
            spec: spec.to_owned(),
            bound: bound.to_owned(),
        }),
    }
}

impl FromStr for ThresholdRange {
    type Err = ThresholdParseError;

    fn from_str(spec: &str) -> Result<ThresholdRange, ThresholdParseError> {
        let spec = spec.trim();
        let (inverted, range) = match spec.strip_prefix('@') {
            Some(rest) => (true, rest),
            None => (false, spec),
        };
        if range.is_empty() {
            return Err(ThresholdParseError::Empty);
        }

        let (lower, upper) = match range.split_once(':') {
            None => (0.0, parse_bound(spec, range)?),
            Some(("", "")) => {
                return Err(ThresholdParseError::MissingBounds {
                    spec: spec.to_owned(),
                })
            }
            Some((start, end)) => {
                let lower = match start {
                    "" => 0.0,
                    "~" => f64::NEG_INFINITY,
                    start => parse_bound(spec, start)?,
                };
                let upper = match end {
                    "" => f64::INFINITY,
                    end => parse_bound(spec, end)?,
                };
                (lower, upper)
            }
        };

        if lower > upper {
            return Err(ThresholdParseError::InvertedBounds {
                spec: spec.to_owned(),
                lower,
                upper,
            });
        }
        Ok(ThresholdRange {
            raw: spec.to_owned(),
            lower,
            upper,
            inverted,
        })
    }
}

impl fmt::Display for ThresholdRange {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
mod unit {
    use assert_matches::assert_matches;

    use super::{ThresholdParseError, ThresholdRange};

    fn range(s: &str) -> ThresholdRange {
        s.parse()
            .unwrap_or_else(|e| panic!("'{}' should parse: {}", s, e))
    }

    #[test]
    fn bare_value_is_zero_to_value() {
        let r = range("10");
        assert_eq!((r.lower(), r.upper(), r.is_inverted()), (0.0, 10.0, false));
    }

    #[test]
    fn open_ended_ranges() {
        let r = range("10:");
        assert_eq!((r.lower(), r.upper()), (10.0, f64::INFINITY));

        let r = range("~:10");
        assert_eq!((r.lower(), r.upper()), (f64::NEG_INFINITY, 10.0));

        let r = range(":10");
        assert_eq!((r.lower(), r.upper()), (0.0, 10.0));

        let r = range("~:");
        assert_eq!((r.lower(), r.upper()), (f64::NEG_INFINITY, f64::INFINITY));
    }

    #[test]
    fn closed_and_inverted_ranges() {
        let r = range("10:20");
        assert_eq!((r.lower(), r.upper(), r.is_inverted()), (10.0, 20.0, false));

        let r = range("@10:20");
        assert_eq!((r.lower(), r.upper(), r.is_inverted()), (10.0, 20.0, true));

        let r = range("@5");
        assert_eq!((r.lower(), r.upper(), r.is_inverted()), (0.0, 5.0, true));

        let r = range("0.5:99.5");
        assert_eq!((r.lower(), r.upper()), (0.5, 99.5));

        let r = range("-10:-5");
        assert_eq!((r.lower(), r.upper()), (-10.0, -5.0));
    }

    #[test]
    fn keeps_the_original_text() {
        assert_eq!(range("@10:20").to_string(), "@10:20");
        assert_eq!(range("~:10").as_str(), "~:10");
    }

    #[test]
    fn rejects_bad_ranges() {
        assert_matches!(
            "20:10".parse::<ThresholdRange>(),
            Err(ThresholdParseError::InvertedBounds { .. })
        );
        assert_matches!(
            "-5".parse::<ThresholdRange>(),
            Err(ThresholdParseError::InvertedBounds { .. })
        );
        assert_matches!("".parse::<ThresholdRange>(), Err(ThresholdParseError::Empty));
        assert_matches!("@".parse::<ThresholdRange>(), Err(ThresholdParseError::Empty));
        assert_matches!(
            ":".parse::<ThresholdRange>(),
            Err(ThresholdParseError::MissingBounds { .. })
        );
        assert_matches!(
            "@:".parse::<ThresholdRange>(),
            Err(ThresholdParseError::MissingBounds { .. })
        );
        for bad in &["ten", "10:x", "~", "10:~", "1:2:3", "inf", "NaN", "@@10"] {
            assert_matches!(
                bad.parse::<ThresholdRange>(),
                Err(ThresholdParseError::InvalidNumber { .. }),
                "{} should be an invalid number",
                bad
            );
        }
    }

    #[test]
    fn plain_ranges_fire_outside_only() {
        let bounds = [(0.0, 0.0), (0.0, 10.0), (-3.5, 7.25), (10.0, 20.0), (85.0, 85.0)];
        let offsets = [-100.0, -1.0, -0.001, 0.0, 0.001, 0.5, 1.0, 100.0];
        for &(a, b) in bounds.iter() {
            let r = range(&format!("{}:{}", a, b));
            for &v in [a, b].iter().chain(offsets.iter()) {
                for &candidate in &[v, a + v, b + v] {
                    assert_eq!(
                        r.evaluate(candidate),
                        candidate < a || candidate > b,
                        "{}:{} with {}",
                        a,
                        b,
                        candidate
                    );
                }
            }
            assert!(!r.evaluate(a), "lower bound alerted for {}:{}", a, b);
            assert!(!r.evaluate(b), "upper bound alerted for {}:{}", a, b);
        }
    }

    #[test]
    fn inverted_ranges_fire_inside_only() {
        let bounds = [(0.0, 0.0), (0.0, 10.0), (-3.5, 7.25), (10.0, 20.0), (85.0, 85.0)];
        let offsets = [-100.0, -1.0, -0.001, 0.0, 0.001, 0.5, 1.0, 100.0];
        for &(a, b) in bounds.iter() {
            let r = range(&format!("@{}:{}", a, b));
            for &v in [a, b].iter().chain(offsets.iter()) {
                for &candidate in &[v, a + v, b + v] {
                    assert_eq!(
                        r.evaluate(candidate),
                        a <= candidate && candidate <= b,
                        "@{}:{} with {}",
                        a,
                        b,
                        candidate
                    );
                }
            }
            assert!(r.evaluate(a), "lower bound did not alert for @{}:{}", a, b);
            assert!(r.evaluate(b), "upper bound did not alert for @{}:{}", a, b);
        }
    }

    #[test]
    fn infinite_bounds_never_fire_on_their_side() {
        assert!(!range("10:").evaluate(1e300));
        assert!(range("10:").evaluate(9.99));
        assert!(!range("~:10").evaluate(-1e300));
        assert!(range("~:10").evaluate(10.01));
        assert!(!range("~:").evaluate(0.0));
    }

    #[test]
    fn violations_describe_the_failed_test() {
        assert_eq!(range("85").violation(100.0), Some("100>85".to_owned()));
        assert_eq!(range("10:").violation(3.0), Some("3<10".to_owned()));
        assert_eq!(range("@10:20").violation(15.0), Some("10<=15<=20".to_owned()));
        assert_eq!(range("85").violation(85.0), None);
        assert_eq!(range("@10:20").violation(25.0), None);
    }
}
