//! Standard APIs in Linux

use std::fmt;
use std::ops;

use lazy_static::lazy_static;
use nix::unistd::{sysconf, SysconfVar};

/// What the kernel reports when `sysconf` can't tell us, see `man 7 time`
const DEFAULT_USER_HZ: u64 = 100;

lazy_static! {
    /// Clock ticks per second, the unit of every cpu counter in procfs
    pub static ref USER_HZ: u64 = match sysconf(SysconfVar::CLK_TCK) {
        Ok(Some(hz)) if hz > 0 => hz as u64,
        _ => DEFAULT_USER_HZ,
    };
}

/// A value that is in USER_HZ units
///
/// This generally represents some time period of CPU usage
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Jiffies(u64);

impl Jiffies {
    pub fn new(val: u64) -> Jiffies {
        Jiffies(val)
    }

    /// Convert to seconds using the kernel's `USER_HZ`
    pub fn as_secs_f64(self) -> f64 {
        self.secs_at(*USER_HZ)
    }

    fn secs_at(self, hz: u64) -> f64 {
        self.0 as f64 / hz as f64
    }
}

impl From<u64> for Jiffies {
    fn from(val: u64) -> Jiffies {
        Jiffies(val)
    }
}

impl fmt::Display for Jiffies {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ops::Add for Jiffies {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Jiffies(self.0 + rhs.0)
    }
}

/// Counters only go up, but a reused pid can make them look like they didn't
impl ops::Sub for Jiffies {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Jiffies(self.0.saturating_sub(rhs.0))
    }
}

#[cfg(test)]
mod unit {
    use super::Jiffies;

    #[test]
    fn jiffies_convert_to_seconds() {
        assert_eq!(Jiffies::new(250).secs_at(100), 2.5);
        assert_eq!(Jiffies::new(0).secs_at(100), 0.0);
    }

    #[test]
    fn jiffies_subtraction_saturates() {
        assert_eq!(Jiffies::new(3) - Jiffies::new(5), Jiffies::new(0));
        assert_eq!(Jiffies::new(8) - Jiffies::new(5), Jiffies::new(3));
        assert_eq!(Jiffies::new(8) + Jiffies::new(5), Jiffies::new(13));
    }

    #[test]
    fn user_hz_is_sane() {
        assert!(*super::USER_HZ > 0);
    }
}
