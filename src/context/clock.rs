use chrono::Timelike;

/// Source of the current hour for `hour` rules
pub trait Clock: Send + Sync {
    /// Two-digit, zero-padded local hour ("00".."23")
    fn current_hour(&self) -> String;
}

/// Local wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn current_hour(&self) -> String {
        format_hour(chrono::Local::now().hour())
    }
}

/// Always reports the same hour. Used by `linkgate resolve --hour` and tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub u32);

impl Clock for FixedClock {
    fn current_hour(&self) -> String {
        format_hour(self.0 % 24)
    }
}

#[inline]
pub fn format_hour(hour: u32) -> String {
    format!("{:02}", hour)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_hour_pads() {
        assert_eq!(format_hour(0), "00");
        assert_eq!(format_hour(9), "09");
        assert_eq!(format_hour(23), "23");
    }

    #[test]
    fn test_system_clock_shape() {
        let hour = SystemClock.current_hour();
        assert_eq!(hour.len(), 2);
        let n: u32 = hour.parse().unwrap();
        assert!(n < 24);
    }

    #[test]
    fn test_fixed_clock_wraps() {
        assert_eq!(FixedClock(7).current_hour(), "07");
        assert_eq!(FixedClock(25).current_hour(), "01");
    }
}
