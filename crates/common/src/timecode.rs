//! Playback time formatting.

/// Format a position in seconds as `mm:ss`.
///
/// Fractional seconds are floored. Negative or non-finite input reads as zero.
/// Minutes are not wrapped into hours, so a 75 minute video shows `75:00`.
pub fn format_time(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// Fraction of `duration` reached at `current`, in `[0, 1]`.
///
/// Returns 0 while the duration is still unknown.
pub fn progress_fraction(current: f64, duration: f64) -> f64 {
    if duration > 0.0 && current.is_finite() {
        (current / duration).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0.0), "00:00");
        assert_eq!(format_time(9.99), "00:09");
        assert_eq!(format_time(75.5), "01:15");
        assert_eq!(format_time(212.0), "03:32");
        assert_eq!(format_time(4500.0), "75:00");
    }

    #[test]
    fn test_format_time_degenerate() {
        assert_eq!(format_time(-3.0), "00:00");
        assert_eq!(format_time(f64::NAN), "00:00");
        assert_eq!(format_time(f64::INFINITY), "00:00");
    }

    #[test]
    fn test_progress_fraction() {
        assert_eq!(progress_fraction(10.0, 0.0), 0.0);
        assert_eq!(progress_fraction(53.0, 212.0), 0.25);
        assert_eq!(progress_fraction(300.0, 212.0), 1.0);
    }
}
