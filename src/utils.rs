use crate::core::BYTES_PER_GB;
use clap::builder::{
    styling::{AnsiColor, Effects},
    Styles,
};
use std::time::Duration;

/// Format duration for display in HH:MM:SS format.
///
/// Hours are the largest unit and may exceed 24, which is what PBS expects
/// in a `walltime=` resource request.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use gsplit::utils::format_duration;
///
/// assert_eq!(format_duration(Duration::from_secs(45)), "00:00:45");
/// assert_eq!(format_duration(Duration::from_secs(9045)), "02:30:45");
/// assert_eq!(format_duration(Duration::from_secs(96 * 3600)), "96:00:00");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Converts fractional hours to a duration rounded up to the whole second.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use gsplit::utils::hours_to_duration;
///
/// assert_eq!(hours_to_duration(1.5), Duration::from_secs(5400));
/// assert_eq!(hours_to_duration(0.0), Duration::ZERO);
/// ```
pub fn hours_to_duration(hours: f64) -> Duration {
    if !hours.is_finite() || hours <= 0.0 {
        return Duration::ZERO;
    }
    Duration::from_secs((hours * 3600.0).ceil() as u64)
}

/// Format a byte count in GB with two decimals, as used in plan reports.
///
/// # Examples
///
/// ```
/// use gsplit::utils::format_gb;
///
/// assert_eq!(format_gb(0), "0.00 GB");
/// assert_eq!(format_gb(1 << 30), "1.00 GB");
/// assert_eq!(format_gb(3 << 29), "1.50 GB");
/// ```
pub fn format_gb(bytes: u64) -> String {
    format!("{:.2} GB", bytes as f64 / BYTES_PER_GB as f64)
}

pub const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());
