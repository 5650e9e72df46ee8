//! Metadata formatting.
//!
//! Pure conversions from raw `stat` values into the strings shown by the
//! listing and info views.

use chrono::{DateTime, Local, TimeZone, Utc};

/// File type mask of `st_mode`.
const S_IFMT: u32 = 0o170000;
/// Directory type bits of `st_mode`.
const S_IFDIR: u32 = 0o040000;

/// Size units, in steps of 1024.
const SIZE_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Owner, group and other rwx bits, most significant first.
const PERMISSION_BITS: [(u32, char); 9] = [
    (0o400, 'r'),
    (0o200, 'w'),
    (0o100, 'x'),
    (0o040, 'r'),
    (0o020, 'w'),
    (0o010, 'x'),
    (0o004, 'r'),
    (0o002, 'w'),
    (0o001, 'x'),
];

/// Timestamp precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeFormat {
    /// `YYYY-MM-DD HH:MM`, used by detailed listings.
    Minutes,
    /// `YYYY-MM-DD HH:MM:SS`, used by the info view.
    Seconds,
}

impl TimeFormat {
    fn pattern(&self) -> &'static str {
        match self {
            Self::Minutes => "%Y-%m-%d %H:%M",
            Self::Seconds => "%Y-%m-%d %H:%M:%S",
        }
    }
}

/// Render `st_mode` as a ten character permission string.
///
/// The first character is `d` for directories and `-` for everything else,
/// followed by the user, group and other rwx triplets.
pub fn permission_string(mode: u32) -> String {
    let mut perms = String::with_capacity(10);
    perms.push(if mode & S_IFMT == S_IFDIR { 'd' } else { '-' });
    for (bit, ch) in PERMISSION_BITS {
        perms.push(if mode & bit != 0 { ch } else { '-' });
    }
    perms
}

/// Permission bits as a zero-padded three digit octal string.
pub fn octal_mode(mode: u32) -> String {
    format!("{:03o}", mode & 0o777)
}

/// Human-readable size with two decimals, e.g. `1.50 KB`.
///
/// Units stop at TB; larger sizes are expressed in TB.
pub fn format_size(bytes: u64) -> String {
    let mut size = bytes as f64;
    let mut unit = 0;

    while size >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    format!("{:.2} {}", size, SIZE_UNITS[unit])
}

/// Format a timestamp in the local timezone.
pub fn format_time(ts: &DateTime<Utc>, format: TimeFormat) -> String {
    format_time_in(ts, &Local, format)
}

/// Format a timestamp in an explicit timezone.
pub fn format_time_in<Tz>(ts: &DateTime<Utc>, tz: &Tz, format: TimeFormat) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    ts.with_timezone(tz).format(format.pattern()).to_string()
}
