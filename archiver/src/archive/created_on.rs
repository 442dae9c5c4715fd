//! Creation timestamp recorded in the manifest.
//!
//! Timestamps are stored as opaque `YYYY-MM-DDThh:mm:ssZ` strings. The
//! current time is formatted from `SystemTime` to avoid pulling in a date
//! crate.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, SystemTimeError, UNIX_EPOCH};

/// An ISO 8601 UTC timestamp recording when the archive was created.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CreatedOn(String);

impl CreatedOn {
    /// Wrap a timestamp string without validating it.
    ///
    /// # Examples
    ///
    /// ```
    /// use model_archiver::archive::created_on::CreatedOn;
    ///
    /// let ts = CreatedOn::new("2026-10-16T09:30:00Z");
    /// assert_eq!(ts.as_str(), "2026-10-16T09:30:00Z");
    /// ```
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Capture the current UTC time.
    ///
    /// # Errors
    ///
    /// Returns an error if the system clock is set before the Unix epoch.
    pub fn now() -> Result<Self, SystemTimeError> {
        let secs = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
        Ok(Self(format_epoch_secs(secs)))
    }

    /// Return the timestamp as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CreatedOn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Return `true` if `ts` has the `YYYY-MM-DDThh:mm:ssZ` shape.
///
/// # Examples
///
/// ```
/// use model_archiver::archive::created_on::is_iso8601_utc;
///
/// assert!(is_iso8601_utc("2026-10-16T09:30:00Z"));
/// assert!(!is_iso8601_utc("16/10/2026 09:30:00"));
/// ```
#[must_use]
pub fn is_iso8601_utc(ts: &str) -> bool {
    let b = ts.as_bytes();
    let digits = |range: std::ops::Range<usize>| {
        b.get(range)
            .is_some_and(|part| part.iter().all(u8::is_ascii_digit))
    };
    let separator = |index: usize, expected: u8| b.get(index) == Some(&expected);
    b.len() == 20
        && separator(4, b'-')
        && separator(7, b'-')
        && separator(10, b'T')
        && separator(13, b':')
        && separator(16, b':')
        && separator(19, b'Z')
        && digits(0..4)
        && digits(5..7)
        && digits(8..10)
        && digits(11..13)
        && digits(14..16)
        && digits(17..19)
}

/// Format a Unix epoch timestamp as `YYYY-MM-DDThh:mm:ssZ`.
fn format_epoch_secs(epoch_secs: u64) -> String {
    let (year, month, day) = civil_from_epoch(epoch_secs);
    let day_secs = epoch_secs % 86_400;
    let hour = day_secs / 3_600;
    let minute = (day_secs % 3_600) / 60;
    let second = day_secs % 60;
    format!("{year:04}-{month:02}-{day:02}T{hour:02}:{minute:02}:{second:02}Z")
}

/// Convert a Unix epoch timestamp to a `(year, month, day)` triple using
/// Howard Hinnant's public-domain `civil_from_days` algorithm.
fn civil_from_epoch(epoch_secs: u64) -> (u64, u64, u64) {
    let days = epoch_secs / 86_400;
    let z = days + 719_468;
    let era = z / 146_097;
    let doe = z % 146_097;
    let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + u64::from(month <= 2);
    (year, month, day)
}
