//! Timeout value object

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::domain::error::TimeoutParseError;

/// How long a notification stays on screen before it is withdrawn.
/// Immutable and validated on creation; never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timeout {
    milliseconds: u64,
}

impl Timeout {
    /// Create a Timeout from milliseconds. Zero yields `None`.
    pub const fn from_millis(ms: u64) -> Option<Self> {
        if ms == 0 {
            None
        } else {
            Some(Self { milliseconds: ms })
        }
    }

    /// Create a Timeout from seconds. Zero, or a value too large to hold in
    /// milliseconds, yields `None`.
    pub const fn from_secs(secs: u64) -> Option<Self> {
        match secs.checked_mul(1000) {
            Some(ms) => Self::from_millis(ms),
            None => None,
        }
    }

    /// Create a Timeout from a std duration, truncated to milliseconds.
    pub fn from_std(duration: Duration) -> Option<Self> {
        Self::from_millis(duration.as_millis().min(u64::MAX as u128) as u64)
    }

    /// Get timeout in seconds
    pub const fn as_secs(&self) -> u64 {
        self.milliseconds / 1000
    }

    /// Get timeout in milliseconds
    pub const fn as_millis(&self) -> u64 {
        self.milliseconds
    }

    /// Convert to std::time::Duration
    pub const fn as_std(&self) -> Duration {
        Duration::from_millis(self.milliseconds)
    }
}

impl From<Timeout> for Duration {
    fn from(timeout: Timeout) -> Self {
        timeout.as_std()
    }
}

impl FromStr for Timeout {
    type Err = TimeoutParseError;

    /// Parse a timeout string.
    /// Supported formats: "5s", "1m", "1m30s", "90s"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim().to_lowercase();
        let err = || TimeoutParseError {
            input: s.to_string(),
        };

        let mut minutes: Option<u64> = None;
        let mut seconds: Option<u64> = None;
        let mut current_num = String::new();

        for ch in input.chars() {
            if ch.is_ascii_digit() {
                current_num.push(ch);
            } else if ch == 'm' && !current_num.is_empty() {
                // Minutes come first and only once
                if minutes.is_some() || seconds.is_some() {
                    return Err(err());
                }
                minutes = Some(current_num.parse().map_err(|_| err())?);
                current_num.clear();
            } else if ch == 's' && !current_num.is_empty() && seconds.is_none() {
                seconds = Some(current_num.parse().map_err(|_| err())?);
                current_num.clear();
            } else {
                return Err(err());
            }
        }

        if !current_num.is_empty() || (minutes.is_none() && seconds.is_none()) {
            return Err(err());
        }

        let total_millis = minutes
            .unwrap_or(0)
            .checked_mul(60)
            .and_then(|m| m.checked_add(seconds.unwrap_or(0)))
            .and_then(|secs| secs.checked_mul(1000))
            .ok_or_else(err)?;

        Self::from_millis(total_millis).ok_or_else(err)
    }
}

impl fmt::Display for Timeout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total_secs = self.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;

        if minutes == 0 {
            write!(f, "{}s", seconds)
        } else if seconds == 0 {
            write!(f, "{}m", minutes)
        } else {
            write!(f, "{}m{}s", minutes, seconds)
        }
    }
}
