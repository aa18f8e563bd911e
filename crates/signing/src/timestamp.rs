//! Millisecond timestamps in the platform's wire format
//!
//! The platform computes `round((seconds + microseconds / 1e6) * 1000)` in
//! double precision and carries the result as a float. It appears as bare
//! digits in signing input and form fields, and as a JSON float
//! (`1700000000123.0`) in the payment request body.

use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Serialize, Serializer};

/// Milliseconds since the Unix epoch, always integral.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Millis(f64);

impl Millis {
    /// Current wall-clock time.
    pub fn now() -> Self {
        let since_epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Self::from_duration(since_epoch)
    }

    /// Convert a duration since the epoch, truncated to microseconds then
    /// rounded half-to-even to milliseconds.
    pub fn from_duration(since_epoch: Duration) -> Self {
        let seconds = since_epoch.as_secs() as f64;
        let fraction = f64::from(since_epoch.subsec_micros()) / 1_000_000.0;
        Self(((fraction + seconds) * 1000.0).round_ties_even())
    }

    pub fn from_millis(millis: u64) -> Self {
        Self(millis as f64)
    }

    pub fn as_f64(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Millis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.0}", self.0)
    }
}

impl Serialize for Millis {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.0)
    }
}
