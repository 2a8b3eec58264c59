//! Record timestamps.

use chrono::{DateTime, Utc};

/// UTC timestamp stored as `created_at` / `updated_at` on every record.
pub type Timestamp = DateTime<Utc>;

/// Current UTC time, used when creating or mutating a record.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}
