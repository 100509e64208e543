//! Timestamps carried by every persisted record.

use chrono::{DateTime, Utc};

/// UTC timestamp used for `created_at` and `updated_at`.
pub type Timestamp = DateTime<Utc>;

/// Current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// A record that tracks when it was last modified.
pub trait Touch {
    fn updated_at_mut(&mut self) -> &mut Timestamp;

    /// Stamp the record as modified now.
    fn touch(&mut self) {
        *self.updated_at_mut() = now();
    }
}
