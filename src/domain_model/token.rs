use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One access window for one subject. A later grant overwrites the record
/// wholesale; expiry never accumulates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    pub expires_at: DateTime<Utc>,
}

impl TokenRecord {
    /// Live strictly before `expires_at`; inert at the boundary and after.
    pub fn is_live_at(&self, instant: DateTime<Utc>) -> bool {
        instant < self.expires_at
    }
}
