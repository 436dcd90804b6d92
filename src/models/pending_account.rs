use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::account::Role;

/// Verification codes and reset secrets live this long.
pub const VERIFICATION_LIFESPAN_SECS: i64 = 20 * 60;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PendingAccount {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub verification_code: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl PendingAccount {
    /// Valid while `now - created_at` has not exceeded the lifespan; the
    /// boundary itself still counts as valid.
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        (now - self.created_at).num_seconds() <= VERIFICATION_LIFESPAN_SECS
    }
}
