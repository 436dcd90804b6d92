use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::pending_account::VERIFICATION_LIFESPAN_SECS;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "token_kind", rename_all = "snake_case")]
pub enum TokenKind {
    PasswordReset,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Token {
    pub id: Uuid,
    pub account_id: Uuid,
    pub secret: String,
    pub kind: TokenKind,
    pub created_at: DateTime<Utc>,
}

impl Token {
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        (now - self.created_at).num_seconds() <= VERIFICATION_LIFESPAN_SECS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn token_expires_after_twenty_minutes() {
        let now = Utc::now();
        let mut token = Token {
            id: Uuid::new_v4(),
            account_id: Uuid::new_v4(),
            secret: "s".repeat(20),
            kind: TokenKind::PasswordReset,
            created_at: now - Duration::minutes(20),
        };
        assert!(token.is_valid(now));

        token.created_at = now - Duration::minutes(21);
        assert!(!token.is_valid(now));
    }
}
