use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One quiz attempt. `total` is the size of the sampled question set and
/// `score` the number answered correctly.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TestResult {
    pub id: Uuid,
    pub account_id: Uuid,
    pub category_id: Uuid,
    pub score: i32,
    pub total: i32,
    pub date_taken: DateTime<Utc>,
}
