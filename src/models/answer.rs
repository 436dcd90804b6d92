use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::question::OptionSlot;

/// Recorded per answered question; skipped questions leave no row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Answer {
    pub id: Uuid,
    pub test_result_id: Uuid,
    pub question_id: Uuid,
    pub selected_option: OptionSlot,
    pub is_correct: bool,
}
