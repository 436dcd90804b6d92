use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::answer::Answer;
use crate::models::category::TestCategory;
use crate::models::question::{OptionSlot, Question};
use crate::models::test_result::TestResult;
use crate::services::quiz_service::QuestionWithCategory;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryResponse {
    pub id: Uuid,
    pub name: String,
}

impl From<TestCategory> for CategoryResponse {
    fn from(category: TestCategory) -> Self {
        Self {
            id: category.id,
            name: category.name,
        }
    }
}

/// A question as presented to the candidate; the correct slot stays
/// server-side.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QuizQuestionResponse {
    pub id: Uuid,
    pub question_text: String,
    pub option1: String,
    pub option2: String,
    pub option3: String,
    pub option4: String,
}

impl From<Question> for QuizQuestionResponse {
    fn from(question: Question) -> Self {
        Self {
            id: question.id,
            question_text: question.question_text,
            option1: question.option1,
            option2: question.option2,
            option3: question.option3,
            option4: question.option4,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StartAttemptResponse {
    pub category_id: Uuid,
    pub questions: Vec<QuizQuestionResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubmitAttemptPayload {
    /// The sampled question set, echoed back unchanged.
    pub question_ids: Vec<Uuid>,
    /// Selected slot per answered question; omitted questions are skipped.
    pub responses: HashMap<Uuid, OptionSlot>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TestResultResponse {
    pub id: Uuid,
    pub category_id: Uuid,
    pub score: i32,
    pub total: i32,
    pub date_taken: DateTime<Utc>,
}

impl From<TestResult> for TestResultResponse {
    fn from(result: TestResult) -> Self {
        Self {
            id: result.id,
            category_id: result.category_id,
            score: result.score,
            total: result.total,
            date_taken: result.date_taken,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AnswerResponse {
    pub question_id: Uuid,
    pub selected_option: OptionSlot,
    pub is_correct: bool,
}

impl From<Answer> for AnswerResponse {
    fn from(answer: Answer) -> Self {
        Self {
            question_id: answer.question_id,
            selected_option: answer.selected_option,
            is_correct: answer.is_correct,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ResultDetailResponse {
    pub result: TestResultResponse,
    pub answers: Vec<AnswerResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateQuestionPayload {
    pub category_id: Uuid,
    #[validate(length(min = 1))]
    pub question_text: String,
    #[validate(length(min = 1, max = 255))]
    pub option1: String,
    #[validate(length(min = 1, max = 255))]
    pub option2: String,
    #[validate(length(min = 1, max = 255))]
    pub option3: String,
    #[validate(length(min = 1, max = 255))]
    pub option4: String,
    pub correct_option: OptionSlot,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateQuestionPayload {
    #[validate(length(min = 1))]
    pub question_text: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub option1: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub option2: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub option3: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub option4: Option<String>,
    pub correct_option: Option<OptionSlot>,
}

/// Admin view of a question, correct slot included.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QuestionAdminResponse {
    pub id: Uuid,
    pub category_id: Uuid,
    pub category_name: String,
    pub question_text: String,
    pub option1: String,
    pub option2: String,
    pub option3: String,
    pub option4: String,
    pub correct_option: OptionSlot,
}

impl From<QuestionWithCategory> for QuestionAdminResponse {
    fn from(question: QuestionWithCategory) -> Self {
        Self {
            id: question.id,
            category_id: question.category_id,
            category_name: question.category_name,
            question_text: question.question_text,
            option1: question.option1,
            option2: question.option2,
            option3: question.option3,
            option4: question.option4,
            correct_option: question.correct_option,
        }
    }
}
