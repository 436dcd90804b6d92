use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::thread_rng;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::quiz_dto::{CreateQuestionPayload, UpdateQuestionPayload};
use crate::error::{Error, Result};
use crate::models::answer::Answer;
use crate::models::category::TestCategory;
use crate::models::question::{OptionSlot, Question};
use crate::models::test_result::TestResult;
use crate::services::grading_service::GradingService;

pub const MAX_QUESTIONS_PER_ATTEMPT: usize = 20;

#[derive(Clone)]
pub struct QuizService {
    pool: PgPool,
}

/// A question joined with its category name, for the admin listing.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct QuestionWithCategory {
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

impl QuizService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_categories(&self) -> Result<Vec<TestCategory>> {
        let categories =
            sqlx::query_as::<_, TestCategory>("SELECT * FROM test_categories ORDER BY name")
                .fetch_all(&self.pool)
                .await?;
        Ok(categories)
    }

    pub async fn get_category(&self, id: Uuid) -> Result<TestCategory> {
        let category =
            sqlx::query_as::<_, TestCategory>("SELECT * FROM test_categories WHERE id = $1")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(category)
    }

    /// Uniform sample without replacement, capped at
    /// [`MAX_QUESTIONS_PER_ATTEMPT`].
    pub fn sample_questions(mut pool: Vec<Question>) -> Vec<Question> {
        let mut rng = thread_rng();
        pool.shuffle(&mut rng);
        pool.truncate(MAX_QUESTIONS_PER_ATTEMPT);
        pool
    }

    /// Draws the fixed question set for a new attempt. The caller presents
    /// these to the candidate and echoes the same set back on submission;
    /// the sample is not re-rolled server-side.
    pub async fn start_attempt(&self, category_id: Uuid) -> Result<Vec<Question>> {
        self.get_category(category_id).await?;

        let pool = sqlx::query_as::<_, Question>("SELECT * FROM questions WHERE category_id = $1")
            .bind(category_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(Self::sample_questions(pool))
    }

    /// Records one attempt: the result row, one answer row per answered
    /// question, and the final score — all in a single transaction, so the
    /// transient score-0 state is never visible outside it.
    pub async fn submit_attempt(
        &self,
        account_id: Uuid,
        category_id: Uuid,
        question_ids: &[Uuid],
        responses: &HashMap<Uuid, OptionSlot>,
    ) -> Result<TestResult> {
        self.get_category(category_id).await?;

        let questions = if question_ids.is_empty() {
            Vec::new()
        } else {
            sqlx::query_as::<_, Question>(
                "SELECT * FROM questions WHERE id = ANY($1) AND category_id = $2",
            )
            .bind(question_ids)
            .bind(category_id)
            .fetch_all(&self.pool)
            .await?
        };

        if questions.len() != question_ids.len() {
            return Err(Error::BadRequest(
                "Submission references questions outside this category".to_string(),
            ));
        }

        let (score, graded) = GradingService::grade(&questions, responses);

        let mut tx = self.pool.begin().await?;

        let mut result = sqlx::query_as::<_, TestResult>(
            r#"
            INSERT INTO test_results (account_id, category_id, score, total)
            VALUES ($1, $2, 0, $3)
            RETURNING *
            "#,
        )
        .bind(account_id)
        .bind(category_id)
        .bind(questions.len() as i32)
        .fetch_one(&mut *tx)
        .await?;

        for answer in &graded {
            sqlx::query(
                r#"
                INSERT INTO answers (test_result_id, question_id, selected_option, is_correct)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(result.id)
            .bind(answer.question_id)
            .bind(answer.selected_option)
            .bind(answer.is_correct)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query("UPDATE test_results SET score = $1 WHERE id = $2")
            .bind(score)
            .bind(result.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        result.score = score;
        Ok(result)
    }

    /// Owner-scoped fetch: an attempt id belonging to another account is
    /// indistinguishable from a missing one.
    pub async fn get_result(
        &self,
        account_id: Uuid,
        result_id: Uuid,
    ) -> Result<(TestResult, Vec<Answer>)> {
        let result = sqlx::query_as::<_, TestResult>(
            "SELECT * FROM test_results WHERE id = $1 AND account_id = $2",
        )
        .bind(result_id)
        .bind(account_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Attempt not found".to_string()))?;

        let answers =
            sqlx::query_as::<_, Answer>("SELECT * FROM answers WHERE test_result_id = $1")
                .bind(result.id)
                .fetch_all(&self.pool)
                .await?;

        Ok((result, answers))
    }

    pub async fn list_results_for_account(&self, account_id: Uuid) -> Result<Vec<TestResult>> {
        let results = sqlx::query_as::<_, TestResult>(
            "SELECT * FROM test_results WHERE account_id = $1 ORDER BY date_taken DESC",
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(results)
    }

    pub async fn create_question(&self, payload: CreateQuestionPayload) -> Result<Question> {
        self.get_category(payload.category_id).await?;

        let question = sqlx::query_as::<_, Question>(
            r#"
            INSERT INTO questions (category_id, question_text, option1, option2, option3, option4, correct_option)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(payload.category_id)
        .bind(&payload.question_text)
        .bind(&payload.option1)
        .bind(&payload.option2)
        .bind(&payload.option3)
        .bind(&payload.option4)
        .bind(payload.correct_option)
        .fetch_one(&self.pool)
        .await?;

        Ok(question)
    }

    pub async fn update_question(
        &self,
        id: Uuid,
        payload: UpdateQuestionPayload,
    ) -> Result<Question> {
        let question = sqlx::query_as::<_, Question>(
            r#"
            UPDATE questions
            SET question_text = COALESCE($2, question_text),
                option1 = COALESCE($3, option1),
                option2 = COALESCE($4, option2),
                option3 = COALESCE($5, option3),
                option4 = COALESCE($6, option4),
                correct_option = COALESCE($7, correct_option)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(payload.question_text)
        .bind(payload.option1)
        .bind(payload.option2)
        .bind(payload.option3)
        .bind(payload.option4)
        .bind(payload.correct_option)
        .fetch_one(&self.pool)
        .await?;

        Ok(question)
    }

    pub async fn delete_question(&self, id: Uuid) -> Result<()> {
        let res = sqlx::query("DELETE FROM questions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if res.rows_affected() == 0 {
            return Err(Error::NotFound("Question not found".to_string()));
        }
        Ok(())
    }

    pub async fn list_questions(&self) -> Result<Vec<QuestionWithCategory>> {
        let questions = sqlx::query_as::<_, QuestionWithCategory>(
            r#"
            SELECT q.id, q.category_id, c.name AS category_name, q.question_text,
                   q.option1, q.option2, q.option3, q.option4, q.correct_option
            FROM questions q
            JOIN test_categories c ON c.id = q.category_id
            ORDER BY c.name, q.question_text
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(questions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn pool_of(n: usize) -> Vec<Question> {
        (0..n)
            .map(|i| Question {
                id: Uuid::new_v4(),
                category_id: Uuid::new_v4(),
                question_text: format!("q{}", i),
                option1: "a".into(),
                option2: "b".into(),
                option3: "c".into(),
                option4: "d".into(),
                correct_option: OptionSlot::Option1,
            })
            .collect()
    }

    #[test]
    fn large_pools_are_capped_at_twenty_distinct_questions() {
        let pool = pool_of(25);
        let ids: HashSet<Uuid> = pool.iter().map(|q| q.id).collect();

        let sample = QuizService::sample_questions(pool);
        assert_eq!(sample.len(), MAX_QUESTIONS_PER_ATTEMPT);

        let sampled: HashSet<Uuid> = sample.iter().map(|q| q.id).collect();
        assert_eq!(sampled.len(), MAX_QUESTIONS_PER_ATTEMPT);
        assert!(sampled.is_subset(&ids));
    }

    #[test]
    fn small_pools_are_returned_whole() {
        let sample = QuizService::sample_questions(pool_of(5));
        assert_eq!(sample.len(), 5);

        let sampled: HashSet<Uuid> = sample.iter().map(|q| q.id).collect();
        assert_eq!(sampled.len(), 5);
    }

    #[test]
    fn empty_pools_yield_empty_samples() {
        assert!(QuizService::sample_questions(Vec::new()).is_empty());
    }
}
