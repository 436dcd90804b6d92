use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;

use crate::{
    dto::quiz_dto::{
        AnswerResponse, CategoryResponse, QuizQuestionResponse, ResultDetailResponse,
        StartAttemptResponse, SubmitAttemptPayload, TestResultResponse,
    },
    error::Result,
    middleware::auth::AuthAccount,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/quiz/categories",
    responses(
        (status = 200, description = "Available quiz categories", body = Vec<CategoryResponse>)
    )
)]
#[axum::debug_handler]
pub async fn list_categories(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let categories = state.quiz_service.list_categories().await?;
    let categories: Vec<CategoryResponse> = categories.into_iter().map(Into::into).collect();
    Ok(Json(categories))
}

#[utoipa::path(
    get,
    path = "/api/quiz/categories/{id}/attempt",
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "The sampled question set for a new attempt", body = StartAttemptResponse),
        (status = 404, description = "Category not found")
    )
)]
#[axum::debug_handler]
pub async fn start_attempt(
    State(state): State<AppState>,
    Path(category_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let questions = state.quiz_service.start_attempt(category_id).await?;
    let questions: Vec<QuizQuestionResponse> = questions.into_iter().map(Into::into).collect();
    Ok(Json(StartAttemptResponse {
        category_id,
        questions,
    }))
}

#[utoipa::path(
    post,
    path = "/api/quiz/categories/{id}/attempt",
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    request_body = SubmitAttemptPayload,
    responses(
        (status = 200, description = "The scored attempt", body = TestResultResponse),
        (status = 400, description = "Submission references questions outside this category"),
        (status = 404, description = "Category not found")
    )
)]
#[axum::debug_handler]
pub async fn submit_attempt(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthAccount>,
    Path(category_id): Path<Uuid>,
    Json(payload): Json<SubmitAttemptPayload>,
) -> Result<impl IntoResponse> {
    let result = state
        .quiz_service
        .submit_attempt(auth.id, category_id, &payload.question_ids, &payload.responses)
        .await?;
    Ok(Json(TestResultResponse::from(result)))
}

#[utoipa::path(
    get,
    path = "/api/quiz/results",
    responses(
        (status = 200, description = "The caller's attempts, newest first", body = Vec<TestResultResponse>)
    )
)]
#[axum::debug_handler]
pub async fn list_my_results(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthAccount>,
) -> Result<impl IntoResponse> {
    let results = state.quiz_service.list_results_for_account(auth.id).await?;
    let results: Vec<TestResultResponse> = results.into_iter().map(Into::into).collect();
    Ok(Json(results))
}

#[utoipa::path(
    get,
    path = "/api/quiz/results/{id}",
    params(
        ("id" = Uuid, Path, description = "Attempt ID")
    ),
    responses(
        (status = 200, description = "The attempt with its recorded answers", body = ResultDetailResponse),
        (status = 404, description = "No such attempt for this account")
    )
)]
#[axum::debug_handler]
pub async fn get_result(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthAccount>,
    Path(result_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let (result, answers) = state.quiz_service.get_result(auth.id, result_id).await?;
    let answers: Vec<AnswerResponse> = answers.into_iter().map(Into::into).collect();
    Ok(Json(ResultDetailResponse {
        result: TestResultResponse::from(result),
        answers,
    }))
}
