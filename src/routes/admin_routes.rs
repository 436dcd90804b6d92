use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::account_dto::{AccountResponse, CandidateSummaryResponse},
    dto::quiz_dto::{
        CreateQuestionPayload, QuestionAdminResponse, TestResultResponse, UpdateQuestionPayload,
    },
    error::Result,
    models::account::Role,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/admin/questions",
    responses(
        (status = 200, description = "All questions grouped by category", body = Vec<QuestionAdminResponse>)
    )
)]
#[axum::debug_handler]
pub async fn list_questions(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let questions = state.quiz_service.list_questions().await?;
    let questions: Vec<QuestionAdminResponse> = questions.into_iter().map(Into::into).collect();
    Ok(Json(questions))
}

#[utoipa::path(
    post,
    path = "/api/admin/questions",
    request_body = CreateQuestionPayload,
    responses(
        (status = 201, description = "Question created"),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Category not found")
    )
)]
#[axum::debug_handler]
pub async fn create_question(
    State(state): State<AppState>,
    Json(payload): Json<CreateQuestionPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let question = state.quiz_service.create_question(payload).await?;
    Ok((StatusCode::CREATED, Json(question)))
}

#[utoipa::path(
    patch,
    path = "/api/admin/questions/{id}",
    params(
        ("id" = Uuid, Path, description = "Question ID")
    ),
    request_body = UpdateQuestionPayload,
    responses(
        (status = 200, description = "Question updated"),
        (status = 404, description = "Question not found")
    )
)]
#[axum::debug_handler]
pub async fn update_question(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateQuestionPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let question = state.quiz_service.update_question(id, payload).await?;
    Ok(Json(question))
}

#[utoipa::path(
    delete,
    path = "/api/admin/questions/{id}",
    params(
        ("id" = Uuid, Path, description = "Question ID")
    ),
    responses(
        (status = 204, description = "Question deleted"),
        (status = 404, description = "Question not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_question(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.quiz_service.delete_question(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/admin/companies",
    responses(
        (status = 200, description = "All company accounts", body = Vec<AccountResponse>)
    )
)]
#[axum::debug_handler]
pub async fn list_companies(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let accounts = state.account_service.list_by_role(Role::Company).await?;
    let accounts: Vec<AccountResponse> = accounts.into_iter().map(Into::into).collect();
    Ok(Json(accounts))
}

#[utoipa::path(
    get,
    path = "/api/admin/candidates",
    responses(
        (status = 200, description = "All candidate accounts with their quiz history", body = Vec<CandidateSummaryResponse>)
    )
)]
#[axum::debug_handler]
pub async fn list_candidates(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let accounts = state.account_service.list_by_role(Role::Candidate).await?;

    let mut summaries = Vec::with_capacity(accounts.len());
    for account in accounts {
        let results = state
            .quiz_service
            .list_results_for_account(account.id)
            .await?;
        summaries.push(CandidateSummaryResponse {
            id: account.id,
            email: account.email,
            is_active: account.is_active,
            created_at: account.created_at,
            results: results.into_iter().map(TestResultResponse::from).collect(),
        });
    }

    Ok(Json(summaries))
}
