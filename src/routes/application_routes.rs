use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::application_dto::{ApplicationResponse, ApplyPayload, DecidePayload},
    error::Result,
    middleware::auth::AuthAccount,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/adverts/{id}/apply",
    params(
        ("id" = Uuid, Path, description = "Advert ID")
    ),
    request_body = ApplyPayload,
    responses(
        (status = 201, description = "Application recorded", body = ApplicationResponse),
        (status = 404, description = "Advert not found"),
        (status = 409, description = "This email already applied to this advert")
    )
)]
#[axum::debug_handler]
pub async fn apply(
    State(state): State<AppState>,
    Path(advert_id): Path<Uuid>,
    Json(payload): Json<ApplyPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let application = state.application_service.apply(advert_id, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApplicationResponse::from(application)),
    ))
}

#[utoipa::path(
    get,
    path = "/api/company/adverts/{id}/applications",
    params(
        ("id" = Uuid, Path, description = "Advert ID")
    ),
    responses(
        (status = 200, description = "Applications to this advert, newest first", body = Vec<ApplicationResponse>),
        (status = 403, description = "Not the advert owner"),
        (status = 404, description = "Advert not found")
    )
)]
#[axum::debug_handler]
pub async fn list_for_advert(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthAccount>,
    Path(advert_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let applications = state
        .application_service
        .list_for_advert(advert_id, auth.id)
        .await?;
    let applications: Vec<ApplicationResponse> =
        applications.into_iter().map(Into::into).collect();
    Ok(Json(applications))
}

#[utoipa::path(
    get,
    path = "/api/applications/mine",
    responses(
        (status = 200, description = "Applications submitted with the caller's email", body = Vec<ApplicationResponse>)
    )
)]
#[axum::debug_handler]
pub async fn my_applications(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthAccount>,
) -> Result<impl IntoResponse> {
    let account = state.account_service.get_by_id(auth.id).await?;
    let applications = state
        .application_service
        .list_by_email(&account.email)
        .await?;
    let applications: Vec<ApplicationResponse> =
        applications.into_iter().map(Into::into).collect();
    Ok(Json(applications))
}

#[utoipa::path(
    post,
    path = "/api/company/applications/{id}/decision",
    params(
        ("id" = Uuid, Path, description = "Application ID")
    ),
    request_body = DecidePayload,
    responses(
        (status = 200, description = "Status updated", body = ApplicationResponse),
        (status = 403, description = "Not the advert owner"),
        (status = 404, description = "Application not found")
    )
)]
#[axum::debug_handler]
pub async fn decide(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthAccount>,
    Path(application_id): Path<Uuid>,
    Json(payload): Json<DecidePayload>,
) -> Result<impl IntoResponse> {
    let application = state
        .application_service
        .decide(application_id, auth.id, payload.status)
        .await?;
    Ok(Json(ApplicationResponse::from(application)))
}
