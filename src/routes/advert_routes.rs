use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::advert_dto::{
        AdvertResponse, AdvertSearchQuery, CreateAdvertPayload, OwnedAdvertResponse,
        UpdateAdvertPayload,
    },
    error::Result,
    middleware::auth::AuthAccount,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/adverts",
    params(
        ("keyword" = Option<String>, Query, description = "Case-insensitive match on title, company, description or skills"),
        ("location" = Option<String>, Query, description = "Case-insensitive match on location")
    ),
    responses(
        (status = 200, description = "Active adverts, newest first", body = Vec<AdvertResponse>)
    )
)]
#[axum::debug_handler]
pub async fn search_adverts(
    State(state): State<AppState>,
    Query(query): Query<AdvertSearchQuery>,
) -> Result<impl IntoResponse> {
    let adverts = state.advert_service.search(query).await?;
    let adverts: Vec<AdvertResponse> = adverts.into_iter().map(Into::into).collect();
    Ok(Json(adverts))
}

#[utoipa::path(
    get,
    path = "/api/adverts/{id}",
    params(
        ("id" = Uuid, Path, description = "Advert ID")
    ),
    responses(
        (status = 200, description = "Advert found", body = AdvertResponse),
        (status = 404, description = "Advert not found")
    )
)]
#[axum::debug_handler]
pub async fn get_advert(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let advert = state.advert_service.get_by_id(id).await?;
    Ok(Json(AdvertResponse::from(advert)))
}

#[utoipa::path(
    post,
    path = "/api/company/adverts",
    request_body = CreateAdvertPayload,
    responses(
        (status = 201, description = "Advert created", body = AdvertResponse),
        (status = 400, description = "Invalid payload")
    )
)]
#[axum::debug_handler]
pub async fn create_advert(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthAccount>,
    Json(payload): Json<CreateAdvertPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let advert = state.advert_service.create(auth.id, payload).await?;
    Ok((StatusCode::CREATED, Json(AdvertResponse::from(advert))))
}

#[utoipa::path(
    patch,
    path = "/api/company/adverts/{id}",
    params(
        ("id" = Uuid, Path, description = "Advert ID")
    ),
    request_body = UpdateAdvertPayload,
    responses(
        (status = 200, description = "Advert updated", body = AdvertResponse),
        (status = 403, description = "Not the advert owner"),
        (status = 404, description = "Advert not found")
    )
)]
#[axum::debug_handler]
pub async fn update_advert(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthAccount>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAdvertPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let advert = state.advert_service.update(id, auth.id, payload).await?;
    Ok(Json(AdvertResponse::from(advert)))
}

#[utoipa::path(
    delete,
    path = "/api/company/adverts/{id}",
    params(
        ("id" = Uuid, Path, description = "Advert ID")
    ),
    responses(
        (status = 204, description = "Advert deleted"),
        (status = 403, description = "Not the advert owner"),
        (status = 404, description = "Advert not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_advert(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthAccount>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.advert_service.delete(id, auth.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/company/adverts/{id}/publish",
    params(
        ("id" = Uuid, Path, description = "Advert ID")
    ),
    responses(
        (status = 200, description = "Advert published", body = AdvertResponse),
        (status = 403, description = "Not the advert owner"),
        (status = 404, description = "Advert not found")
    )
)]
#[axum::debug_handler]
pub async fn publish_advert(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthAccount>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let advert = state.advert_service.publish(id, auth.id).await?;
    Ok(Json(AdvertResponse::from(advert)))
}

#[utoipa::path(
    get,
    path = "/api/company/adverts",
    responses(
        (status = 200, description = "The caller's adverts with application counts", body = Vec<OwnedAdvertResponse>)
    )
)]
#[axum::debug_handler]
pub async fn list_my_adverts(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthAccount>,
) -> Result<impl IntoResponse> {
    let adverts = state.advert_service.list_by_owner(auth.id).await?;
    let adverts: Vec<OwnedAdvertResponse> = adverts.into_iter().map(Into::into).collect();
    Ok(Json(adverts))
}
