use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;
use validator::Validate;

use crate::{
    dto::account_dto::{
        AccountResponse, AuthResponse, ForgotPasswordPayload, LoginPayload, RegisterPayload,
        RegisterResponse, ResetPasswordPayload, ResetTokenQuery, VerifyAccountPayload,
    },
    error::Result,
    middleware::auth::issue_jwt,
    services::mail_service::EmailTemplate,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterPayload,
    responses(
        (status = 200, description = "Verification code sent", body = RegisterResponse),
        (status = 400, description = "Invalid payload or email already registered")
    )
)]
#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let email = payload.email.to_lowercase();
    let code = state
        .account_service
        .issue_registration(&email, &payload.password, payload.role)
        .await?;

    // Best effort: a failed delivery is logged, the pending record stays.
    if let Err(e) = state
        .mail_service
        .send(
            "Verify Your Account",
            &[email.clone()],
            EmailTemplate::VerificationCode,
            &json!({ "code": code }),
        )
        .await
    {
        tracing::error!(error = ?e, "Failed to send verification email");
    }

    Ok(Json(RegisterResponse { email }))
}

#[utoipa::path(
    post,
    path = "/api/auth/verify",
    request_body = VerifyAccountPayload,
    responses(
        (status = 200, description = "Account verified and logged in", body = AuthResponse),
        (status = 400, description = "Invalid or expired verification code")
    )
)]
#[axum::debug_handler]
pub async fn verify_account(
    State(state): State<AppState>,
    Json(payload): Json<VerifyAccountPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let account = state
        .account_service
        .confirm_registration(&payload.email, &payload.code)
        .await?;
    let token = issue_jwt(&account)?;
    Ok(Json(AuthResponse {
        token,
        account: AccountResponse::from(account),
    }))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Logged in", body = AuthResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let account = state
        .account_service
        .authenticate(&payload.email, &payload.password)
        .await?;
    let token = issue_jwt(&account)?;
    Ok(Json(AuthResponse {
        token,
        account: AccountResponse::from(account),
    }))
}

#[utoipa::path(
    post,
    path = "/api/auth/forgot-password",
    request_body = ForgotPasswordPayload,
    responses(
        (status = 200, description = "Reset link sent"),
        (status = 404, description = "Email not found")
    )
)]
#[axum::debug_handler]
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(payload): Json<ForgotPasswordPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let (account, secret) = state
        .account_service
        .issue_password_reset(&payload.email)
        .await?;

    if let Err(e) = state
        .mail_service
        .send(
            "Your Password Reset Link",
            &[account.email.clone()],
            EmailTemplate::PasswordReset,
            &json!({ "email": account.email, "token": secret }),
        )
        .await
    {
        tracing::error!(error = ?e, "Failed to send password reset email");
    }

    Ok(Json(json!({ "detail": "Password reset link sent to your email" })))
}

#[utoipa::path(
    get,
    path = "/api/auth/reset-password",
    params(
        ("email" = String, Query, description = "Account email"),
        ("token" = String, Query, description = "Reset secret from the email link")
    ),
    responses(
        (status = 200, description = "Whether the reset link is still valid")
    )
)]
#[axum::debug_handler]
pub async fn validate_reset_token(
    State(state): State<AppState>,
    Query(query): Query<ResetTokenQuery>,
) -> Result<impl IntoResponse> {
    let valid = state
        .account_service
        .validate_reset_token(&query.email, &query.token)
        .await?;
    Ok(Json(json!({ "valid": valid })))
}

#[utoipa::path(
    post,
    path = "/api/auth/reset-password",
    request_body = ResetPasswordPayload,
    responses(
        (status = 200, description = "Password changed"),
        (status = 400, description = "Invalid or expired reset link")
    )
)]
#[axum::debug_handler]
pub async fn reset_password(
    State(state): State<AppState>,
    Json(payload): Json<ResetPasswordPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    state
        .account_service
        .consume_reset_token(&payload.email, &payload.token, &payload.new_password)
        .await?;
    Ok((
        StatusCode::OK,
        Json(json!({ "detail": "Password changed successfully" })),
    ))
}
