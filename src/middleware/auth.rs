use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::config::get_config;
use crate::error::{Error, Result};
use crate::models::account::{can_access, Account, Resource, Role};

const JWT_LIFETIME_HOURS: i64 = 24;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    pub role: Role,
}

/// Authenticated identity attached to the request by [`require_auth`].
#[derive(Debug, Clone, Copy)]
pub struct AuthAccount {
    pub id: Uuid,
    pub role: Role,
}

pub fn issue_jwt(account: &Account) -> Result<String> {
    let config = get_config();
    let exp = (Utc::now() + Duration::hours(JWT_LIFETIME_HOURS)).timestamp() as usize;
    let claims = Claims {
        sub: account.id.to_string(),
        exp,
        role: account.role,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| Error::Internal(format!("Failed to sign token: {}", e)))
}

fn unauthorized(code: &str) -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "error": code }))).into_response()
}

/// Decodes the bearer token and attaches the caller's [`AuthAccount`] to the
/// request.
pub async fn require_auth(mut req: Request, next: Next) -> Response {
    let Some(auth_header) = req.headers().get(axum::http::header::AUTHORIZATION) else {
        return unauthorized("missing_authorization");
    };
    let Ok(auth_str) = auth_header.to_str() else {
        return unauthorized("bad_authorization");
    };
    let Some(token) = auth_str.strip_prefix("Bearer ") else {
        return unauthorized("unsupported_scheme");
    };

    let config = get_config();
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    let data = match decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    ) {
        Ok(data) => data,
        Err(_) => return unauthorized("invalid_token"),
    };

    let Ok(id) = data.claims.sub.parse::<Uuid>() else {
        return unauthorized("invalid_token");
    };

    req.extensions_mut().insert(AuthAccount {
        id,
        role: data.claims.role,
    });
    next.run(req).await
}

/// Role gate composed after [`require_auth`]; the policy itself lives in
/// [`can_access`].
pub async fn require_resource(
    State(resource): State<Resource>,
    req: Request,
    next: Next,
) -> Response {
    let Some(auth) = req.extensions().get::<AuthAccount>() else {
        return unauthorized("missing_authorization");
    };
    if !can_access(auth.role, resource) {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({ "error": "forbidden" })),
        )
            .into_response();
    }
    next.run(req).await
}
