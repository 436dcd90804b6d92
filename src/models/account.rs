use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "account_role", rename_all = "lowercase")]
pub enum Role {
    Admin,
    Company,
    Candidate,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Resources gated by role rather than ownership. Ownership checks live in
/// the services that load the owned entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    AdminPanel,
    AdvertManagement,
    QuizTaking,
}

pub fn can_access(role: Role, resource: Resource) -> bool {
    match resource {
        Resource::AdminPanel => matches!(role, Role::Admin),
        Resource::AdvertManagement => matches!(role, Role::Admin | Role::Company),
        Resource::QuizTaking => matches!(role, Role::Candidate),
    }
}
