use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::application::{ApplicationStatus, JobApplication};

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ApplyPayload {
    #[validate(length(min = 1, max = 50))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(url)]
    pub portfolio_url: String,
    /// Reference to the uploaded CV (URL or storage path).
    #[validate(length(min = 1))]
    pub cv: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DecidePayload {
    pub status: ApplicationStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApplicationResponse {
    pub id: Uuid,
    pub advert_id: Uuid,
    pub name: String,
    pub email: String,
    pub portfolio_url: String,
    pub cv: String,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
}

impl From<JobApplication> for ApplicationResponse {
    fn from(application: JobApplication) -> Self {
        Self {
            id: application.id,
            advert_id: application.advert_id,
            name: application.name,
            email: application.email,
            portfolio_url: application.portfolio_url,
            cv: application.cv,
            status: application.status,
            created_at: application.created_at,
        }
    }
}
