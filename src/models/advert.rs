use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "employment_type", rename_all = "snake_case")]
pub enum EmploymentType {
    FullTime,
    PartTime,
    Contract,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "experience_level", rename_all = "snake_case")]
pub enum ExperienceLevel {
    EntryLevel,
    MidLevel,
    Senior,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "location_type", rename_all = "lowercase")]
pub enum LocationType {
    Onsite,
    Hybrid,
    Remote,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobAdvert {
    pub id: Uuid,
    pub title: String,
    pub company_name: String,
    pub description: String,
    pub employment_type: EmploymentType,
    pub experience_level: ExperienceLevel,
    pub location_type: LocationType,
    pub location: Option<String>,
    pub skills: String,
    pub is_published: bool,
    pub deadline: NaiveDate,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

impl JobAdvert {
    /// Active adverts accept applications: published and not past deadline.
    pub fn is_active(&self, today: NaiveDate) -> bool {
        self.is_published && self.deadline >= today
    }
}
