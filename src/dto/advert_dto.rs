use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::advert::{EmploymentType, ExperienceLevel, JobAdvert, LocationType};
use crate::services::advert_service::OwnedAdvert;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateAdvertPayload {
    #[validate(length(min = 1, max = 150))]
    pub title: String,
    #[validate(length(min = 1, max = 150))]
    pub company_name: String,
    #[validate(length(min = 1))]
    pub description: String,
    pub employment_type: EmploymentType,
    pub experience_level: ExperienceLevel,
    pub location_type: LocationType,
    pub location: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub skills: String,
    pub is_published: Option<bool>,
    pub deadline: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateAdvertPayload {
    #[validate(length(min = 1, max = 150))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 150))]
    pub company_name: Option<String>,
    #[validate(length(min = 1))]
    pub description: Option<String>,
    pub employment_type: Option<EmploymentType>,
    pub experience_level: Option<ExperienceLevel>,
    pub location_type: Option<LocationType>,
    pub location: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub skills: Option<String>,
    pub is_published: Option<bool>,
    pub deadline: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, ToSchema)]
#[serde(default)]
pub struct AdvertSearchQuery {
    pub keyword: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AdvertResponse {
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
    /// Whether the advert currently accepts applications.
    pub is_active: bool,
    pub deadline: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl From<JobAdvert> for AdvertResponse {
    fn from(advert: JobAdvert) -> Self {
        let is_active = advert.is_active(Utc::now().date_naive());
        Self {
            id: advert.id,
            title: advert.title,
            company_name: advert.company_name,
            description: advert.description,
            employment_type: advert.employment_type,
            experience_level: advert.experience_level,
            location_type: advert.location_type,
            location: advert.location,
            skills: advert.skills,
            is_published: advert.is_published,
            is_active,
            deadline: advert.deadline,
            created_at: advert.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OwnedAdvertResponse {
    pub id: Uuid,
    pub title: String,
    pub company_name: String,
    pub is_published: bool,
    pub deadline: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub total_applications: i64,
}

impl From<OwnedAdvert> for OwnedAdvertResponse {
    fn from(advert: OwnedAdvert) -> Self {
        Self {
            id: advert.id,
            title: advert.title,
            company_name: advert.company_name,
            is_published: advert.is_published,
            deadline: advert.deadline,
            created_at: advert.created_at,
            total_applications: advert.total_applications,
        }
    }
}
