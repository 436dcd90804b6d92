use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::advert_dto::{AdvertSearchQuery, CreateAdvertPayload, UpdateAdvertPayload};
use crate::error::{Error, Result};
use crate::models::advert::{EmploymentType, ExperienceLevel, JobAdvert, LocationType};

#[derive(Clone)]
pub struct AdvertService {
    pool: PgPool,
}

/// An owner's advert with its application count, for the "my jobs" view.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OwnedAdvert {
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
    pub deadline: chrono::NaiveDate,
    pub created_by: Uuid,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub total_applications: i64,
}

impl AdvertService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, owner: Uuid, payload: CreateAdvertPayload) -> Result<JobAdvert> {
        let advert = sqlx::query_as::<_, JobAdvert>(
            r#"
            INSERT INTO job_adverts (
                title, company_name, description, employment_type, experience_level,
                location_type, location, skills, is_published, deadline, created_by
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(&payload.title)
        .bind(&payload.company_name)
        .bind(&payload.description)
        .bind(payload.employment_type)
        .bind(payload.experience_level)
        .bind(payload.location_type)
        .bind(&payload.location)
        .bind(&payload.skills)
        .bind(payload.is_published.unwrap_or(true))
        .bind(payload.deadline)
        .bind(owner)
        .fetch_one(&self.pool)
        .await?;

        Ok(advert)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<JobAdvert> {
        let advert = sqlx::query_as::<_, JobAdvert>("SELECT * FROM job_adverts WHERE id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(advert)
    }

    pub async fn update(
        &self,
        id: Uuid,
        owner: Uuid,
        payload: UpdateAdvertPayload,
    ) -> Result<JobAdvert> {
        self.get_owned(id, owner).await?;

        let advert = sqlx::query_as::<_, JobAdvert>(
            r#"
            UPDATE job_adverts
            SET title = COALESCE($2, title),
                company_name = COALESCE($3, company_name),
                description = COALESCE($4, description),
                employment_type = COALESCE($5, employment_type),
                experience_level = COALESCE($6, experience_level),
                location_type = COALESCE($7, location_type),
                location = COALESCE($8, location),
                skills = COALESCE($9, skills),
                is_published = COALESCE($10, is_published),
                deadline = COALESCE($11, deadline)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(payload.title)
        .bind(payload.company_name)
        .bind(payload.description)
        .bind(payload.employment_type)
        .bind(payload.experience_level)
        .bind(payload.location_type)
        .bind(payload.location)
        .bind(payload.skills)
        .bind(payload.is_published)
        .bind(payload.deadline)
        .fetch_one(&self.pool)
        .await?;

        Ok(advert)
    }

    pub async fn delete(&self, id: Uuid, owner: Uuid) -> Result<()> {
        self.get_owned(id, owner).await?;

        sqlx::query("DELETE FROM job_adverts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn publish(&self, id: Uuid, owner: Uuid) -> Result<JobAdvert> {
        self.get_owned(id, owner).await?;

        let advert = sqlx::query_as::<_, JobAdvert>(
            "UPDATE job_adverts SET is_published = TRUE WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(advert)
    }

    /// Active adverts (published, deadline not passed), optionally narrowed
    /// by keyword and location, newest first. Absent or blank filters are
    /// no-ops.
    pub async fn search(&self, query: AdvertSearchQuery) -> Result<Vec<JobAdvert>> {
        let keyword = query.keyword.filter(|k| !k.trim().is_empty());
        let location = query.location.filter(|l| !l.trim().is_empty());

        let mut filters = vec![
            "is_published = TRUE".to_string(),
            "deadline >= CURRENT_DATE".to_string(),
        ];
        let mut args: Vec<String> = Vec::new();

        if let Some(keyword) = keyword {
            let idx = args.len() + 1;
            filters.push(format!(
                "(title ILIKE ${i} OR company_name ILIKE ${i} OR description ILIKE ${i} OR skills ILIKE ${i})",
                i = idx
            ));
            args.push(format!("%{}%", keyword));
        }
        if let Some(location) = location {
            let idx = args.len() + 1;
            filters.push(format!("location ILIKE ${}", idx));
            args.push(format!("%{}%", location));
        }

        let sql = format!(
            "SELECT * FROM job_adverts WHERE {} ORDER BY created_at DESC",
            filters.join(" AND ")
        );

        let mut statement = sqlx::query_as::<_, JobAdvert>(&sql);
        for value in &args {
            statement = statement.bind(value);
        }

        let adverts = statement.fetch_all(&self.pool).await?;
        Ok(adverts)
    }

    pub async fn list_by_owner(&self, owner: Uuid) -> Result<Vec<OwnedAdvert>> {
        let adverts = sqlx::query_as::<_, OwnedAdvert>(
            r#"
            SELECT a.*, COUNT(ap.id) AS total_applications
            FROM job_adverts a
            LEFT JOIN job_applications ap ON ap.advert_id = a.id
            WHERE a.created_by = $1
            GROUP BY a.id
            ORDER BY a.created_at DESC
            "#,
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;
        Ok(adverts)
    }

    async fn get_owned(&self, id: Uuid, owner: Uuid) -> Result<JobAdvert> {
        let advert = self.get_by_id(id).await?;
        if advert.created_by != owner {
            return Err(Error::Forbidden(
                "You can only manage an advert created by you".to_string(),
            ));
        }
        Ok(advert)
    }
}
