use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::application_dto::ApplyPayload;
use crate::error::{is_unique_violation, Error, Result};
use crate::models::advert::JobAdvert;
use crate::models::application::{ApplicationStatus, JobApplication};
use crate::services::mail_service::{EmailTemplate, MailService};

#[derive(Clone)]
pub struct ApplicationService {
    pool: PgPool,
    mail: MailService,
}

impl ApplicationService {
    pub fn new(pool: PgPool, mail: MailService) -> Self {
        Self { pool, mail }
    }

    /// Records an application against an advert. The unique index on
    /// (advert, lowercased email) closes the duplicate race at the store
    /// level; a violation surfaces as [`Error::DuplicateApplication`].
    pub async fn apply(&self, advert_id: Uuid, payload: ApplyPayload) -> Result<JobApplication> {
        self.get_advert(advert_id).await?;

        let application = sqlx::query_as::<_, JobApplication>(
            r#"
            INSERT INTO job_applications (advert_id, name, email, portfolio_url, cv, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(advert_id)
        .bind(&payload.name)
        .bind(&payload.email)
        .bind(&payload.portfolio_url)
        .bind(&payload.cv)
        .bind(ApplicationStatus::Applied)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                Error::DuplicateApplication
            } else {
                e.into()
            }
        })?;

        Ok(application)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<JobApplication> {
        let application =
            sqlx::query_as::<_, JobApplication>("SELECT * FROM job_applications WHERE id = $1")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(application)
    }

    /// Applications for one advert, visible to the advert owner only.
    pub async fn list_for_advert(
        &self,
        advert_id: Uuid,
        actor: Uuid,
    ) -> Result<Vec<JobApplication>> {
        let advert = self.get_advert(advert_id).await?;
        if advert.created_by != actor {
            return Err(Error::Forbidden(
                "You can only see applications for an advert created by you".to_string(),
            ));
        }

        let applications = sqlx::query_as::<_, JobApplication>(
            "SELECT * FROM job_applications WHERE advert_id = $1 ORDER BY created_at DESC",
        )
        .bind(advert_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(applications)
    }

    pub async fn list_by_email(&self, email: &str) -> Result<Vec<JobApplication>> {
        let applications = sqlx::query_as::<_, JobApplication>(
            "SELECT * FROM job_applications WHERE LOWER(email) = LOWER($1) ORDER BY created_at DESC",
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await?;
        Ok(applications)
    }

    /// Owner-gated status change. Statuses are free re-assignments, not a
    /// state machine. A move to rejected notifies the applicant after the
    /// write commits; delivery failure is logged, never rolled back.
    pub async fn decide(
        &self,
        application_id: Uuid,
        actor: Uuid,
        new_status: ApplicationStatus,
    ) -> Result<JobApplication> {
        let application = self.get_by_id(application_id).await?;
        let advert = self.get_advert(application.advert_id).await?;

        if advert.created_by != actor {
            return Err(Error::Forbidden(
                "You can only decide on an advert created by you".to_string(),
            ));
        }

        let updated = sqlx::query_as::<_, JobApplication>(
            "UPDATE job_applications SET status = $1 WHERE id = $2 RETURNING *",
        )
        .bind(new_status)
        .bind(application_id)
        .fetch_one(&self.pool)
        .await?;

        if new_status == ApplicationStatus::Rejected {
            let context = json!({
                "applicant_name": updated.name,
                "job_title": advert.title,
                "company_name": advert.company_name,
            });
            let subject = format!("Application Outcome for {}", advert.title);
            if let Err(e) = self
                .mail
                .send(
                    &subject,
                    &[updated.email.clone()],
                    EmailTemplate::ApplicationOutcome,
                    &context,
                )
                .await
            {
                tracing::error!(error = ?e, application_id = %updated.id, "Failed to send rejection email");
            }
        }

        Ok(updated)
    }

    async fn get_advert(&self, advert_id: Uuid) -> Result<JobAdvert> {
        let advert = sqlx::query_as::<_, JobAdvert>("SELECT * FROM job_adverts WHERE id = $1")
            .bind(advert_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(advert)
    }
}
