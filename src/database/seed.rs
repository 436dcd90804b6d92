use crate::config::Config;
use crate::error::Result;
use crate::models::account::Role;
use crate::utils::crypto::hash_password;
use sqlx::PgPool;
use tracing::info;

const DEFAULT_CATEGORIES: &[&str] = &["Math", "Aptitude", "English", "Coding"];

/// Idempotent bootstrap: default quiz categories plus, when configured, the
/// initial admin account. Safe to run on every startup.
pub async fn seed(pool: &PgPool, config: &Config) -> Result<()> {
    for name in DEFAULT_CATEGORIES {
        sqlx::query("INSERT INTO test_categories (name) VALUES ($1) ON CONFLICT (name) DO NOTHING")
            .bind(name)
            .execute(pool)
            .await?;
    }

    if let (Some(email), Some(password)) = (&config.admin_email, &config.admin_password) {
        let email = email.to_lowercase();
        let existing: Option<(uuid::Uuid,)> =
            sqlx::query_as("SELECT id FROM accounts WHERE email = $1")
                .bind(&email)
                .fetch_optional(pool)
                .await?;

        if existing.is_none() {
            let password_hash = hash_password(password)?;
            sqlx::query(
                "INSERT INTO accounts (email, password_hash, role, is_active) VALUES ($1, $2, $3, TRUE)",
            )
            .bind(&email)
            .bind(&password_hash)
            .bind(Role::Admin)
            .execute(pool)
            .await?;
            info!("Seeded admin account {}", email);
        }
    }

    Ok(())
}
