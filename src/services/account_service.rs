use chrono::Utc;
use sqlx::PgPool;
use subtle::ConstantTimeEq;
use uuid::Uuid;

use crate::error::{is_unique_violation, Error, Result};
use crate::models::account::{Account, Role};
use crate::models::pending_account::PendingAccount;
use crate::models::token::{Token, TokenKind};
use crate::utils::crypto::{hash_password, verify_password};
use crate::utils::token::{generate_code, RESET_SECRET_LEN, VERIFICATION_CODE_LEN};

/// Registration verification and password-reset tokens. Expiry is computed
/// lazily from the record's age at use time; nothing sweeps the tables.
#[derive(Clone)]
pub struct AccountService {
    pool: PgPool,
}

impl AccountService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Account> {
        let account = sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(account)
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Option<Account>> {
        let account = sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE email = $1")
            .bind(email.to_lowercase())
            .fetch_optional(&self.pool)
            .await?;
        Ok(account)
    }

    pub async fn list_by_role(&self, role: Role) -> Result<Vec<Account>> {
        let accounts = sqlx::query_as::<_, Account>(
            "SELECT * FROM accounts WHERE role = $1 ORDER BY created_at DESC",
        )
        .bind(role)
        .fetch_all(&self.pool)
        .await?;
        Ok(accounts)
    }

    /// Upserts the pending registration for this email (last request wins)
    /// and returns the fresh verification code for delivery.
    pub async fn issue_registration(
        &self,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<String> {
        let email = email.to_lowercase();

        if self.get_by_email(&email).await?.is_some() {
            return Err(Error::BadRequest(
                "Email already exists on the platform".to_string(),
            ));
        }

        let password_hash = hash_password(password)?;
        let code = generate_code(VERIFICATION_CODE_LEN);

        sqlx::query(
            r#"
            INSERT INTO pending_accounts (email, password_hash, verification_code, role, created_at)
            VALUES ($1, $2, $3, $4, NOW())
            ON CONFLICT (email) DO UPDATE
            SET password_hash = EXCLUDED.password_hash,
                verification_code = EXCLUDED.verification_code,
                role = EXCLUDED.role,
                created_at = NOW()
            "#,
        )
        .bind(&email)
        .bind(&password_hash)
        .bind(&code)
        .bind(role)
        .execute(&self.pool)
        .await?;

        Ok(code)
    }

    /// Exchanges a live (email, code) pair for a real account. The pending
    /// record is deleted in the same transaction, so a second confirmation
    /// with the same code fails.
    pub async fn confirm_registration(&self, email: &str, code: &str) -> Result<Account> {
        let email = email.to_lowercase();

        let pending = sqlx::query_as::<_, PendingAccount>(
            "SELECT * FROM pending_accounts WHERE email = $1 AND verification_code = $2",
        )
        .bind(&email)
        .bind(code)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(Error::InvalidOrExpired)?;

        if !pending.is_valid(Utc::now()) {
            return Err(Error::InvalidOrExpired);
        }

        let mut tx = self.pool.begin().await?;

        let account = sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts (email, password_hash, role, is_active)
            VALUES ($1, $2, $3, TRUE)
            RETURNING *
            "#,
        )
        .bind(&pending.email)
        .bind(&pending.password_hash)
        .bind(pending.role)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                Error::BadRequest("Email already exists on the platform".to_string())
            } else {
                e.into()
            }
        })?;

        sqlx::query("DELETE FROM pending_accounts WHERE id = $1")
            .bind(pending.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(account)
    }

    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Account> {
        let account = self
            .get_by_email(email)
            .await?
            .ok_or_else(|| Error::Unauthorized("Invalid credentials".to_string()))?;

        if !account.is_active || !verify_password(password, &account.password_hash)? {
            return Err(Error::Unauthorized("Invalid credentials".to_string()));
        }

        Ok(account)
    }

    /// Upserts the reset token for this account (re-requesting invalidates
    /// the previous secret) and returns the new secret for delivery.
    pub async fn issue_password_reset(&self, email: &str) -> Result<(Account, String)> {
        let account = self
            .get_by_email(email)
            .await?
            .ok_or_else(|| Error::NotFound("Email not found".to_string()))?;

        let secret = generate_code(RESET_SECRET_LEN);

        sqlx::query(
            r#"
            INSERT INTO tokens (account_id, secret, kind, created_at)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (account_id, kind) DO UPDATE
            SET secret = EXCLUDED.secret,
                created_at = NOW()
            "#,
        )
        .bind(account.id)
        .bind(&secret)
        .bind(TokenKind::PasswordReset)
        .execute(&self.pool)
        .await?;

        Ok((account, secret))
    }

    pub async fn validate_reset_token(&self, email: &str, secret: &str) -> Result<bool> {
        let Some(account) = self.get_by_email(email).await? else {
            return Ok(false);
        };
        Ok(self.live_reset_token(account.id, secret).await?.is_some())
    }

    /// Re-validates the token, swaps the account password and deletes the
    /// token in one transaction. A consumed token always fails afterwards.
    pub async fn consume_reset_token(
        &self,
        email: &str,
        secret: &str,
        new_password: &str,
    ) -> Result<()> {
        let account = self
            .get_by_email(email)
            .await?
            .ok_or(Error::InvalidOrExpired)?;

        let token = self
            .live_reset_token(account.id, secret)
            .await?
            .ok_or(Error::InvalidOrExpired)?;

        let password_hash = hash_password(new_password)?;

        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE accounts SET password_hash = $1 WHERE id = $2")
            .bind(&password_hash)
            .bind(account.id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM tokens WHERE id = $1")
            .bind(token.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }

    async fn live_reset_token(&self, account_id: Uuid, secret: &str) -> Result<Option<Token>> {
        let Some(token) = sqlx::query_as::<_, Token>(
            "SELECT * FROM tokens WHERE account_id = $1 AND kind = $2",
        )
        .bind(account_id)
        .bind(TokenKind::PasswordReset)
        .fetch_optional(&self.pool)
        .await?
        else {
            return Ok(None);
        };

        let matches: bool = token
            .secret
            .as_bytes()
            .ct_eq(secret.as_bytes())
            .into();

        if matches && token.is_valid(Utc::now()) {
            Ok(Some(token))
        } else {
            Ok(None)
        }
    }
}
