use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::models::{
    password_reset::PasswordResetToken,
    signup::{RoleDetails, SignupPayload},
    user::{PublicUser, User, UserRole},
};

use super::user_repository::UserRepository;

pub struct PostgresUserRepository {
    pub pool: PgPool,
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, role, company_id, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
    }

    async fn is_email_taken(&self, email: &str) -> Result<bool, sqlx::Error> {
        let found: Option<i32> = sqlx::query_scalar("SELECT 1 FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(found.is_some())
    }

    async fn create_user(
        &self,
        payload: &SignupPayload,
        password_hash: &str,
    ) -> Result<User, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let (role, company_id) = match &payload.role {
            RoleDetails::Candidate => (UserRole::Candidate, None),
            RoleDetails::Recruiter {
                company_name,
                company_logo,
                company_website,
                about_company,
            } => {
                let company_id = match company_name {
                    Some(name) => {
                        let id: Uuid = sqlx::query_scalar(
                            r#"
                            INSERT INTO companies (name, logo, website, about)
                            VALUES ($1, $2, $3, $4)
                            RETURNING id
                            "#,
                        )
                        .bind(name)
                        .bind(company_logo)
                        .bind(company_website)
                        .bind(about_company)
                        .fetch_one(&mut *tx)
                        .await?;
                        Some(id)
                    }
                    None => None,
                };
                (UserRole::Recruiter, company_id)
            }
        };

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash, role, company_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, password_hash, role, company_id, created_at
            "#,
        )
        .bind(&payload.name)
        .bind(&payload.email)
        .bind(password_hash)
        .bind(role)
        .bind(company_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(user)
    }

    async fn find_public_user_by_id(
        &self,
        user_id: Uuid,
    ) -> Result<Option<PublicUser>, sqlx::Error> {
        sqlx::query_as::<_, PublicUser>(
            r#"
            SELECT id, name, email, role, company_id
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn insert_password_reset_token(
        &self,
        email: &str,
        token: &str,
        expires_at: OffsetDateTime,
    ) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        // A new token retires any outstanding one for the same account.
        sqlx::query("UPDATE password_resets SET used = TRUE WHERE email = $1 AND used = FALSE")
            .bind(email)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO password_resets (email, token, expires_at) VALUES ($1, $2, $3)",
        )
        .bind(email)
        .bind(token)
        .bind(expires_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn find_password_reset_token(
        &self,
        token: &str,
    ) -> Result<Option<PasswordResetToken>, sqlx::Error> {
        sqlx::query_as::<_, PasswordResetToken>(
            r#"
            SELECT id, email, token, expires_at, used, created_at
            FROM password_resets
            WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
    }

    async fn consume_password_reset_token(
        &self,
        token: &str,
        password_hash: &str,
    ) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE users SET password_hash = $1
            WHERE email = (SELECT email FROM password_resets WHERE token = $2)
            "#,
        )
        .bind(password_hash)
        .bind(token)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE password_resets SET used = TRUE WHERE token = $1")
            .bind(token)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}
