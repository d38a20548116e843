use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::models::{
    password_reset::PasswordResetToken,
    signup::SignupPayload,
    user::{PublicUser, User},
};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error>;
    async fn is_email_taken(&self, email: &str) -> Result<bool, sqlx::Error>;
    /// Creates the account. For recruiter signups the company row is
    /// created first and both inserts share one transaction.
    async fn create_user(
        &self,
        payload: &SignupPayload,
        password_hash: &str,
    ) -> Result<User, sqlx::Error>;
    async fn find_public_user_by_id(
        &self,
        user_id: Uuid,
    ) -> Result<Option<PublicUser>, sqlx::Error>;

    /// Persists a fresh reset token and marks any earlier unused token
    /// for the same email as used, so only one token is ever actionable.
    async fn insert_password_reset_token(
        &self,
        email: &str,
        token: &str,
        expires_at: OffsetDateTime,
    ) -> Result<(), sqlx::Error>;
    async fn find_password_reset_token(
        &self,
        token: &str,
    ) -> Result<Option<PasswordResetToken>, sqlx::Error>;
    /// Stores the new password hash for the token's account and marks the
    /// token used, inside one transaction.
    async fn consume_password_reset_token(
        &self,
        token: &str,
        password_hash: &str,
    ) -> Result<(), sqlx::Error>;
}
