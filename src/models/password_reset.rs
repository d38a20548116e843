use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// How long an issued reset token stays valid.
pub const RESET_TOKEN_TTL_MINUTES: i64 = 15;

#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct PasswordResetToken {
    pub id: Uuid,
    pub email: String,
    pub token: String,
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
    pub used: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Lazily evaluated token state. Expiry is checked at validation time;
/// nothing sweeps expired rows in the background.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenState {
    Valid,
    AlreadyUsed,
    Expired,
}

impl PasswordResetToken {
    /// Used wins over expired so a replayed token is always reported as
    /// replayed, no matter how old it is.
    pub fn state(&self, now: OffsetDateTime) -> TokenState {
        if self.used {
            TokenState::AlreadyUsed
        } else if now > self.expires_at {
            TokenState::Expired
        } else {
            TokenState::Valid
        }
    }
}
