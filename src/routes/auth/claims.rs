use serde::{Deserialize, Serialize};

use crate::models::user::UserRole;

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Claims {
    /// User id as a string so the claim survives any JSON round trip.
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    /// Expiration as a UNIX timestamp.
    pub exp: usize,
}
