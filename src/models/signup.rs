use serde::{Deserialize, Serialize};

/// Role-specific half of the signup payload. Recruiters carry their
/// company details; candidates carry nothing extra.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum RoleDetails {
    Candidate,
    #[serde(rename_all = "camelCase")]
    Recruiter {
        company_name: Option<String>,
        company_logo: Option<String>,
        company_website: Option<String>,
        about_company: Option<String>,
    },
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SignupPayload {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(flatten)]
    pub role: RoleDetails,
}
