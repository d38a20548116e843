use std::sync::Arc;

use crate::db::{
    application_repository::ApplicationRepository, job_repository::JobRepository,
    saved_job_repository::SavedJobRepository, user_repository::UserRepository,
};

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub jobs: Arc<dyn JobRepository>,
    pub applications: Arc<dyn ApplicationRepository>,
    pub saved_jobs: Arc<dyn SavedJobRepository>,
}
