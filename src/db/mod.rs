pub mod application_repository;
pub mod job_repository;
pub mod mock_db;
pub mod postgres_application_repository;
pub mod postgres_job_repository;
pub mod postgres_saved_job_repository;
pub mod postgres_user_repository;
pub mod saved_job_repository;
pub mod user_repository;
