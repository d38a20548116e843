pub mod application;
pub mod job;
pub mod password_reset;
pub mod saved_job;
pub mod signup;
pub mod user;
