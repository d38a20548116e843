//! In-memory repositories backing the handler tests. They implement the
//! same matching, ordering and pagination policy the Postgres queries
//! express in SQL.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::models::{
    application::{
        Application, ApplicationStatus, ApplicationWithCandidate, ApplicationWithJob,
        CandidateSummary,
    },
    job::{
        CreateJobPayload, Job, JobQuery, JobSort, JobStatus, JobWithRecruiter, RecruiterInfo,
    },
    password_reset::PasswordResetToken,
    saved_job::{SavedJob, SavedJobWithJob},
    signup::{RoleDetails, SignupPayload},
    user::{PublicUser, User, UserRole},
};

use super::{
    application_repository::ApplicationRepository, job_repository::JobRepository,
    saved_job_repository::SavedJobRepository, user_repository::UserRepository,
};

fn db_failure() -> sqlx::Error {
    sqlx::Error::Protocol("mock db failure".into())
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    pub users: Mutex<Vec<User>>,
    pub reset_tokens: Mutex<Vec<PasswordResetToken>>,
    pub should_fail: bool,
}

impl InMemoryUserRepository {
    pub fn with_users(users: Vec<User>) -> Self {
        Self {
            users: Mutex::new(users),
            ..Default::default()
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        if self.should_fail {
            return Err(db_failure());
        }
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn is_email_taken(&self, email: &str) -> Result<bool, sqlx::Error> {
        if self.should_fail {
            return Err(db_failure());
        }
        Ok(self.find_user_by_email(email).await?.is_some())
    }

    async fn create_user(
        &self,
        payload: &SignupPayload,
        password_hash: &str,
    ) -> Result<User, sqlx::Error> {
        if self.should_fail {
            return Err(db_failure());
        }
        let (role, company_id) = match &payload.role {
            RoleDetails::Candidate => (UserRole::Candidate, None),
            RoleDetails::Recruiter { company_name, .. } => (
                UserRole::Recruiter,
                company_name.as_ref().map(|_| Uuid::new_v4()),
            ),
        };
        let user = User {
            id: Uuid::new_v4(),
            name: payload.name.clone(),
            email: payload.email.clone(),
            password_hash: password_hash.to_string(),
            role,
            company_id,
            created_at: OffsetDateTime::now_utc(),
        };
        self.users.lock().unwrap().push(user.clone());
        Ok(user)
    }

    async fn find_public_user_by_id(
        &self,
        user_id: Uuid,
    ) -> Result<Option<PublicUser>, sqlx::Error> {
        if self.should_fail {
            return Err(db_failure());
        }
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.id == user_id).map(PublicUser::from))
    }

    async fn insert_password_reset_token(
        &self,
        email: &str,
        token: &str,
        expires_at: OffsetDateTime,
    ) -> Result<(), sqlx::Error> {
        if self.should_fail {
            return Err(db_failure());
        }
        let mut tokens = self.reset_tokens.lock().unwrap();
        for existing in tokens.iter_mut().filter(|t| t.email == email) {
            existing.used = true;
        }
        tokens.push(PasswordResetToken {
            id: Uuid::new_v4(),
            email: email.to_string(),
            token: token.to_string(),
            expires_at,
            used: false,
            created_at: OffsetDateTime::now_utc(),
        });
        Ok(())
    }

    async fn find_password_reset_token(
        &self,
        token: &str,
    ) -> Result<Option<PasswordResetToken>, sqlx::Error> {
        if self.should_fail {
            return Err(db_failure());
        }
        let tokens = self.reset_tokens.lock().unwrap();
        Ok(tokens.iter().find(|t| t.token == token).cloned())
    }

    async fn consume_password_reset_token(
        &self,
        token: &str,
        password_hash: &str,
    ) -> Result<(), sqlx::Error> {
        if self.should_fail {
            return Err(db_failure());
        }
        let email = {
            let mut tokens = self.reset_tokens.lock().unwrap();
            let record = tokens
                .iter_mut()
                .find(|t| t.token == token)
                .ok_or_else(db_failure)?;
            record.used = true;
            record.email.clone()
        };
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.iter_mut().find(|u| u.email == email) {
            user.password_hash = password_hash.to_string();
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryJobRepository {
    pub jobs: Mutex<Vec<JobWithRecruiter>>,
    pub should_fail: bool,
}

impl InMemoryJobRepository {
    pub fn with_jobs(jobs: Vec<JobWithRecruiter>) -> Self {
        Self {
            jobs: Mutex::new(jobs),
            ..Default::default()
        }
    }
}

#[async_trait]
impl JobRepository for InMemoryJobRepository {
    async fn create_job(
        &self,
        recruiter_id: Uuid,
        payload: &CreateJobPayload,
    ) -> Result<Job, sqlx::Error> {
        if self.should_fail {
            return Err(db_failure());
        }
        let job = Job {
            id: Uuid::new_v4(),
            title: payload.title.clone(),
            description: payload.description.clone(),
            requirements: payload.requirements.clone(),
            location: payload.location.clone(),
            salary_range: payload.salary_range.clone(),
            job_type: payload.job_type.clone(),
            experience_level: payload.experience_level.clone(),
            skills: payload.skills.clone(),
            recruiter_id,
            status: JobStatus::Open,
            created_at: OffsetDateTime::now_utc(),
        };
        self.jobs.lock().unwrap().push(JobWithRecruiter {
            job: job.clone(),
            recruiter: RecruiterInfo {
                name: "Recruiter".into(),
                company: None,
            },
        });
        Ok(job)
    }

    async fn list_jobs(
        &self,
        query: &JobQuery,
    ) -> Result<(Vec<JobWithRecruiter>, i64), sqlx::Error> {
        if self.should_fail {
            return Err(db_failure());
        }
        let jobs = self.jobs.lock().unwrap();
        let mut matching: Vec<JobWithRecruiter> = jobs
            .iter()
            .filter(|entry| query.filter.matches(&entry.job))
            .cloned()
            .collect();
        matching.sort_by(|a, b| {
            let key_a = (a.job.created_at, a.job.id);
            let key_b = (b.job.created_at, b.job.id);
            match query.sort {
                JobSort::Newest => key_b.cmp(&key_a),
                JobSort::Oldest => key_a.cmp(&key_b),
            }
        });
        let total = matching.len() as i64;
        let page: Vec<JobWithRecruiter> = matching
            .into_iter()
            .skip(query.offset() as usize)
            .take(query.limit as usize)
            .collect();
        Ok((page, total))
    }

    async fn find_job(&self, id: Uuid) -> Result<Option<JobWithRecruiter>, sqlx::Error> {
        if self.should_fail {
            return Err(db_failure());
        }
        let jobs = self.jobs.lock().unwrap();
        Ok(jobs.iter().find(|entry| entry.job.id == id).cloned())
    }

    async fn find_job_basic(&self, id: Uuid) -> Result<Option<Job>, sqlx::Error> {
        Ok(self.find_job(id).await?.map(|entry| entry.job))
    }

    async fn related_jobs(
        &self,
        location: &str,
        exclude: Uuid,
        limit: i64,
    ) -> Result<Vec<JobWithRecruiter>, sqlx::Error> {
        if self.should_fail {
            return Err(db_failure());
        }
        let jobs = self.jobs.lock().unwrap();
        let mut related: Vec<JobWithRecruiter> = jobs
            .iter()
            .filter(|entry| {
                entry.job.location == location
                    && entry.job.id != exclude
                    && entry.job.status == JobStatus::Open
            })
            .cloned()
            .collect();
        related.sort_by(|a, b| {
            (b.job.created_at, b.job.id).cmp(&(a.job.created_at, a.job.id))
        });
        related.truncate(limit as usize);
        Ok(related)
    }

    async fn jobs_by_recruiter(
        &self,
        recruiter_id: Uuid,
    ) -> Result<Vec<JobWithRecruiter>, sqlx::Error> {
        if self.should_fail {
            return Err(db_failure());
        }
        let jobs = self.jobs.lock().unwrap();
        let mut mine: Vec<JobWithRecruiter> = jobs
            .iter()
            .filter(|entry| entry.job.recruiter_id == recruiter_id)
            .cloned()
            .collect();
        mine.sort_by(|a, b| (b.job.created_at, b.job.id).cmp(&(a.job.created_at, a.job.id)));
        Ok(mine)
    }

    async fn set_job_status(&self, id: Uuid, status: JobStatus) -> Result<(), sqlx::Error> {
        let mut jobs = self.jobs.lock().unwrap();
        if let Some(entry) = jobs.iter_mut().find(|entry| entry.job.id == id) {
            entry.job.status = status;
        }
        Ok(())
    }

    async fn delete_job(&self, id: Uuid) -> Result<(), sqlx::Error> {
        let mut jobs = self.jobs.lock().unwrap();
        jobs.retain(|entry| entry.job.id != id);
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryApplicationRepository {
    pub applications: Mutex<Vec<Application>>,
    /// job id -> owning recruiter, for status-update authorization.
    pub job_owners: Mutex<HashMap<Uuid, Uuid>>,
    /// job id -> job context returned by candidate listings.
    pub job_context: Mutex<HashMap<Uuid, JobWithRecruiter>>,
    pub candidates: Mutex<HashMap<Uuid, CandidateSummary>>,
    pub should_fail: bool,
}

#[async_trait]
impl ApplicationRepository for InMemoryApplicationRepository {
    async fn find_application(
        &self,
        job_id: Uuid,
        candidate_id: Uuid,
    ) -> Result<Option<Application>, sqlx::Error> {
        if self.should_fail {
            return Err(db_failure());
        }
        let applications = self.applications.lock().unwrap();
        Ok(applications
            .iter()
            .find(|a| a.job_id == job_id && a.candidate_id == candidate_id)
            .cloned())
    }

    async fn create_application(
        &self,
        job_id: Uuid,
        candidate_id: Uuid,
        resume_url: &str,
    ) -> Result<Application, sqlx::Error> {
        if self.should_fail {
            return Err(db_failure());
        }
        let application = Application {
            id: Uuid::new_v4(),
            job_id,
            candidate_id,
            resume_url: resume_url.to_string(),
            status: ApplicationStatus::Applied,
            applied_at: OffsetDateTime::now_utc(),
        };
        self.applications.lock().unwrap().push(application.clone());
        Ok(application)
    }

    async fn applications_for_job(
        &self,
        job_id: Uuid,
    ) -> Result<Vec<ApplicationWithCandidate>, sqlx::Error> {
        if self.should_fail {
            return Err(db_failure());
        }
        let applications = self.applications.lock().unwrap();
        let candidates = self.candidates.lock().unwrap();
        Ok(applications
            .iter()
            .filter(|a| a.job_id == job_id)
            .map(|a| ApplicationWithCandidate {
                application: a.clone(),
                candidate: candidates.get(&a.candidate_id).cloned().unwrap_or(
                    CandidateSummary {
                        name: "Candidate".into(),
                        email: "candidate@example.com".into(),
                    },
                ),
            })
            .collect())
    }

    async fn applications_for_candidate(
        &self,
        candidate_id: Uuid,
    ) -> Result<Vec<ApplicationWithJob>, sqlx::Error> {
        if self.should_fail {
            return Err(db_failure());
        }
        let applications = self.applications.lock().unwrap();
        let context = self.job_context.lock().unwrap();
        Ok(applications
            .iter()
            .filter(|a| a.candidate_id == candidate_id)
            .filter_map(|a| {
                context.get(&a.job_id).map(|job| ApplicationWithJob {
                    application: a.clone(),
                    job: job.clone(),
                })
            })
            .collect())
    }

    async fn find_application_with_owner(
        &self,
        id: Uuid,
    ) -> Result<Option<(Application, Uuid)>, sqlx::Error> {
        if self.should_fail {
            return Err(db_failure());
        }
        let applications = self.applications.lock().unwrap();
        let owners = self.job_owners.lock().unwrap();
        Ok(applications.iter().find(|a| a.id == id).and_then(|a| {
            owners
                .get(&a.job_id)
                .map(|owner| (a.clone(), *owner))
        }))
    }

    async fn set_application_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
    ) -> Result<(), sqlx::Error> {
        let mut applications = self.applications.lock().unwrap();
        if let Some(application) = applications.iter_mut().find(|a| a.id == id) {
            application.status = status;
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemorySavedJobRepository {
    pub saved: Mutex<Vec<SavedJob>>,
    pub job_context: Mutex<HashMap<Uuid, JobWithRecruiter>>,
    pub should_fail: bool,
}

#[async_trait]
impl SavedJobRepository for InMemorySavedJobRepository {
    async fn find_saved(
        &self,
        user_id: Uuid,
        job_id: Uuid,
    ) -> Result<Option<SavedJob>, sqlx::Error> {
        if self.should_fail {
            return Err(db_failure());
        }
        let saved = self.saved.lock().unwrap();
        Ok(saved
            .iter()
            .find(|s| s.user_id == user_id && s.job_id == job_id)
            .cloned())
    }

    async fn save_job(&self, user_id: Uuid, job_id: Uuid) -> Result<SavedJob, sqlx::Error> {
        if self.should_fail {
            return Err(db_failure());
        }
        let entry = SavedJob {
            id: Uuid::new_v4(),
            user_id,
            job_id,
            saved_at: OffsetDateTime::now_utc(),
        };
        self.saved.lock().unwrap().push(entry.clone());
        Ok(entry)
    }

    async fn unsave_job(&self, user_id: Uuid, job_id: Uuid) -> Result<bool, sqlx::Error> {
        if self.should_fail {
            return Err(db_failure());
        }
        let mut saved = self.saved.lock().unwrap();
        let before = saved.len();
        saved.retain(|s| !(s.user_id == user_id && s.job_id == job_id));
        Ok(saved.len() < before)
    }

    async fn saved_jobs_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<SavedJobWithJob>, sqlx::Error> {
        if self.should_fail {
            return Err(db_failure());
        }
        let saved = self.saved.lock().unwrap();
        let context = self.job_context.lock().unwrap();
        let mut mine: Vec<SavedJobWithJob> = saved
            .iter()
            .filter(|s| s.user_id == user_id)
            .filter_map(|s| {
                context.get(&s.job_id).map(|job| SavedJobWithJob {
                    saved: s.clone(),
                    job: job.clone(),
                })
            })
            .collect();
        mine.sort_by(|a, b| b.saved.saved_at.cmp(&a.saved.saved_at));
        Ok(mine)
    }
}
