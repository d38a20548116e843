mod config;
mod db;
mod models;
mod responses;
mod routes;
mod state;
mod utils;

use std::{net::SocketAddr, sync::Arc};

use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method};
use axum::{
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post},
    Router,
};
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use config::Config;
use db::{
    application_repository::ApplicationRepository, job_repository::JobRepository,
    postgres_application_repository::PostgresApplicationRepository,
    postgres_job_repository::PostgresJobRepository,
    postgres_saved_job_repository::PostgresSavedJobRepository,
    postgres_user_repository::PostgresUserRepository,
    saved_job_repository::SavedJobRepository, user_repository::UserRepository,
};
use responses::JsonResponse;
use routes::{
    applications::{
        applications_for_job, apply, check_application, my_applications, update_status,
    },
    auth::{
        forgot_password::handle_forgot_password,
        handle_login, handle_logout, handle_me, handle_signup,
        reset_password::{handle_reset_password, handle_validate_token},
    },
    jobs::{
        close_job, create_job, delete_job, get_job, list_jobs, my_jobs, related_jobs, reopen_job,
    },
    saved_jobs::{check_saved, list_saved_jobs, save_job, unsave_job},
};
use state::AppState;

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber).unwrap();

    let config = Config::from_env();

    let pool = establish_connection(&config.database_url).await;
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    let state = AppState {
        users: Arc::new(PostgresUserRepository { pool: pool.clone() }) as Arc<dyn UserRepository>,
        jobs: Arc::new(PostgresJobRepository { pool: pool.clone() }) as Arc<dyn JobRepository>,
        applications: Arc::new(PostgresApplicationRepository { pool: pool.clone() })
            as Arc<dyn ApplicationRepository>,
        saved_jobs: Arc::new(PostgresSavedJobRepository { pool: pool.clone() })
            as Arc<dyn SavedJobRepository>,
    };

    let cors = CorsLayer::new()
        .allow_origin(config.frontend_origin.parse::<HeaderValue>().unwrap())
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([CONTENT_TYPE])
        .allow_credentials(true);

    // Stricter limiter for the credential endpoints.
    let auth_governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(1)
            .burst_size(10)
            .use_headers()
            .error_handler(|_err| {
                JsonResponse::too_many_requests(
                    "Too many requests. Please wait a moment and try again.",
                )
                .into_response()
            })
            .finish()
            .unwrap(),
    );

    let auth_routes = Router::new()
        .route("/register", post(handle_signup))
        .route("/login", post(handle_login))
        .route("/logout", post(handle_logout))
        .route("/me", get(handle_me))
        .route("/forgot-password", post(handle_forgot_password))
        .route("/reset-password", post(handle_reset_password))
        .route("/reset-password/{token}", get(handle_validate_token))
        .layer(GovernorLayer {
            config: auth_governor_conf,
        });

    let job_routes = Router::new()
        .route("/", get(list_jobs).post(create_job))
        .route("/my-jobs", get(my_jobs))
        .route("/{id}", get(get_job).delete(delete_job))
        .route("/{id}/related", get(related_jobs))
        .route("/{id}/close", patch(close_job))
        .route("/{id}/reopen", patch(reopen_job));

    let application_routes = Router::new()
        .route("/", post(apply))
        .route("/my", get(my_applications))
        .route("/check/{job_id}", get(check_application))
        .route("/job/{job_id}", get(applications_for_job))
        .route("/{id}/status", patch(update_status));

    let saved_job_routes = Router::new()
        .route("/", post(save_job).get(list_saved_jobs))
        .route("/check/{job_id}", get(check_saved))
        .route("/{job_id}", delete(unsave_job));

    let app = Router::new()
        .route("/", get(root))
        .nest("/api/auth", auth_routes)
        .nest("/api/jobs", job_routes)
        .nest("/api/applications", application_routes)
        .nest("/api/saved-jobs", saved_job_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr: SocketAddr = config
        .bind_addr
        .parse()
        .expect("BIND_ADDR must be a valid socket address");
    let listener = TcpListener::bind(addr).await.unwrap();
    info!("Listening on http://{}", addr);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .unwrap();
}

async fn root() -> Response {
    JsonResponse::success("Job board API is running").into_response()
}

/// Establish a connection to the database and verify it.
async fn establish_connection(database_url: &str) -> PgPool {
    let pool = PgPool::connect(database_url)
        .await
        .expect("Failed to connect to the database");

    sqlx::query("SELECT 1")
        .execute(&pool)
        .await
        .expect("Failed to verify database connection");

    info!("Successfully connected to the database");
    pool
}
