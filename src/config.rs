use std::env;

pub struct Config {
    pub database_url: String,
    pub frontend_origin: String,
    pub bind_addr: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let frontend_origin = env::var("FRONTEND_ORIGIN").expect("FRONTEND_ORIGIN must be set");
        // JWT_SECRET is read lazily by the jwt utils; fail fast here instead
        // of on the first login request.
        env::var("JWT_SECRET").expect("JWT_SECRET must be set");
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:5000".to_string());

        Config {
            database_url,
            frontend_origin,
            bind_addr,
        }
    }
}
