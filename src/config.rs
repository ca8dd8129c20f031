use std::env;

// Dev fallback only; set JWT_SECRET for any real deployment.
const DEV_JWT_SECRET: &str = "9b3aef88c9c44a7db1a52af83c7b9218d5c98c25b8c84c408cfd3a8d2c7a30f1";

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    pub jwt_secret: String,
    pub token_ttl_minutes: i64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| DEV_JWT_SECRET.to_string());
        let token_ttl_minutes = env::var("TOKEN_TTL_MINUTES")
            .ok()
            .and_then(|s| s.parse::<i64>().ok())
            .unwrap_or(60);

        Ok(Self {
            database_url,
            bind_addr,
            jwt_secret,
            token_ttl_minutes,
        })
    }
}
