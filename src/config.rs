use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub identity_url: String,
    pub identity_api_key: String,
    pub messaging_url: String,
    pub messaging_token: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().expect("PORT must be a number"),
            identity_url: env::var("IDENTITY_URL").expect("IDENTITY_URL must be set (identity provider base URL)"),
            identity_api_key: env::var("IDENTITY_API_KEY").unwrap_or_default(),
            messaging_url: env::var("MESSAGING_URL").unwrap_or_else(|_| "http://localhost:8000/api/v1/messages".to_string()),
            messaging_token: env::var("MESSAGING_TOKEN").unwrap_or_else(|_| "test-token-1".to_string()),
        }
    }
}
