use dotenvy::dotenv;
use once_cell::sync::Lazy;
use std::env;

pub static CONFIG: Lazy<Config> = Lazy::new(|| {
    dotenv().ok(); // Load .env file if present
    Config {
        search_api_url: get_env_or_default("SEARCH_API_URL", "http://localhost:5000"),
        source_base_url: get_env_or_default("SOURCE_BASE_URL", "https://docs.example.com"),
        page_url: get_env_or_default("PAGE_URL", "http://localhost:5000/"),
        log_level: get_env_or_default("LOG_LEVEL", "info"),
    }
});

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the search service (`/search` and `/health` hang off it).
    pub search_api_url: String,
    /// Prefix that `metadata.source_path` is appended to.
    pub source_base_url: String,
    /// URL the page is "loaded" at. A `q` parameter here triggers a deep-link search.
    pub page_url: String,
    pub log_level: String,
}

fn get_env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
