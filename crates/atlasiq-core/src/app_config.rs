use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub meta_access_token: String,
    pub meta_graph_base_url: String,
    pub request_timeout_secs: u64,
    pub max_calls_per_hour: u32,
    pub search_radius_meters: f64,
    pub place_query: String,
    pub max_places: usize,
    pub posts_per_place: u32,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
    pub categories_path: Option<PathBuf>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("meta_access_token", &"[redacted]")
            .field("meta_graph_base_url", &self.meta_graph_base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_calls_per_hour", &self.max_calls_per_hour)
            .field("search_radius_meters", &self.search_radius_meters)
            .field("place_query", &self.place_query)
            .field("max_places", &self.max_places)
            .field("posts_per_place", &self.posts_per_place)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .field("categories_path", &self.categories_path)
            .finish()
    }
}
