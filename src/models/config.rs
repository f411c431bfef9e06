use serde::Deserialize;

/// Configuration options for the dashboard server.
///
/// Loaded from `config/default.yaml`, then `config/{APP_ENV}.yaml`, then
/// `APP_*` environment variables.
#[derive(Clone, Debug, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind.
    pub address: String,
    /// Port to bind.
    pub port: u16,
    /// SQLite database holding dashboard sessions.
    pub database_url: String,
    /// Base URL of the REST backend, including its `/api` prefix.
    pub backend_url: String,
    /// Key used to sign the session and flash cookies (at least 64 bytes).
    pub secret: String,
    /// Glob used to load tera templates.
    #[serde(default = "default_templates_dir")]
    pub templates_dir: String,
    /// Directory served under `/assets`.
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
    /// Maximum size of an uploaded video, in megabytes.
    #[serde(default = "default_upload_limit_mb")]
    pub upload_limit_mb: usize,
}

fn default_templates_dir() -> String {
    "templates/**/*".to_string()
}

fn default_static_dir() -> String {
    "./assets".to_string()
}

fn default_upload_limit_mb() -> usize {
    500
}
