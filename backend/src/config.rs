use std::env;

/// Runtime settings, read once at startup. Every value has a default so the
/// binary runs with no environment set at all.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Path of the SQLite database file. Handlers open their own connection
    /// against this path per request.
    pub database: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let host =
            env::var("OFFICE_BEARERS_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("OFFICE_BEARERS_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);
        let database = env::var("OFFICE_BEARERS_DB")
            .unwrap_or_else(|_| "office_bearers.sqlite".to_string());

        AppConfig {
            host,
            port,
            database,
        }
    }
}
