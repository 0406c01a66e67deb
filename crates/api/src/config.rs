use closer_core::pipeline::PipelineStep;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have sensible defaults suitable for
/// local development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Graceful shutdown timeout in seconds (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Operator JWT validation configuration.
    pub jwt: JwtConfig,
    /// Calendar provider and scheduling-widget configuration.
    pub calendar: CalendarConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`| `30`                       |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            jwt: JwtConfig::from_env(),
            calendar: CalendarConfig::from_env(),
        }
    }
}

/// Calendar provider and hosted scheduling-widget configuration.
#[derive(Debug, Clone)]
pub struct CalendarConfig {
    /// Base URL of the calendar provider REST API.
    pub api_url: String,
    /// Calendar to read availability from and book events into.
    pub calendar_id: String,
    /// Timezone sent with created events.
    pub timezone: String,
    /// Hosted scheduling page for site-visit appointments.
    pub scheduler_sopralluogo_url: String,
    /// Hosted scheduling page for preliminary-contract appointments.
    pub scheduler_preliminare_url: String,
}

impl CalendarConfig {
    /// Load calendar configuration from environment variables.
    ///
    /// | Env Var                      | Default                                    |
    /// |------------------------------|--------------------------------------------|
    /// | `CALENDAR_API_URL`           | the provider's production URL              |
    /// | `CALENDAR_ID`                | `primary`                                  |
    /// | `CALENDAR_TIMEZONE`          | `Europe/Rome`                              |
    /// | `SCHEDULER_SOPRALLUOGO_URL`  | `https://calendly.com/closer/sopralluogo`  |
    /// | `SCHEDULER_PRELIMINARE_URL`  | `https://calendly.com/closer/preliminare`  |
    pub fn from_env() -> Self {
        Self {
            api_url: std::env::var("CALENDAR_API_URL")
                .unwrap_or_else(|_| closer_calendar::api::DEFAULT_BASE_URL.into()),
            calendar_id: std::env::var("CALENDAR_ID").unwrap_or_else(|_| "primary".into()),
            timezone: std::env::var("CALENDAR_TIMEZONE").unwrap_or_else(|_| "Europe/Rome".into()),
            scheduler_sopralluogo_url: std::env::var("SCHEDULER_SOPRALLUOGO_URL")
                .unwrap_or_else(|_| "https://calendly.com/closer/sopralluogo".into()),
            scheduler_preliminare_url: std::env::var("SCHEDULER_PRELIMINARE_URL")
                .unwrap_or_else(|_| "https://calendly.com/closer/preliminare".into()),
        }
    }

    /// The hosted scheduling page for a bookable step, if any.
    pub fn scheduler_url(&self, step: PipelineStep) -> Option<&str> {
        match step {
            PipelineStep::Sopralluogo => Some(&self.scheduler_sopralluogo_url),
            PipelineStep::Preliminare => Some(&self.scheduler_preliminare_url),
            PipelineStep::Chiamata | PipelineStep::Accordo => None,
        }
    }
}
