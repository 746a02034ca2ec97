//! # Server Configuration
//!
//! Command-line flags for `roster-api serve`, each with an environment
//! variable fallback.

use std::time::Duration;

use clap::{Args, ValueEnum};
use roster_store::PgStoreConfig;

/// Output format for log lines on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable, colored when attached to a terminal.
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Configuration for the HTTP server.
#[derive(Debug, Clone, Args)]
pub struct AppConfig {
    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Postgres connection URL. Without it users are kept in memory.
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Upper bound on pooled database connections.
    #[arg(long, env = "DATABASE_MAX_CONNECTIONS", default_value_t = 10)]
    pub max_connections: u32,

    /// How long to wait for a free pooled connection, in milliseconds.
    #[arg(long, env = "DATABASE_ACQUIRE_TIMEOUT_MS", default_value_t = 5000)]
    pub acquire_timeout_ms: u64,

    /// Upper bound on a single store call, in milliseconds.
    #[arg(long, env = "STORE_TIMEOUT_MS", default_value_t = 5000)]
    pub store_timeout_ms: u64,

    /// Log output format.
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Per-call store timeout.
    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }

    /// Pool settings, when a database URL is configured.
    pub fn pg_config(&self) -> Option<PgStoreConfig> {
        self.database_url.as_ref().map(|url| PgStoreConfig {
            url: url.clone(),
            max_connections: self.max_connections,
            acquire_timeout: Duration::from_millis(self.acquire_timeout_ms),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        config: AppConfig,
    }

    #[test]
    fn flags_override_defaults() {
        let config = Harness::try_parse_from([
            "roster-api",
            "--port",
            "8081",
            "--database-url",
            "postgres://localhost/roster",
            "--max-connections",
            "3",
            "--acquire-timeout-ms",
            "250",
            "--store-timeout-ms",
            "750",
            "--log-format",
            "json",
        ])
        .unwrap()
        .config;

        assert_eq!(config.port, 8081);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.store_timeout(), Duration::from_millis(750));

        let pg = config.pg_config().unwrap();
        assert_eq!(pg.url, "postgres://localhost/roster");
        assert_eq!(pg.max_connections, 3);
        assert_eq!(pg.acquire_timeout, Duration::from_millis(250));
    }

    #[test]
    fn unknown_log_format_is_rejected() {
        assert!(Harness::try_parse_from(["roster-api", "--log-format", "xml"]).is_err());
    }
}
