//! `PostgreSQL` connection configuration.

use serde::Deserialize;

use quarry_types::error::{SourceError, ValidationFailure};

/// Connection settings for a `PostgreSQL` source.
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectionConfig {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub user: String,
    #[serde(default)]
    pub password: String,
    pub database: String,
    /// Optional connect timeout in seconds.
    #[serde(default)]
    pub connect_timeout_secs: Option<u64>,
}

fn default_port() -> u16 {
    5432
}

impl ConnectionConfig {
    /// Check the connection fields before any connect attempt.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Configuration`] carrying every violation.
    pub fn validate(&self) -> Result<(), SourceError> {
        let mut failures = Vec::new();
        if self.host.trim().is_empty() {
            failures.push(ValidationFailure::new("Host must be specified.", None));
        }
        if self.user.trim().is_empty() {
            failures.push(ValidationFailure::new("User must be specified.", None));
        }
        if self.database.trim().is_empty() {
            failures.push(ValidationFailure::new("Database must be specified.", None));
        }
        if failures.is_empty() {
            Ok(())
        } else {
            Err(SourceError::Configuration(failures))
        }
    }

    /// libpq-style connection string, without the password, for logging.
    #[must_use]
    pub fn display_string(&self) -> String {
        format!(
            "host={} port={} user={} dbname={}",
            self.host, self.port, self.user, self.database
        )
    }
}
