//! Configuration management via environment variables
//!
//! Provides helper functions for reading environment variables with fallback
//! to deprecated variable names with warning logs.

/// Default bind host
pub const DEFAULT_HOST: &str = "0.0.0.0";
/// Default listen port
pub const DEFAULT_PORT: u16 = 3000;
/// Default database URL
pub const DEFAULT_DATABASE_URL: &str = "sqlite:data/ledger.db";
/// Default JWT lifetime in hours
pub const DEFAULT_JWT_EXPIRATION_HOURS: i64 = 72;

/// Get an environment variable with fallback to a deprecated name
///
/// If the new variable name is set, returns its value.
/// If only the old (deprecated) variable name is set, returns its value
/// and logs a deprecation warning.
///
/// # Arguments
/// * `new_name` - The new environment variable name (preferred)
/// * `old_name` - The deprecated environment variable name (fallback)
///
/// # Returns
/// * `Some(value)` - The environment variable value
/// * `None` - Neither variable is set
///
/// # Example
/// ```
/// use resource_ledger::config::get_env_with_fallback;
///
/// let port = get_env_with_fallback("LEDGER_PORT", "PORT");
/// ```
pub fn get_env_with_fallback(new_name: &str, old_name: &str) -> Option<String> {
    if let Ok(val) = std::env::var(new_name) {
        return Some(val);
    }
    if let Ok(val) = std::env::var(old_name) {
        tracing::warn!(
            "Environment variable '{}' is deprecated, use '{}' instead",
            old_name,
            new_name
        );
        return Some(val);
    }
    None
}

/// Get an environment variable with fallback and default value
pub fn get_env_with_fallback_or(new_name: &str, old_name: &str, default: &str) -> String {
    get_env_with_fallback(new_name, old_name).unwrap_or_else(|| default.to_string())
}

/// Get an environment variable with fallback, parsing to a specific type
///
/// Falls back to `default` when neither variable is set or parsing fails.
pub fn get_env_with_fallback_parse<T: std::str::FromStr>(
    new_name: &str,
    old_name: &str,
    default: T,
) -> T {
    get_env_with_fallback(new_name, old_name)
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// Get a boolean flag (`true/1/yes/on`, case-insensitive)
pub fn get_env_flag(new_name: &str, old_name: &str) -> bool {
    get_env_with_fallback(new_name, old_name)
        .map(|value| {
            matches!(
                value.to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            )
        })
        .unwrap_or(false)
}

/// Server configuration loaded from the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    /// Bind host
    pub host: String,
    /// Listen port
    pub port: u16,
    /// SQLite database URL
    pub database_url: String,
    /// JWT signing secret (generated at startup when unset)
    pub jwt_secret: Option<String>,
    /// JWT lifetime in hours
    pub jwt_expiration_hours: i64,
    /// Seed sample resources on an empty database
    pub seed_data: bool,
    /// Allowed CORS origin (any origin when unset)
    pub cors_origin: Option<String>,
}

impl LedgerConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: get_env_with_fallback_or("LEDGER_HOST", "HOST", DEFAULT_HOST),
            port: get_env_with_fallback_parse("LEDGER_PORT", "PORT", DEFAULT_PORT),
            database_url: get_env_with_fallback_or(
                "LEDGER_DATABASE_URL",
                "DATABASE_URL",
                DEFAULT_DATABASE_URL,
            ),
            jwt_secret: get_env_with_fallback("LEDGER_JWT_SECRET", "SECRET")
                .filter(|s| !s.is_empty()),
            jwt_expiration_hours: get_env_with_fallback_parse(
                "LEDGER_JWT_EXPIRATION_HOURS",
                "JWT_EXPIRATION_HOURS",
                DEFAULT_JWT_EXPIRATION_HOURS,
            ),
            seed_data: get_env_flag("LEDGER_SEED_DATA", "SEED_DATA"),
            cors_origin: get_env_with_fallback("LEDGER_CORS_ORIGIN", "CORS_ORIGIN")
                .filter(|s| !s.is_empty()),
        }
    }

    /// `host:port` bind address
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
