use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use enrichment::EnrichmentSettings;
use storage::PoolSettings;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub pool: PoolSettings,
    pub enrichment: EnrichmentSettings,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup. Missing keys use the
    /// documented defaults; `DATABASE_URL` wins over the `DB_*` parts.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let database_url = match lookup("DATABASE_URL") {
            Some(url) => url,
            None => format!(
                "postgres://{}:{}@{}:{}/{}",
                var("DB_USER", "postgres"),
                var("DB_PASSWORD", "secret"),
                var("DB_HOST", "localhost"),
                var("DB_PORT", "5432"),
                var("DB_NAME", "persons_db"),
            ),
        };

        let pool = PoolSettings {
            max_connections: parse(&lookup, "DB_MAX_CONNECTIONS", 25)?,
            max_lifetime: Duration::from_secs(parse(&lookup, "DB_MAX_LIFETIME_SECS", 300)?),
            ..PoolSettings::default()
        };

        let defaults = EnrichmentSettings::default();
        let enrichment = EnrichmentSettings {
            age_url: lookup("AGE_API_URL").unwrap_or(defaults.age_url),
            gender_url: lookup("GENDER_API_URL").unwrap_or(defaults.gender_url),
            nationality_url: lookup("NATIONALITY_API_URL").unwrap_or(defaults.nationality_url),
            timeout: Duration::from_secs(parse(
                &lookup,
                "PREDICTOR_TIMEOUT_SECS",
                defaults.timeout.as_secs(),
            )?),
        };

        Ok(Self {
            host: var("HOST", "0.0.0.0"),
            port: parse(&lookup, "PORT", 8080)?,
            database_url,
            pool,
            enrichment,
        })
    }

    /// Database URL without credentials, for logging.
    pub fn redacted_database_url(&self) -> &str {
        self.database_url
            .split('@')
            .next_back()
            .unwrap_or("unknown")
    }
}

fn parse<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} must be a number")),
        None => Ok(default),
    }
}
