//! Runtime configuration, parsed once at startup from flags and environment.

use anyhow::{bail, Result};
use clap::{Parser, ValueEnum};

/// Placeholder secret used when `JWT_SECRET` is unset. Refused in production.
pub const DEV_JWT_SECRET: &str = "dev-secret-change-in-production-minimum-32-characters";

const MIN_PRODUCTION_SECRET_LEN: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "carematch")]
#[command(about = "CareMatch marketplace API server")]
pub struct Config {
    /// Interface to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Path to the SQLite database file
    #[arg(long, env = "DATABASE_PATH", default_value = "carematch.db")]
    pub database_path: String,

    /// HMAC secret for session tokens
    #[arg(long, env = "JWT_SECRET", default_value = DEV_JWT_SECRET, hide_env_values = true)]
    pub jwt_secret: String,

    /// Session token lifetime
    #[arg(long, env = "JWT_TTL_HOURS", default_value_t = 24)]
    pub jwt_ttl_hours: i64,

    #[arg(long = "app-env", env = "APP_ENV", value_enum, default_value_t = Environment::Development)]
    pub environment: Environment,

    /// Allowed CORS origin (the web frontend). Permissive when unset in development.
    #[arg(long, env = "FRONTEND_ORIGIN")]
    pub frontend_origin: Option<String>,

    #[arg(long, env = "BCRYPT_COST", default_value_t = bcrypt::DEFAULT_COST)]
    pub bcrypt_cost: u32,

    #[arg(long, env = "SEED_ADMIN_EMAIL", default_value = "admin@carematch.local")]
    pub seed_admin_email: String,

    /// Seed an admin with this password when no admin exists
    #[arg(long, env = "SEED_ADMIN_PASSWORD", hide_env_values = true)]
    pub seed_admin_password: Option<String>,
}

impl Config {
    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Reject settings that are unsafe or unusable.
    pub fn validate(&self) -> Result<()> {
        if self.jwt_ttl_hours <= 0 {
            bail!("JWT_TTL_HOURS must be positive");
        }
        if !(4..=31).contains(&self.bcrypt_cost) {
            bail!("BCRYPT_COST must be between 4 and 31");
        }
        if self.is_production() {
            if self.jwt_secret == DEV_JWT_SECRET {
                bail!("JWT_SECRET must be set in production");
            }
            if self.jwt_secret.len() < MIN_PRODUCTION_SECRET_LEN {
                bail!(
                    "JWT_SECRET must be at least {} bytes in production",
                    MIN_PRODUCTION_SECRET_LEN
                );
            }
            if self.frontend_origin.is_none() {
                bail!("FRONTEND_ORIGIN must be set in production");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        let mut argv = vec!["carematch"];
        argv.extend_from_slice(args);
        Config::parse_from(argv)
    }

    #[test]
    fn test_development_defaults_validate() {
        let config = parse(&["--jwt-secret", DEV_JWT_SECRET, "--app-env", "development"]);
        assert!(!config.is_production());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_production_requires_real_secret() {
        let config = parse(&[
            "--app-env",
            "production",
            "--jwt-secret",
            DEV_JWT_SECRET,
            "--frontend-origin",
            "https://carematch.example",
        ]);
        assert!(config.validate().is_err());

        let short = parse(&[
            "--app-env",
            "production",
            "--jwt-secret",
            "short",
            "--frontend-origin",
            "https://carematch.example",
        ]);
        assert!(short.validate().is_err());

        let ok = parse(&[
            "--app-env",
            "production",
            "--jwt-secret",
            "0123456789abcdef0123456789abcdef-prod",
            "--frontend-origin",
            "https://carematch.example",
        ]);
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_ttl_and_cost() {
        let ttl = parse(&["--jwt-ttl-hours", "0", "--app-env", "development"]);
        assert!(ttl.validate().is_err());

        let cost = parse(&["--bcrypt-cost", "2", "--app-env", "development"]);
        assert!(cost.validate().is_err());
    }
}
