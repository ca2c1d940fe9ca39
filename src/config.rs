use std::{env, str::FromStr};

use anyhow::{Context, bail};

/// How the admission engine treats a caller-supplied `duration` that does not
/// match the wall-clock span of the requested slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DurationPolicy {
    /// Accept the caller's duration as-is and bill on it.
    #[default]
    Waived,
    /// Reject bookings whose duration differs from `end - start`.
    Enforced,
}

impl FromStr for DurationPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "waived" => Ok(DurationPolicy::Waived),
            "enforced" => Ok(DurationPolicy::Enforced),
            other => bail!("unknown booking duration policy: {other}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub duration_policy: DurationPolicy,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET is not set")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let duration_policy = match env::var("BOOKING_DURATION_POLICY") {
            Ok(raw) => raw.parse()?,
            Err(_) => DurationPolicy::default(),
        };
        Ok(Self {
            port,
            database_url,
            host,
            jwt_secret,
            duration_policy,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_policy_parses_case_insensitively() {
        assert_eq!(
            "Enforced".parse::<DurationPolicy>().unwrap(),
            DurationPolicy::Enforced
        );
        assert_eq!(
            " waived ".parse::<DurationPolicy>().unwrap(),
            DurationPolicy::Waived
        );
        assert!("strict".parse::<DurationPolicy>().is_err());
    }
}
