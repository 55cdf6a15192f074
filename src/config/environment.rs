//! Deployment environment, selecting `config/{environment}.toml`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Test,
    Staging,
    Production,
}

impl Environment {
    /// Variable read by `from_env`.
    pub const ENV_VAR: &'static str = "VILLA_APP_ENV";

    pub const ALL: [Environment; 4] = [
        Environment::Development,
        Environment::Test,
        Environment::Staging,
        Environment::Production,
    ];

    /// `VILLA_APP_ENV`, falling back to `Development` when unset or unknown.
    pub fn from_env() -> Self {
        match std::env::var(Self::ENV_VAR) {
            Ok(value) => value.parse().unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    /// Lowercase name, also the stem of the per-environment config file.
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Test => "test",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        let alias = match wanted.as_str() {
            "dev" => "development",
            "stage" => "staging",
            "prod" => "production",
            other => other,
        };

        Self::ALL
            .into_iter()
            .find(|env| env.as_str() == alias)
            .ok_or_else(|| {
                ConfigError::EnvVarError(format!(
                    "Invalid {} '{}'. Valid values are: development, test, staging, production",
                    Self::ENV_VAR,
                    s
                ))
            })
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
