//! Settings read from the environment (a `.env` file is loaded first by `main`).
//!
//! | Variable                   | Default                        |
//! |----------------------------|--------------------------------|
//! | `PORT`                     | `8000`                         |
//! | `APP_ENV`                  | `development`                  |
//! | `DATABASE_URL`             | `sqlite://blogful.db?mode=rwc` |
//! | `DATABASE_MAX_CONNECTIONS` | `5`                            |
//! | `ARTICLES_TABLE`           | `articles`                     |
//! | `API_PREFIX`               | empty                          |

use std::env;
use std::str::FromStr;

use crate::handlers::errors::ErrorPolicy;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be a number, got {value:?}")]
    NotANumber { name: &'static str, value: String },
    #[error("unknown APP_ENV {0:?}, expected development, test or production")]
    UnknownEnvironment(String),
    #[error("ARTICLES_TABLE {0:?} is not a valid table name")]
    InvalidTableName(String),
    #[error("API_PREFIX {0:?} must start with '/'")]
    InvalidPrefix(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "test" => Ok(Self::Test),
            "production" | "prod" => Ok(Self::Production),
            _ => Err(ConfigError::UnknownEnvironment(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub environment: Environment,
    pub database_url: String,
    pub max_connections: u32,
    pub table_name: String,
    /// Empty or a path starting with `/`, never ending with `/`.
    pub api_prefix: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from any variable source, so tests need not touch the process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = number(&lookup, "PORT", 8000)?;
        let max_connections = number(&lookup, "DATABASE_MAX_CONNECTIONS", 5)?;
        let environment = match lookup("APP_ENV") {
            Some(value) => value.parse()?,
            None => Environment::Development,
        };
        let database_url = lookup("DATABASE_URL")
            .unwrap_or_else(|| "sqlite://blogful.db?mode=rwc".to_string());

        let table_name = lookup("ARTICLES_TABLE").unwrap_or_else(|| "articles".to_string());
        if !is_valid_table_name(&table_name) {
            return Err(ConfigError::InvalidTableName(table_name));
        }

        let api_prefix = lookup("API_PREFIX").unwrap_or_default();
        let api_prefix = api_prefix.trim_end_matches('/').to_string();
        if !api_prefix.is_empty() && !api_prefix.starts_with('/') {
            return Err(ConfigError::InvalidPrefix(api_prefix));
        }

        Ok(Self {
            port,
            environment,
            database_url,
            max_connections,
            table_name,
            api_prefix,
        })
    }

    pub fn error_policy(&self) -> ErrorPolicy {
        match self.environment {
            Environment::Production => ErrorPolicy::Opaque,
            Environment::Development | Environment::Test => ErrorPolicy::Detailed,
        }
    }

    /// Collection path, e.g. `/api/articles`.
    pub fn articles_path(&self) -> String {
        format!("{}/articles", self.api_prefix)
    }
}

fn number<F, N>(lookup: &F, name: &'static str, default: N) -> Result<N, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    N: FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::NotANumber { name, value }),
    }
}

fn is_valid_table_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.port, 8000);
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.database_url, "sqlite://blogful.db?mode=rwc");
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.table_name, "articles");
        assert_eq!(config.articles_path(), "/articles");
        assert_eq!(config.error_policy(), ErrorPolicy::Detailed);
    }

    #[test]
    fn production_hides_store_errors() {
        let config = config(&[("APP_ENV", "production")]).unwrap();
        assert_eq!(config.error_policy(), ErrorPolicy::Opaque);
    }

    #[test]
    fn prefix_is_normalized() {
        let prefixed = config(&[("API_PREFIX", "/api/")]).unwrap();
        assert_eq!(prefixed.api_prefix, "/api");
        assert_eq!(prefixed.articles_path(), "/api/articles");

        assert_eq!(
            config(&[("API_PREFIX", "api")]),
            Err(ConfigError::InvalidPrefix("api".into()))
        );
    }

    #[test]
    fn rejects_bad_values() {
        assert_eq!(
            config(&[("PORT", "eighty")]),
            Err(ConfigError::NotANumber {
                name: "PORT",
                value: "eighty".into()
            })
        );
        assert_eq!(
            config(&[("APP_ENV", "staging")]),
            Err(ConfigError::UnknownEnvironment("staging".into()))
        );
        assert_eq!(
            config(&[("ARTICLES_TABLE", "articles; DROP TABLE x")]),
            Err(ConfigError::InvalidTableName("articles; DROP TABLE x".into()))
        );
    }

    #[test]
    fn table_names() {
        assert!(is_valid_table_name("articles"));
        assert!(is_valid_table_name("name-of-project-table"));
        assert!(is_valid_table_name("_tmp2"));
        assert!(!is_valid_table_name(""));
        assert!(!is_valid_table_name("2fast"));
        assert!(!is_valid_table_name("a\"b"));
    }
}
