use serde::{Deserialize, Serialize};
use std::env;

/// Process configuration, built once at startup and injected into the router
/// as shared state. Nothing in the request path reads the environment
/// directly, which keeps the auth gate and response formatter testable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Shared secret compared byte-for-byte against the `bgmi-token` request
    /// header. An empty token authorizes nothing.
    pub admin_token: String,
}

impl AppConfig {
    /// Build configuration from the process environment.
    ///
    /// `DEV` (any non-empty value) or `APP_ENV=development` selects
    /// development mode, which turns on the permissive CORS headers for the
    /// local front-end.
    pub fn from_env() -> Self {
        let environment = if env::var("DEV").map(|v| !v.is_empty()).unwrap_or(false) {
            Environment::Development
        } else {
            match env::var("APP_ENV").as_deref() {
                Ok("development") | Ok("dev") => Environment::Development,
                _ => Environment::Production,
            }
        };

        let port = env::var("BGMI_API_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(8888);

        let admin_token = env::var("BGMI_ADMIN_TOKEN").unwrap_or_default();

        Self {
            environment,
            server: ServerConfig { port },
            security: SecurityConfig { admin_token },
        }
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(environment: Environment) -> AppConfig {
        AppConfig {
            environment,
            server: ServerConfig { port: 8888 },
            security: SecurityConfig {
                admin_token: "secret".to_string(),
            },
        }
    }

    #[test]
    fn test_development_flag() {
        assert!(test_config(Environment::Development).is_development());
        assert!(!test_config(Environment::Production).is_development());
    }
}
