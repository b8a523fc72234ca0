//! Configuration for Products API

use core_config::{app_info, cors::CorsConfig, server::ServerConfig, AppInfo, FromEnv};

pub use core_config::Environment;

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?;
        let cors = CorsConfig::from_env()?;

        if environment.is_production() && !cors.is_configured() {
            eyre::bail!("CORS_ALLOWED_ORIGIN must be set in production");
        }

        Ok(Self {
            app: app_info!(),
            server,
            cors,
            environment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_development_defaults() {
        temp_env::with_vars_unset(
            ["APP_ENV", "HOST", "PORT", "CORS_ALLOWED_ORIGIN", "SHUTDOWN_TIMEOUT_SECS"],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.environment, Environment::Development);
                assert_eq!(config.server.address(), "0.0.0.0:8080");
                assert!(!config.cors.is_configured());
                assert_eq!(config.app.name, "products_api");
            },
        );
    }

    #[test]
    fn test_production_requires_cors_origin() {
        temp_env::with_vars(
            [
                ("APP_ENV", Some("production")),
                ("CORS_ALLOWED_ORIGIN", None),
            ],
            || {
                assert!(Config::from_env().is_err());
            },
        );
    }

    #[test]
    fn test_production_with_cors_origin() {
        temp_env::with_vars(
            [
                ("APP_ENV", Some("production")),
                ("CORS_ALLOWED_ORIGIN", Some("https://shop.example.com")),
                ("PORT", Some("3003")),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert!(config.environment.is_production());
                assert_eq!(config.server.port, 3003);
                assert_eq!(config.cors.allowed_origins, vec!["https://shop.example.com"]);
            },
        );
    }

    #[test]
    fn test_invalid_port_is_an_error() {
        temp_env::with_var("PORT", Some("eighty"), || {
            assert!(Config::from_env().is_err());
        });
    }
}
