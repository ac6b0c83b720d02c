//! Layered server configuration.
//!
//! Sources, lowest priority first: built-in defaults, an optional YAML file,
//! then `DATEDIFF__`-prefixed environment variables (`DATEDIFF__SERVER__BIND_ADDR`
//! sets `server.bind_addr`). Command-line overrides are applied by the binary.

use std::net::SocketAddr;
use std::path::Path;

use anyhow::{bail, Context};
use chrono_tz::Tz;
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use serde::{Deserialize, Serialize};

pub const ENV_PREFIX: &str = "DATEDIFF__";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub calculator: CalculatorConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to.
    pub bind_addr: SocketAddr,
    /// Route for the REST calculate endpoint.
    pub rest_path: String,
    /// Route for the GraphQL endpoint.
    pub graphql_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            rest_path: "/V1/datetime/calculate".to_owned(),
            graphql_path: "/graphql".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct CalculatorConfig {
    /// IANA timezone for date strings that carry no offset or zone name.
    pub default_timezone: String,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            default_timezone: "UTC".to_owned(),
        }
    }
}

impl CalculatorConfig {
    pub fn timezone(&self) -> anyhow::Result<Tz> {
        self.default_timezone
            .parse::<Tz>()
            .map_err(|e| anyhow::anyhow!("invalid calculator.default_timezone: {e}"))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `datediff_engine=debug,info`.
    /// `RUST_LOG` takes precedence when set.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: LogFormat::Text,
        }
    }
}

impl AppConfig {
    /// Load defaults, then `path` (if given), then the environment.
    ///
    /// # Errors
    ///
    /// Fails if `path` does not exist, a source cannot be parsed, or the
    /// resulting configuration does not pass [`AppConfig::validate`].
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));

        if let Some(path) = path {
            if !path.is_file() {
                bail!("config file does not exist: {}", path.display());
            }
            figment = figment.merge(Yaml::file(path));
        }

        let config: AppConfig = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("failed to load configuration")?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.calculator.timezone()?;

        for (name, path) in [
            ("server.rest_path", &self.server.rest_path),
            ("server.graphql_path", &self.server.graphql_path),
        ] {
            if !path.starts_with('/') {
                bail!("{name} must start with '/': '{path}'");
            }
        }
        if self.server.rest_path == self.server.graphql_path {
            bail!(
                "server.rest_path and server.graphql_path must differ: '{}'",
                self.server.rest_path
            );
        }
        if self.logging.level.trim().is_empty() {
            bail!("logging.level must not be empty");
        }

        Ok(())
    }

    /// Effective configuration rendered as YAML.
    pub fn to_yaml(&self) -> anyhow::Result<String> {
        serde_yaml::to_string(self).context("failed to render configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_default_config() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.server.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(cfg.server.rest_path, "/V1/datetime/calculate");
        assert_eq!(cfg.server.graphql_path, "/graphql");
        assert_eq!(cfg.calculator.timezone().unwrap(), Tz::UTC);
        assert_eq!(cfg.logging.format, LogFormat::Text);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_yaml_overrides_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "datediff.yaml",
                r#"
server:
  bind_addr: "0.0.0.0:9000"
calculator:
  default_timezone: "Australia/Adelaide"
logging:
  format: json
"#,
            )?;

            let cfg = AppConfig::load(Some(Path::new("datediff.yaml"))).map_err(|e| e.to_string())?;
            assert_eq!(cfg.server.bind_addr.port(), 9000);
            assert_eq!(cfg.server.rest_path, "/V1/datetime/calculate");
            assert_eq!(cfg.calculator.timezone().unwrap(), chrono_tz::Australia::Adelaide);
            assert_eq!(cfg.logging.format, LogFormat::Json);
            assert_eq!(cfg.logging.level, "info");
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_yaml() {
        Jail::expect_with(|jail| {
            jail.create_file("datediff.yaml", "logging:\n  level: warn\n")?;
            jail.set_env("DATEDIFF__LOGGING__LEVEL", "debug");
            jail.set_env("DATEDIFF__SERVER__GRAPHQL_PATH", "/gql");

            let cfg = AppConfig::load(Some(Path::new("datediff.yaml"))).map_err(|e| e.to_string())?;
            assert_eq!(cfg.logging.level, "debug");
            assert_eq!(cfg.server.graphql_path, "/gql");
            Ok(())
        });
    }

    #[test]
    fn test_missing_file_is_error() {
        let err = AppConfig::load(Some(Path::new("/nonexistent/datediff.yaml"))).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_unknown_key_is_error() {
        Jail::expect_with(|jail| {
            jail.create_file("datediff.yaml", "server:\n  listen: 1\n")?;
            assert!(AppConfig::load(Some(Path::new("datediff.yaml"))).is_err());
            Ok(())
        });
    }

    #[test]
    fn test_invalid_timezone_is_error() {
        let mut cfg = AppConfig::default();
        cfg.calculator.default_timezone = "Mars/Olympus_Mons".to_owned();
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("default_timezone"));
    }

    #[test]
    fn test_paths_must_be_rooted_and_distinct() {
        let mut cfg = AppConfig::default();
        cfg.server.rest_path = "calculate".to_owned();
        assert!(cfg.validate().is_err());

        let mut cfg = AppConfig::default();
        cfg.server.graphql_path = cfg.server.rest_path.clone();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_to_yaml_round_trips() {
        let cfg = AppConfig::default();
        let yaml = cfg.to_yaml().unwrap();
        let parsed: AppConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, cfg);
    }
}
