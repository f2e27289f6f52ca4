/// Front-end configuration
use crate::error::{CliError, Result};
use devmatch_client::ClientConfig;
use devmatch_engine::EngineConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the config file picked up from the working directory
const DEFAULT_CONFIG_FILE: &str = "devmatch.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default = "default_server")]
    pub server: ClientConfig,

    #[serde(default)]
    pub engine: EngineConfig,
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// `path` replaces the default `devmatch.toml` lookup and must exist.
    /// `url` overrides whatever server the sources name.
    pub fn load(path: Option<&Path>, url: Option<String>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(CliError::Config(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // Override with environment variables, e.g. DEVMATCH_SERVER__URL
        settings = settings.add_source(
            config::Environment::with_prefix("DEVMATCH")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let mut config: AppConfig = settings.build()?.try_deserialize()?;

        if let Some(url) = url {
            config.server.url = url;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.url.trim().is_empty() {
            return Err(CliError::Config(
                "Server URL is required (set DEVMATCH_SERVER__URL or --url)".to_string(),
            ));
        }

        if self.server.timeout_secs == 0 {
            return Err(CliError::Config(
                "server.timeout_secs must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

fn default_server() -> ClientConfig {
    ClientConfig::new("http://localhost:3001")
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            engine: EngineConfig::default(),
        }
    }
}
