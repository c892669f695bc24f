use thiserror::Error;
use tracing::warn;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{name} is set but empty")]
    Empty { name: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

/// Configuration for the quote service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub bind_addr: String,
    pub port: u16,
    /// Model endpoint; without one every prediction reports that no model is configured.
    pub predictor_url: Option<String>,
    pub log_format: LogFormat,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            port: DEFAULT_PORT,
            predictor_url: None,
            log_format: LogFormat::default(),
        }
    }
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from any variable source; `from_env` passes the process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(port) = lookup("PORT") {
            match port.trim().parse::<u16>() {
                Ok(port) => config.port = port,
                Err(_) => warn!(port = %port, "invalid PORT, using {}", DEFAULT_PORT),
            }
        }

        if let Some(addr) = lookup("BIND_ADDR") {
            if addr.trim().is_empty() {
                return Err(ConfigError::Empty { name: "BIND_ADDR" });
            }
            config.bind_addr = addr.trim().to_string();
        }

        if let Some(url) = lookup("PREDICTOR_URL") {
            if url.trim().is_empty() {
                return Err(ConfigError::Empty {
                    name: "PREDICTOR_URL",
                });
            }
            config.predictor_url = Some(url.trim().to_string());
        }

        config.log_format = match lookup("LOG_FORMAT").as_deref() {
            Some("pretty") => LogFormat::Pretty,
            _ => LogFormat::Json,
        };

        Ok(config)
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}
