use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use learnloop_algo::AlgorithmConfig;
use thiserror::Error;

const DEFAULT_MAX_QUESTIONS_PER_SESSION: usize = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Algorithm(#[from] learnloop_algo::ConfigError),
    #[error("failed to read algorithm config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    pub max_questions_per_session: usize,
    pub algorithm_config_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3000);

        let host = std::env::var("HOST")
            .ok()
            .and_then(|value| value.parse::<IpAddr>().ok())
            .unwrap_or(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)));

        let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let max_questions_per_session = std::env::var("MAX_QUESTIONS_PER_SESSION")
            .ok()
            .and_then(|value| value.parse::<usize>().ok())
            .filter(|value| *value > 0)
            .unwrap_or(DEFAULT_MAX_QUESTIONS_PER_SESSION);

        let algorithm_config_path = std::env::var("ALGORITHM_CONFIG_PATH")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        Self {
            host,
            port,
            log_level,
            max_questions_per_session,
            algorithm_config_path,
        }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// JSON file when `ALGORITHM_CONFIG_PATH` is set, environment otherwise.
    pub fn algorithm_config(&self) -> Result<AlgorithmConfig, ConfigError> {
        match &self.algorithm_config_path {
            Some(path) => load_algorithm_config_file(path),
            None => Ok(AlgorithmConfig::from_env()?),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)),
            port: 3000,
            log_level: "info".to_string(),
            max_questions_per_session: DEFAULT_MAX_QUESTIONS_PER_SESSION,
            algorithm_config_path: None,
        }
    }
}

pub fn load_algorithm_config_file(path: &Path) -> Result<AlgorithmConfig, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(AlgorithmConfig::from_json(&raw)?)
}
