//! Runtime configuration read from environment variables.

use crate::data::SourceColumns;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub gdp_path: PathBuf,
    pub internet_path: PathBuf,
    /// Column of the internet source used as usage percentage.
    pub internet_year: String,
    pub addr: SocketAddr,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let host = get("HOST", "127.0.0.1");
        let ip: IpAddr = host.parse().map_err(|_| ConfigError::Invalid {
            key: "HOST",
            value: host.clone(),
        })?;
        let port = get("PORT", "5000");
        let port: u16 = port.parse().map_err(|_| ConfigError::Invalid {
            key: "PORT",
            value: port.clone(),
        })?;

        Ok(Self {
            gdp_path: get("GDP_CONS_PATH", "DatosGDPCONS2.csv").into(),
            internet_path: get("INTERNET_PATH", "Porcentaje_acceso_internet.csv").into(),
            internet_year: get("INTERNET_YEAR", "2022"),
            addr: SocketAddr::new(ip, port),
            log_level: get("LOG_LEVEL", "info"),
        })
    }

    pub fn source_columns(&self) -> SourceColumns {
        SourceColumns::for_year(&self.internet_year)
    }
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
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.gdp_path, PathBuf::from("DatosGDPCONS2.csv"));
        assert_eq!(cfg.internet_path, PathBuf::from("Porcentaje_acceso_internet.csv"));
        assert_eq!(cfg.addr, "127.0.0.1:5000".parse().unwrap());
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.source_columns(), SourceColumns::default());
    }

    #[test]
    fn overrides() {
        let cfg = config(&[
            ("PORT", "8080"),
            ("HOST", "0.0.0.0"),
            ("INTERNET_YEAR", "2021"),
            ("GDP_CONS_PATH", "/data/gdp.csv"),
        ])
        .unwrap();
        assert_eq!(cfg.addr, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(cfg.gdp_path, PathBuf::from("/data/gdp.csv"));
        assert_eq!(cfg.source_columns().internet_year, "2021");
    }

    #[test]
    fn bad_port_is_an_error() {
        assert_eq!(
            config(&[("PORT", "http")]),
            Err(ConfigError::Invalid {
                key: "PORT",
                value: "http".to_string()
            })
        );
    }
}
