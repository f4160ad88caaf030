use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use thiserror::Error;

pub const ADDR_VAR: &str = "FIT_DISTANCE_ADDR";
pub const MAX_UPLOAD_VAR: &str = "FIT_DISTANCE_MAX_UPLOAD_BYTES";

const DEFAULT_ADDR: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 3000);
const DEFAULT_MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} is not a valid socket address: {value}")]
    InvalidAddr { var: &'static str, value: String },
    #[error("{var} is not a valid byte count: {value}")]
    InvalidSize { var: &'static str, value: String },
}

/// Server settings read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    /// Upper bound for an uploaded request body.
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Build the config from any variable source; unset variables fall back
    /// to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let addr = match lookup(ADDR_VAR) {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidAddr {
                    var: ADDR_VAR,
                    value: value.clone(),
                })?,
            None => DEFAULT_ADDR,
        };

        let max_upload_bytes = match lookup(MAX_UPLOAD_VAR) {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidSize {
                    var: MAX_UPLOAD_VAR,
                    value: value.clone(),
                })?,
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };

        Ok(Self {
            addr,
            max_upload_bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_unset() {
        let config = ServerConfig::from_lookup(|_| None).expect("defaults parse");
        assert_eq!(config, ServerConfig::default());
    }

    #[test]
    fn default_binds_every_interface_on_port_3000() {
        assert_eq!(
            ServerConfig::default().addr,
            "0.0.0.0:3000".parse::<SocketAddr>().unwrap()
        );
    }

    #[test]
    fn values_are_read_from_lookup() {
        let config = ServerConfig::from_lookup(|var| match var {
            ADDR_VAR => Some("127.0.0.1:8080".into()),
            MAX_UPLOAD_VAR => Some(" 1024 ".into()),
            _ => None,
        })
        .expect("valid values");

        assert_eq!(config.addr, "127.0.0.1:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(config.max_upload_bytes, 1024);
    }

    #[test]
    fn invalid_values_are_reported() {
        let error = ServerConfig::from_lookup(|var| {
            (var == MAX_UPLOAD_VAR).then(|| "lots".to_string())
        })
        .expect_err("size must be numeric");
        assert_eq!(
            error,
            ConfigError::InvalidSize {
                var: MAX_UPLOAD_VAR,
                value: "lots".into()
            }
        );

        let error = ServerConfig::from_lookup(|var| (var == ADDR_VAR).then(|| "nowhere".into()))
            .expect_err("address must parse");
        assert!(matches!(error, ConfigError::InvalidAddr { .. }));
    }
}
