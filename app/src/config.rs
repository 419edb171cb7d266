use crate::error::{AppError, AppResult};
use std::env;
use tracing::info;

pub const PORT_VAR: &str = "PORT";
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self { port: DEFAULT_PORT }
    }
}

impl Config {
    /// Read the listening port from `PORT`, falling back to 3000 when it is
    /// unset or blank.
    pub fn load() -> AppResult<Self> {
        match env::var(PORT_VAR).ok().filter(|v| !v.trim().is_empty()) {
            Some(value) => Ok(Self {
                port: parse_port(&value)?,
            }),
            None => {
                info!("{PORT_VAR} not set, using default: {DEFAULT_PORT}");
                Ok(Self::default())
            }
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }
}

fn parse_port(value: &str) -> AppResult<u16> {
    value
        .trim()
        .parse()
        .map_err(|e: std::num::ParseIntError| AppError::InvalidPort {
            value: value.to_string(),
            reason: e.to_string(),
        })
}
