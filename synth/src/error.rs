use std::path::PathBuf;
use thiserror::Error;
use topology::TopologyError;

#[derive(Error, Debug)]
pub enum SynthError {
    #[error("Configuration error: {0}")]
    Topology(#[from] TopologyError),

    #[error("Failed to read services file '{path}': {source}")]
    ServicesFileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse services file: {0}")]
    ServicesFileParse(#[from] toml::de::Error),

    #[error("Failed to write template '{path}': {source}")]
    TemplateWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type SynthResult<T> = Result<T, SynthError>;
