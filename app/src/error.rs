use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid PORT value '{value}': {reason}")]
    InvalidPort { value: String, reason: String },

    #[error("Failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;
