use thiserror::Error;

/// Configuration errors detected before any resource is derived.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TopologyError {
    #[error("Unknown environment: {name}")]
    UnknownEnvironment { name: String },

    #[error("Invalid configuration for {field}: {reason}")]
    InvalidConfig { field: String, reason: String },

    #[error("Duplicate rule priority {priority}: used by '{first}' and '{second}'")]
    DuplicatePriority {
        priority: u32,
        first: String,
        second: String,
    },

    #[error("Duplicate resource name: {name}")]
    DuplicateName { name: String },

    #[error("Duplicate routing path: /{path}")]
    DuplicatePath { path: String },

    #[error("Resource name '{name}' exceeds the {limit} character limit")]
    NameTooLong { name: String, limit: usize },
}

pub type TopologyResult<T> = Result<T, TopologyError>;

impl TopologyError {
    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        TopologyError::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
