use thiserror::Error;

/// Core domain errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("Empty lookup key")]
    EmptyKey,

    #[error("Table '{name}' is not found in the table list")]
    UnresolvedName { name: String },

    #[error("Remote fetch failed: {message}")]
    RemoteFetch { message: String },

    #[error("Invalid record: {message}")]
    InvalidRecord { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl DomainError {
    pub fn unresolved_name(name: impl Into<String>) -> Self {
        Self::UnresolvedName { name: name.into() }
    }

    pub fn remote_fetch(message: impl Into<String>) -> Self {
        Self::RemoteFetch {
            message: message.into(),
        }
    }

    pub fn invalid_record(message: impl Into<String>) -> Self {
        Self::InvalidRecord {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Human-readable message suitable for the user-facing error channel
    pub fn user_message(&self) -> String {
        match self {
            Self::RemoteFetch { message } | Self::InvalidRecord { message } => message.clone(),
            other => other.to_string(),
        }
    }
}
