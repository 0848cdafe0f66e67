use thiserror::Error;

/// Fatal misconfiguration detected while resolving backend settings.
///
/// Every variant names the offending setting so the message can be shown to
/// whoever maintains the settings file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("\"{field}\" is required but was not set.")]
    MissingField { field: String },

    #[error("\"{field}\" is not an \"{expected}\", it is a \"{found}\".")]
    WrongType { field: String, expected: String, found: String },

    #[error("\"{field}\" is not configured for model \"{model_id}\".")]
    NoDefault { field: String, model_id: String },

    #[error("Unknown {role} backend class \"{class}\".")]
    UnknownBackend { role: String, class: String },

    #[error("Unknown length calculator \"{name}\".")]
    UnknownLengthCalculator { name: String },

    #[error("Failed to load settings: {0}")]
    Load(String),
}

impl ConfigError {
    pub(crate) fn missing(field: &str) -> Self {
        Self::MissingField { field: field.to_string() }
    }

    pub(crate) fn wrong_type(field: &str, expected: &str, found: String) -> Self {
        Self::WrongType { field: field.to_string(), expected: expected.to_string(), found }
    }

    pub(crate) fn no_default(field: &str, model_id: &str) -> Self {
        Self::NoDefault { field: field.to_string(), model_id: model_id.to_string() }
    }
}

/// Errors raised by backend calls.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Provider call failed: {0}")]
    Provider(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
pub type BackendResult<T> = std::result::Result<T, BackendError>;
