use std::{error::Error, fmt, io};

#[derive(Debug)]
pub enum ConfigError {
    IoError(io::Error),
    JsonError(serde_json::Error),
    HttpError(reqwest::Error),
    HttpStatus(u16),
    InvalidValue(String),
    UnsupportedVersion(u32),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "I/O error: {}", e),
            ConfigError::JsonError(e) => write!(f, "JSON parsing error: {}", e),
            ConfigError::HttpError(e) => write!(f, "Request error: {}", e),
            ConfigError::HttpStatus(code) => write!(f, "HTTP request failed with status {}", code),
            ConfigError::InvalidValue(msg) => write!(f, "Invalid configuration: {}", msg),
            ConfigError::UnsupportedVersion(v) => {
                write!(f, "Unsupported configuration schema version {}", v)
            }
        }
    }
}

impl Error for ConfigError {}

impl From<io::Error> for ConfigError {
    fn from(err: io::Error) -> Self {
        ConfigError::IoError(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::JsonError(err)
    }
}

impl From<reqwest::Error> for ConfigError {
    fn from(err: reqwest::Error) -> Self {
        ConfigError::HttpError(err)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EditError {
    IndexOutOfRange { kind: &'static str, index: usize, len: usize },
    Invalid(String),
}

impl fmt::Display for EditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditError::IndexOutOfRange { kind, index, len } => {
                write!(f, "No {} at index {} (have {})", kind, index, len)
            }
            EditError::Invalid(msg) => write!(f, "Edit rejected: {}", msg),
        }
    }
}

impl Error for EditError {}

impl From<ConfigError> for EditError {
    fn from(err: ConfigError) -> Self {
        EditError::Invalid(err.to_string())
    }
}
