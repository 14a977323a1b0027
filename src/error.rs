use std::path::PathBuf;
use thiserror::Error;

pub type StudioResult<T> = Result<T, StudioError>;

/// Failures on the ambient paths around the studio (configuration loading,
/// opening the output device). The signal model itself never fails.
#[derive(Debug, Error)]
pub enum StudioError {
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid setting '{name}': {message}")]
    Invalid { name: String, message: String },

    #[error("audio output unavailable: {message}")]
    Audio { message: String },
}

impl StudioError {
    pub fn invalid(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invalid {
            name: name.into(),
            message: message.into(),
        }
    }

    pub fn audio(message: impl ToString) -> Self {
        Self::Audio {
            message: message.to_string(),
        }
    }
}
