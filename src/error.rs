use retouch_core::{DomainError, EngineError};
use thiserror::Error;

use crate::notice::Notice;

/// Everything the session controller can report. All of it is recoverable:
/// the session stays usable and published state is left untouched.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("not a readable image: {0}")]
    Decode(String),
    #[error("image processing engine is not ready")]
    EngineNotReady,
    #[error("image processing engine failed to initialize: {0}")]
    EngineInit(String),
    #[error("image processing engine failed to load; start it again")]
    EngineUnavailable,
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("no rendered image to export")]
    NoImage,
    #[error("render failed: {0}")]
    Render(String),
    #[error("encoding failed: {0}")]
    Encode(String),
    #[error("invalid export file name {0:?}")]
    InvalidFileName(String),
    #[error("writing export failed: {0}")]
    Io(#[from] std::io::Error),
}

impl From<EngineError> for SessionError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Decode(msg) => Self::Decode(msg),
            EngineError::Encode(msg) => Self::Encode(msg),
            EngineError::NotReady => Self::EngineNotReady,
        }
    }
}

impl SessionError {
    /// The notice shown to the user for this error.
    pub fn notice(&self) -> Notice {
        let message = match self {
            Self::Decode(_) => "Please select an image file".to_string(),
            Self::EngineNotReady => "Image processing engine not loaded yet".to_string(),
            Self::EngineInit(_) => "Failed to load image processing engine".to_string(),
            Self::EngineUnavailable => {
                "Image processing engine unavailable, reload to try again".to_string()
            }
            Self::Domain(err) => format!("Invalid adjustment: {err}"),
            Self::NoImage => "No image to download".to_string(),
            Self::Render(_) => "Failed to process image".to_string(),
            Self::Encode(_) | Self::Io(_) => "Failed to save image".to_string(),
            Self::InvalidFileName(name) => format!("Cannot save as {name:?}"),
        };
        Notice::error(message)
    }
}
