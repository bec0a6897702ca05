use std::path::PathBuf;

use retouch_core::Quality;
use serde::{Deserialize, Serialize};

pub const DEFAULT_EXPORT_FILE_NAME: &str = "edited-image.jpg";

/// Host-supplied session settings. Nothing is read from disk; embed this in
/// the host's own settings if it needs to persist.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// JPEG quality for exports.
    pub export_quality: Quality,
    /// File name used when the caller does not supply one.
    pub export_file_name: String,
    pub export_dir: PathBuf,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            export_quality: Quality::default(),
            export_file_name: DEFAULT_EXPORT_FILE_NAME.to_string(),
            export_dir: dirs::download_dir().unwrap_or_else(|| PathBuf::from(".")),
        }
    }
}
