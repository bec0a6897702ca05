use std::path::{Path, PathBuf};

use retouch_core::{Engine, PixelBuffer, Quality};
use tracing::{debug, info};

use crate::error::SessionError;

/// Encode a rendered image as JPEG.
pub fn encode(
    engine: &dyn Engine,
    image: &PixelBuffer,
    quality: Quality,
) -> Result<Vec<u8>, SessionError> {
    let bytes = engine.encode_jpeg(image, quality)?;
    debug!(size = bytes.len(), quality = quality.value(), "exported jpeg");
    Ok(bytes)
}

/// A bare file name: no directories, not `.` or `..`, not empty.
pub fn check_file_name(name: &str) -> Result<(), SessionError> {
    let bad = name.trim().is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\'])
        || name.contains('\0');
    if bad {
        return Err(SessionError::InvalidFileName(name.to_string()));
    }
    Ok(())
}

/// Write `bytes` to `dir/name`, creating `dir` if needed. Existing files are
/// overwritten.
pub fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> Result<PathBuf, SessionError> {
    check_file_name(name)?;
    std::fs::create_dir_all(dir)?;
    let path = dir.join(name);
    std::fs::write(&path, bytes)?;
    info!(path = %path.display(), size = bytes.len(), "saved export");
    Ok(path)
}
