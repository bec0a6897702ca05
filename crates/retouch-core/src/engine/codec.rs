//! Encoded-image boundary, backed by the `image` crate.
//!
//! Decoding does not depend on any engine state, so uploads can be accepted
//! while an engine is still initializing.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageFormat};
use tracing::debug;

use super::Quality;
use crate::error::EngineError;
use crate::pixel_buf::{ChannelLayout, PixelBuffer};

/// Decode JPEG, PNG or TIFF bytes. The format is sniffed from the content,
/// never from a file name.
pub fn decode(bytes: &[u8]) -> Result<PixelBuffer, EngineError> {
    let format = image::guess_format(bytes).map_err(|e| EngineError::Decode(e.to_string()))?;
    let decoded = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| EngineError::Decode(e.to_string()))?;
    let (width, height) = (decoded.width(), decoded.height());
    if width == 0 || height == 0 {
        return Err(EngineError::Decode(format!(
            "empty image dimensions {width}x{height}"
        )));
    }

    let (layout, data) = if decoded.color().has_alpha() {
        (ChannelLayout::Rgba8, decoded.to_rgba8().into_raw())
    } else {
        (ChannelLayout::Rgb8, decoded.to_rgb8().into_raw())
    };
    debug!(?format, width, height, ?layout, "decoded source image");
    PixelBuffer::from_raw(width, height, layout, data)
        .map_err(|e| EngineError::Decode(e.to_string()))
}

/// Baseline JPEG at `quality`. Alpha is dropped; JPEG has no alpha channel.
pub fn encode_jpeg(image: &PixelBuffer, quality: Quality) -> Result<Vec<u8>, EngineError> {
    let stripped;
    let rgb = if image.layout.has_alpha() {
        stripped = image.to_working();
        &stripped
    } else {
        image
    };

    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, quality.value())
        .encode(&rgb.data, rgb.width, rgb.height, ExtendedColorType::Rgb8)
        .map_err(|e| EngineError::Encode(e.to_string()))?;
    debug!(bytes = out.len(), quality = quality.value(), "encoded jpeg");
    Ok(out)
}

/// Lossless PNG, used where exact pixels must survive a trip through bytes.
pub fn encode_png(image: &PixelBuffer) -> Result<Vec<u8>, EngineError> {
    let color = match image.layout {
        ChannelLayout::Rgb8 => ExtendedColorType::Rgb8,
        ChannelLayout::Rgba8 => ExtendedColorType::Rgba8,
    };
    let mut out = Vec::new();
    image::write_buffer_with_format(
        &mut Cursor::new(&mut out),
        &image.data,
        image.width,
        image.height,
        color,
        ImageFormat::Png,
    )
    .map_err(|e| EngineError::Encode(e.to_string()))?;
    Ok(out)
}
