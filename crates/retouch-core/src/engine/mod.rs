//! Image-processing engine capability.
//!
//! The pipeline never touches pixels directly for anything but trivial
//! bookkeeping; it drives an [`Engine`] through a handful of primitives.
//! [`CpuEngine`] is the production implementation. Tests swap in recording
//! or deliberately slow engines without touching stage logic.
//!
//! | Operation | Primitive |
//! |---|---|
//! | Decode (JPEG, PNG, TIFF) | [`Engine::decode`] |
//! | Brightness / contrast | [`Engine::convert_scale`] |
//! | Saturation | [`Engine::rgb_to_hsv`] + [`Engine::hsv_to_rgb`] |
//! | Blur | [`Engine::gaussian_blur`] |
//! | Grayscale | [`Engine::to_luma`] + [`Engine::luma_to_rgb`] |
//! | Sepia | [`Engine::transform`] |
//! | Invert / posterize | [`Engine::lookup`] |
//! | Export | [`Engine::encode_jpeg`] |

pub mod codec;
mod cpu;

pub use cpu::CpuEngine;

use crate::error::EngineError;
use crate::pixel_buf::PixelBuffer;

/// Lossy encoding quality (1-100). Clamped on construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(from = "u8", into = "u8")]
pub struct Quality(u8);

impl Quality {
    pub fn new(value: u8) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl From<u8> for Quality {
    fn from(value: u8) -> Self {
        Self::new(value)
    }
}

impl From<Quality> for u8 {
    fn from(quality: Quality) -> Self {
        quality.0
    }
}

impl Default for Quality {
    /// 95, i.e. 0.95 of maximum.
    fn default() -> Self {
        Self(95)
    }
}

/// Image in the engine's 8-bit HSV representation.
///
/// `data` is interleaved H, S, V with H in [0, 180) and S, V in [0, 255].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HsvBuffer {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl HsvBuffer {
    /// Multiply the saturation channel by `factor`, saturating at 255.
    pub fn scale_saturation(&mut self, factor: f32) {
        for px in self.data.chunks_exact_mut(3) {
            let scaled = (px[1] as f32 * factor).round();
            px[1] = scaled.clamp(0.0, 255.0) as u8;
        }
    }
}

/// Decode, per-stage transform primitives, encode.
///
/// Transform primitives take RGB working buffers and return a fresh RGB
/// buffer; the input is never modified.
pub trait Engine: Send + Sync {
    fn name(&self) -> &str;

    /// Decode an encoded raster. Alpha, if present, is kept (`Rgba8`).
    fn decode(&self, bytes: &[u8]) -> Result<PixelBuffer, EngineError> {
        codec::decode(bytes)
    }

    fn encode_jpeg(&self, image: &PixelBuffer, quality: Quality) -> Result<Vec<u8>, EngineError> {
        codec::encode_jpeg(image, quality)
    }

    /// `saturate(round(v * alpha + beta))` on every channel.
    fn convert_scale(&self, src: &PixelBuffer, alpha: f32, beta: f32) -> PixelBuffer;

    fn rgb_to_hsv(&self, src: &PixelBuffer) -> HsvBuffer;

    fn hsv_to_rgb(&self, src: &HsvBuffer) -> PixelBuffer;

    /// Gaussian blur with a square `ksize` window (odd). Sigma follows from
    /// `ksize`; borders reflect without repeating the edge pixel.
    fn gaussian_blur(&self, src: &PixelBuffer, ksize: u32) -> PixelBuffer;

    /// One luma byte per pixel.
    fn to_luma(&self, src: &PixelBuffer) -> Vec<u8>;

    /// Replicate a single luma plane into three identical channels.
    fn luma_to_rgb(&self, luma: &[u8], width: u32, height: u32) -> PixelBuffer;

    /// Per-pixel 3x3 color matrix, saturated to [0, 255].
    fn transform(&self, src: &PixelBuffer, matrix: &[[f32; 3]; 3]) -> PixelBuffer;

    /// Per-channel table lookup.
    fn lookup(&self, src: &PixelBuffer, lut: &[u8; 256]) -> PixelBuffer;
}
