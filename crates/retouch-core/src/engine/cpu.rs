use anyhow::ensure;
use tracing::info;

use super::{Engine, HsvBuffer};
use crate::color::{self, HsvTables};
use crate::pixel_buf::{ChannelLayout, PixelBuffer};

/// Pure-Rust engine: scalar per-pixel loops, default `image` crate codecs.
pub struct CpuEngine {
    hsv: HsvTables,
}

impl CpuEngine {
    /// Build lookup tables and sanity-check them.
    ///
    /// This is the step a session waits on before its first render.
    pub fn initialize() -> anyhow::Result<Self> {
        let t0 = std::time::Instant::now();
        let hsv = HsvTables::new();
        let [h, s, v] = hsv.rgb_to_hsv(0, 0, 255);
        ensure!(
            [h, s, v] == [120, 255, 255],
            "hsv tables are inconsistent: blue -> ({h}, {s}, {v})"
        );
        info!(elapsed_us = t0.elapsed().as_micros() as u64, "cpu engine ready");
        Ok(Self { hsv })
    }
}

impl Engine for CpuEngine {
    fn name(&self) -> &str {
        "cpu"
    }

    fn convert_scale(&self, src: &PixelBuffer, alpha: f32, beta: f32) -> PixelBuffer {
        // An affine map of one byte only has 256 possible results.
        let mut lut = [0u8; 256];
        for (i, entry) in lut.iter_mut().enumerate() {
            *entry = color::saturate_u8(i as f32 * alpha + beta);
        }
        self.lookup(src, &lut)
    }

    fn rgb_to_hsv(&self, src: &PixelBuffer) -> HsvBuffer {
        let mut data = Vec::with_capacity(src.pixel_count() * 3);
        for px in src.data.chunks_exact(src.channels()) {
            data.extend_from_slice(&self.hsv.rgb_to_hsv(px[0], px[1], px[2]));
        }
        HsvBuffer {
            width: src.width,
            height: src.height,
            data,
        }
    }

    fn hsv_to_rgb(&self, src: &HsvBuffer) -> PixelBuffer {
        let mut data = Vec::with_capacity(src.data.len());
        for px in src.data.chunks_exact(3) {
            data.extend_from_slice(&color::hsv_to_rgb(px[0], px[1], px[2]));
        }
        rgb_buffer(src.width, src.height, data)
    }

    fn gaussian_blur(&self, src: &PixelBuffer, ksize: u32) -> PixelBuffer {
        if ksize <= 1 || src.pixel_count() == 0 {
            return src.to_working();
        }
        let stripped;
        let src = if src.layout.has_alpha() {
            stripped = src.to_working();
            &stripped
        } else {
            src
        };
        let kernel = gaussian_kernel(ksize);
        let radius = (kernel.len() / 2) as isize;
        let width = src.width as usize;
        let height = src.height as usize;

        // Horizontal pass into f32 so the vertical pass sees unrounded values.
        let mut horizontal = vec![0.0f32; width * height * 3];
        for y in 0..height {
            let row = y * width;
            for x in 0..width {
                let mut acc = [0.0f32; 3];
                for (k, weight) in kernel.iter().enumerate() {
                    let sx = reflect_101(x as isize + k as isize - radius, width);
                    let idx = (row + sx) * 3;
                    acc[0] += weight * src.data[idx] as f32;
                    acc[1] += weight * src.data[idx + 1] as f32;
                    acc[2] += weight * src.data[idx + 2] as f32;
                }
                let out = (row + x) * 3;
                horizontal[out..out + 3].copy_from_slice(&acc);
            }
        }

        let mut data = vec![0u8; width * height * 3];
        for y in 0..height {
            for x in 0..width {
                let mut acc = [0.0f32; 3];
                for (k, weight) in kernel.iter().enumerate() {
                    let sy = reflect_101(y as isize + k as isize - radius, height);
                    let idx = (sy * width + x) * 3;
                    acc[0] += weight * horizontal[idx];
                    acc[1] += weight * horizontal[idx + 1];
                    acc[2] += weight * horizontal[idx + 2];
                }
                let out = (y * width + x) * 3;
                data[out] = color::saturate_u8(acc[0]);
                data[out + 1] = color::saturate_u8(acc[1]);
                data[out + 2] = color::saturate_u8(acc[2]);
            }
        }

        rgb_buffer(src.width, src.height, data)
    }

    fn to_luma(&self, src: &PixelBuffer) -> Vec<u8> {
        src.data
            .chunks_exact(src.channels())
            .map(|px| color::luma(px[0], px[1], px[2]))
            .collect()
    }

    fn luma_to_rgb(&self, luma: &[u8], width: u32, height: u32) -> PixelBuffer {
        let mut data = Vec::with_capacity(luma.len() * 3);
        for &y in luma {
            data.extend_from_slice(&[y, y, y]);
        }
        rgb_buffer(width, height, data)
    }

    fn transform(&self, src: &PixelBuffer, matrix: &[[f32; 3]; 3]) -> PixelBuffer {
        let mut data = Vec::with_capacity(src.pixel_count() * 3);
        for px in src.data.chunks_exact(src.channels()) {
            let (r, g, b) = (px[0] as f32, px[1] as f32, px[2] as f32);
            for row in matrix {
                data.push(color::saturate_u8(row[0] * r + row[1] * g + row[2] * b));
            }
        }
        rgb_buffer(src.width, src.height, data)
    }

    fn lookup(&self, src: &PixelBuffer, lut: &[u8; 256]) -> PixelBuffer {
        let mut data = Vec::with_capacity(src.pixel_count() * 3);
        for px in src.data.chunks_exact(src.channels()) {
            data.push(lut[px[0] as usize]);
            data.push(lut[px[1] as usize]);
            data.push(lut[px[2] as usize]);
        }
        rgb_buffer(src.width, src.height, data)
    }
}

fn rgb_buffer(width: u32, height: u32, data: Vec<u8>) -> PixelBuffer {
    PixelBuffer {
        width,
        height,
        layout: ChannelLayout::Rgb8,
        data,
    }
}

/// Sigma used when none is given for a window of `ksize` taps.
pub(crate) fn sigma_for_ksize(ksize: u32) -> f32 {
    0.3 * ((ksize as f32 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Normalized 1-D Gaussian weights, `ksize` taps.
pub(crate) fn gaussian_kernel(ksize: u32) -> Vec<f32> {
    let sigma = sigma_for_ksize(ksize);
    let two_sigma_sq = 2.0 * sigma * sigma;
    let radius = (ksize / 2) as i32;
    let mut weights: Vec<f32> = (-radius..=radius)
        .map(|offset| (-((offset * offset) as f32) / two_sigma_sq).exp())
        .collect();
    let total: f32 = weights.iter().sum();
    for w in &mut weights {
        *w /= total;
    }
    weights
}

/// Mirror an out-of-range index back into `0..len` without repeating the
/// edge sample (`-1 -> 1`, `len -> len - 2`).
fn reflect_101(mut i: isize, len: usize) -> usize {
    let len = len as isize;
    if len == 1 {
        return 0;
    }
    loop {
        if i < 0 {
            i = -i;
        } else if i >= len {
            i = 2 * len - 2 - i;
        } else {
            return i as usize;
        }
    }
}
