use crate::color::{self, SEPIA_MATRIX};
use crate::engine::Engine;
use crate::params::{AdjustmentParams, Filter};
use crate::pipeline::module::ProcessingModule;
use crate::pixel_buf::PixelBuffer;

/// Distance between adjacent posterize levels; 5 levels span 0..=255.
const POSTERIZE_STEP: f32 = 255.0 / 4.0;

/// Stylistic filter, always last.
pub struct StyleFilter;

impl ProcessingModule for StyleFilter {
    fn name(&self) -> &str {
        "filter"
    }

    fn process(
        &self,
        engine: &dyn Engine,
        input: PixelBuffer,
        params: &AdjustmentParams,
    ) -> PixelBuffer {
        match params.filter {
            Filter::None => input,
            Filter::Grayscale => {
                let luma = engine.to_luma(&input);
                engine.luma_to_rgb(&luma, input.width, input.height)
            }
            Filter::Sepia => engine.transform(&input, &SEPIA_MATRIX),
            Filter::Invert => engine.lookup(&input, &invert_lut()),
            Filter::Posterize => engine.lookup(&input, &posterize_lut()),
        }
    }
}

fn invert_lut() -> [u8; 256] {
    let mut lut = [0u8; 256];
    for (i, v) in lut.iter_mut().enumerate() {
        *v = 255 - i as u8;
    }
    lut
}

fn posterize_lut() -> [u8; 256] {
    let mut lut = [0u8; 256];
    for (i, v) in lut.iter_mut().enumerate() {
        *v = color::saturate_u8((i as f32 / POSTERIZE_STEP).round() * POSTERIZE_STEP);
    }
    lut
}
