use crate::engine::Engine;
use crate::params::AdjustmentParams;
use crate::pipeline::module::ProcessingModule;
use crate::pixel_buf::PixelBuffer;

/// Brightness steps are deliberately detuned: the full 0..=200 slider only
/// moves values by about +/-67.
const BRIGHTNESS_DIVISOR: f32 = 1.5;

pub struct BrightnessContrast;

impl BrightnessContrast {
    /// `(alpha, beta)` of the affine map `v * alpha + beta`.
    pub fn coefficients(params: &AdjustmentParams) -> (f32, f32) {
        let alpha = params.contrast as f32 / 100.0;
        let beta = (params.brightness - 100) as f32 / BRIGHTNESS_DIVISOR;
        (alpha, beta)
    }
}

impl ProcessingModule for BrightnessContrast {
    fn name(&self) -> &str {
        "brightness_contrast"
    }

    fn process(
        &self,
        engine: &dyn Engine,
        input: PixelBuffer,
        params: &AdjustmentParams,
    ) -> PixelBuffer {
        let (alpha, beta) = Self::coefficients(params);
        engine.convert_scale(&input, alpha, beta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::CpuEngine;

    fn run(brightness: i32, contrast: i32, value: u8) -> u8 {
        let engine = CpuEngine::initialize().unwrap();
        let params = AdjustmentParams {
            brightness,
            contrast,
            ..Default::default()
        };
        let buf = PixelBuffer::uniform(2, 2, [value; 3]);
        let out = BrightnessContrast.process(&engine, buf, &params);
        assert!(out.data.iter().all(|&v| v == out.data[0]));
        out.data[0]
    }

    #[test]
    fn neutral_coefficients() {
        assert_eq!(
            BrightnessContrast::coefficients(&AdjustmentParams::default()),
            (1.0, 0.0)
        );
    }

    #[test]
    fn brightness_150_on_gray_100() {
        assert_eq!(run(150, 100, 100), 133);
    }

    #[test]
    fn brightness_extremes_clamp() {
        assert_eq!(run(200, 100, 250), 255);
        assert_eq!(run(0, 100, 20), 0);
        // 100 - 66.67
        assert_eq!(run(0, 100, 100), 33);
    }

    #[test]
    fn zero_contrast_flattens_to_beta() {
        assert_eq!(run(100, 0, 17), 0);
        assert_eq!(run(100, 0, 240), 0);
        assert_eq!(run(175, 0, 240), 50);
    }

    #[test]
    fn double_contrast_doubles_values() {
        assert_eq!(run(100, 200, 60), 120);
        assert_eq!(run(100, 200, 200), 255);
    }

    #[test]
    fn channels_clamp_independently() {
        let engine = CpuEngine::initialize().unwrap();
        let params = AdjustmentParams {
            contrast: 200,
            ..Default::default()
        };
        let buf = PixelBuffer::uniform(1, 1, [10, 100, 200]);
        let out = BrightnessContrast.process(&engine, buf, &params);
        assert_eq!(out.data, vec![20, 200, 255]);
    }
}
