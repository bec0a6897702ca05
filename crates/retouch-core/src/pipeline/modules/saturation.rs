use tracing::debug;

use crate::engine::Engine;
use crate::params::AdjustmentParams;
use crate::pipeline::module::ProcessingModule;
use crate::pixel_buf::PixelBuffer;

pub struct Saturation;

impl ProcessingModule for Saturation {
    fn name(&self) -> &str {
        "saturation"
    }

    fn process(
        &self,
        engine: &dyn Engine,
        input: PixelBuffer,
        params: &AdjustmentParams,
    ) -> PixelBuffer {
        // Skipping avoids HSV round-trip quantization on untouched images.
        if params.saturation == 100 {
            return input;
        }

        let factor = params.saturation as f32 / 100.0;
        let mut hsv = engine.rgb_to_hsv(&input);
        drop(input);
        hsv.scale_saturation(factor);
        debug!(factor, "scaled saturation");
        engine.hsv_to_rgb(&hsv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::CpuEngine;
    use crate::engine::tests::RecordingEngine;

    fn with_saturation(saturation: i32) -> AdjustmentParams {
        AdjustmentParams {
            saturation,
            ..Default::default()
        }
    }

    #[test]
    fn identity_is_exact_and_skips_hsv() {
        let engine = RecordingEngine::new();
        let buf = PixelBuffer::from_raw(
            2,
            1,
            crate::pixel_buf::ChannelLayout::Rgb8,
            vec![201, 37, 90, 14, 250, 3],
        )
        .unwrap();
        let expected = buf.clone();
        let out = Saturation.process(&engine, buf, &with_saturation(100));
        assert_eq!(out, expected);
        assert!(engine.calls().is_empty());
    }

    #[test]
    fn zero_saturation_produces_gray() {
        let engine = CpuEngine::initialize().unwrap();
        let buf = PixelBuffer::uniform(1, 1, [200, 100, 50]);
        let out = Saturation.process(&engine, buf, &with_saturation(0));
        // value channel is the max component
        assert_eq!(out.data, vec![200, 200, 200]);
    }

    #[test]
    fn higher_saturation_spreads_channels() {
        let engine = CpuEngine::initialize().unwrap();
        let buf = PixelBuffer::uniform(1, 1, [200, 150, 120]);
        let out = Saturation.process(&engine, buf, &with_saturation(180));
        let spread_before = 200 - 120;
        let spread_after = out.data[0] as i32 - out.data[2] as i32;
        assert!(spread_after > spread_before, "{:?}", out.data);
    }

    #[test]
    fn overflow_clamps_instead_of_wrapping() {
        let engine = CpuEngine::initialize().unwrap();
        // fully saturated red: S = 255, doubled would wrap in u8 arithmetic
        let buf = PixelBuffer::uniform(1, 1, [255, 0, 0]);
        let out = Saturation.process(&engine, buf, &with_saturation(200));
        assert_eq!(out.data, vec![255, 0, 0]);
    }

    #[test]
    fn gray_stays_gray() {
        let engine = CpuEngine::initialize().unwrap();
        for sat in [0, 50, 150, 200] {
            let buf = PixelBuffer::uniform(2, 2, [128, 128, 128]);
            let out = Saturation.process(&engine, buf, &with_saturation(sat));
            assert!(out.data.iter().all(|&v| v == 128), "sat {sat}: {:?}", out.data);
        }
    }

    #[test]
    fn preserves_dimensions() {
        let engine = CpuEngine::initialize().unwrap();
        let buf = PixelBuffer::uniform(10, 5, [40, 80, 120]);
        let out = Saturation.process(&engine, buf, &with_saturation(150));
        assert_eq!((out.width, out.height), (10, 5));
        assert_eq!(out.data.len(), 150);
    }
}
