use tracing::debug;

use crate::engine::Engine;
use crate::params::AdjustmentParams;
use crate::pipeline::module::ProcessingModule;
use crate::pixel_buf::PixelBuffer;

pub struct Blur;

impl ProcessingModule for Blur {
    fn name(&self) -> &str {
        "blur"
    }

    fn process(
        &self,
        engine: &dyn Engine,
        input: PixelBuffer,
        params: &AdjustmentParams,
    ) -> PixelBuffer {
        let ksize = params.blur_kernel_size();
        if ksize == 1 {
            return input;
        }
        debug!(blur = params.blur, ksize, "gaussian blur");
        engine.gaussian_blur(&input, ksize)
    }
}
