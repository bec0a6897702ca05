use crate::engine::Engine;
use crate::params::AdjustmentParams;
use crate::pipeline::module::ProcessingModule;
use crate::pixel_buf::PixelBuffer;

/// Brings the source into the working representation: RGB, alpha dropped.
pub struct Normalize;

impl ProcessingModule for Normalize {
    fn name(&self) -> &str {
        "normalize"
    }

    fn process(
        &self,
        _engine: &dyn Engine,
        input: PixelBuffer,
        _params: &AdjustmentParams,
    ) -> PixelBuffer {
        input.strip_alpha()
    }
}
