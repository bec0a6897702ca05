use crate::engine::Engine;
use crate::params::AdjustmentParams;
use crate::pixel_buf::PixelBuffer;

/// A single step in the adjustment pipeline.
///
/// A module takes ownership of its input and returns the next buffer; the
/// input is dropped when the module returns, whether or not it was reused.
pub trait ProcessingModule: Send + Sync {
    fn name(&self) -> &str;
    fn process(
        &self,
        engine: &dyn Engine,
        input: PixelBuffer,
        params: &AdjustmentParams,
    ) -> PixelBuffer;
}
