pub mod module;
pub mod modules;

use std::time::Instant;

use tracing::debug;

use crate::engine::Engine;
use crate::params::AdjustmentParams;
use crate::pixel_buf::PixelBuffer;
use module::ProcessingModule;

/// Adjustment pipeline that chains modules together.
///
/// ```text
/// Source -> Normalize -> Brightness/Contrast -> Saturation -> Blur -> Filter
/// ```
///
/// The order is fixed: each stage is defined on the previous stage's output.
/// Every render starts from the untouched source, so adjustments never
/// compound.
pub struct Pipeline {
    modules: Vec<Box<dyn ProcessingModule>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self {
            modules: vec![
                Box::new(modules::Normalize),
                Box::new(modules::BrightnessContrast),
                Box::new(modules::Saturation),
                Box::new(modules::Blur),
                Box::new(modules::StyleFilter),
            ],
        }
    }

    /// Stage names in execution order.
    pub fn stages(&self) -> impl Iterator<Item = &str> {
        self.modules.iter().map(|m| m.name())
    }

    /// Render `source` with `params`. The source is only read, and copied
    /// once into the working RGB buffer.
    ///
    /// Never panics. Out-of-domain values should be rejected before this is
    /// reached; if they are not, the blur window is clamped.
    pub fn render(
        &self,
        engine: &dyn Engine,
        source: &PixelBuffer,
        params: &AdjustmentParams,
    ) -> PixelBuffer {
        let t0 = Instant::now();
        let mut current = source.to_working();
        for module in &self.modules {
            debug!(module = module.name(), "processing");
            current = module.process(engine, current, params);
        }
        debug!(
            engine = engine.name(),
            width = current.width,
            height = current.height,
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "render complete"
        );
        current
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}
