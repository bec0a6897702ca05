//! Image adjustment core: pixel buffers, adjustment parameters, the engine
//! capability and the fixed-order adjustment pipeline.

pub mod color;
pub mod engine;
pub mod error;
pub mod params;
pub mod pipeline;
pub mod pixel_buf;

pub use engine::{CpuEngine, Engine, HsvBuffer, Quality};
pub use error::{DomainError, EngineError};
pub use params::{Adjustment, AdjustmentField, AdjustmentParams, FieldSpec, Filter};
pub use pipeline::Pipeline;
pub use pixel_buf::{ChannelLayout, PixelBuffer};
