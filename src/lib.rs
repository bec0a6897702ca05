//! Interactive still-image adjustment: a session controller that drives the
//! `retouch-core` pipeline with last-request-wins rendering, plus export,
//! notices and logging setup for the host application.

pub mod config;
pub mod controller;
pub mod error;
pub mod export;
pub mod logging;
pub mod notice;
pub mod session;

pub use config::SessionConfig;
pub use controller::{EngineState, Event, RenderRequest, RenderStats, SessionController};
pub use error::SessionError;
pub use notice::{Notice, NoticeLevel};
pub use session::{Comparison, Session, ViewMode};

pub use retouch_core::{
    Adjustment, AdjustmentField, AdjustmentParams, CpuEngine, Engine, FieldSpec, Filter,
    PixelBuffer, Quality,
};
