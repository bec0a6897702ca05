//! Session controller: owns the [`Session`], schedules renders off the
//! caller's task and publishes only the newest result.
//!
//! ```text
//! set_adjustment ─┬─> generation += 1 ─> spawn_blocking(render) ─┐
//!                 │                                               │ mpsc
//! next_event <────┴──────── publish iff generation == latest <────┘
//! ```
//!
//! Renders are never cancelled. A render that finishes after a newer one was
//! issued is dropped by the forwarding task, so only its generation crosses
//! the channel.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Context;
use retouch_core::engine::codec;
use retouch_core::{Adjustment, AdjustmentParams, CpuEngine, Engine, Pipeline, PixelBuffer};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::export;
use crate::notice::{Notice, NoticeQueue};
use crate::session::{Session, ViewMode};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineState {
    /// No engine yet; an initializer may be running.
    Initializing,
    Ready,
    Failed,
}

/// What became of a render request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderRequest {
    Issued { generation: u64 },
    /// Engine still loading. The current params render once it is ready.
    Queued,
    /// The last engine load failed and none is running; nothing will render
    /// until a new engine is started or attached.
    EngineUnavailable,
    /// Nothing to render yet.
    NoImage,
}

/// Outcome of one background completion, returned by
/// [`SessionController::next_event`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    EngineReady,
    EngineFailed(String),
    /// A load finished after it stopped mattering: an engine was already
    /// installed, or it failed while another load was still pending.
    EngineLoadIgnored { load: u64 },
    Rendered { generation: u64 },
    Discarded { generation: u64 },
    RenderFailed { generation: u64 },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub issued: u64,
    pub published: u64,
    pub discarded: u64,
    pub failed: u64,
}

enum Completion {
    Engine {
        load: u64,
        result: anyhow::Result<Arc<dyn Engine>>,
    },
    Render {
        generation: u64,
        outcome: RenderOutcome,
    },
}

#[derive(Debug)]
enum RenderOutcome {
    Done(PixelBuffer),
    /// Superseded before it was sent; the buffer was dropped.
    Stale,
    Failed(String),
}

/// Decide what a finished render sends back. Buffers of superseded
/// generations are dropped here instead of queuing in the channel.
fn finish_render(
    generation: u64,
    latest: &AtomicU64,
    result: Result<PixelBuffer, String>,
) -> RenderOutcome {
    match result {
        Ok(image) if generation == latest.load(Ordering::Acquire) => RenderOutcome::Done(image),
        Ok(_) => RenderOutcome::Stale,
        Err(message) => RenderOutcome::Failed(message),
    }
}

pub struct SessionController {
    config: SessionConfig,
    session: Session,
    pipeline: Arc<Pipeline>,
    engine: Option<Arc<dyn Engine>>,
    engine_state: EngineState,
    /// Tag of the most recent `start_engine` call.
    engine_load: u64,
    engine_loads_in_flight: usize,
    render_pending: bool,
    /// Mirror of `session.latest_generation` readable from render tasks.
    latest: Arc<AtomicU64>,
    stats: RenderStats,
    notices: NoticeQueue,
    runtime: Handle,
    tx: mpsc::UnboundedSender<Completion>,
    rx: mpsc::UnboundedReceiver<Completion>,
}

impl SessionController {
    /// Empty session with no engine. Must be called inside a Tokio runtime;
    /// renders run on that runtime's blocking pool.
    pub fn new(config: SessionConfig) -> anyhow::Result<Self> {
        let runtime =
            Handle::try_current().context("session controller needs a running tokio runtime")?;
        let (tx, rx) = mpsc::unbounded_channel();
        Ok(Self {
            config,
            session: Session::default(),
            pipeline: Arc::new(Pipeline::new()),
            engine: None,
            engine_state: EngineState::Initializing,
            engine_load: 0,
            engine_loads_in_flight: 0,
            render_pending: false,
            latest: Arc::new(AtomicU64::new(0)),
            stats: RenderStats::default(),
            notices: NoticeQueue::default(),
            runtime,
            tx,
            rx,
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn engine_state(&self) -> EngineState {
        self.engine_state
    }

    /// A render is running in the background.
    pub fn is_processing(&self) -> bool {
        self.session.in_flight > 0
    }

    pub fn render_stats(&self) -> RenderStats {
        self.stats
    }

    /// Drain notices accumulated since the last call.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.notices.take()
    }

    // ── Engine lifecycle ─────────────────────────────────────────────────

    /// Run `loader` on the blocking pool. Readiness (or failure) arrives
    /// through [`Self::next_event`].
    ///
    /// No-op once an engine is installed. After a failed load this retries,
    /// and the current params render when the new engine is ready.
    pub fn start_engine<F>(&mut self, loader: F)
    where
        F: FnOnce() -> anyhow::Result<Arc<dyn Engine>> + Send + 'static,
    {
        if self.engine.is_some() {
            debug!("engine already installed; ignoring start");
            return;
        }
        if self.engine_state == EngineState::Failed && self.session.original.is_some() {
            self.render_pending = true;
        }
        self.engine_state = EngineState::Initializing;
        self.engine_load += 1;
        self.engine_loads_in_flight += 1;
        let load = self.engine_load;
        let tx = self.tx.clone();
        let task = self.runtime.spawn_blocking(loader);
        self.runtime.spawn(async move {
            let result = match task.await {
                Ok(result) => result,
                Err(join) => Err(anyhow::anyhow!("engine initializer panicked: {join}")),
            };
            let _ = tx.send(Completion::Engine { load, result });
        });
        info!(load, "engine initialization started");
    }

    /// [`Self::start_engine`] with the built-in CPU engine.
    pub fn start_cpu_engine(&mut self) {
        self.start_engine(|| {
            let engine = CpuEngine::initialize().context("initializing cpu engine")?;
            Ok(Arc::new(engine) as Arc<dyn Engine>)
        });
    }

    /// Use an engine the host already initialized.
    pub fn attach_engine(&mut self, engine: Arc<dyn Engine>) {
        self.install_engine(engine);
    }

    fn install_engine(&mut self, engine: Arc<dyn Engine>) {
        info!(engine = engine.name(), "engine ready");
        self.engine = Some(engine);
        self.engine_state = EngineState::Ready;
        self.notices.success("Image processing engine loaded!");
        if std::mem::take(&mut self.render_pending) {
            debug!("issuing render queued before engine readiness");
            self.request_render();
        }
    }

    // ── Operations ───────────────────────────────────────────────────────

    /// Decode `bytes` as the new original, reset params to neutral and render.
    ///
    /// On a decode error nothing changes.
    pub fn load_image(&mut self, bytes: &[u8]) -> Result<RenderRequest, SessionError> {
        let decoded = match &self.engine {
            Some(engine) => engine.decode(bytes),
            None => codec::decode(bytes),
        };
        let image = match decoded {
            Ok(image) => image,
            Err(err) => return Err(self.fail(err.into())),
        };

        info!(width = image.width, height = image.height, "image loaded");
        self.session.original = Some(Arc::new(image));
        self.session.rendered = None;
        self.session.published_generation = 0;
        self.session.params = AdjustmentParams::NEUTRAL;
        self.notices.success("Image uploaded successfully");
        Ok(self.request_render())
    }

    /// Replace one field of the current params and re-render from the original.
    ///
    /// Out-of-domain values are rejected; params stay as they were.
    pub fn set_adjustment(
        &mut self,
        adjustment: Adjustment,
    ) -> Result<RenderRequest, SessionError> {
        let params = match self.session.params.with(adjustment) {
            Ok(params) => params,
            Err(err) => return Err(self.fail(err.into())),
        };
        debug!(?adjustment, "adjustment changed");
        self.session.params = params;
        Ok(self.request_render())
    }

    /// Back to neutral params, then re-render (even if already neutral).
    pub fn reset(&mut self) -> RenderRequest {
        self.session.params = AdjustmentParams::NEUTRAL;
        self.notices.success("Adjustments reset");
        self.request_render()
    }

    /// JPEG bytes of the latest published render.
    pub fn export_current(&mut self) -> Result<Vec<u8>, SessionError> {
        match self.encode_rendered() {
            Ok(bytes) => Ok(bytes),
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Export to `config.export_dir`, under `file_name` or the configured
    /// default name.
    pub fn export_to_file(
        &mut self,
        file_name: Option<&str>,
    ) -> Result<std::path::PathBuf, SessionError> {
        let name = file_name
            .unwrap_or(&self.config.export_file_name)
            .to_string();
        let result = export::check_file_name(&name)
            .and_then(|()| self.encode_rendered())
            .and_then(|bytes| export::write_file(&self.config.export_dir, &name, &bytes));
        match result {
            Ok(path) => {
                self.notices.success("Image downloaded");
                Ok(path)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Flip between showing the original and the edited preview.
    pub fn toggle_original_view(&mut self) -> bool {
        self.session.show_original = !self.session.show_original;
        self.session.show_original
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.session.view_mode = mode;
    }

    // ── Completions ──────────────────────────────────────────────────────

    /// Wait for and apply the next background completion.
    ///
    /// Returns `None` immediately when nothing is outstanding.
    pub async fn next_event(&mut self) -> Option<Event> {
        if self.session.in_flight == 0 && self.engine_loads_in_flight == 0 {
            return None;
        }
        let completion = self.rx.recv().await?;
        Some(self.apply(completion))
    }

    /// Apply completions until no render or engine load is outstanding.
    pub async fn settle(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        while let Some(event) = self.next_event().await {
            events.push(event);
        }
        events
    }

    fn apply(&mut self, completion: Completion) -> Event {
        match completion {
            Completion::Engine { load, result } => {
                self.engine_loads_in_flight = self.engine_loads_in_flight.saturating_sub(1);
                match result {
                    // Any successful load is usable while nothing is installed.
                    Ok(engine) if self.engine.is_none() => {
                        self.install_engine(engine);
                        Event::EngineReady
                    }
                    // Fail only once no other load can still succeed.
                    Err(err) if self.engine.is_none() && self.engine_loads_in_flight == 0 => {
                        self.engine_state = EngineState::Failed;
                        let message = format!("{err:#}");
                        self.notices
                            .failure(&SessionError::EngineInit(message.clone()));
                        Event::EngineFailed(message)
                    }
                    Ok(_) => {
                        debug!(load, "engine already installed; dropping loaded engine");
                        Event::EngineLoadIgnored { load }
                    }
                    Err(err) => {
                        warn!(
                            load,
                            latest = self.engine_load,
                            error = %format!("{err:#}"),
                            "engine load failed while another was pending"
                        );
                        Event::EngineLoadIgnored { load }
                    }
                }
            }
            Completion::Render {
                generation,
                outcome,
            } => {
                self.session.in_flight = self.session.in_flight.saturating_sub(1);
                let latest = self.session.latest_generation;
                match outcome {
                    RenderOutcome::Done(image) if generation == latest => {
                        self.session.rendered = Some(Arc::new(image));
                        self.session.published_generation = generation;
                        self.stats.published += 1;
                        debug!(generation, "published render");
                        Event::Rendered { generation }
                    }
                    RenderOutcome::Done(_) | RenderOutcome::Stale => {
                        self.stats.discarded += 1;
                        debug!(generation, latest, "discarded stale render");
                        Event::Discarded { generation }
                    }
                    RenderOutcome::Failed(message) => {
                        self.stats.failed += 1;
                        if generation == latest {
                            self.notices.failure(&SessionError::Render(message));
                        } else {
                            warn!(generation, latest, error = %message, "stale render failed");
                        }
                        Event::RenderFailed { generation }
                    }
                }
            }
        }
    }

    // ── Internals ────────────────────────────────────────────────────────

    fn request_render(&mut self) -> RenderRequest {
        let Some(source) = self.session.original.clone() else {
            return RenderRequest::NoImage;
        };
        let Some(engine) = self.engine.clone() else {
            if self.engine_state == EngineState::Failed {
                self.notices.failure(&SessionError::EngineUnavailable);
                return RenderRequest::EngineUnavailable;
            }
            self.render_pending = true;
            self.notices.failure(&SessionError::EngineNotReady);
            return RenderRequest::Queued;
        };

        self.session.latest_generation += 1;
        let generation = self.session.latest_generation;
        self.latest.store(generation, Ordering::Release);
        let params = self.session.params;
        let pipeline = Arc::clone(&self.pipeline);
        let latest = Arc::clone(&self.latest);
        let tx = self.tx.clone();

        self.session.in_flight += 1;
        self.stats.issued += 1;
        debug!(generation, ?params, "issuing render");

        let task = self
            .runtime
            .spawn_blocking(move || pipeline.render(engine.as_ref(), &source, &params));
        self.runtime.spawn(async move {
            let result = task.await.map_err(|join| join.to_string());
            let outcome = finish_render(generation, &latest, result);
            let _ = tx.send(Completion::Render {
                generation,
                outcome,
            });
        });
        RenderRequest::Issued { generation }
    }

    fn encode_rendered(&self) -> Result<Vec<u8>, SessionError> {
        let rendered = self.session.rendered.as_ref().ok_or(SessionError::NoImage)?;
        let engine = self.engine.as_ref().ok_or(SessionError::EngineNotReady)?;
        export::encode(engine.as_ref(), rendered, self.config.export_quality)
    }

    fn fail(&mut self, err: SessionError) -> SessionError {
        self.notices.failure(&err);
        err
    }
}
