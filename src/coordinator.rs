use crate::{
    config::QuizSettings,
    error::AppError,
    pipeline::{FrameHandler, FrameOutcome},
    quiz::{ChallengeMonitor, ChallengeSession, QuizEvent},
};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// Counters reported by the producer thread when it exits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProducerSummary {
    pub frames: usize,
    pub classified: usize,
    pub failed: usize,
}

/// Runs one session: a producer thread feeding frames to the handler and a
/// monitor task polling the challenge.
pub struct Coordinator {
    producer: Option<thread::JoinHandle<ProducerSummary>>,
    monitor: Option<JoinHandle<ChallengeSession>>,
    stop_flag: Arc<AtomicBool>,
    shutdown: watch::Sender<bool>,
}

impl Coordinator {
    fn start<F: Send + 'static>(
        frames: Vec<F>,
        handler: Box<dyn FrameHandler<F>>,
        session: ChallengeSession,
        poll_interval: Duration,
        frame_interval: Option<Duration>,
        events: mpsc::Sender<QuizEvent>,
    ) -> Result<Self, AppError> {
        let stop_flag = Arc::new(AtomicBool::new(false));
        let (shutdown, shutdown_rx) = watch::channel(false);

        let producer = Self::start_producer(frames, handler, frame_interval, stop_flag.clone())?;
        let monitor = ChallengeMonitor::new(session, poll_interval, events);
        let monitor = tokio::spawn(monitor.run(shutdown_rx));

        Ok(Self {
            producer: Some(producer),
            monitor: Some(monitor),
            stop_flag,
            shutdown,
        })
    }

    fn start_producer<F: Send + 'static>(
        frames: Vec<F>,
        mut handler: Box<dyn FrameHandler<F>>,
        frame_interval: Option<Duration>,
        stop_flag: Arc<AtomicBool>,
    ) -> Result<thread::JoinHandle<ProducerSummary>, AppError> {
        thread::Builder::new()
            .name("frame-producer".to_string())
            .spawn(move || {
                let mut summary = ProducerSummary::default();
                for frame in frames {
                    if stop_flag.load(Ordering::Relaxed) {
                        tracing::debug!("Producer stopped after {} frames", summary.frames);
                        break;
                    }
                    match handler.on_frame(&frame) {
                        FrameOutcome::Classified { .. } => summary.classified += 1,
                        FrameOutcome::Failed => summary.failed += 1,
                        _ => {}
                    }
                    summary.frames += 1;
                    if let Some(interval) = frame_interval {
                        thread::sleep(interval);
                    }
                }
                tracing::info!(
                    "Producer done: {} frames, {} classified, {} failed",
                    summary.frames,
                    summary.classified,
                    summary.failed
                );
                summary
            })
            .map_err(|e| coordinator_error("Failed to spawn producer", e))
    }

    /// Wait for the producer to run out of frames (or be stopped)
    pub async fn join_producer(&mut self) -> Result<ProducerSummary, AppError> {
        let handle = self
            .producer
            .take()
            .ok_or(AppError::Coordinator("No producer to join".to_string()))?;
        tokio::task::spawn_blocking(move || handle.join())
            .await
            .map_err(|e| coordinator_error("Producer join failed", e))?
            .map_err(|_| AppError::Coordinator("Producer panicked".to_string()))
    }

    /// Stop both sides, claim any pending completion and submit the score.
    /// Returns the session's total points.
    pub async fn shutdown(mut self) -> Result<u32, AppError> {
        self.stop();
        if self.producer.is_some() {
            self.join_producer().await?;
        }
        let monitor = self
            .monitor
            .take()
            .ok_or(AppError::Coordinator("Monitor not running".to_string()))?;
        let session = monitor
            .await
            .map_err(|e| coordinator_error("Monitor task failed", e))?;
        Ok(session.finish().await?)
    }

    pub fn stop(&self) {
        self.stop_flag.store(true, Ordering::Relaxed);
        let _ = self.shutdown.send(true);
    }
}

impl Drop for Coordinator {
    fn drop(&mut self) {
        self.stop();
        if let Some(monitor) = self.monitor.take() {
            monitor.abort();
        }
    }
}

fn coordinator_error(context: &str, cause: impl fmt::Display) -> AppError {
    AppError::Coordinator(format!("{}: {}", context, cause))
}

pub struct CoordinatorBuilder<F> {
    settings: QuizSettings,
    frames: Vec<F>,
    handler: Option<Box<dyn FrameHandler<F>>>,
    session: Option<ChallengeSession>,
    frame_interval: Option<Duration>,
    event_buffer_size: usize,
}

impl<F: Send + 'static> CoordinatorBuilder<F> {
    pub fn new(settings: QuizSettings) -> Self {
        Self {
            settings,
            frames: Vec::new(),
            handler: None,
            session: None,
            frame_interval: None,
            event_buffer_size: 64,
        }
    }

    pub fn frames(mut self, frames: impl IntoIterator<Item = F>) -> Self {
        self.frames = frames.into_iter().collect();
        self
    }

    pub fn handler(mut self, handler: Box<dyn FrameHandler<F>>) -> Self {
        self.handler = Some(handler);
        self
    }

    pub fn session(mut self, session: ChallengeSession) -> Self {
        self.session = Some(session);
        self
    }

    // Overrides the configured poll interval.
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.settings.poll_interval_ms = interval.as_millis() as u64;
        self
    }

    // Paces the replay, e.g. 33ms for a 30fps source. Unpaced by default.
    pub fn frame_interval(mut self, interval: Duration) -> Self {
        self.frame_interval = Some(interval);
        self
    }

    pub fn event_buffer_size(mut self, size: usize) -> Self {
        self.event_buffer_size = size.max(1);
        self
    }

    /// Must be called from inside a tokio runtime
    pub fn build(self) -> Result<(Coordinator, mpsc::Receiver<QuizEvent>), AppError> {
        let handler = self
            .handler
            .ok_or(AppError::Coordinator("Frame handler not set".to_string()))?;
        let session = self
            .session
            .ok_or(AppError::Coordinator("Session not set".to_string()))?;

        let (events_tx, events_rx) = mpsc::channel(self.event_buffer_size);
        let coordinator = Coordinator::start(
            self.frames,
            handler,
            session,
            Duration::from_millis(self.settings.poll_interval_ms.max(1)),
            self.frame_interval,
            events_tx,
        )?;
        Ok((coordinator, events_rx))
    }
}
