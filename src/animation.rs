use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Start/stop switch for the per-frame redraw loop
#[derive(Debug, Default)]
pub struct FrameLoop {
    running: Arc<AtomicBool>,
}

/// Cancellation token handed out by [`FrameLoop::start`]
#[derive(Clone, Debug)]
pub struct StopHandle {
    running: Arc<AtomicBool>,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&self) -> StopHandle {
        self.running.store(true, Ordering::SeqCst);
        StopHandle {
            running: Arc::clone(&self.running),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

impl StopHandle {
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        !self.running.load(Ordering::SeqCst)
    }
}
