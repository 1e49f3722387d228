use std::cell::Cell;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use crossterm::event::{
    self, Event as CtEvent, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};

/// Pointer activity reduced to what the follower cares about
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MouseInput {
    Moved { x: u16, y: u16 },
    Click { x: u16, y: u16 },
}

impl MouseInput {
    pub fn from_crossterm(ev: MouseEvent) -> Option<Self> {
        let (x, y) = (ev.column, ev.row);
        match ev.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) => Some(MouseInput::Moved { x, y }),
            MouseEventKind::Down(MouseButton::Left) => Some(MouseInput::Click { x, y }),
            _ => None,
        }
    }
}

/// Unified event type consumed by the app runner
#[derive(Clone, Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseInput),
    FocusGained,
    FocusLost,
    Resize(u16, u16),
    Tick,
    /// The event source is gone; nothing more will arrive
    Closed,
}

impl AppEvent {
    pub fn from_crossterm(ev: CtEvent) -> Option<Self> {
        match ev {
            // some platforms report releases too; act on presses and repeats only
            CtEvent::Key(key) if key.kind == KeyEventKind::Release => None,
            CtEvent::Key(key) => Some(AppEvent::Key(key)),
            CtEvent::Mouse(m) => MouseInput::from_crossterm(m).map(AppEvent::Mouse),
            CtEvent::FocusGained => Some(AppEvent::FocusGained),
            CtEvent::FocusLost => Some(AppEvent::FocusLost),
            CtEvent::Resize(w, h) => Some(AppEvent::Resize(w, h)),
            _ => None,
        }
    }
}

/// Source of terminal events (keyboard, mouse, resize, etc.)
pub trait EventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    /// Returns Ok(event) if an event arrives before the timeout, or Err(Timeout) if it expires.
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    rx: Receiver<AppEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            match event::read() {
                Ok(ev) => {
                    if let Some(ev) = AppEvent::from_crossterm(ev) {
                        if tx.send(ev).is_err() {
                            break;
                        }
                    }
                }
                Err(err) => {
                    tracing::warn!(%err, "terminal event reader stopped");
                    break;
                }
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Configurable ticker interface
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

/// Fixed interval ticker
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Test event source for unit tests
pub struct TestEventSource {
    rx: Receiver<AppEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<AppEvent>) -> Self {
        Self { rx }
    }
}

impl EventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Runner that advances the application one event/tick at a time
pub struct Runner<E: EventSource, T: Ticker> {
    event_source: E,
    ticker: T,
    last_tick: Cell<Instant>,
}

impl<E: EventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
            last_tick: Cell::new(Instant::now()),
        }
    }

    /// Blocks until the next tick is due and returns the next event, or Tick.
    /// A steady stream of events cannot starve the ticks. Once the source
    /// disconnects every step yields Closed.
    pub fn step(&self) -> AppEvent {
        let since_tick = self.last_tick.get().elapsed();
        let interval = self.ticker.interval();
        if since_tick >= interval {
            self.last_tick.set(Instant::now());
            return AppEvent::Tick;
        }

        match self.event_source.recv_timeout(interval - since_tick) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) => {
                self.last_tick.set(Instant::now());
                AppEvent::Tick
            }
            Err(RecvTimeoutError::Disconnected) => AppEvent::Closed,
        }
    }
}
