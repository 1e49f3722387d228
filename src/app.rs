use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::animation::{FrameLoop, StopHandle};
use crate::clock::Clock;
use crate::config::Config;
use crate::corpus::Corpus;
use crate::cursor::{CursorFollower, CursorSettings, CursorTimer};
use crate::runtime::{AppEvent, MouseInput};
use crate::scene::Scene;
use crate::scheduler::Scheduler;
use crate::trainer::{TextField, Trainer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

/// Typing trainer plus the text field feeding it
#[derive(Debug)]
pub struct TrainerScreen {
    pub trainer: Trainer,
    pub field: TextField,
    pub prompt: Option<String>,
}

impl TrainerScreen {
    fn restart(&mut self, rng: &mut StdRng) {
        match &self.prompt {
            Some(prompt) => self.trainer.start_with(prompt.clone()),
            None => self.trainer.restart(rng),
        }
        self.field.clear();
        self.field.enabled = self.trainer.input_enabled;
    }

    fn on_key(&mut self, key: KeyEvent, rng: &mut StdRng, clock: &dyn Clock) {
        let restart = key.code == KeyCode::Tab
            || (key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('r'));
        if restart {
            self.restart(rng);
            return;
        }

        let changed = match key.code {
            KeyCode::Char(_) if key.modifiers.contains(KeyModifiers::CONTROL) => None,
            KeyCode::Char(c) => self.field.insert(c).map(str::to_owned),
            KeyCode::Backspace => self.field.backspace().map(str::to_owned),
            _ => None,
        };

        if let Some(value) = changed {
            self.trainer.on_input_changed(&value, clock.now());
            self.field.enabled = self.trainer.input_enabled;
        }
    }
}

/// Cursor follower with the scene it draws into and its timer queue
#[derive(Debug)]
pub struct CursorScreen {
    pub follower: CursorFollower,
    pub scene: Scene,
    pub timers: Scheduler<CursorTimer>,
    pub frames: FrameLoop,
    stop: StopHandle,
}

impl CursorScreen {
    fn on_key(&mut self, key: KeyEvent, rng: &mut StdRng) {
        match key.code {
            KeyCode::Char('t') => {
                let on = self.follower.toggle_trail();
                tracing::debug!(trail = on, "trail toggled");
            }
            KeyCode::Char('g') => {
                let glow = !self.follower.style().glow;
                self.follower.set_glow(glow, &mut self.scene);
            }
            KeyCode::Char('c') => {
                self.follower.random_tint(rng, &mut self.scene);
            }
            KeyCode::Char('x') => self.follower.clear_effects(&mut self.scene),
            KeyCode::Char('p') => {
                if self.frames.is_running() {
                    self.stop.stop();
                } else {
                    self.stop = self.frames.start();
                }
            }
            _ => {}
        }
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }
}

#[derive(Debug)]
pub enum Screen {
    Trainer(TrainerScreen),
    Cursor(CursorScreen),
}

pub struct App {
    pub screen: Screen,
    clock: Box<dyn Clock>,
    rng: StdRng,
}

impl App {
    pub fn trainer(
        corpus: Corpus,
        prompt: Option<String>,
        clock: Box<dyn Clock>,
        mut rng: StdRng,
    ) -> Self {
        let mut screen = TrainerScreen {
            trainer: Trainer::new(corpus),
            field: TextField::new(),
            prompt,
        };
        screen.restart(&mut rng);

        Self {
            screen: Screen::Trainer(screen),
            clock,
            rng,
        }
    }

    pub fn cursor(config: &Config, clock: Box<dyn Clock>, rng: StdRng) -> Self {
        let mut scene = Scene::new();
        let mut follower = CursorFollower::new(CursorSettings::from(config), &mut scene, clock.now());
        follower.trail_enabled = config.trail_enabled;
        if config.glow {
            follower.set_glow(true, &mut scene);
        }
        let frames = FrameLoop::new();
        let stop = frames.start();

        Self {
            screen: Screen::Cursor(CursorScreen {
                follower,
                scene,
                timers: Scheduler::new(),
                frames,
                stop,
            }),
            clock,
            rng,
        }
    }

    pub fn with_entropy_rng() -> StdRng {
        StdRng::from_entropy()
    }

    pub fn now(&self) -> std::time::Instant {
        self.clock.now()
    }

    pub fn handle(&mut self, event: AppEvent) -> Control {
        match &event {
            AppEvent::Closed => return Control::Quit,
            AppEvent::Key(key) => {
                let ctrl_c = key.modifiers.contains(KeyModifiers::CONTROL)
                    && key.code == KeyCode::Char('c');
                if key.code == KeyCode::Esc || ctrl_c {
                    return Control::Quit;
                }
            }
            _ => {}
        }

        let now = self.clock.now();
        match &mut self.screen {
            Screen::Trainer(screen) => {
                if let AppEvent::Key(key) = event {
                    screen.on_key(key, &mut self.rng, self.clock.as_ref());
                }
            }
            Screen::Cursor(screen) => {
                for timer in screen.timers.drain_due(now) {
                    screen.follower.on_timer(timer, &mut screen.scene);
                }

                match event {
                    AppEvent::Mouse(MouseInput::Moved { x, y }) => {
                        screen
                            .follower
                            .on_pointer_move(x, y, &mut screen.scene, &mut screen.timers, now)
                    }
                    AppEvent::Mouse(MouseInput::Click { x, y }) => {
                        screen
                            .follower
                            .on_click(x, y, &mut screen.scene, &mut screen.timers, now)
                    }
                    AppEvent::FocusLost => screen.follower.on_pointer_leave(),
                    AppEvent::FocusGained => screen.follower.on_pointer_enter(),
                    AppEvent::Resize(w, h) => screen.follower.on_resize(w, h),
                    AppEvent::Key(key) => screen.on_key(key, &mut self.rng),
                    AppEvent::Tick => {
                        if screen.frames.is_running() {
                            screen.follower.tick(&mut screen.scene);
                        }
                    }
                    AppEvent::Closed => {}
                }
            }
        }
        Control::Continue
    }
}
