use std::time::{Duration, Instant};

use rand::seq::SliceRandom;
use rand::Rng;
use ratatui::style::Color;

use crate::config::Config;
use crate::scene::{ElementId, ElementKind, ElementStyle, Frame, Keyframes, Point, Scene};
use crate::scheduler::{Scheduler, TimerId};

pub const MOVING_CLASS: &str = "moving";
pub const RIPPLE_KEYFRAMES: &str = "click-ripple";

/// Skeleton drawn for the follower; every row has the same width
pub const SPRITE: [&str; 5] = [
    r" \ (o) / ",
    r"  \-+-/  ",
    r"  --+--  ",
    r"  /-+-\  ",
    r" /  ~  \ ",
];
/// Same skeleton mid-stride, shown while the `moving` class is set
pub const SPRITE_MOVING: [&str; 5] = [
    r" / (o) \ ",
    r"  \-+-/  ",
    r"  --+--  ",
    r"  \-+-/  ",
    r" \  ~  / ",
];
pub const SPRITE_WIDTH: u16 = 9;
pub const SPRITE_HEIGHT: u16 = 5;

pub const PALETTE: [Color; 5] = [
    Color::Rgb(0xff, 0xff, 0xff),
    Color::Rgb(0x00, 0xff, 0x00),
    Color::Rgb(0x00, 0xff, 0xff),
    Color::Rgb(0xff, 0x00, 0xff),
    Color::Rgb(0xff, 0xff, 0x00),
];

/// Deferred work the follower hands to the timer queue
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CursorTimer {
    Idle,
    Expire(ElementId),
    EndClickPulse,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CursorSettings {
    pub smoothing: f64,
    pub idle: Duration,
    pub trail_lifetime: Duration,
    pub ripple_lifetime: Duration,
    pub click_pulse: Duration,
}

impl Default for CursorSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for CursorSettings {
    fn from(cfg: &Config) -> Self {
        Self {
            smoothing: cfg.smoothing.clamp(0.0, 1.0),
            idle: cfg.idle(),
            trail_lifetime: cfg.trail_lifetime(),
            ripple_lifetime: cfg.ripple_lifetime(),
            click_pulse: cfg.click_pulse(),
        }
    }
}

/// A sprite that eases toward the pointer, leaving a fading trail and
/// rippling on clicks.
#[derive(Debug)]
pub struct CursorFollower {
    pub settings: CursorSettings,
    pub pointer: Point,
    pub display: Point,
    pub is_moving: bool,
    pub trail_enabled: bool,
    follower: Option<ElementId>,
    idle_timer: Option<TimerId>,
    style: ElementStyle,
}

impl CursorFollower {
    pub fn new(settings: CursorSettings, scene: &mut Scene, now: Instant) -> Self {
        scene.ensure_keyframes(
            RIPPLE_KEYFRAMES,
            Keyframes {
                from: Frame {
                    scale: 0.0,
                    opacity: 1.0,
                },
                to: Frame {
                    scale: 10.0,
                    opacity: 0.0,
                },
                duration: settings.ripple_lifetime,
            },
        );
        let follower = scene.create(ElementKind::Follower, sprite_origin(Point::ORIGIN), now);

        Self {
            settings,
            pointer: Point::ORIGIN,
            display: Point::ORIGIN,
            is_moving: false,
            trail_enabled: true,
            follower: Some(follower),
            idle_timer: None,
            style: ElementStyle::default(),
        }
    }

    pub fn follower(&self) -> Option<ElementId> {
        self.follower
    }

    pub fn on_pointer_move(
        &mut self,
        x: u16,
        y: u16,
        scene: &mut Scene,
        timers: &mut Scheduler<CursorTimer>,
        now: Instant,
    ) {
        self.pointer = Point::from((x, y));
        self.is_moving = true;

        if self.trail_enabled {
            let dot = scene.create(ElementKind::TrailDot, self.pointer, now);
            timers.schedule(now, self.settings.trail_lifetime, CursorTimer::Expire(dot));
        }

        if let Some(previous) = self.idle_timer.take() {
            timers.cancel(previous);
        }
        self.idle_timer = Some(timers.schedule(now, self.settings.idle, CursorTimer::Idle));
    }

    pub fn on_pointer_leave(&mut self) {
        self.is_moving = false;
    }

    pub fn on_pointer_enter(&mut self) {
        self.is_moving = true;
    }

    pub fn on_click(
        &mut self,
        x: u16,
        y: u16,
        scene: &mut Scene,
        timers: &mut Scheduler<CursorTimer>,
        now: Instant,
    ) {
        if let Some(id) = self.follower {
            scene.set_class(id, MOVING_CLASS, true);
        }
        timers.schedule(now, self.settings.click_pulse, CursorTimer::EndClickPulse);

        let ripple = scene.create(ElementKind::Ripple, Point::from((x, y)), now);
        timers.schedule(now, self.settings.ripple_lifetime, CursorTimer::Expire(ripple));
    }

    /// One animation frame: ease toward the pointer and sync the sprite.
    pub fn tick(&mut self, scene: &mut Scene) {
        let k = self.settings.smoothing;
        self.display.x += (self.pointer.x - self.display.x) * k;
        self.display.y += (self.pointer.y - self.display.y) * k;

        if let Some(id) = self.follower {
            scene.set_position(id, sprite_origin(self.display));
            scene.set_class(id, MOVING_CLASS, self.is_moving);
        }
    }

    pub fn on_timer(&mut self, timer: CursorTimer, scene: &mut Scene) {
        match timer {
            CursorTimer::Idle => {
                self.idle_timer = None;
                self.is_moving = false;
            }
            CursorTimer::Expire(id) => {
                scene.remove(id);
            }
            CursorTimer::EndClickPulse => {
                if let Some(id) = self.follower {
                    scene.set_class(id, MOVING_CLASS, false);
                }
            }
        }
    }

    /// Terminal resized: the last reported pointer cell stays the target.
    pub fn on_resize(&mut self, width: u16, height: u16) {
        tracing::debug!(width, height, pointer = ?self.pointer, "resize, keeping pointer");
    }

    pub fn style(&self) -> ElementStyle {
        self.style
    }

    pub fn set_tint(&mut self, tint: Color, scene: &mut Scene) {
        self.style.tint = tint;
        self.apply_style(scene);
    }

    pub fn random_tint<R: Rng + ?Sized>(&mut self, rng: &mut R, scene: &mut Scene) -> Color {
        let tint = *PALETTE.choose(rng).unwrap_or(&PALETTE[0]);
        self.set_tint(tint, scene);
        tint
    }

    pub fn set_glow(&mut self, glow: bool, scene: &mut Scene) {
        self.style.glow = glow;
        self.apply_style(scene);
    }

    pub fn clear_effects(&mut self, scene: &mut Scene) {
        self.style = ElementStyle::default();
        self.apply_style(scene);
    }

    pub fn toggle_trail(&mut self) -> bool {
        self.trail_enabled = !self.trail_enabled;
        self.trail_enabled
    }

    fn apply_style(&self, scene: &mut Scene) {
        if let Some(id) = self.follower {
            scene.set_style(id, self.style);
        }
    }
}

/// Top-left cell that puts the sprite's center on `center`
pub fn sprite_origin(center: Point) -> Point {
    Point::new(
        center.x - (SPRITE_WIDTH / 2) as f64,
        center.y - (SPRITE_HEIGHT / 2) as f64,
    )
}
