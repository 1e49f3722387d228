use std::time::{Duration, Instant};

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::Widget,
};

use crate::cursor::{MOVING_CLASS, RIPPLE_KEYFRAMES, SPRITE, SPRITE_MOVING};
use crate::scene::{Element, ElementKind, Scene};

/// Draws a [`Scene`]: effects first, the follower sprite on top.
pub struct SceneView<'a> {
    scene: &'a Scene,
    now: Instant,
    trail_lifetime: Duration,
}

impl<'a> SceneView<'a> {
    pub fn new(scene: &'a Scene, now: Instant) -> Self {
        Self {
            scene,
            now,
            trail_lifetime: Duration::from_millis(1000),
        }
    }

    pub fn trail_lifetime(mut self, lifetime: Duration) -> Self {
        self.trail_lifetime = lifetime;
        self
    }

    fn draw_trail_dot(&self, el: &Element, area: Rect, buf: &mut Buffer) {
        let fade = fraction(el.age(self.now), self.trail_lifetime);
        let color = if fade < 0.5 {
            Color::Gray
        } else {
            Color::DarkGray
        };
        put(area, buf, el.position.x, el.position.y, "·", Style::default().fg(color));
    }

    fn draw_ripple(&self, el: &Element, area: Rect, buf: &mut Buffer) {
        let Some(keyframes) = self.scene.keyframes(RIPPLE_KEYFRAMES) else {
            return;
        };
        let frame = keyframes.sample(el.age(self.now));
        if frame.opacity <= 0.0 {
            return;
        }

        let style = if frame.opacity > 0.66 {
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
        } else if frame.opacity > 0.33 {
            Style::default().fg(Color::Gray)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        // cells are roughly twice as tall as wide
        let rx = frame.scale;
        let ry = frame.scale / 2.0;
        if rx < 0.5 {
            put(area, buf, el.position.x, el.position.y, "∘", style);
            return;
        }
        let steps = ((rx * 8.0).ceil() as usize).max(8);
        for i in 0..steps {
            let angle = i as f64 / steps as f64 * std::f64::consts::TAU;
            put(
                area,
                buf,
                el.position.x + rx * angle.cos(),
                el.position.y + ry * angle.sin(),
                "○",
                style,
            );
        }
    }

    fn draw_follower(&self, el: &Element, area: Rect, buf: &mut Buffer) {
        let moving = el.classes.contains(MOVING_CLASS);
        let rows = if moving { &SPRITE_MOVING } else { &SPRITE };

        let mut style = Style::default().fg(el.style.tint);
        if el.style.glow {
            style = style.add_modifier(Modifier::BOLD);
        }

        for (dy, row) in rows.iter().enumerate() {
            for (dx, ch) in row.chars().enumerate() {
                if ch == ' ' {
                    continue;
                }
                put(
                    area,
                    buf,
                    el.position.x + dx as f64,
                    el.position.y + dy as f64,
                    ch.encode_utf8(&mut [0; 4]),
                    style,
                );
            }
        }
    }
}

impl Widget for SceneView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut followers = Vec::new();
        for (_, el) in self.scene.iter() {
            match el.kind {
                ElementKind::TrailDot => self.draw_trail_dot(el, area, buf),
                ElementKind::Ripple => self.draw_ripple(el, area, buf),
                ElementKind::Follower => followers.push(el),
            }
        }
        for el in followers {
            self.draw_follower(el, area, buf);
        }
    }
}

fn fraction(age: Duration, lifetime: Duration) -> f64 {
    if lifetime.is_zero() {
        return 1.0;
    }
    (age.as_secs_f64() / lifetime.as_secs_f64()).clamp(0.0, 1.0)
}

/// Writes one symbol at a scene coordinate; anything off the area is dropped.
fn put(area: Rect, buf: &mut Buffer, x: f64, y: f64, symbol: &str, style: Style) {
    let (x, y) = (x.round(), y.round());
    if x < 0.0 || y < 0.0 || x >= area.width as f64 || y >= area.height as f64 {
        return;
    }
    let (x, y) = (area.x + x as u16, area.y + y as u16);
    if let Some(cell) = buf.cell_mut((x, y)) {
        cell.set_symbol(symbol).set_style(style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::{CursorFollower, CursorSettings, CursorTimer};
    use crate::scene::Point;
    use crate::scheduler::Scheduler;

    fn render(scene: &Scene, now: Instant, w: u16, h: u16) -> Buffer {
        let area = Rect::new(0, 0, w, h);
        let mut buf = Buffer::empty(area);
        SceneView::new(scene, now).render(area, &mut buf);
        buf
    }

    fn symbol_at(buf: &Buffer, x: u16, y: u16) -> String {
        buf.cell((x, y)).map(|c| c.symbol().to_string()).unwrap_or_default()
    }

    #[test]
    fn trail_dot_drawn_at_its_cell() {
        let mut scene = Scene::new();
        let now = Instant::now();
        scene.create(ElementKind::TrailDot, Point::new(3.0, 2.0), now);

        let buf = render(&scene, now, 10, 5);
        assert_eq!(symbol_at(&buf, 3, 2), "·");
    }

    #[test]
    fn offscreen_elements_are_clipped() {
        let mut scene = Scene::new();
        let now = Instant::now();
        scene.create(ElementKind::TrailDot, Point::new(-3.0, 2.0), now);
        scene.create(ElementKind::TrailDot, Point::new(50.0, 50.0), now);
        // follower at the origin hangs off the top-left corner
        let _cursor = CursorFollower::new(CursorSettings::default(), &mut scene, now);

        let buf = render(&scene, now, 10, 5);
        assert!(buf.content.iter().any(|c| c.symbol() != " "));
    }

    #[test]
    fn ripple_grows_then_disappears() {
        let mut scene = Scene::new();
        let mut timers: Scheduler<CursorTimer> = Scheduler::new();
        let now = Instant::now();
        let mut cursor = CursorFollower::new(CursorSettings::default(), &mut scene, now);
        cursor.on_click(20, 10, &mut scene, &mut timers, now);

        let fresh = render(&scene, now, 40, 20);
        assert_eq!(symbol_at(&fresh, 20, 10), "∘");

        let later = render(&scene, now + Duration::from_millis(300), 40, 20);
        let ring_cells = later.content.iter().filter(|c| c.symbol() == "○").count();
        assert!(ring_cells > 4);

        let done = render(&scene, now + Duration::from_millis(600), 40, 20);
        assert_eq!(done.content.iter().filter(|c| c.symbol() == "○").count(), 0);
    }

    #[test]
    fn follower_sprite_switches_when_moving() {
        let mut scene = Scene::new();
        let mut timers: Scheduler<CursorTimer> = Scheduler::new();
        let now = Instant::now();
        let mut cursor = CursorFollower::new(CursorSettings::default(), &mut scene, now);
        cursor.trail_enabled = false;
        cursor.on_pointer_move(10, 5, &mut scene, &mut timers, now);
        for _ in 0..200 {
            cursor.tick(&mut scene);
        }

        // sprite origin is (6, 3); head row starts with '/' while moving
        let buf = render(&scene, now, 30, 12);
        assert_eq!(symbol_at(&buf, 7, 3), "/");

        cursor.on_pointer_leave();
        cursor.tick(&mut scene);
        let buf = render(&scene, now, 30, 12);
        assert_eq!(symbol_at(&buf, 7, 3), "\\");
    }
}
