//! Retained display surface.
//!
//! Widgets create, move, restyle and remove elements here; the UI layer
//! only reads it back to draw. Every mutation on an element that is no
//! longer attached is a silent no-op reporting `false`.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::time::{Duration, Instant};

use ratatui::style::Color;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: Point) -> f64 {
        ((other.x - self.x).powi(2) + (other.y - self.y).powi(2)).sqrt()
    }
}

impl From<(u16, u16)> for Point {
    fn from(v: (u16, u16)) -> Self {
        Point::new(v.0 as f64, v.1 as f64)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementKind {
    Follower,
    TrailDot,
    Ripple,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ElementStyle {
    pub tint: Color,
    pub glow: bool,
}

impl Default for ElementStyle {
    fn default() -> Self {
        Self {
            tint: Color::White,
            glow: false,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Element {
    pub kind: ElementKind,
    /// Top-left cell for the follower, center cell for effects
    pub position: Point,
    pub created_at: Instant,
    pub classes: BTreeSet<&'static str>,
    pub style: ElementStyle,
}

impl Element {
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.created_at)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frame {
    pub scale: f64,
    pub opacity: f64,
}

/// Two-stop animation sampled with an ease-out curve
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Keyframes {
    pub from: Frame,
    pub to: Frame,
    pub duration: Duration,
}

impl Keyframes {
    pub fn sample(&self, elapsed: Duration) -> Frame {
        let t = if self.duration.is_zero() {
            1.0
        } else {
            (elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
        };
        let eased = 1.0 - (1.0 - t).powi(2);
        Frame {
            scale: self.from.scale + (self.to.scale - self.from.scale) * eased,
            opacity: self.from.opacity + (self.to.opacity - self.from.opacity) * eased,
        }
    }
}

#[derive(Debug, Default)]
pub struct Scene {
    elements: BTreeMap<ElementId, Element>,
    keyframes: HashMap<String, Keyframes>,
    next_id: u64,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self, kind: ElementKind, position: Point, now: Instant) -> ElementId {
        let id = ElementId(self.next_id);
        self.next_id += 1;
        self.elements.insert(
            id,
            Element {
                kind,
                position,
                created_at: now,
                classes: BTreeSet::new(),
                style: ElementStyle::default(),
            },
        );
        id
    }

    pub fn remove(&mut self, id: ElementId) -> bool {
        self.elements.remove(&id).is_some()
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(&id)
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }

    pub fn set_position(&mut self, id: ElementId, position: Point) -> bool {
        match self.elements.get_mut(&id) {
            Some(el) => {
                el.position = position;
                true
            }
            None => false,
        }
    }

    pub fn set_class(&mut self, id: ElementId, class: &'static str, on: bool) -> bool {
        match self.elements.get_mut(&id) {
            Some(el) => {
                if on {
                    el.classes.insert(class);
                } else {
                    el.classes.remove(class);
                }
                true
            }
            None => false,
        }
    }

    pub fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.elements
            .get(&id)
            .is_some_and(|el| el.classes.contains(class))
    }

    pub fn set_style(&mut self, id: ElementId, style: ElementStyle) -> bool {
        match self.elements.get_mut(&id) {
            Some(el) => {
                el.style = style;
                true
            }
            None => false,
        }
    }

    /// Registers a named animation the first time it is seen. Returns
    /// whether this call did the registration.
    pub fn ensure_keyframes(&mut self, name: &str, keyframes: Keyframes) -> bool {
        if self.keyframes.contains_key(name) {
            return false;
        }
        self.keyframes.insert(name.to_string(), keyframes);
        true
    }

    pub fn keyframes(&self, name: &str) -> Option<&Keyframes> {
        self.keyframes.get(name)
    }

    pub fn count(&self, kind: ElementKind) -> usize {
        self.elements.values().filter(|el| el.kind == kind).count()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Elements in creation order, oldest first
    pub fn iter(&self) -> impl Iterator<Item = (ElementId, &Element)> {
        self.elements.iter().map(|(id, el)| (*id, el))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ripple() -> Keyframes {
        Keyframes {
            from: Frame {
                scale: 0.0,
                opacity: 1.0,
            },
            to: Frame {
                scale: 10.0,
                opacity: 0.0,
            },
            duration: Duration::from_millis(600),
        }
    }

    #[test]
    fn create_and_remove() {
        let mut scene = Scene::new();
        let now = Instant::now();
        let a = scene.create(ElementKind::TrailDot, Point::new(1.0, 2.0), now);
        let b = scene.create(ElementKind::Ripple, Point::new(3.0, 4.0), now);

        assert_ne!(a, b);
        assert_eq!(scene.len(), 2);
        assert_eq!(scene.count(ElementKind::TrailDot), 1);
        assert!(scene.remove(a));
        assert!(!scene.remove(a));
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn ids_are_not_reused() {
        let mut scene = Scene::new();
        let now = Instant::now();
        let a = scene.create(ElementKind::TrailDot, Point::ORIGIN, now);
        scene.remove(a);
        let b = scene.create(ElementKind::TrailDot, Point::ORIGIN, now);
        assert_ne!(a, b);
    }

    #[test]
    fn detached_element_mutations_are_noops() {
        let mut scene = Scene::new();
        let id = scene.create(ElementKind::Follower, Point::ORIGIN, Instant::now());
        scene.remove(id);

        assert!(!scene.set_position(id, Point::new(5.0, 5.0)));
        assert!(!scene.set_class(id, "moving", true));
        assert!(!scene.has_class(id, "moving"));
        assert!(!scene.set_style(id, ElementStyle::default()));
        assert!(scene.is_empty());
    }

    #[test]
    fn classes_toggle() {
        let mut scene = Scene::new();
        let id = scene.create(ElementKind::Follower, Point::ORIGIN, Instant::now());

        scene.set_class(id, "moving", true);
        scene.set_class(id, "moving", true);
        assert!(scene.has_class(id, "moving"));
        scene.set_class(id, "moving", false);
        assert!(!scene.has_class(id, "moving"));
    }

    #[test]
    fn keyframes_register_once() {
        let mut scene = Scene::new();
        assert!(scene.ensure_keyframes("click-ripple", ripple()));

        let mut other = ripple();
        other.duration = Duration::from_secs(5);
        assert!(!scene.ensure_keyframes("click-ripple", other));
        assert_eq!(
            scene.keyframes("click-ripple").map(|k| k.duration),
            Some(Duration::from_millis(600))
        );
    }

    #[test]
    fn keyframes_sample_endpoints_and_clamp() {
        let k = ripple();
        assert_eq!(k.sample(Duration::ZERO), k.from);
        assert_eq!(k.sample(Duration::from_millis(600)), k.to);
        assert_eq!(k.sample(Duration::from_secs(3)), k.to);

        let mid = k.sample(Duration::from_millis(300));
        // ease-out: past the halfway mark at half time
        assert!(mid.scale > 5.0 && mid.scale < 10.0);
        assert!(mid.opacity < 0.5 && mid.opacity > 0.0);
    }

    #[test]
    fn iter_is_creation_ordered() {
        let mut scene = Scene::new();
        let now = Instant::now();
        let ids: Vec<_> = (0..4)
            .map(|i| scene.create(ElementKind::TrailDot, Point::new(i as f64, 0.0), now))
            .collect();
        let seen: Vec<_> = scene.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, seen);
    }
}
