use std::rc::Rc;

use rand::rngs::StdRng;
use rand::SeedableRng;

use reptype::app::{App, CursorScreen, Screen};
use reptype::clock::ManualClock;
use reptype::config::Config;
use reptype::cursor::MOVING_CLASS;
use reptype::runtime::{AppEvent, MouseInput};
use reptype::scene::{ElementKind, Point};

fn cursor(app: &App) -> &CursorScreen {
    match &app.screen {
        Screen::Cursor(s) => s,
        Screen::Trainer(_) => panic!("expected cursor screen"),
    }
}

fn cursor_app() -> (App, Rc<ManualClock>) {
    let clock = Rc::new(ManualClock::new());
    let app = App::cursor(
        &Config::default(),
        Box::new(Rc::clone(&clock)),
        StdRng::seed_from_u64(3),
    );
    (app, clock)
}

/// Simulates a drag across the screen at ~60fps and checks the trail
/// never holds dots older than their lifetime.
#[test]
fn trail_is_bounded_by_lifetime() {
    let (mut app, clock) = cursor_app();

    for step in 0..180u16 {
        app.handle(AppEvent::Mouse(MouseInput::Moved { x: step % 80, y: 10 }));
        clock.advance_ms(16);
        app.handle(AppEvent::Tick);
    }

    let screen = cursor(&app);
    let now = app.now();
    let dots: Vec<_> = screen
        .scene
        .iter()
        .filter(|(_, el)| el.kind == ElementKind::TrailDot)
        .map(|(_, el)| el.age(now))
        .collect();
    assert!(!dots.is_empty());
    assert!(dots.iter().all(|age| age.as_millis() < 1000));
    // 1000ms / 16ms per move
    assert!(dots.len() <= 63);
}

#[test]
fn follower_settles_on_pointer_then_goes_idle() {
    let (mut app, clock) = cursor_app();
    app.handle(AppEvent::Mouse(MouseInput::Moved { x: 50, y: 20 }));

    for _ in 0..120 {
        clock.advance_ms(16);
        app.handle(AppEvent::Tick);
    }

    let screen = cursor(&app);
    assert!(screen.follower.display.distance(Point::new(50.0, 20.0)) < 0.01);
    assert!(!screen.follower.is_moving);
    let id = screen.follower.follower().unwrap();
    assert!(!screen.scene.has_class(id, MOVING_CLASS));
    assert_eq!(screen.scene.count(ElementKind::TrailDot), 0);
}

#[test]
fn click_pulse_and_ripple_expire() {
    let (mut app, clock) = cursor_app();
    app.handle(AppEvent::Mouse(MouseInput::Click { x: 5, y: 5 }));
    let id = cursor(&app).follower.follower().unwrap();
    assert!(cursor(&app).scene.has_class(id, MOVING_CLASS));

    clock.advance_ms(300);
    app.handle(AppEvent::Tick);
    assert!(!cursor(&app).scene.has_class(id, MOVING_CLASS));
    assert_eq!(cursor(&app).scene.count(ElementKind::Ripple), 1);

    clock.advance_ms(300);
    app.handle(AppEvent::Tick);
    assert_eq!(cursor(&app).scene.count(ElementKind::Ripple), 0);
}

#[test]
fn resize_keeps_target() {
    let (mut app, _) = cursor_app();
    app.handle(AppEvent::Mouse(MouseInput::Moved { x: 12, y: 7 }));
    app.handle(AppEvent::Resize(200, 60));
    assert_eq!(cursor(&app).follower.pointer, Point::new(12.0, 7.0));
}
