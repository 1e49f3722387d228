pub mod scene_view;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::app::{App, CursorScreen, Screen, TrainerScreen};
use crate::trainer::Mark;
use scene_view::SceneView;

const HORIZONTAL_MARGIN: u16 = 5;

const CORRECT: Color = Color::Rgb(0x4a, 0x90, 0xe2);
const INCORRECT: Color = Color::Rgb(0xe9, 0x4f, 0x4f);
const INCORRECT_BG: Color = Color::Rgb(0xff, 0xea, 0xea);

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match &self.screen {
            Screen::Trainer(screen) => render_trainer(screen, area, buf),
            Screen::Cursor(screen) => render_cursor(screen, self.now(), area, buf),
        }
    }
}

fn render_trainer(screen: &TrainerScreen, area: Rect, buf: &mut Buffer) {
    let trainer = &screen.trainer;

    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let dim_bold_style = Style::default()
        .patch(bold_style)
        .add_modifier(Modifier::DIM);
    let correct_style = Style::default().patch(bold_style).fg(CORRECT);
    let incorrect_style = Style::default()
        .patch(bold_style)
        .fg(INCORRECT)
        .bg(INCORRECT_BG);
    let italic_style = Style::default().add_modifier(Modifier::ITALIC);

    let max_chars_per_line = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);
    let prompt_lines = if trainer.target.width() <= max_chars_per_line as usize {
        1
    } else {
        (trainer.target.width() as f64 / max_chars_per_line as f64).ceil() as u16 + 1
    };
    let padding = area.height.saturating_sub(prompt_lines + 6) / 2;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Length(padding),
            Constraint::Length(prompt_lines),
            Constraint::Length(1),
            Constraint::Length(1), // input
            Constraint::Length(1),
            Constraint::Length(1), // stats
            Constraint::Min(0),
            Constraint::Length(1), // legend
        ])
        .split(area);

    let spans = trainer
        .target
        .chars()
        .zip(trainer.marks.iter())
        .map(|(c, mark)| match mark {
            Mark::Neutral => Span::styled(c.to_string(), dim_bold_style),
            Mark::Correct => Span::styled(c.to_string(), correct_style),
            Mark::Incorrect => Span::styled(
                match c {
                    ' ' => "·".to_owned(),
                    c => c.to_string(),
                },
                incorrect_style,
            ),
        })
        .collect::<Vec<Span>>();

    Paragraph::new(Line::from(spans))
        .alignment(if prompt_lines == 1 {
            Alignment::Center
        } else {
            Alignment::Left
        })
        .wrap(Wrap { trim: true })
        .render(chunks[1], buf);

    let input_style = if screen.field.enabled {
        bold_style
    } else {
        dim_bold_style
    };
    let mut input = vec![Span::styled(screen.field.value().to_string(), input_style)];
    if screen.field.enabled {
        input.push(Span::styled("▏", bold_style));
    }
    Paragraph::new(Line::from(input))
        .alignment(Alignment::Center)
        .render(chunks[3], buf);

    let stats_style = if trainer.finished {
        Style::default().patch(bold_style).fg(Color::Green)
    } else {
        bold_style
    };
    Paragraph::new(Span::styled(
        format!("{}   {}", trainer.speed_label(), trainer.errors_label()),
        stats_style,
    ))
    .alignment(Alignment::Center)
    .render(chunks[5], buf);

    Paragraph::new(Span::styled("(tab) restart / (esc)ape", italic_style))
        .render(chunks[7], buf);
}

fn render_cursor(screen: &CursorScreen, now: std::time::Instant, area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);

    SceneView::new(&screen.scene, now)
        .trail_lifetime(screen.follower.settings.trail_lifetime)
        .render(chunks[0], buf);

    let legend = format!(
        "(t)rail {} / (g)low / (c)olour / (x) clear / (p)ause{} / (esc)ape",
        if screen.follower.trail_enabled {
            "on"
        } else {
            "off"
        },
        if screen.frames.is_running() { "" } else { " [paused]" },
    );
    Paragraph::new(Span::styled(
        legend,
        Style::default().add_modifier(Modifier::ITALIC),
    ))
    .render(chunks[1], buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::Config;
    use crate::corpus::Corpus;
    use crate::runtime::{AppEvent, MouseInput};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use ratatui::{backend::TestBackend, Terminal};

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn trainer_screen_shows_target_and_stats() {
        let app = App::trainer(
            Corpus::from_sentences(vec![]),
            Some("Дружба начинается с улыбки.".to_string()),
            Box::new(ManualClock::new()),
            StdRng::seed_from_u64(0),
        );

        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|f| f.render_widget(&app, f.area())).unwrap();

        let content = buffer_text(&terminal);
        assert!(content.contains("Дружба"));
        assert!(content.contains("Скорость: 0 зн/мин"));
        assert!(content.contains("Ошибки: 0"));
        assert!(content.contains("(tab) restart"));
    }

    #[test]
    fn incorrect_chars_are_styled_red() {
        let mut app = App::trainer(
            Corpus::from_sentences(vec![]),
            Some("ab".to_string()),
            Box::new(ManualClock::new()),
            StdRng::seed_from_u64(0),
        );
        app.handle(AppEvent::Key(KeyEvent::new(
            KeyCode::Char('x'),
            KeyModifiers::NONE,
        )));

        let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();
        terminal.draw(|f| f.render_widget(&app, f.area())).unwrap();

        let buffer = terminal.backend().buffer();
        let red = buffer
            .content
            .iter()
            .any(|c| c.symbol() == "a" && c.fg == INCORRECT);
        assert!(red);
        assert!(buffer_text(&terminal).contains("Ошибки: 1"));
    }

    #[test]
    fn finished_session_shows_marker() {
        let mut app = App::trainer(
            Corpus::from_sentences(vec![]),
            Some("a".to_string()),
            Box::new(ManualClock::new()),
            StdRng::seed_from_u64(0),
        );
        app.handle(AppEvent::Key(KeyEvent::new(
            KeyCode::Char('a'),
            KeyModifiers::NONE,
        )));

        let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();
        terminal.draw(|f| f.render_widget(&app, f.area())).unwrap();
        assert!(buffer_text(&terminal).contains("(Готово!)"));
    }

    #[test]
    fn cursor_screen_renders_sprite_and_legend() {
        let mut app = App::cursor(
            &Config::default(),
            Box::new(ManualClock::new()),
            StdRng::seed_from_u64(0),
        );
        app.handle(AppEvent::Mouse(MouseInput::Moved { x: 30, y: 10 }));
        for _ in 0..100 {
            app.handle(AppEvent::Tick);
        }

        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|f| f.render_widget(&app, f.area())).unwrap();

        let content = buffer_text(&terminal);
        assert!(content.contains("(o)"));
        assert!(content.contains("(t)rail on"));
    }

    #[test]
    fn tiny_area_does_not_panic() {
        let app = App::trainer(
            Corpus::from_sentences(vec![]),
            Some("a long sentence that will never fit in this area".to_string()),
            Box::new(ManualClock::new()),
            StdRng::seed_from_u64(0),
        );
        let mut terminal = Terminal::new(TestBackend::new(4, 3)).unwrap();
        terminal.draw(|f| f.render_widget(&app, f.area())).unwrap();
    }
}
