use rand::Rng;
use std::time::Instant;

use crate::corpus::Corpus;

pub const DONE_MARKER: &str = " (Готово!)";

/// How a single target character is shown
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mark {
    Neutral,
    Correct,
    Incorrect,
}

/// One attempt at typing a sentence from the corpus
#[derive(Debug)]
pub struct Trainer {
    corpus: Corpus,
    pub target: String,
    pub input: String,
    pub started_at: Option<Instant>,
    pub error_count: usize,
    pub finished: bool,
    /// characters per minute
    pub speed: u64,
    pub marks: Vec<Mark>,
    pub input_enabled: bool,
}

impl Trainer {
    pub fn new(corpus: Corpus) -> Self {
        Self {
            corpus,
            target: String::new(),
            input: String::new(),
            started_at: None,
            error_count: 0,
            finished: false,
            speed: 0,
            marks: Vec::new(),
            input_enabled: false,
        }
    }

    pub fn start_test<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let target = self.corpus.choose(rng).to_string();
        self.start_with(target);
    }

    pub fn start_with(&mut self, target: String) {
        self.marks = vec![Mark::Neutral; target.chars().count()];
        self.target = target;
        self.input.clear();
        self.started_at = None;
        self.error_count = 0;
        self.finished = false;
        self.speed = 0;
        self.input_enabled = true;
        tracing::info!(len = self.marks.len(), "typing session started");
    }

    pub fn restart<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.start_test(rng);
    }

    pub fn on_input_changed(&mut self, value: &str, now: Instant) {
        if self.finished {
            return;
        }
        let started_at = *self.started_at.get_or_insert(now);

        let mut typed = value.chars();
        let mut errors = 0;
        for (mark, expected) in self.marks.iter_mut().zip(self.target.chars()) {
            *mark = match typed.next() {
                None => Mark::Neutral,
                Some(c) if c == expected => Mark::Correct,
                Some(_) => {
                    errors += 1;
                    Mark::Incorrect
                }
            };
        }
        self.error_count = errors;
        self.input = value.to_string();

        let elapsed_ms = now.saturating_duration_since(started_at).as_millis();
        self.speed = speed_cpm(value.chars().count(), elapsed_ms);

        if value == self.target {
            self.finished = true;
            self.input_enabled = false;
            tracing::info!(
                speed = self.speed,
                errors = self.error_count,
                "typing session finished"
            );
        }
    }

    pub fn has_started(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn speed_label(&self) -> String {
        let mut label = format!("Скорость: {} зн/мин", self.speed);
        if self.finished {
            label.push_str(DONE_MARKER);
        }
        label
    }

    pub fn errors_label(&self) -> String {
        format!("Ошибки: {}", self.error_count)
    }
}

/// Characters per minute; zero elapsed time reports zero
pub fn speed_cpm(chars: usize, elapsed_ms: u128) -> u64 {
    if elapsed_ms == 0 {
        return 0;
    }
    let minutes = elapsed_ms as f64 / 60_000.0;
    (chars as f64 / minutes).round() as u64
}

/// Single-line text input that can be locked
#[derive(Debug, Default)]
pub struct TextField {
    value: String,
    pub enabled: bool,
}

impl TextField {
    pub fn new() -> Self {
        Self {
            value: String::new(),
            enabled: true,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns the new value when the edit went through
    pub fn insert(&mut self, c: char) -> Option<&str> {
        if !self.enabled {
            return None;
        }
        self.value.push(c);
        Some(&self.value)
    }

    pub fn backspace(&mut self) -> Option<&str> {
        if !self.enabled {
            return None;
        }
        self.value.pop()?;
        Some(&self.value)
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }
}
