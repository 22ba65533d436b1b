//! Presentation-side state of the factorization game.

use crate::settings::Settings;

use super::generator::{Lcg, RandomSource};
use super::level::{self, Level};
use super::session::FactorizationSession;

/// History is kept most-recent-first and capped.
pub const HISTORY_CAP: usize = 10;
pub const LOG_CAP: usize = 30;

/// One generated round, for the history panel.
#[derive(Clone, Debug, PartialEq)]
pub struct HistoryEntry {
    pub product: u64,
    pub primes: Vec<u64>,
    pub level: u32,
    pub timestamp_ms: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FeedbackKind {
    Info,
    Success,
    Error,
}

#[derive(Clone, Debug)]
pub struct Feedback {
    pub text: String,
    pub kind: FeedbackKind,
}

pub struct PrimeState {
    pub settings: Settings,
    pub level: Level,
    pub session: FactorizationSession,
    pub rng: Box<dyn RandomSource>,
    pub history: Vec<HistoryEntry>,
    pub log: Vec<Feedback>,
    pub show_history: bool,
    /// Ticks left before the next round starts on its own.
    pub advance_countdown: Option<u32>,
    pub rounds_solved: u32,
    pub rounds_revealed: u32,
}

impl PrimeState {
    pub fn new(settings: Settings) -> Self {
        Self::with_rng(settings, Box::new(Lcg::from_entropy()))
    }

    pub fn with_rng(settings: Settings, rng: Box<dyn RandomSource>) -> Self {
        let level = level::level(settings.level).unwrap_or_else(level::default_level);
        Self {
            settings,
            level,
            session: FactorizationSession::new(),
            rng,
            history: Vec::new(),
            log: vec![Feedback {
                text: "素数の積を生成してください [Space]".into(),
                kind: FeedbackKind::Info,
            }],
            show_history: false,
            advance_countdown: None,
            rounds_solved: 0,
            rounds_revealed: 0,
        }
    }

    pub fn add_log(&mut self, text: &str, kind: FeedbackKind) {
        self.log.push(Feedback {
            text: text.to_string(),
            kind,
        });
        if self.log.len() > LOG_CAP {
            self.log.remove(0);
        }
    }

    pub fn push_history(&mut self, entry: HistoryEntry) {
        self.history.insert(0, entry);
        self.history.truncate(HISTORY_CAP);
    }

    /// The `n`-th prime button of the current level (0-based).
    pub fn prime_at(&self, n: usize) -> Option<u64> {
        self.level.available_primes.get(n).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::prime::generator::Lcg;

    fn state() -> PrimeState {
        PrimeState::with_rng(Settings::default(), Box::new(Lcg::new(1)))
    }

    #[test]
    fn initial_state() {
        let s = state();
        assert_eq!(s.level.number, 1);
        assert!(s.history.is_empty());
        assert_eq!(s.log.len(), 1);
        assert!(s.advance_countdown.is_none());
    }

    #[test]
    fn level_comes_from_settings() {
        let settings = Settings {
            level: 5,
            ..Settings::default()
        };
        let s = PrimeState::with_rng(settings, Box::new(Lcg::new(1)));
        assert_eq!(s.level.number, 5);
        assert_eq!(s.prime_at(14), Some(47));
        assert_eq!(s.prime_at(15), None);
    }

    #[test]
    fn unknown_level_in_settings_uses_default() {
        let settings = Settings {
            level: 77,
            ..Settings::default()
        };
        let s = PrimeState::with_rng(settings, Box::new(Lcg::new(1)));
        assert_eq!(s.level.number, 1);
    }

    #[test]
    fn history_is_most_recent_first_and_capped() {
        let mut s = state();
        for i in 0..15u64 {
            s.push_history(HistoryEntry {
                product: i,
                primes: vec![],
                level: 1,
                timestamp_ms: 0.0,
            });
        }
        assert_eq!(s.history.len(), HISTORY_CAP);
        assert_eq!(s.history[0].product, 14);
        assert_eq!(s.history[HISTORY_CAP - 1].product, 5);
    }

    #[test]
    fn log_truncation() {
        let mut s = state();
        for i in 0..40 {
            s.add_log(&format!("msg {i}"), FeedbackKind::Info);
        }
        assert_eq!(s.log.len(), LOG_CAP);
        assert_eq!(s.log.last().unwrap().text, "msg 39");
    }
}
