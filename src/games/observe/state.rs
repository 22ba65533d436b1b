//! Observation mode state: rounds appear on a timer and are shown solved.

use crate::games::prime::generator::{Factorization, Lcg, RandomSource, Round};
use crate::games::prime::level::{self, Level};
use crate::games::prime::state::{HistoryEntry, HISTORY_CAP};
use crate::settings::Settings;

pub struct ObserveState {
    pub settings: Settings,
    pub level: Level,
    pub rng: Box<dyn RandomSource>,
    /// Round on display and its factorization over the level primes.
    pub current: Option<(Round, Factorization)>,
    pub history: Vec<HistoryEntry>,
    pub paused: bool,
    /// Ticks until the next round.
    pub countdown: u32,
    pub rounds_shown: u32,
}

impl ObserveState {
    pub fn new(settings: Settings) -> Self {
        Self::with_rng(settings, Box::new(Lcg::from_entropy()))
    }

    pub fn with_rng(settings: Settings, rng: Box<dyn RandomSource>) -> Self {
        let settings = settings.sanitized();
        let level = level::level(settings.level).unwrap_or_else(level::default_level);
        Self {
            countdown: 0,
            settings,
            level,
            rng,
            current: None,
            history: Vec::new(),
            paused: false,
            rounds_shown: 0,
        }
    }

    pub fn interval(&self) -> u32 {
        self.settings.observe_interval_ticks
    }

    pub fn push_history(&mut self, entry: HistoryEntry) {
        self.history.insert(0, entry);
        self.history.truncate(HISTORY_CAP);
    }
}
