//! Prime product game: factor a generated product back into its primes.

pub mod actions;
pub mod generator;
pub mod level;
pub mod logic;
pub mod render;
pub mod session;
pub mod state;

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::Frame;

use crate::games::Game;
use crate::input::{ClickState, InputEvent, KEY_BACKSPACE, KEY_ENTER};
use crate::settings::Settings;
use crate::time;

use actions::*;
use state::PrimeState;

/// Keys for the 11th..15th prime (shifted 1..5).
const SHIFTED_DIGITS: [char; 5] = ['!', '@', '#', '$', '%'];

pub struct PrimeGame {
    pub state: PrimeState,
}

impl PrimeGame {
    pub fn new(settings: Settings) -> Self {
        Self {
            state: PrimeState::new(settings),
        }
    }

    #[cfg(test)]
    fn with_state(state: PrimeState) -> Self {
        Self { state }
    }

    fn handle_key(&mut self, key: char) -> bool {
        if let Some(idx) = prime_index_for_key(key) {
            // Keys past the level's last prime are swallowed without effect.
            if let Some(p) = self.state.prime_at(idx) {
                logic::pick_prime(&mut self.state, p);
            }
            return true;
        }
        match key {
            KEY_ENTER => {
                logic::submit(&mut self.state);
                true
            }
            KEY_BACKSPACE => {
                logic::deselect_last(&mut self.state);
                true
            }
            'c' => {
                logic::clear(&mut self.state);
                true
            }
            '?' => {
                logic::reveal(&mut self.state);
                true
            }
            ' ' => {
                logic::new_round(&mut self.state, time::now_ms());
                true
            }
            'l' => {
                logic::cycle_level(&mut self.state);
                true
            }
            'i' => {
                logic::toggle_instant(&mut self.state);
                true
            }
            'h' => {
                logic::toggle_history(&mut self.state);
                true
            }
            _ => false,
        }
    }

    fn handle_click(&mut self, action_id: u16) -> bool {
        if action_id == crate::BACK_TO_MENU {
            if self.state.show_history {
                self.state.show_history = false;
                return true;
            }
            return false;
        }

        match action_id {
            NEW_ROUND => logic::new_round(&mut self.state, time::now_ms()),
            SUBMIT => {
                logic::submit(&mut self.state);
            }
            CLEAR => logic::clear(&mut self.state),
            REVEAL => logic::reveal(&mut self.state),
            TOGGLE_INSTANT => logic::toggle_instant(&mut self.state),
            TOGGLE_HISTORY => logic::toggle_history(&mut self.state),
            id if (LEVEL_BASE..PRIME_BASE).contains(&id) => {
                logic::change_level(&mut self.state, (id - LEVEL_BASE) as u32);
            }
            id if (PRIME_BASE..DESELECT_BASE).contains(&id) => {
                match self.state.prime_at((id - PRIME_BASE) as usize) {
                    Some(p) => logic::pick_prime(&mut self.state, p),
                    None => return false,
                }
            }
            id if (DESELECT_BASE..NEW_ROUND).contains(&id) => {
                let pos = (id - DESELECT_BASE) as usize;
                match self.state.session.pending().get(pos).copied() {
                    Some(p) => logic::deselect(&mut self.state, p),
                    None => return false,
                }
            }
            _ => return false,
        }
        true
    }
}

/// `1`..`9`, `0` → primes 0..9; `!`..`%` → primes 10..14.
fn prime_index_for_key(key: char) -> Option<usize> {
    match key {
        '1'..='9' => Some(key as usize - '1' as usize),
        '0' => Some(9),
        _ => SHIFTED_DIGITS.iter().position(|&c| c == key).map(|i| 10 + i),
    }
}

impl Game for PrimeGame {
    fn handle_input(&mut self, event: &InputEvent) -> bool {
        match event {
            InputEvent::Key(c) => self.handle_key(*c),
            InputEvent::Click(id) => self.handle_click(*id),
        }
    }

    fn tick(&mut self, delta_ticks: u32) {
        logic::tick(&mut self.state, delta_ticks, time::now_ms());
    }

    fn render(&self, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
        render::render(&self.state, f, area, click_state);
    }
}
