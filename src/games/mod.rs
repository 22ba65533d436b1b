//! Game trait and mode selection.

pub mod observe;
pub mod prime;

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::Frame;

use crate::input::{ClickState, InputEvent};
use crate::settings::Settings;

/// Trait that every mode implements.
pub trait Game {
    /// Handle an input event. Returns true if the event was consumed.
    fn handle_input(&mut self, event: &InputEvent) -> bool;

    /// Advance timers by `delta_ticks` discrete ticks.
    fn tick(&mut self, delta_ticks: u32);

    /// Render into the given area.
    fn render(&self, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>);
}

/// Which mode the player picked from the menu.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GameChoice {
    Prime,
    Observe,
}

impl GameChoice {
    pub const ALL: [GameChoice; 2] = [GameChoice::Prime, GameChoice::Observe];

    pub fn title(self) -> &'static str {
        match self {
            GameChoice::Prime => "素数の積ゲーム",
            GameChoice::Observe => "観察モード",
        }
    }

    pub fn summary(self) -> &'static str {
        match self {
            GameChoice::Prime => "素数を選んで積を1まで割り切ろう",
            GameChoice::Observe => "生成される積と因数分解を眺める",
        }
    }
}

/// Top-level application state.
pub enum AppState {
    Menu,
    Playing { game: Box<dyn Game> },
}

pub fn create_game(choice: GameChoice, settings: Settings) -> Box<dyn Game> {
    match choice {
        GameChoice::Prime => Box::new(prime::PrimeGame::new(settings)),
        GameChoice::Observe => Box::new(observe::ObserveGame::new(settings)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn created_games_accept_their_new_round_key() {
        for choice in GameChoice::ALL {
            let mut game = create_game(choice, Settings::default());
            assert!(game.handle_input(&InputEvent::Key(' ')), "{choice:?}");
            game.tick(1);
        }
    }
}
