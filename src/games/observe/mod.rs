//! Observation mode: watch generated products and their factorizations go by.

pub mod actions;
pub mod logic;
pub mod render;
pub mod state;

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::Frame;

use crate::games::Game;
use crate::input::{ClickState, InputEvent};
use crate::settings::Settings;
use crate::time;

use actions::*;
use state::ObserveState;

pub struct ObserveGame {
    pub state: ObserveState,
}

impl ObserveGame {
    pub fn new(settings: Settings) -> Self {
        Self {
            state: ObserveState::new(settings),
        }
    }

    fn handle_key(&mut self, key: char) -> bool {
        match key {
            ' ' => logic::next_round(&mut self.state, time::now_ms()),
            'p' => logic::toggle_pause(&mut self.state),
            '+' => logic::faster(&mut self.state),
            '-' => logic::slower(&mut self.state),
            '1'..='5' => logic::set_level(&mut self.state, key as u32 - '0' as u32),
            _ => return false,
        }
        true
    }

    fn handle_click(&mut self, action_id: u16) -> bool {
        match action_id {
            NEXT_ROUND => logic::next_round(&mut self.state, time::now_ms()),
            TOGGLE_PAUSE => logic::toggle_pause(&mut self.state),
            FASTER => logic::faster(&mut self.state),
            SLOWER => logic::slower(&mut self.state),
            id if (LEVEL_BASE..NEXT_ROUND).contains(&id) => {
                logic::set_level(&mut self.state, (id - LEVEL_BASE) as u32);
            }
            _ => return false,
        }
        true
    }
}

impl Game for ObserveGame {
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
