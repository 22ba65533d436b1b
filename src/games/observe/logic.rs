//! Observation mode logic: timed round generation and pace/level controls.

use crate::games::prime::generator::{factorize_over, generate_round};
use crate::games::prime::level;
use crate::games::prime::state::HistoryEntry;
use crate::settings::{self, OBSERVE_INTERVAL_MAX, OBSERVE_INTERVAL_MIN};

use super::state::ObserveState;

/// Interval change per `+` / `-` press.
pub const INTERVAL_STEP: u32 = 5;

/// Show a fresh round now and restart the timer.
pub fn next_round(state: &mut ObserveState, now_ms: f64) {
    let round = generate_round(&state.level, state.rng.as_mut());
    let factorization = factorize_over(round.product, &state.level.available_primes);
    state.push_history(HistoryEntry {
        product: round.product,
        primes: round.primes.clone(),
        level: state.level.number,
        timestamp_ms: now_ms,
    });
    state.current = Some((round, factorization));
    state.rounds_shown += 1;
    state.countdown = state.interval();
}

pub fn tick(state: &mut ObserveState, delta_ticks: u32, now_ms: f64) {
    if state.paused {
        return;
    }
    if state.countdown <= delta_ticks {
        next_round(state, now_ms);
    } else {
        state.countdown -= delta_ticks;
    }
}

pub fn toggle_pause(state: &mut ObserveState) {
    state.paused = !state.paused;
}

/// Shorter interval, i.e. faster pace.
pub fn faster(state: &mut ObserveState) {
    let next = state.interval().saturating_sub(INTERVAL_STEP).max(OBSERVE_INTERVAL_MIN);
    set_interval(state, next);
}

pub fn slower(state: &mut ObserveState) {
    let next = (state.interval() + INTERVAL_STEP).min(OBSERVE_INTERVAL_MAX);
    set_interval(state, next);
}

fn set_interval(state: &mut ObserveState, ticks: u32) {
    if ticks == state.settings.observe_interval_ticks {
        return;
    }
    state.settings.observe_interval_ticks = ticks;
    state.countdown = state.countdown.min(ticks);
    settings::save(&state.settings);
}

/// Switch level; the next round is drawn right away.
pub fn set_level(state: &mut ObserveState, number: u32) {
    let Some(next) = level::level(number) else {
        return;
    };
    if next.number == state.level.number {
        return;
    }
    state.level = next;
    state.current = None;
    state.countdown = 0;
    state.settings.level = number;
    settings::save(&state.settings);
}
