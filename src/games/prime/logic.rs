//! Factorization game controller: forwards player actions to the session and
//! turns each outcome into feedback, history, and countdown updates.

use crate::settings::{self, Settings};
use crate::time::secs_to_ticks;

use super::generator::generate_round;
use super::level::{self, catalog};
use super::session::{join_factors, RejectReason, SelectionStatus, SessionPhase, SubmitResult};
use super::state::{FeedbackKind, HistoryEntry, PrimeState};

/// Generate a round for the current level and start it.
pub fn new_round(state: &mut PrimeState, now_ms: f64) {
    let round = generate_round(&state.level, state.rng.as_mut());
    state.push_history(HistoryEntry {
        product: round.product,
        primes: round.primes.clone(),
        level: state.level.number,
        timestamp_ms: now_ms,
    });
    let product = round.product;
    let is_fallback = round.is_fallback;
    state.session.start(round);
    state.advance_countdown = None;
    state.add_log(&format!("🔄 新しい問題: {product}"), FeedbackKind::Info);
    if is_fallback {
        state.add_log("⚠️ 条件に合う積を作れなかったため既定の問題です", FeedbackKind::Error);
    }
}

/// A prime button press. In instant mode the pick is submitted right away.
pub fn pick_prime(state: &mut PrimeState, prime: u64) {
    if !state.level.contains_prime(prime) {
        return;
    }
    if select(state, prime) && state.settings.instant_divide {
        submit(state);
    }
}

/// Returns true if the selection changed.
pub fn select(state: &mut PrimeState, prime: u64) -> bool {
    match state.session.select_factor(prime) {
        SelectionStatus::Updated => {
            if !state.settings.instant_divide {
                state.add_log(&format!("✏️ {prime} を選択"), FeedbackKind::Info);
            }
            true
        }
        SelectionStatus::Unchanged | SelectionStatus::NotActive => false,
    }
}

pub fn deselect(state: &mut PrimeState, prime: u64) {
    if state.session.deselect_factor(prime) == SelectionStatus::Updated {
        state.add_log(&format!("🗑️ {prime} を取り消し"), FeedbackKind::Info);
    }
}

/// Undo the largest pending pick.
pub fn deselect_last(state: &mut PrimeState) {
    if let Some(&last) = state.session.pending().last() {
        deselect(state, last);
    }
}

pub fn clear(state: &mut PrimeState) {
    if state.session.clear_selection() == SelectionStatus::Updated {
        state.add_log("🗑️ 全選択をクリア", FeedbackKind::Info);
    }
}

pub fn submit(state: &mut PrimeState) -> SubmitResult {
    let pending = state.session.pending().to_vec();
    let result = state.session.submit();
    match result {
        SubmitResult::Applied { new_value } => {
            state.add_log(
                &format!("✅ {} = {new_value}", division_text(&pending)),
                FeedbackKind::Success,
            );
        }
        SubmitResult::Complete { is_correct: true } => {
            state.rounds_solved += 1;
            state.add_log(
                &format!("✅ {} = 1", division_text(&pending)),
                FeedbackKind::Success,
            );
            state.add_log("🎉 因数分解完了！おめでとう！", FeedbackKind::Success);
            schedule_advance(state);
        }
        SubmitResult::Complete { is_correct: false } => {
            state.add_log(
                "⚠️ 1 になりましたが、正解の因数分解と一致しません",
                FeedbackKind::Error,
            );
            schedule_advance(state);
        }
        SubmitResult::Invalid(RejectReason::ExcessFactor) => {
            state.add_log(
                &format!("❌ {} は使える因数を超えています", join_factors(&pending)),
                FeedbackKind::Error,
            );
        }
        SubmitResult::Invalid(RejectReason::NotDivisible) => {
            state.add_log(
                &format!(
                    "❌ {} は {} で割り切れません",
                    state.session.current_value(),
                    join_factors(&pending)
                ),
                FeedbackKind::Error,
            );
        }
        SubmitResult::NothingSelected | SubmitResult::NotActive => {}
    }
    result
}

fn division_text(divisors: &[u64]) -> String {
    match divisors {
        [single] => format!("÷{single}"),
        many => format!(
            "÷({})",
            many.iter().map(|d| d.to_string()).collect::<Vec<_>>().join("×")
        ),
    }
}

fn schedule_advance(state: &mut PrimeState) {
    let ticks = secs_to_ticks(state.settings.auto_advance_secs);
    state.advance_countdown = (ticks > 0).then_some(ticks);
}

pub fn reveal(state: &mut PrimeState) {
    if state.session.phase() != SessionPhase::InProgress {
        return;
    }
    if let Some(primes) = state.session.reveal_answer() {
        state.rounds_revealed += 1;
        let product = state.session.original_product().unwrap_or_default();
        state.add_log(
            &format!("💡 正解: {product} = {}", join_factors(&primes)),
            FeedbackKind::Info,
        );
    }
}

/// Switch level; the current round is discarded.
pub fn change_level(state: &mut PrimeState, number: u32) {
    let Some(next) = level::level(number) else {
        return;
    };
    if next.number == state.level.number {
        return;
    }
    state.level = next;
    state.session.reset();
    state.advance_countdown = None;
    let desc = state.level.description();
    state.add_log(&desc, FeedbackKind::Info);
    update_settings(state, |s| s.level = number);
}

pub fn cycle_level(state: &mut PrimeState) {
    let count = catalog().len() as u32;
    let next = state.level.number % count + 1;
    change_level(state, next);
}

pub fn toggle_instant(state: &mut PrimeState) {
    let on = !state.settings.instant_divide;
    state.session.clear_selection();
    update_settings(state, |s| s.instant_divide = on);
    let msg = if on {
        "⚡ 即時割り算: ON（素数を押すとすぐに割ります）"
    } else {
        "⚡ 即時割り算: OFF（選んでから解答します）"
    };
    state.add_log(msg, FeedbackKind::Info);
}

pub fn toggle_history(state: &mut PrimeState) {
    state.show_history = !state.show_history;
}

fn update_settings(state: &mut PrimeState, f: impl FnOnce(&mut Settings)) {
    f(&mut state.settings);
    settings::save(&state.settings);
}

/// Count down the auto-advance timer; starts the next round when it expires.
pub fn tick(state: &mut PrimeState, delta_ticks: u32, now_ms: f64) {
    let Some(left) = state.advance_countdown else {
        return;
    };
    if left <= delta_ticks {
        new_round(state, now_ms);
    } else {
        state.advance_countdown = Some(left - delta_ticks);
    }
}
