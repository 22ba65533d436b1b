//! Player-interaction state machine for one round.
//!
//! The player collects primes into a pending selection and submits it; a
//! legal submission divides the current value by the selection's product.
//! Reaching 1 completes the round, after which the applied factors are
//! checked against the round's ground truth.

use std::collections::BTreeMap;

use super::generator::{product_of, Round};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    /// No round loaded.
    Idle,
    InProgress,
    /// Current value reached 1; selections are locked.
    Complete,
    /// Answer was shown; selections are locked until the next `start`.
    Revealed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RejectReason {
    /// Some prime would be used more often than it occurs in the round.
    ExcessFactor,
    /// The current value is not divisible by the selection's product.
    NotDivisible,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitResult {
    Applied { new_value: u64 },
    Complete { is_correct: bool },
    Invalid(RejectReason),
    NothingSelected,
    NotActive,
}

/// Outcome of select / deselect / clear.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionStatus {
    Updated,
    Unchanged,
    NotActive,
}

#[derive(Clone, Debug)]
pub struct FactorizationSession {
    round: Option<Round>,
    phase: SessionPhase,
    current_value: u64,
    pending: Vec<u64>,
    applied: Vec<u64>,
}

impl Default for FactorizationSession {
    fn default() -> Self {
        Self::new()
    }
}

impl FactorizationSession {
    pub fn new() -> Self {
        Self {
            round: None,
            phase: SessionPhase::Idle,
            current_value: 0,
            pending: Vec::new(),
            applied: Vec::new(),
        }
    }

    /// Load a round, discarding whatever state the previous one left behind.
    pub fn start(&mut self, round: Round) {
        self.current_value = round.product;
        self.pending.clear();
        self.applied.clear();
        self.phase = SessionPhase::InProgress;
        self.round = Some(round);
    }

    /// Drop the round and return to `Idle`.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn select_factor(&mut self, prime: u64) -> SelectionStatus {
        if self.phase != SessionPhase::InProgress {
            return SelectionStatus::NotActive;
        }
        let at = self.pending.partition_point(|&p| p <= prime);
        self.pending.insert(at, prime);
        SelectionStatus::Updated
    }

    /// Remove one occurrence of `prime` from the pending selection.
    pub fn deselect_factor(&mut self, prime: u64) -> SelectionStatus {
        if self.phase != SessionPhase::InProgress {
            return SelectionStatus::NotActive;
        }
        match self.pending.iter().position(|&p| p == prime) {
            Some(idx) => {
                self.pending.remove(idx);
                SelectionStatus::Updated
            }
            None => SelectionStatus::Unchanged,
        }
    }

    pub fn clear_selection(&mut self) -> SelectionStatus {
        if self.phase != SessionPhase::InProgress {
            return SelectionStatus::NotActive;
        }
        if self.pending.is_empty() {
            return SelectionStatus::Unchanged;
        }
        self.pending.clear();
        SelectionStatus::Updated
    }

    /// Divide the current value by the pending selection. The selection is
    /// cleared whatever the outcome.
    pub fn submit(&mut self) -> SubmitResult {
        if self.phase != SessionPhase::InProgress {
            return SubmitResult::NotActive;
        }
        if self.pending.is_empty() {
            return SubmitResult::NothingSelected;
        }
        let pending = std::mem::take(&mut self.pending);
        let Some(round) = &self.round else {
            return SubmitResult::NotActive;
        };

        if exceeds_multiplicity(&round.primes, &self.applied, &pending) {
            return SubmitResult::Invalid(RejectReason::ExcessFactor);
        }
        let divisor = match product_of(&pending) {
            Some(d) if self.current_value % d == 0 => d,
            _ => return SubmitResult::Invalid(RejectReason::NotDivisible),
        };

        self.current_value /= divisor;
        self.applied.extend(pending);

        if self.current_value == 1 {
            self.phase = SessionPhase::Complete;
            return SubmitResult::Complete {
                is_correct: self.validate().unwrap_or(false),
            };
        }
        SubmitResult::Applied {
            new_value: self.current_value,
        }
    }

    /// Whether the applied factors are exactly the round's primes. `None`
    /// until the current value has reached 1.
    pub fn validate(&self) -> Option<bool> {
        let round = self.round.as_ref()?;
        if self.current_value != 1 {
            return None;
        }
        let mut applied = self.applied.clone();
        applied.sort_unstable();
        let mut truth = round.primes.clone();
        truth.sort_unstable();
        Some(applied == truth)
    }

    /// Ground-truth primes of the loaded round. Locks selection for the rest
    /// of an in-progress round; a completed round stays `Complete`.
    pub fn reveal_answer(&mut self) -> Option<Vec<u64>> {
        let round = self.round.as_ref()?;
        if self.phase == SessionPhase::InProgress {
            self.phase = SessionPhase::Revealed;
            self.pending.clear();
        }
        Some(round.primes.clone())
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    pub fn original_product(&self) -> Option<u64> {
        self.round.as_ref().map(|r| r.product)
    }

    pub fn current_value(&self) -> u64 {
        self.current_value
    }

    pub fn pending(&self) -> &[u64] {
        &self.pending
    }

    pub fn applied(&self) -> &[u64] {
        &self.applied
    }

    pub fn is_completed(&self) -> bool {
        self.phase == SessionPhase::Complete
    }

    /// `12 ÷ (2) = 6` while in progress, `12 = 2 × 2 × 3` once complete.
    pub fn progress_line(&self) -> Option<String> {
        let original = self.original_product()?;
        if self.applied.is_empty() {
            return None;
        }
        let trace = join_factors(&self.applied);
        if self.current_value == 1 {
            Some(format!("{original} = {trace}"))
        } else {
            Some(format!("{original} ÷ ({trace}) = {}", self.current_value))
        }
    }
}

/// Whether `applied ++ pending` uses some prime more often than `truth`.
fn exceeds_multiplicity(truth: &[u64], applied: &[u64], pending: &[u64]) -> bool {
    let mut remaining: BTreeMap<u64, usize> = BTreeMap::new();
    for &p in truth {
        *remaining.entry(p).or_default() += 1;
    }
    for &p in applied.iter().chain(pending) {
        match remaining.get_mut(&p) {
            Some(n) if *n > 0 => *n -= 1,
            _ => return true,
        }
    }
    false
}

pub fn join_factors(factors: &[u64]) -> String {
    factors
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join(" × ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round(primes: &[u64]) -> Round {
        Round::new(primes.to_vec()).unwrap()
    }

    fn started(primes: &[u64]) -> FactorizationSession {
        let mut s = FactorizationSession::new();
        s.start(round(primes));
        s
    }

    #[test]
    fn new_session_is_idle() {
        let s = FactorizationSession::new();
        assert_eq!(s.phase(), SessionPhase::Idle);
        assert_eq!(s.original_product(), None);
        assert!(s.progress_line().is_none());
    }

    #[test]
    fn idle_operations_are_not_active() {
        let mut s = FactorizationSession::new();
        assert_eq!(s.select_factor(2), SelectionStatus::NotActive);
        assert_eq!(s.deselect_factor(2), SelectionStatus::NotActive);
        assert_eq!(s.clear_selection(), SelectionStatus::NotActive);
        assert_eq!(s.submit(), SubmitResult::NotActive);
        assert_eq!(s.validate(), None);
        assert_eq!(s.reveal_answer(), None);
        assert!(s.pending().is_empty());
    }

    #[test]
    fn start_initializes_state() {
        let s = started(&[2, 2, 3]);
        assert_eq!(s.phase(), SessionPhase::InProgress);
        assert_eq!(s.original_product(), Some(12));
        assert_eq!(s.current_value(), 12);
        assert!(s.pending().is_empty());
        assert!(s.applied().is_empty());
    }

    #[test]
    fn selection_is_kept_sorted_with_duplicates() {
        let mut s = started(&[2, 2, 3]);
        s.select_factor(3);
        s.select_factor(2);
        s.select_factor(2);
        assert_eq!(s.pending(), &[2, 2, 3]);
    }

    #[test]
    fn deselect_removes_one_occurrence() {
        let mut s = started(&[2, 2, 3]);
        s.select_factor(2);
        s.select_factor(2);
        assert_eq!(s.deselect_factor(2), SelectionStatus::Updated);
        assert_eq!(s.pending(), &[2]);
    }

    #[test]
    fn deselect_missing_prime_leaves_state_unchanged() {
        let mut s = started(&[2, 2, 3]);
        s.select_factor(3);
        assert_eq!(s.deselect_factor(5), SelectionStatus::Unchanged);
        assert_eq!(s.pending(), &[3]);
        assert_eq!(s.current_value(), 12);
    }

    #[test]
    fn clear_selection_empties_pending() {
        let mut s = started(&[2, 2, 3]);
        assert_eq!(s.clear_selection(), SelectionStatus::Unchanged);
        s.select_factor(2);
        s.select_factor(3);
        assert_eq!(s.clear_selection(), SelectionStatus::Updated);
        assert!(s.pending().is_empty());
    }

    #[test]
    fn submit_with_nothing_selected() {
        let mut s = started(&[2, 5]);
        assert_eq!(s.submit(), SubmitResult::NothingSelected);
        assert_eq!(s.phase(), SessionPhase::InProgress);
    }

    #[test]
    fn two_step_factorization_of_twelve() {
        let mut s = started(&[2, 2, 3]);

        s.select_factor(2);
        assert_eq!(s.submit(), SubmitResult::Applied { new_value: 6 });
        assert_eq!(s.applied(), &[2]);
        assert!(s.pending().is_empty());
        assert_eq!(s.progress_line().unwrap(), "12 ÷ (2) = 6");

        s.select_factor(2);
        s.select_factor(3);
        assert_eq!(s.submit(), SubmitResult::Complete { is_correct: true });
        assert_eq!(s.current_value(), 1);
        assert_eq!(s.phase(), SessionPhase::Complete);
        assert_eq!(s.validate(), Some(true));
        assert_eq!(s.progress_line().unwrap(), "12 = 2 × 2 × 3");
    }

    #[test]
    fn prime_outside_round_is_excess_factor() {
        let mut s = started(&[2, 2, 3]);
        s.select_factor(5);
        assert_eq!(s.submit(), SubmitResult::Invalid(RejectReason::ExcessFactor));
        assert_eq!(s.current_value(), 12);
        assert!(s.pending().is_empty());
        assert_eq!(s.phase(), SessionPhase::InProgress);
    }

    #[test]
    fn too_many_copies_is_excess_factor() {
        let mut s = started(&[2, 2, 3]);
        s.select_factor(2);
        s.submit();
        s.select_factor(2);
        s.select_factor(2);
        assert_eq!(s.submit(), SubmitResult::Invalid(RejectReason::ExcessFactor));
        assert_eq!(s.current_value(), 6);
        assert_eq!(s.applied(), &[2]);
    }

    #[test]
    fn composite_input_is_rejected_by_session() {
        // The UI only offers level primes, so a raw 4 never reaches a real
        // session; if it does, the multiplicity check rejects it.
        let mut s = started(&[2, 5]);
        s.select_factor(4);
        assert_eq!(s.submit(), SubmitResult::Invalid(RejectReason::ExcessFactor));
        assert_eq!(s.current_value(), 10);
    }

    #[test]
    fn divisibility_is_checked_against_current_value() {
        // Multiplicity passes but the current value no longer holds the
        // divisor. Submits alone cannot get here, so the state is hand-built.
        let mut s = started(&[2, 3]);
        s.current_value = 2;
        s.select_factor(3);
        assert_eq!(s.submit(), SubmitResult::Invalid(RejectReason::NotDivisible));
        assert_eq!(s.current_value(), 2);
        assert!(s.pending().is_empty());
    }

    #[test]
    fn validate_rejects_diverging_applied_factors() {
        let mut s = started(&[2, 3]);
        s.current_value = 1;
        s.applied = vec![3, 3];
        assert_eq!(s.validate(), Some(false));
        s.applied = vec![3, 2];
        assert_eq!(s.validate(), Some(true));
    }

    #[test]
    fn validate_is_none_until_complete() {
        let mut s = started(&[2, 3]);
        s.select_factor(2);
        s.submit();
        assert_eq!(s.validate(), None);
    }

    #[test]
    fn complete_locks_selection() {
        let mut s = started(&[7]);
        s.select_factor(7);
        assert_eq!(s.submit(), SubmitResult::Complete { is_correct: true });
        assert_eq!(s.select_factor(7), SelectionStatus::NotActive);
        assert_eq!(s.clear_selection(), SelectionStatus::NotActive);
        assert_eq!(s.submit(), SubmitResult::NotActive);
    }

    #[test]
    fn reveal_locks_in_progress_round() {
        let mut s = started(&[2, 3, 5]);
        s.select_factor(2);
        s.submit();
        s.select_factor(3);

        assert_eq!(s.reveal_answer(), Some(vec![2, 3, 5]));
        assert_eq!(s.phase(), SessionPhase::Revealed);
        assert_eq!(s.current_value(), 15);
        assert_eq!(s.applied(), &[2]);
        assert!(s.pending().is_empty());
        assert_eq!(s.select_factor(5), SelectionStatus::NotActive);
        assert_eq!(s.submit(), SubmitResult::NotActive);
    }

    #[test]
    fn reveal_after_completion_keeps_complete() {
        let mut s = started(&[2, 3]);
        s.select_factor(2);
        s.select_factor(3);
        s.submit();
        assert_eq!(s.reveal_answer(), Some(vec![2, 3]));
        assert_eq!(s.phase(), SessionPhase::Complete);
    }

    #[test]
    fn start_discards_previous_round() {
        let mut s = started(&[2, 3]);
        s.select_factor(2);
        s.submit();
        s.reveal_answer();

        s.start(round(&[5, 7]));
        assert_eq!(s.phase(), SessionPhase::InProgress);
        assert_eq!(s.current_value(), 35);
        assert!(s.applied().is_empty());
        assert!(s.pending().is_empty());
    }

    #[test]
    fn reset_returns_to_idle() {
        let mut s = started(&[2, 3]);
        s.reset();
        assert_eq!(s.phase(), SessionPhase::Idle);
        assert_eq!(s.round(), None);
    }

    #[test]
    fn multiplicity_counts_applied_and_pending() {
        assert!(!exceeds_multiplicity(&[2, 2, 3], &[2], &[2, 3]));
        assert!(exceeds_multiplicity(&[2, 2, 3], &[2, 2], &[2]));
        assert!(exceeds_multiplicity(&[2, 3], &[], &[5]));
        assert!(!exceeds_multiplicity(&[2, 3], &[], &[]));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    const SMALL_PRIMES: [u64; 6] = [2, 3, 5, 7, 11, 13];

    fn arb_round() -> impl Strategy<Value = Round> {
        prop::collection::vec(prop::sample::select(SMALL_PRIMES.to_vec()), 1..6)
            .prop_map(|primes| Round::new(primes).unwrap())
    }

    #[derive(Clone, Debug)]
    enum Op {
        Select(u64),
        Deselect(u64),
        Clear,
        Submit,
    }

    fn arb_op() -> impl Strategy<Value = Op> {
        prop_oneof![
            4 => prop::sample::select(SMALL_PRIMES.to_vec()).prop_map(Op::Select),
            1 => prop::sample::select(SMALL_PRIMES.to_vec()).prop_map(Op::Deselect),
            1 => Just(Op::Clear),
            2 => Just(Op::Submit),
        ]
    }

    fn count(v: u64, xs: &[u64]) -> usize {
        xs.iter().filter(|&&x| x == v).count()
    }

    proptest! {
        #[test]
        fn prop_applied_never_exceeds_ground_truth(
            round in arb_round(),
            ops in prop::collection::vec(arb_op(), 0..40),
        ) {
            let mut s = FactorizationSession::new();
            s.start(round.clone());
            for op in ops {
                match op {
                    Op::Select(p) => { s.select_factor(p); }
                    Op::Deselect(p) => { s.deselect_factor(p); }
                    Op::Clear => { s.clear_selection(); }
                    Op::Submit => { s.submit(); }
                }
                for &v in &SMALL_PRIMES {
                    prop_assert!(count(v, s.applied()) <= count(v, &round.primes));
                }
                let applied = product_of(s.applied()).unwrap();
                prop_assert_eq!(applied * s.current_value(), round.product);
            }
        }

        #[test]
        fn prop_deselect_absent_is_noop(
            round in arb_round(),
            picks in prop::collection::vec(prop::sample::select(vec![2u64, 3, 5]), 0..5),
        ) {
            let mut s = FactorizationSession::new();
            s.start(round);
            for p in picks {
                s.select_factor(p);
            }
            let before = s.pending().to_vec();
            prop_assert_eq!(s.deselect_factor(97), SelectionStatus::Unchanged);
            prop_assert_eq!(s.pending(), before.as_slice());
        }

        #[test]
        fn prop_submitting_ground_truth_in_chunks_completes(
            round in arb_round(),
            chunk in 1usize..4,
        ) {
            let mut s = FactorizationSession::new();
            s.start(round.clone());
            let mut last = SubmitResult::NotActive;
            for part in round.primes.chunks(chunk) {
                for &p in part {
                    s.select_factor(p);
                }
                last = s.submit();
                prop_assert!(!matches!(last, SubmitResult::Invalid(_)), "{:?}", last);
            }
            prop_assert_eq!(last, SubmitResult::Complete { is_correct: true });
            prop_assert_eq!(s.current_value(), 1);
            prop_assert_eq!(s.validate(), Some(true));
        }
    }
}
