//! Level catalog: which primes may be drawn, how many of them, and how many
//! decimal digits the resulting product may have.

use std::ops::RangeInclusive;

/// Tuning for one difficulty level.
#[derive(Clone, Debug, PartialEq)]
pub struct Level {
    pub number: u32,
    pub label: &'static str,
    /// Ascending, distinct.
    pub available_primes: Vec<u64>,
    pub factor_count: RangeInclusive<u32>,
    pub digits: RangeInclusive<u32>,
    /// When false, each prime is drawn at most once per round.
    pub allow_repeats: bool,
}

impl Level {
    /// Build a level. Panics on a malformed configuration; levels are static
    /// data so this is a programming error, not a runtime condition.
    pub fn new(
        number: u32,
        label: &'static str,
        primes: &[u64],
        factor_count: RangeInclusive<u32>,
        digits: RangeInclusive<u32>,
    ) -> Self {
        assert!(!primes.is_empty(), "level {number}: no primes");
        assert!(
            primes.iter().all(|&p| is_prime(p)),
            "level {number}: non-prime in {primes:?}"
        );
        assert!(
            *factor_count.start() >= 1 && factor_count.start() <= factor_count.end(),
            "level {number}: bad factor count {factor_count:?}"
        );
        assert!(
            *digits.start() >= 1 && digits.start() <= digits.end(),
            "level {number}: bad digit range {digits:?}"
        );

        let mut available_primes = primes.to_vec();
        available_primes.sort_unstable();
        available_primes.dedup();

        Self {
            number,
            label,
            available_primes,
            factor_count,
            digits,
            allow_repeats: true,
        }
    }

    /// Draw each prime at most once per round.
    pub fn distinct(mut self) -> Self {
        assert!(
            *self.factor_count.end() as usize <= self.available_primes.len(),
            "level {}: cannot draw {} distinct primes from {}",
            self.number,
            self.factor_count.end(),
            self.available_primes.len()
        );
        self.allow_repeats = false;
        self
    }

    pub fn contains_prime(&self, p: u64) -> bool {
        self.available_primes.binary_search(&p).is_ok()
    }

    /// Text for the level selector, e.g. `レベル1 - 簡単 (2, 3, 5, 7)`.
    pub fn description(&self) -> String {
        let primes: Vec<String> = self.available_primes.iter().map(|p| p.to_string()).collect();
        format!("{} ({})", self.label, primes.join(", "))
    }
}

const LEVEL1_PRIMES: &[u64] = &[2, 3, 5, 7];
const LEVEL2_PRIMES: &[u64] = &[2, 3, 5, 7, 11, 13];
const LEVEL3_PRIMES: &[u64] = &[2, 3, 5, 7, 11, 13, 17, 19];
const LEVEL4_PRIMES: &[u64] = &[2, 3, 5, 7, 11, 13, 17, 19, 23, 29];
const LEVEL5_PRIMES: &[u64] = &[2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47];

/// All defined levels, in selector order.
pub fn catalog() -> Vec<Level> {
    vec![
        Level::new(1, "レベル1 - 簡単", LEVEL1_PRIMES, 2..=3, 1..=3),
        Level::new(2, "レベル2 - 普通", LEVEL2_PRIMES, 3..=4, 2..=4),
        Level::new(3, "レベル3 - 難しい", LEVEL3_PRIMES, 4..=6, 3..=5),
        Level::new(4, "レベル4 - とても難しい", LEVEL4_PRIMES, 3..=5, 3..=5),
        Level::new(5, "レベル5 - 超難しい", LEVEL5_PRIMES, 3..=5, 4..=6),
    ]
}

pub fn level(number: u32) -> Option<Level> {
    catalog().into_iter().find(|l| l.number == number)
}

/// Level used when a stored or requested level number is unknown.
pub fn default_level() -> Level {
    Level::new(1, "レベル1 - 簡単", LEVEL1_PRIMES, 2..=3, 1..=3)
}

fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    let mut d = 2u64;
    while d * d <= n {
        if n % d == 0 {
            return false;
        }
        d += 1;
    }
    true
}
