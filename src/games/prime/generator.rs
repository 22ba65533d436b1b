//! Round generation: draw a multiset of level primes whose product has an
//! acceptable number of digits.

use crate::log;

use super::level::Level;

/// Attempts before falling back to the fixed round.
pub const MAX_ATTEMPTS: u32 = 50;

/// Uniform integer source, injected so generation is reproducible in tests.
pub trait RandomSource {
    /// Uniform integer in `min..=max`.
    fn rand_int(&mut self, min: u32, max: u32) -> u32;
}

// ── LCG ─────────────────────────────────────────────────────────

fn next_rng(seed: u64) -> u64 {
    seed.wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407)
}

/// 64-bit LCG; the production random source.
#[derive(Clone, Debug)]
pub struct Lcg {
    state: u64,
}

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Seed from `Math.random()` and the wall clock.
    #[cfg(target_arch = "wasm32")]
    pub fn from_entropy() -> Self {
        let noise = (js_sys::Math::random() * (1u64 << 53) as f64) as u64;
        let clock = js_sys::Date::now() as u64;
        Self::new(noise ^ clock.rotate_left(32))
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_entropy() -> Self {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);
        Self::new(nanos)
    }
}

impl RandomSource for Lcg {
    fn rand_int(&mut self, min: u32, max: u32) -> u32 {
        debug_assert!(min <= max);
        let span = (max - min) as u64 + 1;
        self.state = next_rng(self.state);
        min + ((self.state >> 33) % span) as u32
    }
}

// ── Round ───────────────────────────────────────────────────────

/// A target product plus its ground-truth factorization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Round {
    /// Ascending.
    pub primes: Vec<u64>,
    pub product: u64,
    /// True when generation gave up and returned the fixed round.
    pub is_fallback: bool,
}

impl Round {
    /// Round from an explicit factor list. `None` if the list is empty, holds
    /// a value below 2, or the product overflows.
    pub fn new(mut primes: Vec<u64>) -> Option<Self> {
        if primes.is_empty() || primes.iter().any(|&p| p < 2) {
            return None;
        }
        primes.sort_unstable();
        let product = product_of(&primes)?;
        Some(Self {
            primes,
            product,
            is_fallback: false,
        })
    }
}

/// Exact product, or `None` on `u64` overflow. The empty product is 1.
pub fn product_of(factors: &[u64]) -> Option<u64> {
    factors.iter().try_fold(1u64, |acc, &f| acc.checked_mul(f))
}

pub fn digit_count(n: u64) -> u32 {
    n.checked_ilog10().map_or(1, |d| d + 1)
}

// ── Generation ──────────────────────────────────────────────────

/// Generate a round for `level`. Never fails: after [`MAX_ATTEMPTS`] misses
/// the fixed fallback round is returned and a warning is logged.
pub fn generate_round<R: RandomSource + ?Sized>(level: &Level, rng: &mut R) -> Round {
    for _ in 0..MAX_ATTEMPTS {
        let primes = draw_primes(level, rng);
        let Some(product) = product_of(&primes) else {
            continue;
        };
        if level.digits.contains(&digit_count(product)) {
            return Round {
                primes,
                product,
                is_fallback: false,
            };
        }
    }

    log::warn(&format!(
        "[generator] level {}: no product with {:?} digits in {} attempts, using fallback",
        level.number, level.digits, MAX_ATTEMPTS
    ));
    fallback_round(level)
}

fn draw_primes<R: RandomSource + ?Sized>(level: &Level, rng: &mut R) -> Vec<u64> {
    let count = rng.rand_int(*level.factor_count.start(), *level.factor_count.end()) as usize;
    let mut primes = Vec::with_capacity(count);

    if level.allow_repeats {
        let last = (level.available_primes.len() - 1) as u32;
        for _ in 0..count {
            primes.push(level.available_primes[rng.rand_int(0, last) as usize]);
        }
    } else {
        let mut pool = level.available_primes.clone();
        while primes.len() < count && !pool.is_empty() {
            let idx = rng.rand_int(0, (pool.len() - 1) as u32) as usize;
            primes.push(pool.remove(idx));
        }
    }

    primes.sort_unstable();
    primes
}

/// The two smallest distinct primes of the level (or the single one).
pub fn fallback_round(level: &Level) -> Round {
    let mut primes: Vec<u64> = level.available_primes.iter().take(2).copied().collect();
    let product = match product_of(&primes) {
        Some(p) => p,
        None => {
            primes.truncate(1);
            primes[0]
        }
    };
    Round {
        primes,
        product,
        is_fallback: true,
    }
}

// ── Factor check ────────────────────────────────────────────────

/// Result of trial-dividing a number by a set of primes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Factorization {
    /// Ascending.
    pub factors: Vec<u64>,
    /// True if `n` is made only of the given primes.
    pub complete: bool,
}

/// Factor `n` over `primes` by trial division.
pub fn factorize_over(n: u64, primes: &[u64]) -> Factorization {
    if n == 0 {
        return Factorization {
            factors: Vec::new(),
            complete: false,
        };
    }

    let mut sorted = primes.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    let mut remaining = n;
    let mut factors = Vec::new();
    for p in sorted.into_iter().filter(|&p| p >= 2) {
        while remaining % p == 0 {
            factors.push(p);
            remaining /= p;
        }
    }

    Factorization {
        factors,
        complete: remaining == 1,
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::ScriptedRandom;
    use super::*;
    use crate::games::prime::level::{catalog, level};

    #[test]
    fn scripted_draw_of_two_and_three() {
        let lvl = Level::new(1, "test", &[2, 3, 5, 7], 2..=2, 1..=2);
        // count draw, then index 0 and index 1
        let mut rng = ScriptedRandom::new(&[0, 0, 1]);
        let round = generate_round(&lvl, &mut rng);
        assert_eq!(round.primes, vec![2, 3]);
        assert_eq!(round.product, 6);
        assert!(!round.is_fallback);
    }

    #[test]
    fn drawn_primes_are_sorted() {
        let lvl = Level::new(1, "test", &[2, 3, 5, 7], 3..=3, 1..=3);
        let mut rng = ScriptedRandom::new(&[0, 3, 0, 1]);
        let round = generate_round(&lvl, &mut rng);
        assert_eq!(round.primes, vec![2, 3, 7]);
        assert_eq!(round.product, 42);
    }

    #[test]
    fn out_of_range_candidates_are_retried() {
        // 7*7 = 49 has two digits (rejected), then 2*3 = 6 is accepted.
        let lvl = Level::new(1, "test", &[2, 3, 5, 7], 2..=2, 1..=1);
        let mut rng = ScriptedRandom::new(&[0, 3, 3, 0, 0, 1]);
        let round = generate_round(&lvl, &mut rng);
        assert_eq!(round.product, 6);
        assert!(!round.is_fallback);
    }

    #[test]
    fn exhaustion_returns_fallback() {
        // 2 primes from {5, 7} always give two digits; one digit is required.
        let lvl = Level::new(1, "test", &[7, 5], 2..=2, 1..=1);
        let mut rng = Lcg::new(7);
        let round = generate_round(&lvl, &mut rng);
        assert!(round.is_fallback);
        assert_eq!(round.primes, vec![5, 7]);
        assert_eq!(round.product, 35);
    }

    #[test]
    fn fallback_uses_two_smallest_distinct_primes() {
        let round = fallback_round(&level(5).unwrap());
        assert_eq!(round.primes, vec![2, 3]);
        assert_eq!(round.product, 6);
    }

    #[test]
    fn fallback_with_single_prime_is_well_formed() {
        let lvl = Level::new(1, "test", &[11], 1..=1, 5..=6);
        let round = fallback_round(&lvl);
        assert_eq!(round.primes, vec![11]);
        assert_eq!(round.product, 11);
    }

    #[test]
    fn distinct_level_never_repeats() {
        let lvl = Level::new(1, "test", &[2, 3, 5, 7], 4..=4, 1..=4).distinct();
        let mut rng = Lcg::new(99);
        for _ in 0..50 {
            let round = generate_round(&lvl, &mut rng);
            assert_eq!(round.primes, vec![2, 3, 5, 7]);
        }
    }

    #[test]
    fn lcg_is_deterministic_and_in_range() {
        let mut a = Lcg::new(42);
        let mut b = Lcg::new(42);
        for _ in 0..200 {
            let x = a.rand_int(3, 9);
            assert_eq!(x, b.rand_int(3, 9));
            assert!((3..=9).contains(&x));
        }
    }

    #[test]
    fn lcg_covers_whole_range() {
        let mut rng = Lcg::new(1);
        let mut seen = [false; 5];
        for _ in 0..500 {
            seen[rng.rand_int(0, 4) as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn catalog_rounds_are_never_fallback_in_practice() {
        let mut rng = Lcg::new(2024);
        for lvl in catalog() {
            for _ in 0..100 {
                assert!(!generate_round(&lvl, &mut rng).is_fallback, "level {}", lvl.number);
            }
        }
    }

    #[test]
    fn digit_count_boundaries() {
        assert_eq!(digit_count(0), 1);
        assert_eq!(digit_count(9), 1);
        assert_eq!(digit_count(10), 2);
        assert_eq!(digit_count(999_999), 6);
        assert_eq!(digit_count(1_000_000), 7);
        assert_eq!(digit_count(u64::MAX), 20);
    }

    #[test]
    fn product_of_detects_overflow() {
        assert_eq!(product_of(&[]), Some(1));
        assert_eq!(product_of(&[2, 2, 3]), Some(12));
        assert_eq!(product_of(&[u64::MAX, 2]), None);
    }

    #[test]
    fn round_new_validates_and_sorts() {
        let round = Round::new(vec![3, 2, 2]).unwrap();
        assert_eq!(round.primes, vec![2, 2, 3]);
        assert_eq!(round.product, 12);
        assert!(Round::new(vec![]).is_none());
        assert!(Round::new(vec![1, 2]).is_none());
        assert!(Round::new(vec![u64::MAX, 3]).is_none());
    }

    #[test]
    fn factorize_over_level_primes() {
        let f = factorize_over(360, &[5, 3, 2]);
        assert_eq!(f.factors, vec![2, 2, 2, 3, 3, 5]);
        assert!(f.complete);

        let f = factorize_over(22, &[2, 3, 5, 7]);
        assert_eq!(f.factors, vec![2]);
        assert!(!f.complete);

        assert!(factorize_over(1, &[2]).complete);
        assert!(!factorize_over(0, &[2]).complete);
    }
}
