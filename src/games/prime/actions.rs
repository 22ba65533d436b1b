//! Semantic action IDs for the factorization game's click targets.

// ── Level tabs (base + level number) ────────────────────────────
pub const LEVEL_BASE: u16 = 10;

// ── Prime buttons (base + index into the level's primes) ────────
pub const PRIME_BASE: u16 = 100;

// ── Pending selection chips (base + position, click to remove) ──
pub const DESELECT_BASE: u16 = 200;

// ── Commands ────────────────────────────────────────────────────
pub const NEW_ROUND: u16 = 300;
pub const SUBMIT: u16 = 301;
pub const CLEAR: u16 = 302;
pub const REVEAL: u16 = 303;
pub const TOGGLE_INSTANT: u16 = 304;
pub const TOGGLE_HISTORY: u16 = 305;
