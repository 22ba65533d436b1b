//! Semantic action IDs for observation mode click targets.

// ── Level tabs (base + level number) ────────────────────────────
pub const LEVEL_BASE: u16 = 10;

// ── Controls ────────────────────────────────────────────────────
pub const NEXT_ROUND: u16 = 100;
pub const TOGGLE_PAUSE: u16 = 101;
pub const FASTER: u16 = 102;
pub const SLOWER: u16 = 103;
