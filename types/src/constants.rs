/// Blocks per issue: every 20th block finalizes a round.
pub const BLOCKS_PER_ISSUE: u64 = 20;

/// Lock margin in blocks: betting closes when fewer than this many blocks
/// remain before the finalizing block.
pub const LOCK_MARGIN: u64 = 5;

/// Default chain poll cadence in milliseconds.
pub const POLL_INTERVAL_MS: u64 = 3_000;

/// Default per-fetch timeout in milliseconds. A stuck fetch must never block
/// the poll cadence indefinitely.
pub const FETCH_TIMEOUT_MS: u64 = 5_000;

/// Starting player balance in chips.
pub const INITIAL_PLAYER_BALANCE: u64 = 10_000;

/// Starting house balance in chips.
pub const INITIAL_HOUSE_BALANCE: i64 = 88_888_888;

/// Sums at or above this are Big, below are Small.
pub const BIG_THRESHOLD: u8 = 14;

/// Sums that trigger the special odds override when enabled: 13 discounts
/// the small/odd side, 14 the big/even side.
pub const SPECIAL_SUMS: [u8; 2] = [13, 14];

/// Round results retained for display, most recent first.
pub const ROUND_HISTORY_LIMIT: usize = 20;

/// Reason codes for bet rejections.
pub const REJECT_PAUSED: u8 = 1;
pub const REJECT_ROUND_LOCKED: u8 = 2;
pub const REJECT_BELOW_MIN: u8 = 3;
pub const REJECT_LIMIT_EXCEEDED: u8 = 4;
pub const REJECT_INSUFFICIENT_BALANCE: u8 = 5;
pub const REJECT_UNKNOWN_GAME: u8 = 6;
pub const REJECT_UNKNOWN_BET: u8 = 7;
