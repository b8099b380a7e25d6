//! Shared domain types for the pc28 block-hash lottery.
//!
//! Everything here is pure data: bet types and wagers, derived round
//! results, per-game configuration, fixed-point odds, engine events, and
//! rejection reasons. The crates above this one (engine, chain, node) hold
//! all of the behavior.

pub mod bet;
pub mod config;
pub mod constants;
pub mod events;
pub mod fixed;
pub mod reject;
pub mod result;

pub use bet::{BetType, Wager, WagerStatus};
pub use config::{default_games, BetOption, GameConfig, GameStatus};
pub use events::Event;
pub use fixed::Decimal;
pub use reject::{AdminError, RejectReason};
pub use result::{Block, Parity, ResultAttributes, RoundResult, Size};
