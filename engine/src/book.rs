//! The mutable betting book: balances, pending wagers, settled history.
//!
//! All three move together under one lock owned by the engine, so a
//! settlement and a concurrent placement can never interleave their balance
//! deltas.

use crate::history::History;
use crate::ledger::WagerLedger;
use pc28_types::RejectReason;

/// Player and house balances.
///
/// The house balance is signed: a round where payouts exceed collected
/// stakes legitimately drives it down, possibly below zero, and must never
/// be clamped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Balances {
    pub player: u64,
    pub house: i64,
}

impl Balances {
    pub fn new(player: u64, house: i64) -> Self {
        Self { player, house }
    }

    /// Debit the player for a stake; rejects rather than underflows.
    pub fn debit_player(&mut self, amount: u64) -> Result<(), RejectReason> {
        if self.player < amount {
            return Err(RejectReason::InsufficientBalance {
                balance: self.player,
                required: amount,
            });
        }
        self.player -= amount;
        Ok(())
    }

    /// Credit the player (refund or payout).
    pub fn credit_player(&mut self, amount: u64) {
        self.player = self.player.saturating_add(amount);
    }

    /// Apply a settlement delta to the house: stake collected minus payout
    /// owed for one issue.
    pub fn apply_house_delta(&mut self, delta: i64) {
        self.house = self.house.saturating_add(delta);
    }
}

/// Everything settlement and placement contend over.
pub struct Book {
    pub ledger: WagerLedger,
    pub balances: Balances,
    pub history: History,
}

impl Book {
    pub fn new(player_balance: u64, house_balance: i64) -> Self {
        Self {
            ledger: WagerLedger::new(),
            balances: Balances::new(player_balance, house_balance),
            history: History::new(),
        }
    }
}
