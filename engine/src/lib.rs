//! Round lifecycle and settlement engine for the pc28 block-hash lottery.
//!
//! The [`Engine`] is the explicit context object everything flows through:
//! it owns the config store, the betting book (ledger + balances + history)
//! and nothing else. It is synchronous and runtime-free; the node crate
//! drives it from the chain poller and a command mailbox.

pub mod book;
pub mod clock;
pub mod config_store;
pub mod derive;
pub mod history;
pub mod ledger;
pub mod settle;

pub use book::{Balances, Book};
pub use clock::{Phase, RoundState};
pub use config_store::ConfigStore;
pub use history::{DashboardStats, History, IssueReport};
pub use ledger::WagerLedger;
pub use settle::SettledBatch;

use pc28_types::{
    AdminError, BetType, Decimal, GameConfig, GameStatus, RejectReason, RoundResult, Wager,
};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

pub struct Engine {
    store: ConfigStore,
    // Single writer for ledger, balances and history together: a settlement
    // and a concurrent placement can never interleave their balance deltas.
    book: Mutex<Book>,
}

impl Engine {
    pub fn new(
        games: Vec<GameConfig>,
        player_balance: u64,
        house_balance: i64,
    ) -> Result<Self, AdminError> {
        Ok(Self {
            store: ConfigStore::new(games)?,
            book: Mutex::new(Book::new(player_balance, house_balance)),
        })
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    /// Place a bet on the round currently open for betting.
    ///
    /// The phase gate runs first: a locked round, paused game or hidden game
    /// rejects before any ledger validation, and nothing is mutated on any
    /// rejection path.
    pub fn place_bet(
        &self,
        game_id: &str,
        bet_type: BetType,
        amount: u64,
        round: &RoundState,
    ) -> Result<Wager, RejectReason> {
        let cfg = self
            .store
            .get(game_id)
            .ok_or_else(|| RejectReason::UnknownGame(game_id.to_string()))?;
        match Phase::derive(cfg.status, round) {
            Phase::Open => {}
            Phase::Locked => return Err(RejectReason::RoundLocked),
            Phase::Paused | Phase::Hidden => return Err(RejectReason::Paused),
        }

        let mut book = self.book();
        let Book {
            ledger, balances, ..
        } = &mut *book;
        ledger.place(&cfg, bet_type, amount, round.next_issue, balances)
    }

    /// Cancel all of a game's pending wagers for the open round.
    pub fn cancel_all_bets(&self, game_id: &str, round: &RoundState) -> Result<u64, RejectReason> {
        self.cancel_gate(game_id, round)?;
        let mut book = self.book();
        let Book {
            ledger, balances, ..
        } = &mut *book;
        Ok(ledger.cancel_all(game_id, round.next_issue, balances))
    }

    /// Cancel a game's pending wagers of one type for the open round.
    pub fn cancel_bets_by_type(
        &self,
        game_id: &str,
        bet_type: BetType,
        round: &RoundState,
    ) -> Result<u64, RejectReason> {
        self.cancel_gate(game_id, round)?;
        let mut book = self.book();
        let Book {
            ledger, balances, ..
        } = &mut *book;
        Ok(ledger.cancel_type(game_id, round.next_issue, bet_type, balances))
    }

    // Cancellation is blocked by the same phase gate as placement: once the
    // round locks, stakes are committed until settlement.
    fn cancel_gate(&self, game_id: &str, round: &RoundState) -> Result<(), RejectReason> {
        let cfg = self
            .store
            .get(game_id)
            .ok_or_else(|| RejectReason::UnknownGame(game_id.to_string()))?;
        match Phase::derive(cfg.status, round) {
            Phase::Open => Ok(()),
            Phase::Locked => Err(RejectReason::RoundLocked),
            Phase::Paused | Phase::Hidden => Err(RejectReason::Paused),
        }
    }

    /// Settle a finalized round and record it in history.
    pub fn settle_round(&self, result: &RoundResult) -> SettledBatch {
        let now = unix_now_ms();
        let mut book = self.book();
        let batch = settle::settle(&mut book, &self.store, result, now);
        book.history.record_round(result.clone());
        batch
    }

    // --- admin pass-throughs ---

    pub fn update_odds(
        &self,
        game_id: &str,
        bet_type: BetType,
        odds: Decimal,
    ) -> Result<(), AdminError> {
        self.store.apply_odds_change(game_id, bet_type, odds)
    }

    pub fn set_game_status(&self, game_id: &str, status: GameStatus) -> Result<(), AdminError> {
        self.store.set_status(game_id, status)
    }

    pub fn set_special_rules(
        &self,
        game_id: &str,
        enabled: bool,
        single_odds: Decimal,
        combo_odds: Decimal,
    ) -> Result<(), AdminError> {
        self.store
            .set_special_rules(game_id, enabled, single_odds, combo_odds)
    }

    pub fn apply_limits(&self, game_ids: &[String], min: u64, max: u64) -> Result<(), AdminError> {
        self.store.apply_limits(game_ids, min, max)
    }

    // --- snapshots for display layers ---

    pub fn balances(&self) -> Balances {
        self.book().balances
    }

    pub fn pending_wagers(&self, game_id: &str, issue: u64) -> Vec<Wager> {
        self.book().ledger.pending_for(game_id, issue)
    }

    pub fn recent_rounds(&self) -> Vec<RoundResult> {
        self.book().history.rounds().cloned().collect()
    }

    pub fn settled_history(&self) -> Vec<Wager> {
        self.book().history.settled().to_vec()
    }

    pub fn issue_report(&self, game_id: &str, limit: usize) -> Vec<IssueReport> {
        self.book().history.recent_issue_report(game_id, limit)
    }

    pub fn dashboard_stats(&self) -> DashboardStats {
        let book = self.book();
        DashboardStats::compute(
            book.history.settled(),
            book.ledger.total_pending_stake(),
            book.ledger.max_potential_payout(),
        )
    }

    // The book holds plain data; a poisoned mutex only means a panic while
    // it was held, and every mutation path leaves it internally consistent.
    fn book(&self) -> std::sync::MutexGuard<'_, Book> {
        self.book.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn unix_now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Shared handle used by the node's poller and mailbox.
pub type SharedEngine = Arc<Engine>;
