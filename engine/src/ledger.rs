//! Pending-wager ledger.
//!
//! Wagers are partitioned by issue; settlement drains one whole partition
//! while placements only ever touch the open (future) issue, so the two
//! never contend over the same entries.

use crate::book::Balances;
use pc28_types::{BetType, GameConfig, RejectReason, Wager};
use std::collections::BTreeMap;

#[derive(Default)]
pub struct WagerLedger {
    pending: BTreeMap<u64, Vec<Wager>>,
}

impl WagerLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and record a placement.
    ///
    /// Checks run in the order players see them: game status, minimum,
    /// cumulative per-type limit, balance. Nothing is mutated on rejection.
    pub fn place(
        &mut self,
        cfg: &GameConfig,
        bet_type: BetType,
        amount: u64,
        issue: u64,
        balances: &mut Balances,
    ) -> Result<Wager, RejectReason> {
        if !cfg.status.is_active() {
            return Err(RejectReason::Paused);
        }
        if amount < cfg.min_bet {
            return Err(RejectReason::BelowMin {
                amount,
                min: cfg.min_bet,
            });
        }
        // Limits are cumulative per bet type per issue, not per wager;
        // landing exactly on the limit is allowed.
        let staked = self.staked(&cfg.id, issue, bet_type);
        if staked.saturating_add(amount) > cfg.max_bet {
            return Err(RejectReason::LimitExceeded {
                staked,
                amount,
                limit: cfg.max_bet,
            });
        }
        let odds = cfg
            .odds_for(bet_type)
            .ok_or(RejectReason::UnknownBet(bet_type))?;

        balances.debit_player(amount)?;

        let wager = Wager::new(&cfg.id, bet_type, amount, odds, issue);
        self.pending.entry(issue).or_default().push(wager.clone());
        Ok(wager)
    }

    /// Cumulative pending stake for one bet type of one game in one issue.
    pub fn staked(&self, game_id: &str, issue: u64, bet_type: BetType) -> u64 {
        self.pending
            .get(&issue)
            .map(|wagers| {
                wagers
                    .iter()
                    .filter(|w| w.game_id == game_id && w.bet_type == bet_type)
                    .map(|w| w.amount)
                    .sum()
            })
            .unwrap_or(0)
    }

    /// Cancel every pending wager of one game for an issue; returns the
    /// refund credited back to the player.
    pub fn cancel_all(&mut self, game_id: &str, issue: u64, balances: &mut Balances) -> u64 {
        self.cancel_where(issue, balances, |w| w.game_id == game_id)
    }

    /// Cancel pending wagers of one bet type of one game for an issue.
    pub fn cancel_type(
        &mut self,
        game_id: &str,
        issue: u64,
        bet_type: BetType,
        balances: &mut Balances,
    ) -> u64 {
        self.cancel_where(issue, balances, |w| {
            w.game_id == game_id && w.bet_type == bet_type
        })
    }

    fn cancel_where<F>(&mut self, issue: u64, balances: &mut Balances, matches: F) -> u64
    where
        F: Fn(&Wager) -> bool,
    {
        let Some(wagers) = self.pending.get_mut(&issue) else {
            return 0;
        };
        let mut refund = 0u64;
        wagers.retain(|w| {
            if matches(w) {
                refund = refund.saturating_add(w.amount);
                false
            } else {
                true
            }
        });
        if wagers.is_empty() {
            self.pending.remove(&issue);
        }
        balances.credit_player(refund);
        refund
    }

    /// Atomically remove and return all pending wagers for a finalized
    /// issue. A second drain of the same issue returns empty, which is what
    /// makes settlement idempotent.
    pub fn drain(&mut self, issue: u64) -> Vec<Wager> {
        self.pending.remove(&issue).unwrap_or_default()
    }

    /// Pending wagers of one game for an issue, for display.
    pub fn pending_for(&self, game_id: &str, issue: u64) -> Vec<Wager> {
        self.pending
            .get(&issue)
            .map(|wagers| {
                wagers
                    .iter()
                    .filter(|w| w.game_id == game_id)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Total stake currently at risk across all issues and games.
    pub fn total_pending_stake(&self) -> u64 {
        self.pending
            .values()
            .flatten()
            .map(|w| w.amount)
            .fold(0, u64::saturating_add)
    }

    /// Worst-case total return if every pending wager won at its
    /// snapshotted odds.
    pub fn max_potential_payout(&self) -> u64 {
        self.pending
            .values()
            .flatten()
            .map(|w| w.odds.mul_amount(w.amount))
            .fold(0, u64::saturating_add)
    }
}
