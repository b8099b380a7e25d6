//! Settlement of a finalized issue against the betting book.

use crate::book::Book;
use crate::config_store::ConfigStore;
use pc28_types::constants::SPECIAL_SUMS;
use pc28_types::{BetType, Decimal, GameConfig, RoundResult, Wager, WagerStatus};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Everything settled for one issue, returned for the caller to surface.
#[derive(Clone, Debug)]
pub struct SettledBatch {
    pub issue: u64,
    pub total_stake: u64,
    pub total_payout: u64,
    pub wagers: Vec<Wager>,
}

impl SettledBatch {
    fn empty(issue: u64) -> Self {
        Self {
            issue,
            total_stake: 0,
            total_payout: 0,
            wagers: Vec::new(),
        }
    }
}

/// The payout ratio a wager actually settles at.
///
/// Default is the odds snapshotted at placement. When the game runs the
/// special rule and the sum lands on 13 or 14, only the bet types matching
/// that sum's own attributes are discounted: 13 is small/odd territory, so
/// small, odd and small_odd take the override; 14 is big/even territory, so
/// big, even and big_even take it. Everything else, including the opposite
/// combos, keeps its snapshot odds. The asymmetry is the rule, not an
/// oversight.
pub fn effective_odds(wager: &Wager, cfg: &GameConfig, sum: u8) -> Decimal {
    if !cfg.special_rules_enabled || !SPECIAL_SUMS.contains(&sum) {
        return wager.odds;
    }
    match (sum, wager.bet_type) {
        (13, BetType::Small | BetType::Odd) => cfg.special_single_odds,
        (13, BetType::SmallOdd) => cfg.special_combo_odds,
        (14, BetType::Big | BetType::Even) => cfg.special_single_odds,
        (14, BetType::BigEven) => cfg.special_combo_odds,
        _ => wager.odds,
    }
}

/// Settle all pending wagers for `result.issue`.
///
/// Drains the ledger partition (at most once per issue by construction),
/// marks every wager won or lost, credits the player with total payouts and
/// moves the stake/payout difference onto the house. An issue with no
/// pending wagers is a cheap no-op.
pub fn settle(book: &mut Book, store: &ConfigStore, result: &RoundResult, now: u64) -> SettledBatch {
    let wagers = book.ledger.drain(result.issue);
    if wagers.is_empty() {
        debug!(issue = result.issue, "no wagers to settle");
        return SettledBatch::empty(result.issue);
    }

    // One config snapshot per game for the whole batch: an admin edit that
    // lands mid-settlement affects the next round, never this one.
    let mut configs: HashMap<String, Option<Arc<GameConfig>>> = HashMap::new();

    let mut total_stake = 0u64;
    let mut total_payout = 0u64;
    let mut settled = Vec::with_capacity(wagers.len());

    for mut wager in wagers {
        total_stake = total_stake.saturating_add(wager.amount);

        let cfg = configs
            .entry(wager.game_id.clone())
            .or_insert_with(|| store.get(&wager.game_id));

        let won = wager.bet_type.wins(&result.attributes);
        let payout = if won {
            let odds = match cfg {
                Some(cfg) => effective_odds(&wager, cfg, result.sum),
                // Game deleted from the catalog mid-flight: fall back to the
                // snapshot the player bet at.
                None => wager.odds,
            };
            odds.mul_amount(wager.amount)
        } else {
            0
        };

        wager.status = if won { WagerStatus::Won } else { WagerStatus::Lost };
        wager.payout = Some(payout);
        wager.settled_at = Some(now);
        total_payout = total_payout.saturating_add(payout);
        settled.push(wager);
    }

    book.balances.credit_player(total_payout);
    // Signed on purpose: the house eats the difference even when it pays out
    // more than it collected.
    book.balances
        .apply_house_delta(total_stake as i64 - total_payout as i64);

    book.history.record_settled(&settled);

    info!(
        issue = result.issue,
        sum = result.sum,
        combo = %result.attributes.combo,
        wagers = settled.len(),
        total_stake,
        total_payout,
        "settled round"
    );

    SettledBatch {
        issue: result.issue,
        total_stake,
        total_payout,
        wagers: settled,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::derive;
    use pc28_types::default_games;

    fn fixture() -> (Book, ConfigStore) {
        let book = Book::new(10_000, 0);
        let store = ConfigStore::new(default_games()).expect("default catalog is valid");
        (book, store)
    }

    fn place(book: &mut Book, store: &ConfigStore, game: &str, t: BetType, amount: u64, issue: u64) {
        let cfg = store.get(game).expect("game exists");
        book.ledger
            .place(&cfg, t, amount, issue, &mut book.balances)
            .expect("placement accepted");
    }

    /// sum(8,3,9) = 20: Big / Even.
    fn big_even_result(issue: u64) -> RoundResult {
        derive("x839", issue, 0)
    }

    /// sum(6,4,3) = 13: Small / Odd, the special sum.
    fn sum13_result(issue: u64) -> RoundResult {
        derive("x643", issue, 0)
    }

    /// sum(8,2,4) = 14: Big / Even, the special sum.
    fn sum14_result(issue: u64) -> RoundResult {
        derive("x824", issue, 0)
    }

    #[test]
    fn test_win_and_loss_payouts() {
        let (mut book, store) = fixture();
        place(&mut book, &store, "pc2.0", BetType::Big, 100, 120); // wins at 2.0
        place(&mut book, &store, "pc2.0", BetType::Odd, 50, 120); // loses
        assert_eq!(book.balances.player, 9_850);

        let batch = settle(&mut book, &store, &big_even_result(120), 999);
        assert_eq!(batch.total_stake, 150);
        assert_eq!(batch.total_payout, 200);
        assert_eq!(book.balances.player, 10_050);
        assert_eq!(book.balances.house, -50);

        let won = batch.wagers.iter().find(|w| w.bet_type == BetType::Big).unwrap();
        assert_eq!(won.status, WagerStatus::Won);
        assert_eq!(won.payout, Some(200));
        assert_eq!(won.settled_at, Some(999));
        let lost = batch.wagers.iter().find(|w| w.bet_type == BetType::Odd).unwrap();
        assert_eq!(lost.status, WagerStatus::Lost);
        assert_eq!(lost.payout, Some(0));
    }

    #[test]
    fn test_conservation() {
        let (mut book, store) = fixture();
        for (t, amount) in [
            (BetType::Big, 100),
            (BetType::Small, 80),
            (BetType::BigEven, 60),
            (BetType::Leopard, 10),
        ] {
            place(&mut book, &store, "pc2.0", t, amount, 120);
        }
        let player_before = book.balances.player;
        let house_before = book.balances.house;

        let batch = settle(&mut book, &store, &big_even_result(120), 0);

        // House gains exactly stake - payout; player gains exactly payout.
        assert_eq!(
            book.balances.house - house_before,
            batch.total_stake as i64 - batch.total_payout as i64
        );
        assert_eq!(
            book.balances.player - player_before,
            batch.total_payout
        );
    }

    #[test]
    fn test_settle_twice_is_noop() {
        let (mut book, store) = fixture();
        place(&mut book, &store, "pc2.0", BetType::Big, 100, 120);

        let first = settle(&mut book, &store, &big_even_result(120), 0);
        assert_eq!(first.wagers.len(), 1);
        let balances_after = book.balances;
        let settled_count = book.history.settled().len();

        let second = settle(&mut book, &store, &big_even_result(120), 0);
        assert!(second.wagers.is_empty());
        assert_eq!(second.total_stake, 0);
        assert_eq!(book.balances, balances_after);
        assert_eq!(book.history.settled().len(), settled_count);
    }

    #[test]
    fn test_empty_issue_is_noop() {
        let (mut book, store) = fixture();
        let batch = settle(&mut book, &store, &big_even_result(120), 0);
        assert!(batch.wagers.is_empty());
        assert_eq!(book.balances, crate::book::Balances::new(10_000, 0));
    }

    #[test]
    fn test_special_rule_sum_13() {
        // small at snapshot 2.0 settles at 1.98 when the sum is 13 and the
        // rule is on.
        let (mut book, store) = fixture();
        place(&mut book, &store, "pc2.0", BetType::Small, 100, 120);
        place(&mut book, &store, "pc2.0", BetType::SmallOdd, 100, 120);

        let batch = settle(&mut book, &store, &sum13_result(120), 0);
        let small = batch.wagers.iter().find(|w| w.bet_type == BetType::Small).unwrap();
        assert_eq!(small.payout, Some(198));
        let combo = batch
            .wagers
            .iter()
            .find(|w| w.bet_type == BetType::SmallOdd)
            .unwrap();
        assert_eq!(combo.payout, Some(160));
    }

    #[test]
    fn test_special_rule_sum_14() {
        let (mut book, store) = fixture();
        place(&mut book, &store, "pc2.0", BetType::Big, 100, 120);
        place(&mut book, &store, "pc2.0", BetType::Even, 100, 120);
        place(&mut book, &store, "pc2.0", BetType::BigEven, 100, 120);

        let batch = settle(&mut book, &store, &sum14_result(120), 0);
        for wager in &batch.wagers {
            let expected = match wager.bet_type {
                BetType::Big | BetType::Even => 198,
                BetType::BigEven => 160,
                _ => unreachable!(),
            };
            assert_eq!(wager.payout, Some(expected), "{:?}", wager.bet_type);
        }
    }

    #[test]
    fn test_special_rule_leaves_other_types_alone() {
        // The override is intentionally asymmetric: at sum 13 only the
        // small/odd side is discounted. A winning bet on a type outside
        // that side keeps its snapshot odds; this pins the asymmetry so a
        // well-meaning "generalization" fails loudly.
        let (mut book, store) = fixture();
        place(&mut book, &store, "pc2.0", BetType::Odd, 100, 120);
        place(&mut book, &store, "pc2.0", BetType::Pair, 100, 120);

        // 6+4+3 = 13, digits distinct so pair loses; odd wins discounted.
        let batch = settle(&mut book, &store, &sum13_result(120), 0);
        let odd = batch.wagers.iter().find(|w| w.bet_type == BetType::Odd).unwrap();
        assert_eq!(odd.payout, Some(198));

        // big_odd at sum 13 would lose anyway (13 is Small); check the
        // ratio directly instead of through a settlement.
        let cfg = store.get("pc2.0").unwrap();
        let wager = Wager::new("pc2.0", BetType::BigOdd, 100, Decimal::from_centi(380), 120);
        assert_eq!(effective_odds(&wager, &cfg, 13), Decimal::from_centi(380));
        // Symmetric check at 14: small_even keeps its odds.
        let wager = Wager::new("pc2.0", BetType::SmallEven, 100, Decimal::from_centi(380), 120);
        assert_eq!(effective_odds(&wager, &cfg, 14), Decimal::from_centi(380));
    }

    #[test]
    fn test_special_rule_disabled_game_ignores_override() {
        // The "pure" game ships with the rule off.
        let (mut book, store) = fixture();
        place(&mut book, &store, "pure", BetType::Small, 100, 120);

        let batch = settle(&mut book, &store, &sum13_result(120), 0);
        assert_eq!(batch.wagers[0].payout, Some(200));
    }

    #[test]
    fn test_special_rule_only_at_13_and_14() {
        let cfg = store_cfg();
        // sum 12: small wins at snapshot odds even with the rule on.
        let wager = Wager::new("pc2.0", BetType::Small, 100, Decimal::from_centi(200), 120);
        assert_eq!(effective_odds(&wager, &cfg, 12), Decimal::from_centi(200));
        assert_eq!(effective_odds(&wager, &cfg, 13), Decimal::from_centi(198));
        assert_eq!(effective_odds(&wager, &cfg, 14), Decimal::from_centi(200));
    }

    fn store_cfg() -> GameConfig {
        default_games().remove(0)
    }

    #[test]
    fn test_settlement_uses_config_snapshot_not_placement_config() {
        // The special override reads the settlement-time config: an admin
        // lowering the special odds after placement applies to this round.
        let (mut book, store) = fixture();
        place(&mut book, &store, "pc2.0", BetType::Small, 100, 120);
        store
            .set_special_rules(
                "pc2.0",
                true,
                Decimal::from_centi(150),
                Decimal::from_centi(120),
            )
            .unwrap();

        let batch = settle(&mut book, &store, &sum13_result(120), 0);
        assert_eq!(batch.wagers[0].payout, Some(150));
    }

    #[test]
    fn test_house_can_end_negative() {
        let (mut book, store) = fixture();
        place(&mut book, &store, "pc2.0", BetType::Leopard, 100, 120);

        // 5+5+5: leopard pays 50x.
        let result = derive("x555", 120, 0);
        let batch = settle(&mut book, &store, &result, 0);
        assert_eq!(batch.total_payout, 5_000);
        assert_eq!(book.balances.house, 100 - 5_000);
    }
}
