//! Round and wager history plus the operator-facing aggregates.

use pc28_types::constants::ROUND_HISTORY_LIMIT;
use pc28_types::{RoundResult, Wager};
use std::collections::VecDeque;

/// Settled records and recent round results.
///
/// Round results are a bounded ring for display; settled wagers are
/// append-only and feed the reporting aggregates.
pub struct History {
    rounds: VecDeque<RoundResult>,
    settled: Vec<Wager>,
}

impl History {
    pub fn new() -> Self {
        Self {
            rounds: VecDeque::with_capacity(ROUND_HISTORY_LIMIT),
            settled: Vec::new(),
        }
    }

    /// Record a round result, newest first, deduplicated by issue.
    pub fn record_round(&mut self, result: RoundResult) {
        if self.rounds.iter().any(|r| r.issue == result.issue) {
            return;
        }
        self.rounds.push_front(result);
        self.rounds.truncate(ROUND_HISTORY_LIMIT);
    }

    /// Append settled wagers, newest batch first.
    pub fn record_settled(&mut self, wagers: &[Wager]) {
        self.settled.extend_from_slice(wagers);
    }

    /// Recent round results, newest first.
    pub fn rounds(&self) -> impl Iterator<Item = &RoundResult> {
        self.rounds.iter()
    }

    pub fn settled(&self) -> &[Wager] {
        &self.settled
    }

    /// Per-issue stake and player profit for one game, newest issue first.
    pub fn recent_issue_report(&self, game_id: &str, limit: usize) -> Vec<IssueReport> {
        let mut reports: Vec<IssueReport> = Vec::new();
        for wager in self.settled.iter().filter(|w| w.game_id == game_id) {
            match reports.iter_mut().find(|r| r.issue == wager.issue) {
                Some(report) => {
                    report.stake = report.stake.saturating_add(wager.amount);
                    report.profit += wager.profit();
                }
                None => reports.push(IssueReport {
                    issue: wager.issue,
                    stake: wager.amount,
                    profit: wager.profit(),
                }),
            }
        }
        reports.sort_by(|a, b| b.issue.cmp(&a.issue));
        reports.truncate(limit);
        reports
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

/// One game's stake and player profit for one settled issue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IssueReport {
    pub issue: u64,
    pub stake: u64,
    /// Player profit: payout minus stake, negative when the house won.
    pub profit: i64,
}

/// Operator dashboard aggregates over settled history and open exposure.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DashboardStats {
    /// Total stake ever settled.
    pub turnover: u64,
    /// Total paid out to the player.
    pub total_payout: u64,
    /// House profit: turnover minus payouts.
    pub net_profit: i64,
    /// Net profit as a percentage of turnover.
    pub house_win_rate: f64,
    /// Stake currently riding on unsettled issues.
    pub current_exposure: u64,
    /// Worst-case return if every pending wager won.
    pub max_potential_payout: u64,
}

impl DashboardStats {
    pub fn compute(settled: &[Wager], current_exposure: u64, max_potential_payout: u64) -> Self {
        let turnover = settled.iter().map(|w| w.amount).fold(0u64, u64::saturating_add);
        let total_payout = settled
            .iter()
            .map(|w| w.payout.unwrap_or(0))
            .fold(0u64, u64::saturating_add);
        let net_profit = turnover as i64 - total_payout as i64;
        let house_win_rate = if turnover > 0 {
            (net_profit as f64 / turnover as f64) * 100.0
        } else {
            0.0
        };
        Self {
            turnover,
            total_payout,
            net_profit,
            house_win_rate,
            current_exposure,
            max_potential_payout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pc28_types::{BetType, Decimal, WagerStatus};

    fn settled_wager(game_id: &str, issue: u64, amount: u64, payout: u64) -> Wager {
        let mut wager = Wager::new(game_id, BetType::Big, amount, Decimal::from_centi(200), issue);
        wager.status = if payout > 0 {
            WagerStatus::Won
        } else {
            WagerStatus::Lost
        };
        wager.payout = Some(payout);
        wager.settled_at = Some(issue * 3_000);
        wager
    }

    fn round(issue: u64) -> RoundResult {
        crate::derive::derive(&format!("hash{issue}"), issue, issue * 3_000)
    }

    #[test]
    fn test_round_ring_caps_and_dedupes() {
        let mut history = History::new();
        for issue in (0..25).map(|i| i * 20) {
            history.record_round(round(issue));
        }
        assert_eq!(history.rounds().count(), ROUND_HISTORY_LIMIT);
        // Newest first.
        assert_eq!(history.rounds().next().unwrap().issue, 480);

        history.record_round(round(480));
        assert_eq!(history.rounds().count(), ROUND_HISTORY_LIMIT);
    }

    #[test]
    fn test_issue_report() {
        let mut history = History::new();
        history.record_settled(&[
            settled_wager("pc2.0", 100, 50, 100), // +50
            settled_wager("pc2.0", 100, 30, 0),   // -30
            settled_wager("pc2.0", 120, 10, 0),   // -10
            settled_wager("netdisk", 120, 99, 0), // other game
        ]);

        let report = history.recent_issue_report("pc2.0", 5);
        assert_eq!(report.len(), 2);
        assert_eq!(
            report[0],
            IssueReport {
                issue: 120,
                stake: 10,
                profit: -10,
            }
        );
        assert_eq!(
            report[1],
            IssueReport {
                issue: 100,
                stake: 80,
                profit: 20,
            }
        );

        let report = history.recent_issue_report("pc2.0", 1);
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].issue, 120);
    }

    #[test]
    fn test_dashboard_stats() {
        let settled = [
            settled_wager("pc2.0", 100, 100, 200),
            settled_wager("pc2.0", 100, 300, 0),
        ];
        let stats = DashboardStats::compute(&settled, 40, 80);
        assert_eq!(stats.turnover, 400);
        assert_eq!(stats.total_payout, 200);
        assert_eq!(stats.net_profit, 200);
        assert!((stats.house_win_rate - 50.0).abs() < f64::EPSILON);
        assert_eq!(stats.current_exposure, 40);
        assert_eq!(stats.max_potential_payout, 80);
    }

    #[test]
    fn test_dashboard_stats_empty() {
        let stats = DashboardStats::compute(&[], 0, 0);
        assert_eq!(stats.net_profit, 0);
        assert_eq!(stats.house_win_rate, 0.0);
    }
}
