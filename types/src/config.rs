use crate::bet::BetType;
use crate::fixed::Decimal;
use serde::{Deserialize, Serialize};

/// Operational status of a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    /// Open for betting.
    Active,
    /// Visible but paused; no placements or cancellations accepted.
    Maintenance,
    /// Not listed to players at all.
    Hidden,
}

impl GameStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, GameStatus::Active)
    }
}

/// One entry of a game's odds table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BetOption {
    #[serde(rename = "type")]
    pub bet_type: BetType,
    pub label: String,
    pub odds: Decimal,
}

impl BetOption {
    fn new(bet_type: BetType, centi_odds: i64) -> Self {
        Self {
            bet_type,
            label: bet_type.label().to_string(),
            odds: Decimal::from_centi(centi_odds),
        }
    }
}

/// Per-game configuration.
///
/// Mutated only through the config store, which replaces the whole value
/// atomically; everything reading odds or limits holds a snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub status: GameStatus,
    pub odds: Vec<BetOption>,
    pub min_bet: u64,
    pub max_bet: u64,
    /// Toggle for the sum 13/14 odds override.
    pub special_rules_enabled: bool,
    /// Override for big/small/odd/even when the special sum matches.
    pub special_single_odds: Decimal,
    /// Override for big_even/small_odd when the special sum matches.
    pub special_combo_odds: Decimal,
}

impl GameConfig {
    /// Snapshot odds for a bet type, if the table carries it.
    pub fn odds_for(&self, bet_type: BetType) -> Option<Decimal> {
        self.odds
            .iter()
            .find(|o| o.bet_type == bet_type)
            .map(|o| o.odds)
    }
}

/// Standard odds table.
pub fn default_bet_odds() -> Vec<BetOption> {
    vec![
        BetOption::new(BetType::Big, 200),
        BetOption::new(BetType::Small, 200),
        BetOption::new(BetType::Odd, 200),
        BetOption::new(BetType::Even, 200),
        BetOption::new(BetType::BigOdd, 380),
        BetOption::new(BetType::BigEven, 380),
        BetOption::new(BetType::SmallOdd, 380),
        BetOption::new(BetType::SmallEven, 380),
        BetOption::new(BetType::Pair, 300),
        BetOption::new(BetType::Leopard, 5000),
    ]
}

/// Higher odds table for the "full odds" game.
pub fn high_bet_odds() -> Vec<BetOption> {
    vec![
        BetOption::new(BetType::Big, 205),
        BetOption::new(BetType::Small, 205),
        BetOption::new(BetType::Odd, 205),
        BetOption::new(BetType::Even, 205),
        BetOption::new(BetType::BigOdd, 420),
        BetOption::new(BetType::BigEven, 420),
        BetOption::new(BetType::SmallOdd, 420),
        BetOption::new(BetType::SmallEven, 420),
        BetOption::new(BetType::Pair, 350),
        BetOption::new(BetType::Leopard, 6000),
    ]
}

/// The stock game catalog.
pub fn default_games() -> Vec<GameConfig> {
    let base = GameConfig {
        id: String::new(),
        name: String::new(),
        description: String::new(),
        status: GameStatus::Active,
        odds: default_bet_odds(),
        min_bet: 10,
        max_bet: 50_000,
        special_rules_enabled: true,
        special_single_odds: Decimal::from_centi(198),
        special_combo_odds: Decimal::from_centi(160),
    };
    vec![
        GameConfig {
            id: "pc2.0".into(),
            name: "Nile PC 2.0".into(),
            description: "经典区块哈希玩法，实时开奖".into(),
            ..base.clone()
        },
        GameConfig {
            id: "netdisk".into(),
            name: "网盘 PC28".into(),
            description: "超高赔率，极速体验".into(),
            ..base.clone()
        },
        GameConfig {
            id: "pure".into(),
            name: "纯流水 PC28".into(),
            description: "零抽水，纯粹博弈".into(),
            special_rules_enabled: false,
            ..base.clone()
        },
        GameConfig {
            id: "full".into(),
            name: "满赔率 PC28".into(),
            description: "全网最高赔率".into(),
            odds: high_bet_odds(),
            // Higher entry and lower cap to bound exposure at high odds.
            min_bet: 100,
            max_bet: 20_000,
            ..base
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog() {
        let games = default_games();
        assert_eq!(games.len(), 4);
        for game in &games {
            assert!(game.min_bet <= game.max_bet);
            // Every bet type is quoted exactly once.
            for t in BetType::ALL {
                assert_eq!(game.odds.iter().filter(|o| o.bet_type == t).count(), 1);
            }
        }
    }

    #[test]
    fn test_pure_game_has_special_rules_off() {
        let games = default_games();
        let pure = games.iter().find(|g| g.id == "pure").unwrap();
        assert!(!pure.special_rules_enabled);
    }

    #[test]
    fn test_odds_for() {
        let games = default_games();
        let full = games.iter().find(|g| g.id == "full").unwrap();
        assert_eq!(
            full.odds_for(BetType::Leopard),
            Some(Decimal::from_centi(6000))
        );
        assert_eq!(full.odds_for(BetType::Big), Some(Decimal::from_centi(205)));
    }

    #[test]
    fn test_yaml_round_trip() {
        // GameConfig is what node configs override, so the serde surface
        // matters: bet types as snake_case strings, odds as decimals.
        let games = default_games();
        let encoded = serde_yaml::to_string(&games).unwrap();
        assert!(encoded.contains("big_odd"));
        assert!(encoded.contains("'3.8'"));
        let decoded: Vec<GameConfig> = serde_yaml::from_str(&encoded).unwrap();
        assert_eq!(decoded, games);
    }
}
