use crate::fixed::Decimal;
use crate::result::{Parity, ResultAttributes, Size};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// The closed set of bet types.
///
/// Each type carries a fixed winning predicate over [`ResultAttributes`];
/// odds are configured per game, never here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BetType {
    Big,
    Small,
    Odd,
    Even,
    BigOdd,
    BigEven,
    SmallOdd,
    SmallEven,
    Pair,
    Leopard,
}

impl BetType {
    /// All bet types, in board display order.
    pub const ALL: [BetType; 10] = [
        BetType::Big,
        BetType::Small,
        BetType::Odd,
        BetType::Even,
        BetType::BigOdd,
        BetType::BigEven,
        BetType::SmallOdd,
        BetType::SmallEven,
        BetType::Pair,
        BetType::Leopard,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BetType::Big => "big",
            BetType::Small => "small",
            BetType::Odd => "odd",
            BetType::Even => "even",
            BetType::BigOdd => "big_odd",
            BetType::BigEven => "big_even",
            BetType::SmallOdd => "small_odd",
            BetType::SmallEven => "small_even",
            BetType::Pair => "pair",
            BetType::Leopard => "leopard",
        }
    }

    /// Board label shown to players.
    pub fn label(&self) -> &'static str {
        match self {
            BetType::Big => "大",
            BetType::Small => "小",
            BetType::Odd => "单",
            BetType::Even => "双",
            BetType::BigOdd => "大单",
            BetType::BigEven => "大双",
            BetType::SmallOdd => "小单",
            BetType::SmallEven => "小双",
            BetType::Pair => "对子",
            BetType::Leopard => "豹子",
        }
    }

    /// Whether this bet wins against the given round attributes.
    pub fn wins(&self, attrs: &ResultAttributes) -> bool {
        match self {
            BetType::Big => attrs.size == Size::Big,
            BetType::Small => attrs.size == Size::Small,
            BetType::Odd => attrs.parity == Parity::Odd,
            BetType::Even => attrs.parity == Parity::Even,
            BetType::BigOdd => attrs.size == Size::Big && attrs.parity == Parity::Odd,
            BetType::BigEven => attrs.size == Size::Big && attrs.parity == Parity::Even,
            BetType::SmallOdd => attrs.size == Size::Small && attrs.parity == Parity::Odd,
            BetType::SmallEven => attrs.size == Size::Small && attrs.parity == Parity::Even,
            BetType::Pair => attrs.is_pair,
            BetType::Leopard => attrs.is_leopard,
        }
    }
}

impl fmt::Display for BetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BetType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BetType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or(())
    }
}

/// Lifecycle of a wager.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WagerStatus {
    Pending,
    Won,
    Lost,
}

/// A single wager.
///
/// Created pending by the ledger; settled exactly once (status, payout and
/// `settled_at` set together), never mutated again afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Wager {
    pub id: Uuid,
    pub game_id: String,
    pub bet_type: BetType,
    pub label: String,
    /// Stake in chips, always positive.
    pub amount: u64,
    /// Odds snapshotted from the game config at placement time.
    pub odds: Decimal,
    pub status: WagerStatus,
    /// The issue this wager is riding on.
    pub issue: u64,
    /// Total return (stake x odds) if won, 0 if lost. None while pending.
    pub payout: Option<u64>,
    /// Settlement timestamp in milliseconds. None while pending.
    pub settled_at: Option<u64>,
}

impl Wager {
    pub fn new(game_id: &str, bet_type: BetType, amount: u64, odds: Decimal, issue: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            game_id: game_id.to_string(),
            bet_type,
            label: bet_type.label().to_string(),
            amount,
            odds,
            status: WagerStatus::Pending,
            issue,
            payout: None,
            settled_at: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == WagerStatus::Pending
    }

    /// Net result for the player: payout minus stake. Zero while pending.
    pub fn profit(&self) -> i64 {
        match self.status {
            WagerStatus::Pending => 0,
            _ => self.payout.unwrap_or(0) as i64 - self.amount as i64,
        }
    }
}
