use crate::bet::BetType;
use crate::constants::*;
use thiserror::Error;

/// Why a placement or cancellation was refused.
///
/// Every rejection is synchronous and mutates nothing; the calling layer
/// maps `code()` to its own presentation.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RejectReason {
    #[error("game is under maintenance, betting paused")]
    Paused,
    #[error("round is locked, waiting for the draw")]
    RoundLocked,
    #[error("bet amount {amount} is below the minimum {min}")]
    BelowMin { amount: u64, min: u64 },
    #[error("cumulative stake {staked} + {amount} exceeds the per-type limit {limit}")]
    LimitExceeded {
        staked: u64,
        amount: u64,
        limit: u64,
    },
    #[error("insufficient balance: have {balance}, need {required}")]
    InsufficientBalance { balance: u64, required: u64 },
    #[error("unknown game: {0}")]
    UnknownGame(String),
    #[error("game does not quote odds for {0}")]
    UnknownBet(BetType),
}

impl RejectReason {
    /// Stable machine-readable code.
    pub fn code(&self) -> u8 {
        match self {
            RejectReason::Paused => REJECT_PAUSED,
            RejectReason::RoundLocked => REJECT_ROUND_LOCKED,
            RejectReason::BelowMin { .. } => REJECT_BELOW_MIN,
            RejectReason::LimitExceeded { .. } => REJECT_LIMIT_EXCEEDED,
            RejectReason::InsufficientBalance { .. } => REJECT_INSUFFICIENT_BALANCE,
            RejectReason::UnknownGame(_) => REJECT_UNKNOWN_GAME,
            RejectReason::UnknownBet(_) => REJECT_UNKNOWN_BET,
        }
    }
}

/// Why an administrative config write was refused.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AdminError {
    #[error("unknown game: {0}")]
    UnknownGame(String),
    #[error("no games selected")]
    EmptySelection,
    #[error("invalid limits: min {min} > max {max}")]
    InvalidLimits { min: u64, max: u64 },
    #[error("game does not quote odds for {0}")]
    UnknownBetType(BetType),
    #[error("odds must be positive, got {0}")]
    NonPositiveOdds(crate::fixed::Decimal),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_distinct() {
        let reasons = [
            RejectReason::Paused,
            RejectReason::RoundLocked,
            RejectReason::BelowMin { amount: 5, min: 10 },
            RejectReason::LimitExceeded {
                staked: 90,
                amount: 20,
                limit: 100,
            },
            RejectReason::InsufficientBalance {
                balance: 1,
                required: 10,
            },
            RejectReason::UnknownGame("x".into()),
            RejectReason::UnknownBet(BetType::Big),
        ];
        let mut codes: Vec<u8> = reasons.iter().map(|r| r.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), reasons.len());
    }

    #[test]
    fn test_messages_carry_context() {
        let reason = RejectReason::LimitExceeded {
            staked: 90,
            amount: 20,
            limit: 100,
        };
        let message = reason.to_string();
        assert!(message.contains("90"));
        assert!(message.contains("20"));
        assert!(message.contains("100"));
    }
}
