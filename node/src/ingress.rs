//! Command surface for UI and admin layers.
//!
//! Callers hold a cloneable [`Mailbox`]; the poller owns the receiving end
//! and applies commands between chain ticks, so every mutation of the
//! betting book goes through one task.

use pc28_types::{AdminError, BetType, Decimal, GameStatus, RejectReason, Wager};
use tokio::sync::{mpsc, oneshot};

/// Messages sent to the poller.
pub enum Command {
    PlaceBet {
        game_id: String,
        bet_type: BetType,
        amount: u64,
        response: oneshot::Sender<Result<Wager, RejectReason>>,
    },
    CancelAllBets {
        game_id: String,
        response: oneshot::Sender<Result<u64, RejectReason>>,
    },
    CancelBetsByType {
        game_id: String,
        bet_type: BetType,
        response: oneshot::Sender<Result<u64, RejectReason>>,
    },
    UpdateOdds {
        game_id: String,
        bet_type: BetType,
        odds: Decimal,
        response: oneshot::Sender<Result<(), AdminError>>,
    },
    SetGameStatus {
        game_id: String,
        status: GameStatus,
        response: oneshot::Sender<Result<(), AdminError>>,
    },
    SetSpecialRules {
        game_id: String,
        enabled: bool,
        single_odds: Decimal,
        combo_odds: Decimal,
        response: oneshot::Sender<Result<(), AdminError>>,
    },
    ApplyLimits {
        game_ids: Vec<String>,
        min: u64,
        max: u64,
        response: oneshot::Sender<Result<(), AdminError>>,
    },
}

/// Mailbox for the poller.
#[derive(Clone)]
pub struct Mailbox {
    sender: mpsc::Sender<Command>,
}

impl Mailbox {
    pub(crate) fn new(sender: mpsc::Sender<Command>) -> Self {
        Self { sender }
    }

    pub async fn place_bet(
        &self,
        game_id: &str,
        bet_type: BetType,
        amount: u64,
    ) -> Result<Wager, RejectReason> {
        let (response, receiver) = oneshot::channel();
        self.sender
            .send(Command::PlaceBet {
                game_id: game_id.to_string(),
                bet_type,
                amount,
                response,
            })
            .await
            .expect("Failed to send place_bet");
        receiver.await.expect("Failed to receive place_bet")
    }

    pub async fn cancel_all_bets(&self, game_id: &str) -> Result<u64, RejectReason> {
        let (response, receiver) = oneshot::channel();
        self.sender
            .send(Command::CancelAllBets {
                game_id: game_id.to_string(),
                response,
            })
            .await
            .expect("Failed to send cancel_all_bets");
        receiver.await.expect("Failed to receive cancel_all_bets")
    }

    pub async fn cancel_bets_by_type(
        &self,
        game_id: &str,
        bet_type: BetType,
    ) -> Result<u64, RejectReason> {
        let (response, receiver) = oneshot::channel();
        self.sender
            .send(Command::CancelBetsByType {
                game_id: game_id.to_string(),
                bet_type,
                response,
            })
            .await
            .expect("Failed to send cancel_bets_by_type");
        receiver
            .await
            .expect("Failed to receive cancel_bets_by_type")
    }

    pub async fn update_odds(
        &self,
        game_id: &str,
        bet_type: BetType,
        odds: Decimal,
    ) -> Result<(), AdminError> {
        let (response, receiver) = oneshot::channel();
        self.sender
            .send(Command::UpdateOdds {
                game_id: game_id.to_string(),
                bet_type,
                odds,
                response,
            })
            .await
            .expect("Failed to send update_odds");
        receiver.await.expect("Failed to receive update_odds")
    }

    pub async fn set_game_status(
        &self,
        game_id: &str,
        status: GameStatus,
    ) -> Result<(), AdminError> {
        let (response, receiver) = oneshot::channel();
        self.sender
            .send(Command::SetGameStatus {
                game_id: game_id.to_string(),
                status,
                response,
            })
            .await
            .expect("Failed to send set_game_status");
        receiver.await.expect("Failed to receive set_game_status")
    }

    pub async fn set_special_rules(
        &self,
        game_id: &str,
        enabled: bool,
        single_odds: Decimal,
        combo_odds: Decimal,
    ) -> Result<(), AdminError> {
        let (response, receiver) = oneshot::channel();
        self.sender
            .send(Command::SetSpecialRules {
                game_id: game_id.to_string(),
                enabled,
                single_odds,
                combo_odds,
                response,
            })
            .await
            .expect("Failed to send set_special_rules");
        receiver.await.expect("Failed to receive set_special_rules")
    }

    pub async fn apply_limits(
        &self,
        game_ids: Vec<String>,
        min: u64,
        max: u64,
    ) -> Result<(), AdminError> {
        let (response, receiver) = oneshot::channel();
        self.sender
            .send(Command::ApplyLimits {
                game_ids,
                min,
                max,
                response,
            })
            .await
            .expect("Failed to send apply_limits");
        receiver.await.expect("Failed to receive apply_limits")
    }
}
