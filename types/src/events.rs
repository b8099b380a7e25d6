use crate::bet::Wager;
use crate::reject::RejectReason;
use crate::result::RoundResult;

/// Events emitted by the engine for display layers to render.
#[derive(Clone, Debug)]
pub enum Event {
    /// The observed chain tip moved the round state.
    RoundAdvanced { issue: u64, blocks_remaining: u64 },
    /// An issue finalized and its wagers were settled.
    RoundSettled {
        result: RoundResult,
        wagers: Vec<Wager>,
    },
    /// A bet was refused; mirrors the synchronous error for passive
    /// observers (toasts, dashboards).
    BetRejected {
        game_id: String,
        reason: RejectReason,
    },
}
