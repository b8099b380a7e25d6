//! Chain tip poller: the one periodic task that drives rounds forward.
//!
//! Each tick fetches the tip under a bounded timeout; any failure skips the
//! cycle and the next tick retries, so a slow or dead node never wedges the
//! cadence. When the tip crosses a round boundary the finalizing block is
//! fetched (by height if the tip already moved past it), derived, and
//! settled exactly once.

use crate::ingress::{Command, Mailbox};
use crate::ValidatedConfig;
use pc28_chain::ChainSource;
use pc28_engine::{derive::derive_block, RoundState, SharedEngine};
use pc28_types::{Block, Event, RejectReason};
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tokio::time::{self, timeout, MissedTickBehavior};
use tracing::{debug, info, warn};

const MAILBOX_SIZE: usize = 64;
const EVENT_CHANNEL_CAPACITY: usize = 1_024;

pub struct Poller<C: ChainSource> {
    chain: C,
    engine: SharedEngine,

    poll_interval: Duration,
    fetch_timeout: Duration,
    blocks_per_issue: u64,
    lock_margin: u64,

    commands: mpsc::Receiver<Command>,
    events: broadcast::Sender<Event>,

    /// Round state at the last successfully observed tip.
    round: Option<RoundState>,
    /// Highest issue already fed to settlement.
    last_finalized: Option<u64>,
}

impl<C: ChainSource> Poller<C> {
    pub fn new(
        chain: C,
        engine: SharedEngine,
        config: &ValidatedConfig,
    ) -> (Self, Mailbox, broadcast::Receiver<Event>) {
        let (command_tx, command_rx) = mpsc::channel(MAILBOX_SIZE);
        let (event_tx, event_rx) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let poller = Self {
            chain,
            engine,
            poll_interval: config.poll_interval,
            fetch_timeout: config.fetch_timeout,
            blocks_per_issue: config.blocks_per_issue,
            lock_margin: config.lock_margin,
            commands: command_rx,
            events: event_tx,
            round: None,
            last_finalized: None,
        };
        (poller, Mailbox::new(command_tx), event_rx)
    }

    /// Run until every mailbox handle is dropped.
    pub async fn run(mut self) {
        let mut ticker = time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = ticker.tick() => self.tick().await,
                command = self.commands.recv() => match command {
                    Some(command) => self.handle_command(command),
                    None => {
                        info!("command mailbox closed, shutting down poller");
                        break;
                    }
                },
            }
        }
    }

    /// One poll cycle. Fetch failures are logged and skipped, never fatal.
    pub(crate) async fn tick(&mut self) {
        let tip = match timeout(self.fetch_timeout, self.chain.latest_block()).await {
            Ok(Ok(block)) => block,
            Ok(Err(e)) => {
                warn!(error = %e, "tip fetch failed, skipping cycle");
                return;
            }
            Err(_) => {
                warn!("tip fetch timed out, skipping cycle");
                return;
            }
        };

        let round = RoundState::at(tip.height, self.blocks_per_issue, self.lock_margin);
        if self.round != Some(round) {
            debug!(
                tip = tip.height,
                next_issue = round.next_issue,
                blocks_remaining = round.blocks_remaining,
                locked = round.locked,
                "round advanced"
            );
            self.round = Some(round);
            self.emit(Event::RoundAdvanced {
                issue: round.next_issue,
                blocks_remaining: round.blocks_remaining,
            });
        }

        // On a cold start the first observed boundary becomes the first
        // settleable issue; nothing older is back-filled.
        let boundary = round.current_issue;
        if self.last_finalized.map_or(true, |finalized| finalized < boundary) {
            self.finalize(boundary, &tip).await;
        }
    }

    /// Fetch the finalizing block for `issue`, derive its result and settle.
    ///
    /// When the poll cadence is coarser than block production the tip has
    /// usually moved past the boundary already, so the boundary block is
    /// fetched by height rather than assumed to be the tip. On fetch failure
    /// `last_finalized` is not advanced and the next tick retries.
    async fn finalize(&mut self, issue: u64, tip: &Block) {
        let block = if tip.height == issue {
            tip.clone()
        } else {
            match timeout(self.fetch_timeout, self.chain.block_by_height(issue)).await {
                Ok(Ok(block)) => block,
                Ok(Err(e)) => {
                    warn!(issue, error = %e, "finalizing block fetch failed, retrying next cycle");
                    return;
                }
                Err(_) => {
                    warn!(issue, "finalizing block fetch timed out, retrying next cycle");
                    return;
                }
            }
        };

        let result = derive_block(&block);
        self.last_finalized = Some(issue);
        let batch = self.engine.settle_round(&result);
        self.emit(Event::RoundSettled {
            result,
            wagers: batch.wagers,
        });
    }

    pub(crate) fn handle_command(&mut self, command: Command) {
        match command {
            Command::PlaceBet {
                game_id,
                bet_type,
                amount,
                response,
            } => {
                let result = match &self.round {
                    Some(round) => self.engine.place_bet(&game_id, bet_type, amount, round),
                    // No tip observed yet: betting is not open.
                    None => Err(RejectReason::RoundLocked),
                };
                if let Err(reason) = &result {
                    self.emit(Event::BetRejected {
                        game_id: game_id.clone(),
                        reason: reason.clone(),
                    });
                }
                let _ = response.send(result);
            }
            Command::CancelAllBets { game_id, response } => {
                let result = match &self.round {
                    Some(round) => self.engine.cancel_all_bets(&game_id, round),
                    None => Err(RejectReason::RoundLocked),
                };
                if let Err(reason) = &result {
                    self.emit(Event::BetRejected {
                        game_id: game_id.clone(),
                        reason: reason.clone(),
                    });
                }
                let _ = response.send(result);
            }
            Command::CancelBetsByType {
                game_id,
                bet_type,
                response,
            } => {
                let result = match &self.round {
                    Some(round) => self.engine.cancel_bets_by_type(&game_id, bet_type, round),
                    None => Err(RejectReason::RoundLocked),
                };
                if let Err(reason) = &result {
                    self.emit(Event::BetRejected {
                        game_id: game_id.clone(),
                        reason: reason.clone(),
                    });
                }
                let _ = response.send(result);
            }
            Command::UpdateOdds {
                game_id,
                bet_type,
                odds,
                response,
            } => {
                let result = self.engine.update_odds(&game_id, bet_type, odds);
                if result.is_ok() {
                    info!(%game_id, %bet_type, %odds, "odds updated");
                }
                let _ = response.send(result);
            }
            Command::SetGameStatus {
                game_id,
                status,
                response,
            } => {
                let result = self.engine.set_game_status(&game_id, status);
                if result.is_ok() {
                    info!(%game_id, ?status, "game status updated");
                }
                let _ = response.send(result);
            }
            Command::SetSpecialRules {
                game_id,
                enabled,
                single_odds,
                combo_odds,
                response,
            } => {
                let result = self
                    .engine
                    .set_special_rules(&game_id, enabled, single_odds, combo_odds);
                if result.is_ok() {
                    info!(%game_id, enabled, "special rules updated");
                }
                let _ = response.send(result);
            }
            Command::ApplyLimits {
                game_ids,
                min,
                max,
                response,
            } => {
                let result = self.engine.apply_limits(&game_ids, min, max);
                if result.is_ok() {
                    info!(games = game_ids.len(), min, max, "limits applied");
                }
                let _ = response.send(result);
            }
        }
    }

    fn emit(&self, event: Event) {
        if self.events.send(event).is_err() {
            debug!("no event subscribers");
        }
    }
}
