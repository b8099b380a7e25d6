//! Administrative store for per-game configuration.
//!
//! Readers take `Arc` snapshots; writers build a replacement config and swap
//! the `Arc` under the lock, so a reader can never observe a config
//! mid-write. Multi-game writes (limits) validate everything first and swap
//! all targets in one critical section.

use pc28_types::{AdminError, BetType, Decimal, GameConfig, GameStatus};
use std::sync::{Arc, PoisonError, RwLock};

pub struct ConfigStore {
    // Vec, not a map: the catalog is tiny and display order matters.
    games: RwLock<Vec<Arc<GameConfig>>>,
}

impl ConfigStore {
    /// Build a store from a catalog, validating each game's invariants.
    pub fn new(games: Vec<GameConfig>) -> Result<Self, AdminError> {
        for game in &games {
            check_game(game)?;
        }
        Ok(Self {
            games: RwLock::new(games.into_iter().map(Arc::new).collect()),
        })
    }

    /// Snapshot one game's config.
    pub fn get(&self, game_id: &str) -> Option<Arc<GameConfig>> {
        self.read().iter().find(|g| g.id == game_id).cloned()
    }

    /// Snapshot the full catalog in display order.
    pub fn games(&self) -> Vec<Arc<GameConfig>> {
        self.read().clone()
    }

    /// Snapshot the catalog as players see it (hidden games excluded).
    pub fn visible_games(&self) -> Vec<Arc<GameConfig>> {
        self.read()
            .iter()
            .filter(|g| g.status != GameStatus::Hidden)
            .cloned()
            .collect()
    }

    /// Change the quoted odds for one bet type of one game.
    pub fn apply_odds_change(
        &self,
        game_id: &str,
        bet_type: BetType,
        odds: Decimal,
    ) -> Result<(), AdminError> {
        if !odds.is_positive() {
            return Err(AdminError::NonPositiveOdds(odds));
        }
        self.update(game_id, |game| {
            let entry = game
                .odds
                .iter_mut()
                .find(|o| o.bet_type == bet_type)
                .ok_or(AdminError::UnknownBetType(bet_type))?;
            entry.odds = odds;
            Ok(())
        })
    }

    /// Set a game's operational status.
    pub fn set_status(&self, game_id: &str, status: GameStatus) -> Result<(), AdminError> {
        self.update(game_id, |game| {
            game.status = status;
            Ok(())
        })
    }

    /// Configure the sum 13/14 odds override.
    pub fn set_special_rules(
        &self,
        game_id: &str,
        enabled: bool,
        single_odds: Decimal,
        combo_odds: Decimal,
    ) -> Result<(), AdminError> {
        if enabled && !single_odds.is_positive() {
            return Err(AdminError::NonPositiveOdds(single_odds));
        }
        if enabled && !combo_odds.is_positive() {
            return Err(AdminError::NonPositiveOdds(combo_odds));
        }
        self.update(game_id, |game| {
            game.special_rules_enabled = enabled;
            game.special_single_odds = single_odds;
            game.special_combo_odds = combo_odds;
            Ok(())
        })
    }

    /// Apply betting limits to a set of games, all or nothing.
    pub fn apply_limits(&self, game_ids: &[String], min: u64, max: u64) -> Result<(), AdminError> {
        if game_ids.is_empty() {
            return Err(AdminError::EmptySelection);
        }
        if max < min {
            return Err(AdminError::InvalidLimits { min, max });
        }

        let mut games = self.write();
        // Validate every target before touching any of them.
        for id in game_ids {
            if !games.iter().any(|g| g.id == *id) {
                return Err(AdminError::UnknownGame(id.clone()));
            }
        }
        for game in games.iter_mut() {
            if game_ids.contains(&game.id) {
                let mut updated = GameConfig::clone(game);
                updated.min_bet = min;
                updated.max_bet = max;
                *game = Arc::new(updated);
            }
        }
        Ok(())
    }

    fn update<F>(&self, game_id: &str, mutate: F) -> Result<(), AdminError>
    where
        F: FnOnce(&mut GameConfig) -> Result<(), AdminError>,
    {
        let mut games = self.write();
        let slot = games
            .iter_mut()
            .find(|g| g.id == game_id)
            .ok_or_else(|| AdminError::UnknownGame(game_id.to_string()))?;
        let mut updated = GameConfig::clone(slot);
        mutate(&mut updated)?;
        *slot = Arc::new(updated);
        Ok(())
    }

    // A poisoned lock only means a writer panicked between building and
    // swapping an Arc; the vector itself is always a complete snapshot.
    fn read(&self) -> std::sync::RwLockReadGuard<'_, Vec<Arc<GameConfig>>> {
        self.games.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Vec<Arc<GameConfig>>> {
        self.games.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn check_game(game: &GameConfig) -> Result<(), AdminError> {
    if game.max_bet < game.min_bet {
        return Err(AdminError::InvalidLimits {
            min: game.min_bet,
            max: game.max_bet,
        });
    }
    for t in BetType::ALL {
        match game.odds_for(t) {
            Some(odds) if odds.is_positive() => {}
            Some(odds) => return Err(AdminError::NonPositiveOdds(odds)),
            None => return Err(AdminError::UnknownBetType(t)),
        }
    }
    Ok(())
}
