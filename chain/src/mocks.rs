//! Scriptable in-memory chain for tests.

use crate::{ChainError, ChainSource};
use pc28_types::Block;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Default)]
struct Inner {
    blocks: BTreeMap<u64, Block>,
    down: bool,
}

/// A chain whose tip advances when the test says so.
///
/// Blocks are synthesized with deterministic hashes (`mock<height>` plus a
/// caller-chosen suffix), so tests can pin the exact digits a settlement
/// derives from.
#[derive(Clone, Default)]
pub struct MockChain {
    inner: Arc<Mutex<Inner>>,
}

impl MockChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a block with an explicit hash; the highest pushed height is the
    /// tip.
    pub fn push_block(&self, height: u64, hash: &str) {
        let mut inner = self.lock();
        inner.blocks.insert(
            height,
            Block {
                hash: hash.to_string(),
                height,
                timestamp: height * 3_000,
            },
        );
    }

    /// Advance the tip to `height`, synthesizing any missing blocks.
    pub fn advance_to(&self, height: u64) {
        let mut inner = self.lock();
        let start = inner.blocks.keys().next_back().map_or(0, |h| h + 1);
        for h in start..=height {
            inner.blocks.entry(h).or_insert_with(|| Block {
                hash: format!("mock{h}"),
                height: h,
                timestamp: h * 3_000,
            });
        }
    }

    /// Simulate an outage: every fetch fails until cleared.
    pub fn set_down(&self, down: bool) {
        self.lock().down = down;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ChainSource for MockChain {
    async fn latest_block(&self) -> Result<Block, ChainError> {
        let inner = self.lock();
        if inner.down {
            return Err(ChainError::Unavailable("mock outage".to_string()));
        }
        inner
            .blocks
            .values()
            .next_back()
            .cloned()
            .ok_or_else(|| ChainError::Unavailable("mock chain is empty".to_string()))
    }

    async fn block_by_height(&self, height: u64) -> Result<Block, ChainError> {
        let inner = self.lock();
        if inner.down {
            return Err(ChainError::Unavailable("mock outage".to_string()));
        }
        inner
            .blocks
            .get(&height)
            .cloned()
            .ok_or(ChainError::NotFound(height))
    }
}
