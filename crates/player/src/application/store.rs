//! Holder of the single authoritative snapshot.
//!
//! Snapshots are replaced wholesale. Each carries the arrival stamp of the
//! response it came from; a stamp that is not newer than the stored one is
//! refused, so the most recently arrived response always wins.

use std::sync::Arc;

use tokio::sync::RwLock;
use wolfpack_domain::GameSnapshot;

#[derive(Debug, Default)]
struct StoreState {
    snapshot: Option<Arc<GameSnapshot>>,
    stamp: u64,
}

#[derive(Debug, Default)]
pub struct GameStateStore {
    inner: RwLock<StoreState>,
}

impl GameStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current snapshot, or `None` before the first successful sync.
    pub async fn current(&self) -> Option<Arc<GameSnapshot>> {
        self.inner.read().await.snapshot.clone()
    }

    /// Stamp of the stored snapshot; 0 when empty.
    pub async fn applied_stamp(&self) -> u64 {
        self.inner.read().await.stamp
    }

    /// Store `snapshot` if `stamp` is newer than what is held.
    pub(crate) async fn apply(&self, stamp: u64, snapshot: Arc<GameSnapshot>) -> bool {
        let mut state = self.inner.write().await;
        if stamp <= state.stamp {
            return false;
        }
        state.snapshot = Some(snapshot);
        state.stamp = stamp;
        true
    }

    /// Forget the snapshot at session end. The stamp is kept so a response
    /// still in flight cannot resurrect it.
    pub(crate) async fn clear(&self) {
        self.inner.write().await.snapshot = None;
    }
}
