// ── Collection: snapshot + sync state machine ──
//
// One fetch in flight at a time. `sync()` while `Fetching` waits for the
// running fetch and shares its outcome instead of issuing a second request.

use std::future::Future;
use std::sync::Arc;

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use tokio::sync::watch;
use tracing::{debug, warn};

use super::collection::EntityCollection;
use super::state::SyncState;
use crate::bus::{ChangeBus, ChangeEvent, Target};
use crate::error::CoreError;
use crate::model::Entity;
use crate::stream::EntityStream;

/// Produces a fresh batch of entities for one collection.
pub type Fetcher<T> =
    Arc<dyn Fn() -> BoxFuture<'static, Result<Vec<T>, CoreError>> + Send + Sync>;

/// Wrap an async closure as a [`Fetcher`].
pub fn fetcher<T, F, Fut>(f: F) -> Fetcher<T>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Vec<T>, CoreError>> + Send + 'static,
{
    Arc::new(move || f().boxed())
}

/// An ordered, de-duplicated set of one entity kind, owned by an aggregate.
pub struct Collection<T: Entity> {
    target: Target,
    entities: EntityCollection<T>,
    state: watch::Sender<SyncState>,
    fetch: Fetcher<T>,
    bus: ChangeBus,
}

impl<T: Entity> Collection<T> {
    pub fn new(target: Target, bus: ChangeBus, fetch: Fetcher<T>) -> Self {
        let (state, _) = watch::channel(SyncState::Idle);
        Self {
            target,
            entities: EntityCollection::new(),
            state,
            fetch,
            bus,
        }
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Fetch and replace the contents. Returns the new entity count.
    ///
    /// On success the snapshot is replaced and `Synced` is triggered. On
    /// failure the snapshot is left untouched, the state becomes `Failed`
    /// and `SyncFailed` is triggered with the reason.
    pub async fn sync(&self) -> Result<usize, CoreError> {
        // Subscribed before the transition so a joiner cannot miss it.
        let rx = self.state.subscribe();
        let started = self.state.send_if_modified(|state| {
            if state.is_fetching() {
                return false;
            }
            *state = SyncState::Fetching;
            true
        });
        if !started {
            debug!(collection = %self.target, "joining in-flight sync");
            return self.settled(rx).await;
        }

        debug!(collection = %self.target, "sync started");
        let guard = InFlight {
            state: &self.state,
            armed: true,
        };
        let result = (self.fetch)().await;
        guard.disarm();

        match result {
            Ok(items) => {
                let count = self.entities.replace(items);
                self.state.send_replace(SyncState::ready(count));
                debug!(collection = %self.target, count, "sync complete");
                self.bus.trigger(ChangeEvent::Synced(self.target.clone()));
                Ok(count)
            }
            Err(e) => {
                let reason = e.to_string();
                self.state.send_replace(SyncState::failed(reason.clone()));
                warn!(collection = %self.target, error = %e, "sync failed, keeping previous snapshot");
                self.bus.trigger(ChangeEvent::SyncFailed {
                    target: self.target.clone(),
                    reason,
                });
                Err(e)
            }
        }
    }

    /// Wait for the in-flight fetch and report its outcome.
    async fn settled(&self, mut rx: watch::Receiver<SyncState>) -> Result<usize, CoreError> {
        let state = rx
            .wait_for(|s| !s.is_fetching())
            .await
            .map_err(|_| CoreError::Internal("collection dropped during sync".into()))?
            .clone();

        match state {
            SyncState::Ready { count, .. } => Ok(count),
            SyncState::Failed { reason, .. } => Err(CoreError::SyncFailed {
                target: self.target.to_string(),
                reason,
            }),
            SyncState::Idle | SyncState::Fetching => Err(CoreError::Internal(format!(
                "{} settled without an outcome",
                self.target
            ))),
        }
    }

    // ── Reads ────────────────────────────────────────────────────────

    pub fn snapshot(&self) -> Arc<Vec<Arc<T>>> {
        self.entities.snapshot()
    }

    pub fn subscribe(&self) -> EntityStream<T> {
        EntityStream::new(self.entities.subscribe())
    }

    /// Look up by portal id; accepts an `&EntityId` or a plain `&str`.
    pub fn get(&self, id: impl AsRef<str>) -> Option<Arc<T>> {
        self.entities.get_by_id(id.as_ref())
    }

    pub fn find(&self, predicate: impl Fn(&T) -> bool) -> Option<Arc<T>> {
        self.snapshot().iter().find(|e| predicate(e)).cloned()
    }

    pub fn filter(&self, predicate: impl Fn(&T) -> bool) -> Vec<Arc<T>> {
        self.snapshot()
            .iter()
            .filter(|e| predicate(e))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Bumped on every replacement or clear.
    pub fn version(&self) -> u64 {
        self.entities.version()
    }

    pub fn state(&self) -> SyncState {
        self.state.borrow().clone()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<SyncState> {
        self.state.subscribe()
    }

    /// Drop the contents without fetching. State is left as is.
    pub(crate) fn clear(&self) {
        self.entities.clear();
    }
}

/// Resets `Fetching` if the owning `sync()` future is dropped mid-fetch,
/// so joiners observe a failure instead of waiting forever.
struct InFlight<'a> {
    state: &'a watch::Sender<SyncState>,
    armed: bool,
}

impl InFlight<'_> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.state.send_replace(SyncState::failed("sync cancelled"));
        }
    }
}
