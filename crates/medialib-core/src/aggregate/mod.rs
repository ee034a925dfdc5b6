// ── Aggregates ──
//
// Each aggregate owns one or more collections and turns their individual
// sync outcomes into a single aggregate event through a `JoinBarrier`.
// Collection fetches are polled concurrently; completion order is free.

mod app_documents;
mod folder_view;
mod my_documents;
mod shared_documents;
mod widgets;

pub use app_documents::AppDocuments;
pub use folder_view::FolderView;
pub use my_documents::MyDocuments;
pub use shared_documents::SharedDocuments;
pub use widgets::Widgets;

use futures_util::StreamExt;
use futures_util::future::BoxFuture;
use futures_util::stream::FuturesUnordered;
use tracing::{debug, warn};

use crate::bus::{ChangeBus, ChangeEvent, CollectionKind, Source, Target};
use crate::error::CoreError;
use crate::store::{BarrierOutcome, JoinBarrier};

type PendingSync<'a> = (CollectionKind, BoxFuture<'a, Result<usize, CoreError>>);

/// Drive every collection sync of `source` and announce the joined outcome.
///
/// Triggers exactly one `Synced` or `SyncFailed` for the aggregate, after
/// the last collection settled.
pub(crate) async fn join_syncs(
    bus: &ChangeBus,
    source: &Source,
    syncs: Vec<PendingSync<'_>>,
) -> Result<(), CoreError> {
    let target = Target::Aggregate(source.clone());
    let mut barrier = JoinBarrier::new(syncs.iter().map(|(kind, _)| *kind));
    let mut pending: FuturesUnordered<_> = syncs
        .into_iter()
        .map(|(kind, sync)| async move { (kind, sync.await) })
        .collect();

    let mut outcome = None;
    while let Some((kind, result)) = pending.next().await {
        debug!(aggregate = %source, %kind, ok = result.is_ok(), "collection settled");
        let arrival = result.map(|_| ()).map_err(|e| e.to_string());
        if let Some(resolved) = barrier.arrive(kind, arrival) {
            outcome = Some(resolved);
        }
    }

    // An aggregate with no collections has nothing to wait for.
    match outcome.unwrap_or(BarrierOutcome::Complete) {
        BarrierOutcome::Complete => {
            bus.trigger(ChangeEvent::Synced(target));
            Ok(())
        }
        failed @ BarrierOutcome::Failed(_) => {
            let reason = failed.reason().unwrap_or_default();
            warn!(aggregate = %source, %reason, "aggregate sync failed");
            bus.trigger(ChangeEvent::SyncFailed {
                target: target.clone(),
                reason: reason.clone(),
            });
            Err(CoreError::SyncFailed {
                target: target.to_string(),
                reason,
            })
        }
    }
}
