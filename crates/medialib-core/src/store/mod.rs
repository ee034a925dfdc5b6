// ── Reactive entity store ──
//
// Snapshot storage with push-based change notification, the per-collection
// sync state machine, and the join barrier aggregates are built on.

mod barrier;
mod collection;
mod state;
mod sync;

pub use barrier::{BarrierOutcome, JoinBarrier};
pub use state::SyncState;
pub use sync::{Collection, Fetcher, fetcher};
