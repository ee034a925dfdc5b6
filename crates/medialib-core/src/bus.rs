// ── Change bus ──
//
// Session-wide publish/subscribe for "data changed" notifications.
// Events are typed: a `Target` names what changed, a `ChangeEvent` says how.
// Callbacks run synchronously inside `trigger`, in subscription order;
// async consumers can take a broadcast receiver instead.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::broadcast;
use tracing::trace;

/// Capacity of the async event channel. Lagging receivers drop the oldest events.
const EVENT_CHANNEL_SIZE: usize = 256;

/// Where a collection's data comes from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Source {
    MyDocuments,
    SharedDocuments,
    AppDocuments,
    /// A folder view, keyed by folder path.
    Folder(String),
    Widgets,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MyDocuments => f.write_str("myDocuments"),
            Self::SharedDocuments => f.write_str("sharedDocuments"),
            Self::AppDocuments => f.write_str("appDocuments"),
            Self::Folder(path) => write!(f, "folder[{path}]"),
            Self::Widgets => f.write_str("widgets"),
        }
    }
}

/// Entity kind held by a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CollectionKind {
    Documents,
    Folders,
    Widgets,
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Documents => "documents",
            Self::Folders => "folders",
            Self::Widgets => "widgets",
        })
    }
}

/// What an event is about: one collection, or a whole aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Target {
    Collection { source: Source, kind: CollectionKind },
    Aggregate(Source),
}

impl Target {
    pub fn collection(source: Source, kind: CollectionKind) -> Self {
        Self::Collection { source, kind }
    }

    pub fn source(&self) -> &Source {
        match self {
            Self::Collection { source, .. } | Self::Aggregate(source) => source,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Collection { source, kind } => write!(f, "{source}.{kind}"),
            Self::Aggregate(source) => write!(f, "{source}"),
        }
    }
}

/// A change notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEvent {
    /// A sync completed and the snapshot was replaced.
    Synced(Target),
    /// A sync failed. The previous snapshot is still in place.
    SyncFailed { target: Target, reason: String },
    /// Contents changed outside a sync (folder closed, widgets applied).
    Changed(Target),
}

impl ChangeEvent {
    pub fn target(&self) -> &Target {
        match self {
            Self::Synced(t) | Self::Changed(t) => t,
            Self::SyncFailed { target, .. } => target,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::SyncFailed { .. })
    }
}

impl fmt::Display for ChangeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Synced(t) => write!(f, "{t}.sync"),
            Self::SyncFailed { target, reason } => write!(f, "{target}.sync-failed: {reason}"),
            Self::Changed(t) => write!(f, "{t}.change"),
        }
    }
}

/// Handle returned by [`ChangeBus::on`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Callback = Arc<dyn Fn(&ChangeEvent) + Send + Sync>;

struct Subscriber {
    /// `None` receives every event.
    target: Option<Target>,
    callback: Callback,
}

struct Inner {
    // BTreeMap keyed by a monotonic id keeps subscription order.
    subscribers: RwLock<BTreeMap<SubscriptionId, Subscriber>>,
    next_id: AtomicU64,
    events: broadcast::Sender<ChangeEvent>,
}

/// Cheaply cloneable handle to the session's change bus.
#[derive(Clone)]
pub struct ChangeBus {
    inner: Arc<Inner>,
}

impl ChangeBus {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_SIZE);
        Self {
            inner: Arc::new(Inner {
                subscribers: RwLock::new(BTreeMap::new()),
                next_id: AtomicU64::new(0),
                events,
            }),
        }
    }

    /// Run `callback` for every event about `target`.
    pub fn on<F>(&self, target: Target, callback: F) -> SubscriptionId
    where
        F: Fn(&ChangeEvent) + Send + Sync + 'static,
    {
        self.insert(Some(target), Arc::new(callback))
    }

    /// Run `callback` for every event.
    pub fn on_any<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&ChangeEvent) + Send + Sync + 'static,
    {
        self.insert(None, Arc::new(callback))
    }

    /// Remove a subscription. Returns `false` if it was already gone.
    pub fn off(&self, id: SubscriptionId) -> bool {
        self.inner
            .subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)
            .is_some()
    }

    /// Deliver `event` to matching callbacks, then to broadcast receivers.
    ///
    /// Callbacks are snapshotted before dispatch: one added or removed by a
    /// callback takes effect from the next `trigger`.
    pub fn trigger(&self, event: ChangeEvent) {
        let callbacks: Vec<Callback> = {
            let subs = self
                .inner
                .subscribers
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            subs.values()
                .filter(|s| s.target.as_ref().is_none_or(|t| t == event.target()))
                .map(|s| Arc::clone(&s.callback))
                .collect()
        };

        trace!(event = %event, subscribers = callbacks.len(), "dispatching change event");
        for callback in &callbacks {
            callback(&event);
        }

        // No receivers is not an error.
        let _ = self.inner.events.send(event);
    }

    /// Async receiver of every event triggered from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.inner.events.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner
            .subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn insert(&self, target: Option<Target>, callback: Callback) -> SubscriptionId {
        let id = SubscriptionId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        self.inner
            .subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, Subscriber { target, callback });
        id
    }
}

impl Default for ChangeBus {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ChangeBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeBus")
            .field("subscribers", &self.subscriber_count())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use pretty_assertions::assert_eq;

    use super::*;

    fn docs(source: Source) -> Target {
        Target::collection(source, CollectionKind::Documents)
    }

    #[test]
    fn event_names() {
        let t = Target::collection(Source::Folder("Cours".into()), CollectionKind::Folders);
        assert_eq!(ChangeEvent::Synced(t.clone()).to_string(), "folder[Cours].folders.sync");
        assert_eq!(
            ChangeEvent::Changed(Target::Aggregate(Source::Widgets)).to_string(),
            "widgets.change"
        );
        assert_eq!(
            ChangeEvent::SyncFailed { target: t, reason: "boom".into() }.to_string(),
            "folder[Cours].folders.sync-failed: boom"
        );
    }

    #[test]
    fn callbacks_run_in_subscription_order() {
        let bus = ChangeBus::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        for n in 0..3 {
            let log = Arc::clone(&log);
            bus.on(docs(Source::MyDocuments), move |_| log.lock().unwrap().push(n));
        }

        bus.trigger(ChangeEvent::Synced(docs(Source::MyDocuments)));
        assert_eq!(*log.lock().unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn only_matching_target_is_notified() {
        let bus = ChangeBus::new();
        let hits = Arc::new(AtomicU64::new(0));
        let all = Arc::new(AtomicU64::new(0));
        {
            let hits = Arc::clone(&hits);
            bus.on(docs(Source::AppDocuments), move |_| {
                hits.fetch_add(1, Ordering::SeqCst);
            });
        }
        {
            let all = Arc::clone(&all);
            bus.on_any(move |_| {
                all.fetch_add(1, Ordering::SeqCst);
            });
        }

        bus.trigger(ChangeEvent::Synced(docs(Source::MyDocuments)));
        bus.trigger(ChangeEvent::Synced(docs(Source::AppDocuments)));

        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(all.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn off_removes_subscription() {
        let bus = ChangeBus::new();
        let hits = Arc::new(AtomicU64::new(0));
        let id = {
            let hits = Arc::clone(&hits);
            bus.on_any(move |_| {
                hits.fetch_add(1, Ordering::SeqCst);
            })
        };
        assert!(bus.off(id));
        assert!(!bus.off(id));

        bus.trigger(ChangeEvent::Changed(Target::Aggregate(Source::Widgets)));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn subscribing_during_dispatch_does_not_deadlock() {
        let bus = ChangeBus::new();
        let late = Arc::new(AtomicU64::new(0));
        {
            let inner_bus = bus.clone();
            let late = Arc::clone(&late);
            bus.on_any(move |_| {
                let late = Arc::clone(&late);
                inner_bus.on_any(move |_| {
                    late.fetch_add(1, Ordering::SeqCst);
                });
            });
        }

        bus.trigger(ChangeEvent::Changed(Target::Aggregate(Source::Widgets)));
        // Added during dispatch: not called for the event that added it.
        assert_eq!(late.load(Ordering::SeqCst), 0);
        assert_eq!(bus.subscriber_count(), 2);
    }

    #[tokio::test]
    async fn broadcast_receivers_see_events() {
        let bus = ChangeBus::new();
        let mut rx = bus.subscribe();
        let event = ChangeEvent::Synced(Target::Aggregate(Source::SharedDocuments));
        bus.trigger(event.clone());
        assert_eq!(rx.recv().await.unwrap(), event);
    }
}
