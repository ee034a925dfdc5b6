use chrono::{DateTime, Utc};

/// Lifecycle of a single collection's sync.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SyncState {
    /// Never synced.
    #[default]
    Idle,
    /// A fetch is in flight. Further `sync()` calls join it.
    Fetching,
    /// Last fetch succeeded with `count` entities.
    Ready { at: DateTime<Utc>, count: usize },
    /// Last fetch failed. The previous snapshot is still served.
    Failed { at: DateTime<Utc>, reason: String },
}

impl SyncState {
    pub fn is_fetching(&self) -> bool {
        matches!(self, Self::Fetching)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Time of the last settled fetch, successful or not.
    pub fn settled_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Ready { at, .. } | Self::Failed { at, .. } => Some(*at),
            Self::Idle | Self::Fetching => None,
        }
    }

    pub(crate) fn ready(count: usize) -> Self {
        Self::Ready {
            at: Utc::now(),
            count,
        }
    }

    pub(crate) fn failed(reason: impl Into<String>) -> Self {
        Self::Failed {
            at: Utc::now(),
            reason: reason.into(),
        }
    }
}
