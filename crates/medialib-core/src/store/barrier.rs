// ── Join barrier ──
//
// Counts down N pending collection syncs and resolves exactly once, when
// the last of them settles. Arrival order does not matter.

use std::collections::BTreeSet;

use crate::bus::CollectionKind;

/// How a barrier resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BarrierOutcome {
    /// Every collection synced.
    Complete,
    /// At least one collection failed, with its reason.
    Failed(Vec<(CollectionKind, String)>),
}

impl BarrierOutcome {
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete)
    }

    /// `"documents: timeout; folders: forbidden"`
    pub fn reason(&self) -> Option<String> {
        match self {
            Self::Complete => None,
            Self::Failed(failures) => Some(
                failures
                    .iter()
                    .map(|(kind, reason)| format!("{kind}: {reason}"))
                    .collect::<Vec<_>>()
                    .join("; "),
            ),
        }
    }
}

#[derive(Debug)]
pub struct JoinBarrier {
    pending: BTreeSet<CollectionKind>,
    failures: Vec<(CollectionKind, String)>,
    fired: bool,
}

impl JoinBarrier {
    pub fn new(kinds: impl IntoIterator<Item = CollectionKind>) -> Self {
        Self {
            pending: kinds.into_iter().collect(),
            failures: Vec::new(),
            fired: false,
        }
    }

    /// Record that `kind` settled.
    ///
    /// Returns the outcome on the arrival that empties the barrier and
    /// `None` otherwise. Repeated arrivals for a kind, arrivals for kinds
    /// the barrier never waited on, and anything after it fired are ignored.
    pub fn arrive(
        &mut self,
        kind: CollectionKind,
        result: Result<(), String>,
    ) -> Option<BarrierOutcome> {
        if self.fired || !self.pending.remove(&kind) {
            return None;
        }
        if let Err(reason) = result {
            self.failures.push((kind, reason));
        }
        if !self.pending.is_empty() {
            return None;
        }

        self.fired = true;
        if self.failures.is_empty() {
            Some(BarrierOutcome::Complete)
        } else {
            Some(BarrierOutcome::Failed(std::mem::take(&mut self.failures)))
        }
    }

    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    pub fn is_complete(&self) -> bool {
        self.fired
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use CollectionKind::{Documents, Folders, Widgets};

    #[test]
    fn single_collection_passes_through() {
        let mut barrier = JoinBarrier::new([Documents]);
        assert_eq!(barrier.arrive(Documents, Ok(())), Some(BarrierOutcome::Complete));
        assert!(barrier.is_complete());
    }

    #[test]
    fn fires_after_both_in_either_order() {
        for order in [[Folders, Documents], [Documents, Folders]] {
            let mut barrier = JoinBarrier::new([Folders, Documents]);
            assert_eq!(barrier.arrive(order[0], Ok(())), None);
            assert_eq!(barrier.remaining(), 1);
            assert_eq!(barrier.arrive(order[1], Ok(())), Some(BarrierOutcome::Complete));
        }
    }

    #[test]
    fn duplicate_arrival_does_not_count_twice() {
        let mut barrier = JoinBarrier::new([Folders, Documents]);
        assert_eq!(barrier.arrive(Folders, Ok(())), None);
        assert_eq!(barrier.arrive(Folders, Ok(())), None);
        assert!(!barrier.is_complete());
        assert_eq!(barrier.arrive(Documents, Ok(())), Some(BarrierOutcome::Complete));
    }

    #[test]
    fn fires_exactly_once() {
        let mut barrier = JoinBarrier::new([Documents]);
        assert!(barrier.arrive(Documents, Ok(())).is_some());
        assert_eq!(barrier.arrive(Documents, Ok(())), None);
    }

    #[test]
    fn unknown_kind_is_ignored() {
        let mut barrier = JoinBarrier::new([Documents]);
        assert_eq!(barrier.arrive(Widgets, Ok(())), None);
        assert_eq!(barrier.remaining(), 1);
    }

    #[test]
    fn failure_waits_for_the_rest_then_reports() {
        let mut barrier = JoinBarrier::new([Folders, Documents]);
        assert_eq!(barrier.arrive(Documents, Err("timeout".into())), None);
        let outcome = barrier.arrive(Folders, Ok(())).unwrap_or(BarrierOutcome::Complete);
        assert_eq!(
            outcome,
            BarrierOutcome::Failed(vec![(Documents, "timeout".into())])
        );
        assert_eq!(outcome.reason().as_deref(), Some("documents: timeout"));
    }
}
