// ── Snapshot subscriptions ──
//
// Subscription handle for consuming snapshot replacements from a
// coordinator. Hosts use it to re-render switch state after a refresh or
// a staged setting write.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::model::ApplianceSnapshot;

type SnapshotSlot = Option<Arc<ApplianceSnapshot>>;

/// A subscription to one appliance's snapshots.
///
/// Provides both point-in-time access and change notification via
/// [`changed()`](Self::changed) or by converting to a `Stream`.
pub struct SnapshotStream {
    current: SnapshotSlot,
    receiver: watch::Receiver<SnapshotSlot>,
}

impl SnapshotStream {
    pub(crate) fn new(receiver: watch::Receiver<SnapshotSlot>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    /// The snapshot captured at creation time or by the last `changed()`.
    pub fn current(&self) -> Option<&Arc<ApplianceSnapshot>> {
        self.current.as_ref()
    }

    /// The latest snapshot (may have changed since creation).
    pub fn latest(&self) -> SnapshotSlot {
        self.receiver.borrow().clone()
    }

    /// Wait for the next replacement, returning the new snapshot.
    /// Returns `None` once the coordinator has been dropped.
    pub async fn changed(&mut self) -> Option<Arc<ApplianceSnapshot>> {
        loop {
            self.receiver.changed().await.ok()?;
            let snap = self.receiver.borrow_and_update().clone();
            if let Some(snap) = snap {
                self.current = Some(Arc::clone(&snap));
                return Some(snap);
            }
        }
    }

    /// Convert into a `Stream` for use with `StreamExt` combinators.
    pub fn into_stream(self) -> SnapshotWatchStream {
        SnapshotWatchStream {
            inner: WatchStream::from_changes(self.receiver),
        }
    }
}

/// `Stream` adapter yielding each new snapshot.
pub struct SnapshotWatchStream {
    inner: WatchStream<SnapshotSlot>,
}

impl Stream for SnapshotWatchStream {
    type Item = Arc<ApplianceSnapshot>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            match Pin::new(&mut self.inner).poll_next(cx) {
                Poll::Ready(Some(Some(snap))) => return Poll::Ready(Some(snap)),
                Poll::Ready(Some(None)) => {}
                Poll::Ready(None) => return Poll::Ready(None),
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::ApplianceState;
    use futures_util::StreamExt;

    fn snap(version: u64) -> SnapshotSlot {
        Some(Arc::new(ApplianceSnapshot::new(
            ApplianceState::default(),
            version,
        )))
    }

    #[tokio::test]
    async fn changed_skips_empty_slots() {
        let (tx, rx) = watch::channel(None);
        let mut sub = SnapshotStream::new(rx);
        assert!(sub.current().is_none());

        tx.send_replace(snap(1));
        let next = sub.changed().await.unwrap();
        assert_eq!(next.version, 1);
        assert_eq!(sub.current().unwrap().version, 1);
    }

    #[tokio::test]
    async fn changed_ends_when_coordinator_drops() {
        let (tx, rx) = watch::channel(snap(1));
        let mut sub = SnapshotStream::new(rx);
        drop(tx);
        assert!(sub.changed().await.is_none());
        assert_eq!(sub.latest().unwrap().version, 1);
    }

    #[tokio::test]
    async fn stream_yields_replacements_only() {
        let (tx, rx) = watch::channel(snap(1));
        let mut stream = SnapshotStream::new(rx).into_stream();

        tx.send_replace(snap(2));
        assert_eq!(stream.next().await.unwrap().version, 2);

        drop(tx);
        assert!(stream.next().await.is_none());
    }
}
