//! Single-slot transient alert channel
//!
//! At most one alert is visible at a time. Publishing overwrites the
//! slot and restarts the auto-dismiss timer; a later alert's timer, not
//! an earlier one's, decides when the banner finally clears.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use crate::model::Alert;

struct AlertInner {
    slot: watch::Sender<Option<Alert>>,
    epoch: AtomicU64,
}

/// Broadcast channel for the global alert banner
#[derive(Clone)]
pub struct AlertChannel {
    inner: Arc<AlertInner>,
    dismiss_after: Duration,
}

impl AlertChannel {
    /// Create a channel whose alerts auto-dismiss after `dismiss_after`
    pub fn new(dismiss_after: Duration) -> Self {
        let (slot, _) = watch::channel(None);
        Self {
            inner: Arc::new(AlertInner {
                slot,
                epoch: AtomicU64::new(0),
            }),
            dismiss_after,
        }
    }

    /// Show an alert, replacing any currently displayed one and
    /// restarting the dismiss timer.
    ///
    /// Must be called from within a tokio runtime; the dismiss timer is
    /// a spawned task.
    pub fn publish(&self, alert: Alert) {
        let epoch = self.inner.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner.slot.send_replace(Some(alert));

        let inner = self.inner.clone();
        let after = self.dismiss_after;
        tokio::spawn(async move {
            tokio::time::sleep(after).await;
            // Only the timer belonging to the latest publish may clear
            // the slot; superseded timers expire silently.
            if inner.epoch.load(Ordering::SeqCst) == epoch {
                inner.slot.send_replace(None);
            }
        });
    }

    /// Publish an info-severity alert
    pub fn info(&self, title: &str, message: &str) {
        self.publish(Alert::info(title, message));
    }

    /// Publish a warn-severity alert
    pub fn warn(&self, title: &str, message: &str) {
        self.publish(Alert::warn(title, message));
    }

    /// Publish a fail-severity alert
    pub fn fail(&self, title: &str, message: &str) {
        self.publish(Alert::fail(title, message));
    }

    /// Clear the slot immediately
    pub fn dismiss(&self) {
        self.inner.epoch.fetch_add(1, Ordering::SeqCst);
        self.inner.slot.send_replace(None);
    }

    /// The currently visible alert, if any
    pub fn current(&self) -> Option<Alert> {
        self.inner.slot.borrow().clone()
    }

    /// Observe the slot; the banner view re-renders on every change
    pub fn subscribe(&self) -> watch::Receiver<Option<Alert>> {
        self.inner.slot.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{advance, Duration};

    const DISMISS: Duration = Duration::from_millis(4000);

    #[tokio::test(start_paused = true)]
    async fn alert_auto_dismisses_after_window() {
        let channel = AlertChannel::new(DISMISS);
        channel.info("Ticket", "Ticket #5 created");
        assert_eq!(channel.current().unwrap().message, "Ticket #5 created");

        tokio::task::yield_now().await;
        advance(DISMISS + Duration::from_millis(1)).await;
        tokio::task::yield_now().await;
        assert!(channel.current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn later_alert_replaces_earlier_and_owns_the_timer() {
        let channel = AlertChannel::new(DISMISS);
        channel.info("A", "first");
        tokio::task::yield_now().await;

        advance(Duration::from_millis(3000)).await;
        channel.fail("B", "second");
        tokio::task::yield_now().await;
        assert_eq!(channel.current().unwrap().title, "B");

        // A's timer expires here; B must survive it.
        advance(Duration::from_millis(1500)).await;
        tokio::task::yield_now().await;
        let visible = channel.current().unwrap();
        assert_eq!(visible.title, "B");

        // B's own window ends 4000ms after B was published.
        advance(Duration::from_millis(3000)).await;
        tokio::task::yield_now().await;
        assert!(channel.current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn manual_dismiss_clears_slot() {
        let channel = AlertChannel::new(DISMISS);
        channel.warn("Heads up", "something");
        channel.dismiss();
        assert!(channel.current().is_none());

        // The orphaned timer must not resurrect anything, nor clear a
        // later alert.
        channel.info("C", "third");
        advance(DISMISS - Duration::from_millis(1)).await;
        tokio::task::yield_now().await;
        assert_eq!(channel.current().unwrap().title, "C");
    }

    #[tokio::test(start_paused = true)]
    async fn subscribers_observe_publish_and_dismiss() {
        let channel = AlertChannel::new(DISMISS);
        let mut updates = channel.subscribe();

        channel.info("A", "first");
        updates.changed().await.unwrap();
        assert!(updates.borrow_and_update().is_some());

        advance(DISMISS + Duration::from_millis(1)).await;
        updates.changed().await.unwrap();
        assert!(updates.borrow_and_update().is_none());
    }
}
