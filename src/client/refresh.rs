use std::sync::Arc;

use tokio::sync::watch;

/// Generation counter shared by a client and the views that read through it
#[derive(Debug, Clone)]
pub struct RefreshNotifier {
    tx: Arc<watch::Sender<u64>>,
}

impl RefreshNotifier {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(0);
        Self { tx: Arc::new(tx) }
    }

    /// Advance the generation, waking every subscriber
    pub fn notify(&self) {
        self.tx.send_modify(|generation| *generation += 1);
    }

    pub fn generation(&self) -> u64 {
        *self.tx.borrow()
    }

    /// Subscription that has already seen the current generation
    pub fn subscribe(&self) -> RefreshSubscription {
        RefreshSubscription {
            rx: self.tx.subscribe(),
        }
    }
}

impl Default for RefreshNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct RefreshSubscription {
    rx: watch::Receiver<u64>,
}

impl RefreshSubscription {
    /// Wait for the next generation. `None` once every notifier is gone.
    pub async fn changed(&mut self) -> Option<u64> {
        self.rx.changed().await.ok()?;
        Some(*self.rx.borrow_and_update())
    }

    pub fn generation(&self) -> u64 {
        *self.rx.borrow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn notify_advances_generation() {
        let notifier = RefreshNotifier::new();
        assert_eq!(notifier.generation(), 0);
        notifier.notify();
        notifier.notify();
        assert_eq!(notifier.generation(), 2);
    }

    #[tokio::test]
    async fn subscribers_wake_on_next_notify_only() {
        let notifier = RefreshNotifier::new();
        notifier.notify();

        let mut subscription = notifier.subscribe();
        let pending = tokio::time::timeout(Duration::from_millis(20), subscription.changed()).await;
        assert!(pending.is_err(), "a fresh subscription must not see earlier generations");

        let clone = notifier.clone();
        tokio::spawn(async move { clone.notify() });
        assert_eq!(subscription.changed().await, Some(2));
    }

    #[tokio::test]
    async fn changed_ends_when_notifier_dropped() {
        let notifier = RefreshNotifier::new();
        let mut subscription = notifier.subscribe();
        drop(notifier);
        assert_eq!(subscription.changed().await, None);
    }
}
