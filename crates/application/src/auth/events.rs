//! Authentication event bus.

use tokio::sync::broadcast;
use warden_domain::OAuthEvent;

/// Default number of events buffered per subscriber.
const DEFAULT_CAPACITY: usize = 16;

/// Fire-and-forget publisher of [`OAuthEvent`]s.
///
/// Publishing with no subscriber is not an error. Subscribers that fall more
/// than the channel capacity behind lose the oldest events.
#[derive(Debug, Clone)]
pub struct AuthEvents {
    tx: broadcast::Sender<OAuthEvent>,
}

impl Default for AuthEvents {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl AuthEvents {
    /// Creates a bus buffering `capacity` events per subscriber.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Publishes an event, returning how many subscribers received it.
    pub fn emit(&self, event: OAuthEvent) -> usize {
        let name = event.name();
        let delivered = self.tx.send(event).unwrap_or(0);
        tracing::debug!(event = name, delivered, "published auth event");
        delivered
    }

    /// Registers a new listener.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<OAuthEvent> {
        self.tx.subscribe()
    }

    /// Number of active listeners.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}
