use crate::domain::events::ThingMessage;
use tokio::sync::broadcast::Receiver;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, instrument, warn};

/// Logs every message the registry publishes until the registry goes away. Returns the number of
/// messages received.
#[instrument(skip_all)]
pub async fn message_listener(mut rx: Receiver<ThingMessage>) -> usize {
    let mut received = 0;

    loop {
        match rx.recv().await {
            Ok(ThingMessage::PropertyChanged { name, value, origin }) => {
                info!(property = %name, ?origin, "🔵 {} = {}", name, value);
                received += 1;
            }
            Ok(ThingMessage::EventFired(event)) => {
                info!(event = event.kind.name(), "🔵 Event '{}' at {}", event.kind.name(), event.timestamp);
                received += 1;
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!("⚠️ Listener fell behind, skipped {} message(s)", skipped);
            }
            Err(RecvError::Closed) => break,
        }
    }

    received
}
