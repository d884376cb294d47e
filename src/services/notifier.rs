// src/services/notifier.rs

use tokio::sync::broadcast;
use uuid::Uuid;

use crate::models::event::{ChangeEvent, ResourceKind};

const CHANNEL_CAPACITY: usize = 256;

// Emissor de eventos de mudança (fire-and-forget). Publicado só depois do
// commit; clientes usam o evento apenas como gatilho de re-fetch.
#[derive(Clone)]
pub struct Notifier {
    sender: broadcast::Sender<ChangeEvent>,
}

impl Notifier {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    pub fn publish(&self, resource: ResourceKind, action: &str, entity_id: Option<Uuid>) {
        let event = ChangeEvent {
            resource,
            action: action.to_string(),
            entity_id,
        };
        // Err = nenhum inscrito no momento; ignorado de propósito.
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.sender.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscriber_receives_published_event() {
        let notifier = Notifier::new();
        let mut rx = notifier.subscribe();

        let id = Uuid::new_v4();
        notifier.publish(ResourceKind::Inventory, "adjusted", Some(id));

        let event = rx.recv().await.expect("evento deveria chegar");
        assert_eq!(event.resource, ResourceKind::Inventory);
        assert_eq!(event.action, "adjusted");
        assert_eq!(event.entity_id, Some(id));
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_a_noop() {
        let notifier = Notifier::new();
        // Não pode entrar em pânico nem falhar
        notifier.publish(ResourceKind::Dashboard, "refresh", None);
    }
}
