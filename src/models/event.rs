// src/models/event.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

// Recurso afetado por uma mutação. O cliente usa isso para saber o que
// recarregar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Transaction,
    Inventory,
    Product,
    Dashboard,
    User,
}

impl ResourceKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "transaction" => Some(ResourceKind::Transaction),
            "inventory" => Some(ResourceKind::Inventory),
            "product" => Some(ResourceKind::Product),
            "dashboard" => Some(ResourceKind::Dashboard),
            "user" => Some(ResourceKind::User),
            _ => None,
        }
    }
}

// Evento de mudança publicado após um commit bem-sucedido. Entrega
// no máximo uma vez; um evento perdido só atrasa o refresh do cliente,
// nunca afeta a correção (o banco é a fonte da verdade).
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangeEvent {
    pub resource: ResourceKind,
    pub action: String,
    pub entity_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::ResourceKind;

    #[test]
    fn parse_known_kinds() {
        assert_eq!(ResourceKind::parse("transaction"), Some(ResourceKind::Transaction));
        assert_eq!(ResourceKind::parse("inventory"), Some(ResourceKind::Inventory));
        assert_eq!(ResourceKind::parse("dashboard"), Some(ResourceKind::Dashboard));
        assert_eq!(ResourceKind::parse("pedido"), None);
    }
}
