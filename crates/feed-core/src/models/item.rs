use serde::{Deserialize, Serialize};

/// Server-assigned item id. Monotonically increasing at the origin, so
/// id-descending order is consistent with recency-descending order.
pub type ItemId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
}

/// One feed entry. Immutable once created upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub title: String,
    #[serde(rename = "createdAt")]
    pub created_at: u64,
    pub author: Author,
}

impl Item {
    pub fn order_key(&self) -> OrderKey {
        OrderKey {
            created_at: self.created_at,
            id: self.id,
        }
    }
}

/// The `(created_at, id)` pair that totally orders the feed.
/// Greater key means more recent; the derived `Ord` compares
/// `created_at` first and falls back to `id` as the tiebreak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct OrderKey {
    pub created_at: u64,
    pub id: ItemId,
}
