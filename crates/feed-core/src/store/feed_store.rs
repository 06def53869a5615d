use crate::models::{Item, ItemId};
use tracing::debug;

/// Ordered local window over the public feed - single source of truth for
/// what the viewer currently sees.
///
/// The window is newest-first and strictly decreasing by `(created_at, id)`,
/// which also rules out duplicate ids without a separate id set: every
/// insertion point is constrained relative to the head or tail, so an id
/// already present can never pass the strict-inequality check again.
///
/// The head is never replaced behind the viewer's back; newer items only
/// enter through [`FeedStore::reveal_head`].
pub struct FeedStore {
    items: Vec<Item>,
}

impl FeedStore {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Initialize the window from the newest item known at mount, if any.
    /// Only valid before the first append or reveal.
    pub fn seed(&mut self, item: Option<Item>) {
        debug_assert!(self.items.is_empty(), "seed after first use");
        if let Some(item) = item {
            self.items.push(item);
        }
    }

    // ===== Getters =====

    /// Read-only snapshot of the window, newest first.
    pub fn peek(&self) -> &[Item] {
        &self.items
    }

    /// Exclusive lower bound for the next backward page, i.e. the id of the
    /// current tail item. `None` while the window is empty.
    pub fn tail_cursor(&self) -> Option<ItemId> {
        self.items.last().map(|i| i.id)
    }

    pub fn head_id(&self) -> Option<ItemId> {
        self.items.first().map(|i| i.id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    // ===== Mutations =====

    /// Fold one backward page (newest-first) onto the tail. Returns the
    /// number of items actually appended.
    ///
    /// A page whose first row is not strictly older than the current tail is
    /// an overlap (duplicate page, stale cursor) and is rejected whole.
    /// Within an accepted page, any row that breaks the strictly-decreasing
    /// order is dropped individually.
    pub fn append_older(&mut self, page: Vec<Item>) -> usize {
        if let (Some(tail), Some(first)) = (self.items.last(), page.first()) {
            if first.order_key() >= tail.order_key() {
                debug!(
                    first_id = first.id,
                    tail_id = tail.id,
                    "rejecting overlapping page"
                );
                return 0;
            }
        }

        let mut appended = 0;
        for item in page {
            if let Some(tail) = self.items.last() {
                if item.order_key() >= tail.order_key() {
                    debug!(id = item.id, "dropping out-of-order page row");
                    continue;
                }
            }
            self.items.push(item);
            appended += 1;
        }
        appended
    }

    /// Prepend a revealed item as the new head. Returns false (and leaves
    /// the window untouched) when the candidate is not strictly newer than
    /// the current head - a stale reveal racing an earlier one.
    pub fn reveal_head(&mut self, item: Item) -> bool {
        if let Some(head) = self.items.first() {
            if item.order_key() <= head.order_key() {
                debug!(id = item.id, head_id = head.id, "skipping stale reveal");
                return false;
            }
        }
        self.items.insert(0, item);
        true
    }
}

impl Default for FeedStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Author;

    fn item(id: ItemId, created_at: u64) -> Item {
        Item {
            id,
            title: format!("item {}", id),
            created_at,
            author: Author {
                name: "someUser".to_string(),
            },
        }
    }

    fn ids(store: &FeedStore) -> Vec<ItemId> {
        store.peek().iter().map(|i| i.id).collect()
    }

    fn assert_strictly_decreasing(store: &FeedStore) {
        let items = store.peek();
        for pair in items.windows(2) {
            assert!(pair[0].order_key() > pair[1].order_key());
        }
    }

    #[test]
    fn test_seed_then_append_older() {
        let mut store = FeedStore::new();
        store.seed(Some(item(10, 100)));
        let appended = store.append_older(vec![item(9, 90), item(8, 80)]);
        assert_eq!(appended, 2);
        assert_eq!(ids(&store), vec![10, 9, 8]);
        assert_strictly_decreasing(&store);
    }

    #[test]
    fn test_seed_none_leaves_window_empty() {
        let mut store = FeedStore::new();
        store.seed(None);
        assert!(store.is_empty());
        assert_eq!(store.tail_cursor(), None);
    }

    #[test]
    fn test_append_into_empty_window() {
        let mut store = FeedStore::new();
        let appended = store.append_older(vec![item(4, 40), item(3, 30), item(2, 20), item(1, 10)]);
        assert_eq!(appended, 4);
        assert_eq!(ids(&store), vec![4, 3, 2, 1]);
        assert_eq!(store.tail_cursor(), Some(1));
        assert_eq!(store.head_id(), Some(4));
    }

    #[test]
    fn test_overlapping_page_rejected_whole() {
        let mut store = FeedStore::new();
        store.append_older(vec![item(6, 60), item(5, 50)]);
        // First row not strictly older than tail id 5.
        let appended = store.append_older(vec![item(5, 50), item(4, 40)]);
        assert_eq!(appended, 0);
        assert_eq!(ids(&store), vec![6, 5]);
    }

    #[test]
    fn test_interior_out_of_order_row_dropped() {
        let mut store = FeedStore::new();
        store.append_older(vec![item(9, 90)]);
        let appended = store.append_older(vec![item(7, 70), item(8, 80), item(6, 60)]);
        assert_eq!(appended, 2);
        assert_eq!(ids(&store), vec![9, 7, 6]);
        assert_strictly_decreasing(&store);
    }

    #[test]
    fn test_ordering_invariant_across_many_appends() {
        let mut store = FeedStore::new();
        store.seed(Some(item(100, 1000)));
        for page_start in [90u64, 60, 30] {
            let page: Vec<Item> = (0..3)
                .map(|n| item((page_start - n * 10) as ItemId, page_start - n * 10))
                .collect();
            store.append_older(page);
            assert_strictly_decreasing(&store);
        }
        assert_eq!(store.len(), 10);
        let unique: std::collections::HashSet<ItemId> =
            store.peek().iter().map(|i| i.id).collect();
        assert_eq!(unique.len(), store.len());
    }

    #[test]
    fn test_reveal_head_prepends_newer_item() {
        let mut store = FeedStore::new();
        store.seed(Some(item(10, 100)));
        assert!(store.reveal_head(item(11, 110)));
        assert_eq!(ids(&store), vec![11, 10]);
    }

    #[test]
    fn test_reveal_head_into_empty_window() {
        let mut store = FeedStore::new();
        assert!(store.reveal_head(item(1, 10)));
        assert_eq!(ids(&store), vec![1]);
    }

    #[test]
    fn test_stale_reveal_is_noop() {
        let mut store = FeedStore::new();
        store.seed(Some(item(10, 100)));
        assert!(!store.reveal_head(item(10, 100)));
        assert!(!store.reveal_head(item(9, 90)));
        assert_eq!(ids(&store), vec![10]);
    }

    #[test]
    fn test_id_tiebreak_same_timestamp() {
        let mut store = FeedStore::new();
        store.seed(Some(item(10, 100)));
        // Same timestamp as head, higher id: still strictly newer.
        assert!(store.reveal_head(item(11, 100)));
        // Same timestamp as tail, lower id: strictly older, accepted.
        assert_eq!(store.append_older(vec![item(9, 100)]), 1);
        assert_eq!(ids(&store), vec![11, 10, 9]);
    }
}
