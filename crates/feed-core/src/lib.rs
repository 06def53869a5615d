pub mod config;
pub mod constants;
pub mod models;
pub mod pager;
pub mod presence;
pub mod reconciler;
pub mod runtime;
pub mod store;
pub mod tracing_setup;
pub mod tracker;
pub mod transport;

pub use config::CoreConfig;
pub use models::{Author, Item, ItemId, OnlineUser, OrderKey};
pub use pager::{BackwardPager, LoadOutcome};
pub use presence::PresenceRuntime;
pub use reconciler::Reconciler;
pub use runtime::FeedRuntime;
pub use store::FeedStore;
pub use tracker::NewItemTracker;
pub use transport::{
    FeedPage, HeadEvent, PresenceClient, QueryExecutor, RosterEvent, SubscriptionEvent,
    TransportError,
};
