pub mod item;
pub mod presence;

pub use item::{Author, Item, ItemId, OrderKey};
pub use presence::OnlineUser;
