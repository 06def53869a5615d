pub mod app;
pub mod terminal;

pub use app::App;
pub use terminal::{init as init_terminal, restore as restore_terminal, Tui};
