use crossterm::event::{KeyCode, KeyEvent};

use crate::ui::App;

/// What a key press asks the app to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Action {
    Quit,
    LoadOlder,
    RevealNew,
    None,
}

pub(crate) fn map_key(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Char('o') | KeyCode::Enter => Action::LoadOlder,
        KeyCode::Char('n') => Action::RevealNew,
        _ => Action::None,
    }
}

pub(crate) async fn handle_key(app: &mut App, key: KeyEvent) {
    match map_key(key) {
        Action::Quit => app.should_quit = true,
        Action::LoadOlder => {
            // Coalesced by the pager if one is already in flight.
            let _ = app.reconciler().load_older().await;
        }
        Action::RevealNew => {
            app.reconciler().reveal_new();
        }
        Action::None => {}
    }
}
