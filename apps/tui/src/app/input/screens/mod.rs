use crate::app::state::App;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

mod help;
mod main;

pub fn dispatch_input(app: &mut App, key: KeyEvent) {
    // Windows terminals also report key releases
    if key.kind == KeyEventKind::Release {
        return;
    }

    if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
        app.quit();
        return;
    }

    if help::handle_help_toggle(app, key.code) {
        return;
    }

    main::handle_main_input(app, key);
}
