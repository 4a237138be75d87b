pub mod screens;

use crate::app::state::App;
use crossterm::event::KeyEvent;

pub fn handle_input(app: &mut App, key: KeyEvent) {
    screens::dispatch_input(app, key);
}

pub fn handle_paste(app: &mut App, text: &str) {
    if !app.show_help {
        app.url_input.paste(text);
    }
}
