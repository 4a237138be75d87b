use crate::app::state::App;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

pub fn handle_main_input(app: &mut App, key: KeyEvent) {
    // AltGr arrives as Ctrl+Alt on Windows and still types a character
    if key.modifiers.contains(KeyModifiers::CONTROL) && !key.modifiers.contains(KeyModifiers::ALT) {
        if key.code == KeyCode::Char('u') {
            app.url_input.clear();
        }
        return;
    }

    match key.code {
        KeyCode::Enter => app.submit(),
        KeyCode::Esc => app.quit(),
        KeyCode::Backspace => app.url_input.backspace(),
        KeyCode::Char(c) => app.url_input.push_char(c),
        _ => {}
    }
}
