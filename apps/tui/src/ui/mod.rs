// UI module for genre_predict-tui
// Handles all UI rendering functions

pub mod screens;
pub mod widgets;

use crate::app::App;
use ratatui::Frame;

pub fn ui(app: &App, f: &mut Frame<'_>) {
    screens::main::render_main(app, f);
}

/// "rock" -> "Rock", the way labels are shown to the user.
pub fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

#[cfg(test)]
mod tests {
    use super::capitalize_first;

    #[test]
    fn capitalizes_only_the_first_letter() {
        assert_eq!(capitalize_first("rock"), "Rock");
        assert_eq!(capitalize_first("hipHop"), "HipHop");
        assert_eq!(capitalize_first(""), "");
        assert_eq!(capitalize_first("élan"), "Élan");
    }
}
