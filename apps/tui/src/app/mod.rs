// App module for genre_predict-tui
// Handles application state and key handling

pub mod input;
pub mod state;
pub mod url_input;

pub use input::{handle_input, handle_paste};
pub use state::App;
