// Config module for genre_predict-tui
// Resolves endpoint, timeouts, log location and chart colours once at startup

mod palette;
mod settings;

pub use palette::{ChartPalette, Rgb, DEFAULT_PALETTE};
pub use settings::{
    init_app_config, AppConfig, ConfigError, DEFAULT_ENDPOINT, DEFAULT_LOG_DIR,
    DEFAULT_TIMEOUT_SECS,
};
