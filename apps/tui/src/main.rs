mod app;
mod cli;
mod event;
mod terminal;
mod ui;

use app::App;
use clap::Parser;
use cli::CliArgs;
use color_eyre::Result;
use genre_predict_tui::config::{init_app_config, AppConfig};
use genre_predict_tui::domain::SubmissionState;
use genre_predict_tui::logging;
use genre_predict_tui::predict::{HttpTransport, PredictionController};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    // Setup error handling
    color_eyre::install()?;

    let args = CliArgs::parse();
    args.apply_env_overrides();

    // Resolved once; everything below reads from this
    let config = init_app_config()?;

    match logging::init(&config.log_dir, config.debug) {
        Ok(path) => tracing::debug!("writing logs to {}", path.display()),
        Err(e) => eprintln!("Logging disabled: {e}"),
    }

    let transport = HttpTransport::from_config(&config)?;
    tracing::info!(
        endpoint = %transport.endpoint(),
        timeout_secs = config.request_timeout.as_secs(),
        "prediction transport ready"
    );
    let controller = PredictionController::new(Arc::new(transport));

    if let Some(url) = args.url.as_deref() {
        let state = event::run_headless(&controller, url, args.json).await?;
        if state == SubmissionState::Failed {
            std::process::exit(1);
        }
        return Ok(());
    }

    // Without a terminal there is nothing to draw on
    if !is_terminal() {
        print_configuration(&config);
        println!("\n{}", CliArgs::help_text());
        return Ok(());
    }

    let mut app = App::new(controller, &config);

    // Setup terminal
    let mut terminal = terminal::setup_terminal()?;

    // Run the application
    let result = event::run(&mut terminal, &mut app).await;

    // Restore terminal
    terminal::cleanup_terminal_state(true, true);

    result
}

fn print_configuration(config: &AppConfig) {
    println!("Genre Prediction");
    println!("================");
    println!("Endpoint: {}", config.endpoint);
    println!("Request timeout: {}s", config.request_timeout.as_secs());
    println!("Log directory: {}", config.log_dir.display());
}

// Check if we're running in a terminal
fn is_terminal() -> bool {
    atty::is(atty::Stream::Stdout)
}
