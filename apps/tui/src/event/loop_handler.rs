use color_eyre::Result;
use crossterm::event::{self, Event};
use genre_predict_tui::domain::SubmissionState;
use genre_predict_tui::predict::{ControllerSnapshot, PredictionController};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::fmt::Write as _;
use std::io::Stdout;

use crate::app::{handle_input, handle_paste, App};
use crate::ui;

/// Submit one URL without a UI, print the outcome and return the final state.
pub async fn run_headless(
    controller: &PredictionController,
    url: &str,
    json: bool,
) -> Result<SubmissionState> {
    let submission = controller.submit(url);
    if let Err(e) = submission.settled().await {
        // The controller has already moved the state to Failed
        tracing::error!("prediction task ended abnormally: {e}");
    }

    let snapshot = controller.snapshot();
    if json {
        println!("{}", render_headless_json(&snapshot)?);
    } else {
        print!("{}", render_headless_text(&snapshot));
    }

    Ok(snapshot.state)
}

fn render_headless_text(snapshot: &ControllerSnapshot) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "\nGenre Prediction");
    let _ = writeln!(out, "================");
    let _ = writeln!(out, "URL: {}", snapshot.url.as_deref().unwrap_or(""));
    let _ = writeln!(out, "State: {}", snapshot.state.label());

    if let Some(error) = &snapshot.error {
        let _ = writeln!(out, "Error: {error}");
    }

    if let Some(title) = snapshot.video_title() {
        let _ = writeln!(out, "Title: {title}");
    }

    if let Some(top) = snapshot.top_genre() {
        let _ = writeln!(out, "Top prediction: {}", ui::capitalize_first(top));
    }

    if let Some(distribution) = snapshot.distribution() {
        let _ = writeln!(out, "\nGenre distribution:");
        for (genre, value) in distribution.ranked() {
            let _ = writeln!(
                out,
                "- {genre}: {value:.2} ({:.1}%)",
                distribution.share(value)
            );
        }
    }

    if snapshot.state == SubmissionState::Succeeded
        && snapshot.result.as_ref().is_some_and(|result| result.is_empty())
    {
        let _ = writeln!(out, "(the server returned nothing to show)");
    }

    out
}

fn render_headless_json(snapshot: &ControllerSnapshot) -> Result<String> {
    let report = HeadlessReport {
        state: snapshot.state,
        url: snapshot.url.clone(),
        video_title: snapshot.video_title().map(ToString::to_string),
        top_prediction: snapshot.top_genre().map(ToString::to_string),
        results: snapshot.distribution().map(|distribution| {
            distribution
                .ranked()
                .into_iter()
                .map(|(genre, value)| HeadlessGenre {
                    genre: genre.to_string(),
                    value,
                    share: distribution.share(value),
                })
                .collect()
        }),
        error: snapshot.error.clone(),
        completed_at: snapshot.completed_at.map(|time| time.to_rfc3339()),
    };

    Ok(serde_json::to_string_pretty(&report)?)
}

#[derive(serde::Serialize)]
struct HeadlessReport {
    state: SubmissionState,
    url: Option<String>,
    video_title: Option<String>,
    top_prediction: Option<String>,
    results: Option<Vec<HeadlessGenre>>,
    error: Option<String>,
    completed_at: Option<String>,
}

#[derive(serde::Serialize)]
struct HeadlessGenre {
    genre: String,
    value: f64,
    share: f64,
}

/// Run the main application event loop
pub async fn run(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    // Configure event poll timeout (ms)
    const EVENT_POLL_TIMEOUT: u64 = 50;

    loop {
        // Pick up controller transitions and advance animations
        app.update();

        if let Err(e) = terminal.draw(|f| ui::ui(app, f)) {
            return Err(color_eyre::eyre::eyre!("Terminal draw error: {e}"));
        }

        // Polling blocks this task; yield so submission tasks keep moving
        tokio::task::yield_now().await;

        if matches!(
            event::poll(std::time::Duration::from_millis(EVENT_POLL_TIMEOUT)),
            Ok(true)
        ) {
            match event::read() {
                Ok(Event::Key(key)) => {
                    handle_input(app, key);
                    if !app.running {
                        break;
                    }
                }
                Ok(Event::Paste(text)) => handle_paste(app, &text),
                Ok(Event::Resize(_, _)) => {
                    // Force a redraw after resize
                    if terminal.draw(|f| ui::ui(app, f)).is_err() {
                        tracing::debug!("redraw after resize failed");
                    }
                }
                Ok(Event::Mouse(_) | Event::FocusGained | Event::FocusLost) | Err(_) => {}
            }
        }
    }

    tracing::info!("event loop finished");
    Ok(())
}
