use crate::app::url_input::UrlInput;
use genre_predict_tui::config::{AppConfig, ChartPalette};
use genre_predict_tui::domain::SubmissionState;
use genre_predict_tui::predict::{ControllerSnapshot, PredictionController};
use std::fmt::Write as _;
use std::time::{Duration, Instant};
use throbber_widgets_tui::ThrobberState;
use tokio::sync::watch;

const SPINNER_STEP: Duration = Duration::from_millis(100);

#[derive(Debug)]
pub struct App {
    pub running: bool,
    pub url_input: UrlInput,
    pub controller: PredictionController,
    /// Latest state published by the controller, refreshed every frame.
    pub snapshot: ControllerSnapshot,
    updates: watch::Receiver<ControllerSnapshot>,
    pub throbber_state: ThrobberState,
    last_spin: Instant,
    pub animation_counter: f64,
    pub last_frame: Instant,
    pub show_help: bool,
    pub palette: ChartPalette,
    pub endpoint: String,
    last_logged_state: SubmissionState,
}

impl App {
    pub fn new(controller: PredictionController, config: &AppConfig) -> Self {
        let updates = controller.subscribe();
        let snapshot = controller.snapshot();
        Self {
            running: true,
            url_input: UrlInput::new(),
            controller,
            snapshot,
            updates,
            throbber_state: ThrobberState::default(),
            last_spin: Instant::now(),
            animation_counter: 0.0,
            last_frame: Instant::now(),
            show_help: false,
            palette: config.palette,
            endpoint: config.endpoint.to_string(),
            last_logged_state: SubmissionState::Idle,
        }
    }

    pub fn update(&mut self) {
        let now = Instant::now();
        let delta = now.duration_since(self.last_frame);
        self.last_frame = now;

        // Update animation counter (cycles between 0 and 2*PI)
        self.animation_counter += delta.as_secs_f64() * 2.0;
        if self.animation_counter > 2.0 * std::f64::consts::PI {
            self.animation_counter -= 2.0 * std::f64::consts::PI;
        }

        self.refresh_snapshot();

        if self.snapshot.loading_visible() && now.duration_since(self.last_spin) >= SPINNER_STEP {
            self.throbber_state.calc_next();
            self.last_spin = now;
        }
    }

    pub fn refresh_snapshot(&mut self) {
        if self.updates.has_changed().unwrap_or(false) {
            self.snapshot = self.updates.borrow_and_update().clone();
        }

        if self.snapshot.state != self.last_logged_state {
            tracing::debug!(
                from = self.last_logged_state.as_str(),
                to = self.snapshot.state.as_str(),
                generation = self.snapshot.generation,
                "screen observed state change"
            );
            self.last_logged_state = self.snapshot.state;
        }
    }

    /// Submit whatever is currently in the URL field.
    pub fn submit(&mut self) {
        let submission = self.controller.submit(self.url_input.current_value());
        tracing::debug!(generation = submission.generation(), "submission started from UI");
        self.refresh_snapshot();
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Status bar text derived from the current snapshot.
    pub fn status_message(&self) -> String {
        let at = self
            .snapshot
            .completed_at
            .map(|time| time.format("%H:%M:%S").to_string())
            .unwrap_or_default();

        match self.snapshot.state {
            SubmissionState::Idle => {
                format!("Ready. Predictions are requested from {}", self.endpoint)
            }
            SubmissionState::Submitting => {
                format!("Request #{} in progress...", self.snapshot.generation)
            }
            SubmissionState::Succeeded => {
                let mut message =
                    format!("Request #{} completed at {at}", self.snapshot.generation);
                if let Some(distribution) = self.snapshot.distribution() {
                    if let Some((genre, value)) = distribution.leader() {
                        let _ = write!(
                            message,
                            ", highest score {genre} ({:.1}%)",
                            distribution.share(value)
                        );
                    }
                }
                message
            }
            SubmissionState::Failed => {
                format!("Request #{} failed at {at}", self.snapshot.generation)
            }
        }
    }
}
