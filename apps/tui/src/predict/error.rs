use thiserror::Error;

/// Shown when the server rejects a request without saying why.
pub const SERVER_FALLBACK_MESSAGE: &str = "Failed to fetch response from server.";

/// Shown when no usable response was obtained at all.
pub const TRANSPORT_FALLBACK_MESSAGE: &str = "An unexpected error occurred.";

/// Ways a single prediction attempt can fail.
///
/// These never reach the presentation layer as types: the controller
/// collapses every variant into one user-visible string via
/// [`PredictError::user_message`].
#[derive(Error, Debug)]
pub enum PredictError {
    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("Server rejected request (HTTP {status}): {message}")]
    Server { status: u16, message: String },

    #[error("Server rejected request (HTTP {status}) without a message")]
    ServerUnlabeled { status: u16 },
}

impl PredictError {
    pub fn user_message(&self) -> String {
        match self {
            Self::Transport(_) => TRANSPORT_FALLBACK_MESSAGE.to_string(),
            Self::Server { message, .. } => message.clone(),
            Self::ServerUnlabeled { .. } => SERVER_FALLBACK_MESSAGE.to_string(),
        }
    }

    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Server { .. } => "server",
            Self::ServerUnlabeled { .. } => "server_unlabeled",
        }
    }
}

impl From<reqwest::Error> for PredictError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Transport(format!("request timed out: {error}"))
        } else if error.is_connect() {
            Self::Transport(format!("connection failed: {error}"))
        } else {
            Self::Transport(error.to_string())
        }
    }
}
