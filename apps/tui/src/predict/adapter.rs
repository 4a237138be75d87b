//! Turns loosely-typed response bodies into prediction facets.
//!
//! Each recognised field is decoded on its own into a [`FieldDecode`], so a
//! missing or misshapen field never prevents the others from being read.

use crate::domain::{GenreDistribution, PredictionResult};
use serde_json::{Map, Value};

pub const VIDEO_TITLE_KEY: &str = "video_title";
pub const RESULTS_KEY: &str = "results";
pub const TOP_PREDICTION_KEY: &str = "top_prediction";
pub const ERROR_KEY: &str = "error";

/// Outcome of reading one optional field from a payload.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldDecode<T> {
    Absent,
    Present(T),
    /// The key exists but holds something other than `expected`.
    Mismatched { expected: &'static str },
}

impl<T> FieldDecode<T> {
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Present(value) => Some(value),
            Self::Absent | Self::Mismatched { .. } => None,
        }
    }
}

/// Parse a raw body as JSON. Fails only on bodies that are not JSON at all.
pub fn decode_payload(body: &str) -> Result<Value, serde_json::Error> {
    serde_json::from_str(body)
}

/// Extract whatever facets the payload carries. Never fails.
pub fn adapt_result(payload: &Value) -> PredictionResult {
    let Some(object) = payload.as_object() else {
        tracing::debug!("prediction payload is not an object; nothing to show");
        return PredictionResult::default();
    };

    PredictionResult {
        video_title: log_mismatch(VIDEO_TITLE_KEY, string_field(object, VIDEO_TITLE_KEY))
            .into_option(),
        genre_distribution: log_mismatch(RESULTS_KEY, distribution_field(object, RESULTS_KEY))
            .into_option(),
        top_genre: log_mismatch(TOP_PREDICTION_KEY, string_field(object, TOP_PREDICTION_KEY))
            .into_option(),
    }
}

/// Pull the server's `error` message out of a failure body, if it has one.
///
/// Empty bodies, non-JSON bodies and blank messages all yield `None`.
pub fn adapt_error(body: &str) -> Option<String> {
    error_message(&decode_payload(body).ok()?)
}

/// The non-blank `error` string of an already decoded failure payload.
pub fn error_message(payload: &Value) -> Option<String> {
    string_field(payload.as_object()?, ERROR_KEY)
        .into_option()
        .filter(|message| !message.trim().is_empty())
}

pub fn string_field(object: &Map<String, Value>, key: &str) -> FieldDecode<String> {
    match object.get(key) {
        None | Some(Value::Null) => FieldDecode::Absent,
        Some(Value::String(text)) => FieldDecode::Present(text.clone()),
        Some(_) => FieldDecode::Mismatched { expected: "string" },
    }
}

/// A distribution is only accepted when every value is numeric.
pub fn distribution_field(
    object: &Map<String, Value>,
    key: &str,
) -> FieldDecode<GenreDistribution> {
    let entries = match object.get(key) {
        None | Some(Value::Null) => return FieldDecode::Absent,
        Some(Value::Object(entries)) => entries,
        Some(_) => {
            return FieldDecode::Mismatched {
                expected: "object of numbers",
            }
        }
    };

    let mut parsed = Vec::with_capacity(entries.len());
    for (genre, value) in entries {
        let Some(number) = value.as_f64() else {
            return FieldDecode::Mismatched {
                expected: "object of numbers",
            };
        };
        parsed.push((genre.clone(), number));
    }

    FieldDecode::Present(parsed.into_iter().collect())
}

fn log_mismatch<T>(key: &str, decoded: FieldDecode<T>) -> FieldDecode<T> {
    if let FieldDecode::Mismatched { expected } = &decoded {
        tracing::debug!(field = key, expected, "ignoring misshapen response field");
    }
    decoded
}
