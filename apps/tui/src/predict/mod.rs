// Prediction module for genre_predict-tui
// Request lifecycle, response interpretation and the outbound transport

pub mod adapter;
pub mod controller;
pub mod error;
pub mod transport;

pub use controller::{ControllerSnapshot, PredictionController, Submission};
pub use error::PredictError;
pub use transport::{HttpTransport, PredictionTransport, RawResponse};
