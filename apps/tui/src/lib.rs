// Export our modules for use in the binary and tests
pub mod config;
pub mod domain;
pub mod logging;
pub mod predict;

pub use domain::{GenreDistribution, PredictionRequest, PredictionResult, SubmissionState};
pub use predict::{ControllerSnapshot, PredictionController};
