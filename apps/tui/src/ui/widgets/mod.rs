pub mod charts;
pub mod popup;
