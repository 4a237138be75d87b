use serde::Serialize;
use std::collections::BTreeMap;

/// Genres the remote model was trained on, in the order it reports them.
pub const KNOWN_GENRES: [&str; 10] = [
    "blues",
    "classical",
    "country",
    "disco",
    "hiphop",
    "jazz",
    "metal",
    "pop",
    "reggae",
    "rock",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

impl SubmissionState {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Submitting => "submitting",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Submitting => "Submitting",
            Self::Succeeded => "Succeeded",
            Self::Failed => "Failed",
        }
    }

    pub const fn is_settled(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

/// Body of the outbound prediction call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PredictionRequest {
    pub url: String,
}

impl PredictionRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// Genre label to percentage, as reported by the prediction service.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct GenreDistribution(BTreeMap<String, f64>);

impl GenreDistribution {
    pub fn get(&self, genre: &str) -> Option<f64> {
        self.0.get(genre).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(genre, value)| (genre.as_str(), *value))
    }

    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    /// Entries sorted by percentage, highest first. Ties fall back to label order.
    pub fn ranked(&self) -> Vec<(&str, f64)> {
        let mut entries: Vec<(&str, f64)> = self.iter().collect();
        entries.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries
    }

    /// Highest scoring genre, if any.
    pub fn leader(&self) -> Option<(&str, f64)> {
        self.ranked().into_iter().next()
    }

    /// Share of the whole distribution in percent, the way a pie chart slices it.
    pub fn share(&self, value: f64) -> f64 {
        let total = self.total();
        if total > 0.0 {
            value / total * 100.0
        } else {
            0.0
        }
    }
}

impl FromIterator<(String, f64)> for GenreDistribution {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// The three independently optional facets of a prediction response.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PredictionResult {
    pub video_title: Option<String>,
    pub genre_distribution: Option<GenreDistribution>,
    pub top_genre: Option<String>,
}

impl PredictionResult {
    pub const fn is_empty(&self) -> bool {
        self.video_title.is_none() && self.genre_distribution.is_none() && self.top_genre.is_none()
    }
}

/// Position of a genre in [`KNOWN_GENRES`], used to keep chart colours stable.
pub fn genre_index(genre: &str) -> Option<usize> {
    let genre = genre.trim().to_lowercase();
    KNOWN_GENRES.iter().position(|known| *known == genre)
}
