use serde::{Deserialize, Serialize};

/// A user's score for one catalog title, supplied per request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub title: String,
    #[serde(rename = "rating")]
    pub score: f64,
}

impl Rating {
    pub fn new(title: impl Into<String>, score: f64) -> Self {
        Self {
            title: title.into(),
            score,
        }
    }
}

/// A ranked recommendation returned to the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationEntry {
    pub title: String,
    pub genres: Vec<String>,
    /// Rating-weighted mean similarity to the rated movies
    pub score: f64,
}
