use serde::{Deserialize, Serialize};

/// Separator between genre tags in the stored genre column (MovieLens format)
pub const GENRE_SEPARATOR: char = '|';

/// A catalog movie
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: i64,
    /// Title, expected to be unique within the catalog
    pub title: String,
    /// Ordered genre tags (e.g. `["Adventure", "Animation"]`)
    pub genres: Vec<String>,
}

impl Movie {
    /// Creates a movie from an already split genre list
    pub fn new<I, S>(id: i64, title: impl Into<String>, genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id,
            title: title.into(),
            genres: genres.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates a movie from the `|`-delimited genre column used by the store
    pub fn from_delimited(id: i64, title: impl Into<String>, genres: &str) -> Self {
        Self::new(id, title, parse_genres(genres))
    }

    /// Genre list as a single whitespace-delimited document
    pub fn feature_text(&self) -> String {
        self.genres.join(" ")
    }
}

/// Splits a stored genre column into its tags, skipping blanks
pub fn parse_genres(raw: &str) -> Vec<String> {
    raw.split(GENRE_SEPARATOR)
        .map(str::trim)
        .filter(|genre| !genre.is_empty())
        .map(str::to_string)
        .collect()
}
