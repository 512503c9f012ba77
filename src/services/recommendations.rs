use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use crate::{
    db::CatalogStore,
    error::{AppError, AppResult},
    models::{Movie, Rating, RecommendationEntry},
    services::similarity::{self, SimilarityMatrix},
};

/// Number of recommendations returned when the caller does not choose
pub const DEFAULT_TOP_N: usize = 20;

/// Failures of the recommendation computation
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum RecommendError {
    #[error("Unknown title: {0}")]
    UnknownTitle(String),

    #[error("No recommendations available: the movie catalog is empty")]
    EmptyCatalog,

    #[error("Ratings must have a non-zero total score")]
    ZeroWeightRatings,

    #[error("Ratings are too large to combine into finite scores")]
    NonFiniteScores,

    #[error("Similarity model covers {model} movies but the catalog has {catalog}")]
    CatalogMismatch { model: usize, catalog: usize },
}

/// Ranks unrated catalog movies against a set of ratings
///
/// Every rated title contributes its similarity row scaled by its score; the
/// sum is divided by the total score. Movies are ranked by that weighted mean,
/// highest first, with ties kept in catalog order. All rated titles are
/// excluded from the result before taking the first `top_n`.
///
/// `model` must have been built from `catalog`.
pub fn recommend(
    ratings: &[Rating],
    model: &SimilarityMatrix,
    catalog: &[Movie],
    top_n: usize,
) -> Result<Vec<RecommendationEntry>, RecommendError> {
    if catalog.is_empty() || model.is_empty() {
        return Err(RecommendError::EmptyCatalog);
    }
    if model.len() != catalog.len() {
        return Err(RecommendError::CatalogMismatch {
            model: model.len(),
            catalog: catalog.len(),
        });
    }

    let mut cumulative = vec![0.0_f64; model.len()];
    let mut rated: HashSet<&str> = HashSet::with_capacity(ratings.len());
    for rating in ratings {
        let row = model
            .row(&rating.title)
            .ok_or_else(|| RecommendError::UnknownTitle(rating.title.clone()))?;
        for (total, similarity) in cumulative.iter_mut().zip(row) {
            *total += similarity * rating.score;
        }
        rated.insert(rating.title.as_str());
    }

    let total_score: f64 = ratings.iter().map(|rating| rating.score).sum();
    if total_score == 0.0 {
        return Err(RecommendError::ZeroWeightRatings);
    }
    if !total_score.is_finite() {
        return Err(RecommendError::NonFiniteScores);
    }

    let mut ranked: Vec<(usize, f64)> = cumulative
        .into_iter()
        .map(|score| score / total_score)
        .enumerate()
        .collect();
    if ranked.iter().any(|(_, score)| !score.is_finite()) {
        return Err(RecommendError::NonFiniteScores);
    }
    // stable: equal scores keep catalog order
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    Ok(ranked
        .into_iter()
        .filter(|(position, _)| !rated.contains(catalog[*position].title.as_str()))
        .take(top_n)
        .map(|(position, score)| {
            let movie = &catalog[position];
            RecommendationEntry {
                title: movie.title.clone(),
                genres: movie.genres.clone(),
                score,
            }
        })
        .collect())
}

/// Generates recommendations for a user's ratings
///
/// Reads the full catalog, rebuilds the genre similarity model and ranks the
/// unrated movies. The model is rebuilt on every call.
pub async fn get_recommendations(
    catalog: Arc<dyn CatalogStore>,
    ratings: Vec<Rating>,
    top_n: usize,
) -> AppResult<Vec<RecommendationEntry>> {
    let start = Instant::now();

    let movies = catalog.fetch_all_movies().await?;

    tracing::info!(
        catalog_size = movies.len(),
        rating_count = ratings.len(),
        "Building similarity model"
    );

    let entries = tokio::task::spawn_blocking(move || {
        let model = similarity::build(&movies);
        recommend(&ratings, &model, &movies, top_n)
    })
    .await
    .map_err(|e| AppError::Internal(format!("Recommendation task failed: {}", e)))??;

    tracing::info!(
        count = entries.len(),
        processing_time_ms = start.elapsed().as_millis(),
        "Recommendations computed"
    );

    Ok(entries)
}
