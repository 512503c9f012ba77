use crate::{db::CatalogStore, error::AppResult, models::Movie};
use std::sync::Arc;

/// Picks a random sample of catalog movies for the user to rate
///
/// Delegates to the configured CatalogStore, keeping the sampling strategy
/// with the store (e.g. `ORDER BY RANDOM()` in PostgreSQL).
pub async fn sample_for_rating(
    catalog: Arc<dyn CatalogStore>,
    sample_size: usize,
) -> AppResult<Vec<Movie>> {
    let movies = catalog.random_movies(sample_size).await?;
    tracing::debug!(requested = sample_size, returned = movies.len(), "Sampled movies");
    Ok(movies)
}
