use sqlx::{postgres::PgPoolOptions, PgPool};

use super::{username_taken, CatalogStore, UserStore};
use crate::{error::AppResult, models::Movie};

/// Creates a PostgreSQL connection pool
///
/// Establishes a pool of database connections for efficient reuse.
/// The pool automatically manages connection lifecycle and limits.
pub async fn create_pool(database_url: &str, max_connections: u32) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Row of the `movies` table; genres are `|`-delimited
#[derive(Debug, sqlx::FromRow)]
struct MovieRow {
    movie_id: i64,
    title: String,
    genres: String,
}

impl From<MovieRow> for Movie {
    fn from(row: MovieRow) -> Self {
        Movie::from_delimited(row.movie_id, row.title, &row.genres)
    }
}

/// Catalog backed by the `movies` table
#[derive(Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl CatalogStore for PgCatalogStore {
    async fn fetch_all_movies(&self) -> AppResult<Vec<Movie>> {
        let rows: Vec<MovieRow> =
            sqlx::query_as("SELECT movie_id, title, genres FROM movies ORDER BY movie_id")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.into_iter().map(Movie::from).collect())
    }

    async fn random_movies(&self, limit: usize) -> AppResult<Vec<Movie>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows: Vec<MovieRow> =
            sqlx::query_as("SELECT movie_id, title, genres FROM movies ORDER BY RANDOM() LIMIT $1")
                .bind(limit)
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.into_iter().map(Movie::from).collect())
    }
}

/// Accounts backed by the `users` table
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl UserStore for PgUserStore {
    async fn find_password_hash(&self, username: &str) -> AppResult<Option<String>> {
        let hash: Option<String> = sqlx::query_scalar("SELECT password FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        Ok(hash)
    }

    async fn create_user(&self, username: &str, password_hash: &str) -> AppResult<()> {
        let result = sqlx::query(
            "INSERT INTO users (username, password) VALUES ($1, $2) \
             ON CONFLICT (username) DO NOTHING",
        )
        .bind(username)
        .bind(password_hash)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(username_taken());
        }

        tracing::info!(username = %username, "User registered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movie_row_splits_genre_column() {
        let row = MovieRow {
            movie_id: 1,
            title: "Toy Story (1995)".to_string(),
            genres: "Adventure|Animation|Children|Comedy|Fantasy".to_string(),
        };

        let movie = Movie::from(row);
        assert_eq!(movie.id, 1);
        assert_eq!(movie.genres.len(), 5);
        assert_eq!(movie.genres[0], "Adventure");
    }
}
