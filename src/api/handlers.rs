use std::collections::BTreeMap;

use axum::{extract::State, http::StatusCode, Extension, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use super::{AppState, CurrentUser};
use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{Credentials, Movie, Rating, RecommendationEntry},
    services::{auth, catalog, recommendations},
};

// Request/Response types

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: Uuid,
    pub username: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct MovieResponse {
    pub id: i64,
    pub title: String,
    pub genres: Vec<String>,
}

impl From<Movie> for MovieResponse {
    fn from(movie: Movie) -> Self {
        Self {
            id: movie.id,
            title: movie.title,
            genres: movie.genres,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RandomMoviesResponse {
    pub username: String,
    pub movies: Vec<MovieResponse>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub username: String,
    pub recommendations: Vec<RecommendationEntry>,
}

/// A submitted rating value: a JSON number or a numeric string from a form
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RatingValue {
    Number(f64),
    Text(String),
}

impl RatingValue {
    /// Parsed score; a blank string means the movie was left unrated
    fn score(&self, title: &str) -> AppResult<Option<f64>> {
        let score = match self {
            RatingValue::Number(n) => *n,
            RatingValue::Text(text) if text.trim().is_empty() => return Ok(None),
            RatingValue::Text(text) => text.trim().parse::<f64>().map_err(|_| {
                AppError::InvalidInput(format!("Rating for '{}' is not a number", title))
            })?,
        };

        if !score.is_finite() {
            return Err(AppError::InvalidInput(format!(
                "Rating for '{}' must be a finite number",
                title
            )));
        }
        Ok(Some(score))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RatingInput {
    pub title: String,
    pub rating: RatingValue,
}

/// `{"ratings": [...]}` body; any other key makes the body ambiguous
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RatingsList {
    pub ratings: Vec<RatingInput>,
}

/// Ratings submitted for recommendation
///
/// Accepts `{"ratings": [{"title": ..., "rating": ...}]}` or a flat
/// `{"<title>": <rating>}` object mirroring a submitted rating form.
/// Bodies mixing both shapes are rejected.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RatingsRequest {
    List(RatingsList),
    Form(BTreeMap<String, RatingValue>),
}

impl RatingsRequest {
    /// Converts to ratings, dropping entries left blank
    pub fn into_ratings(self) -> AppResult<Vec<Rating>> {
        let pairs: Vec<(String, RatingValue)> = match self {
            RatingsRequest::List(RatingsList { ratings }) => ratings
                .into_iter()
                .map(|input| (input.title, input.rating))
                .collect(),
            RatingsRequest::Form(form) => form.into_iter().collect(),
        };

        let mut ratings = Vec::with_capacity(pairs.len());
        for (title, value) in pairs {
            if let Some(score) = value.score(&title)? {
                ratings.push(Rating::new(title, score));
            }
        }
        Ok(ratings)
    }
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Create an account
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<Credentials>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    let username = request.username.clone();
    auth::register(state.users.clone(), request).await?;
    Ok((StatusCode::CREATED, Json(RegisterResponse { username })))
}

/// Log in and receive a session token
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<Credentials>,
) -> AppResult<Json<LoginResponse>> {
    let session = auth::login(state.users.clone(), state.sessions.clone(), request).await?;
    Ok(Json(LoginResponse {
        token: session.token,
        username: session.username,
        expires_at: session.expires_at,
    }))
}

/// Revoke the current session
pub async fn logout(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
) -> AppResult<StatusCode> {
    auth::logout(state.sessions.clone(), &session).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Random movies for the logged-in user to rate
pub async fn random_movies(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<RandomMoviesResponse>> {
    let movies = catalog::sample_for_rating(state.catalog.clone(), state.settings.sample_size).await?;
    Ok(Json(RandomMoviesResponse {
        username: user.username().to_string(),
        movies: movies.into_iter().map(MovieResponse::from).collect(),
    }))
}

/// Recommend movies from the submitted ratings
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    user: CurrentUser,
    Json(request): Json<RatingsRequest>,
) -> AppResult<Json<RecommendationsResponse>> {
    let ratings = request.into_ratings()?;

    tracing::info!(
        request_id = %request_id,
        username = %user.username(),
        rating_count = ratings.len(),
        "Processing recommendation request"
    );

    let recommendations = recommendations::get_recommendations(
        state.catalog.clone(),
        ratings,
        state.settings.recommendation_count,
    )
    .await?;

    Ok(Json(RecommendationsResponse {
        username: user.username().to_string(),
        recommendations,
    }))
}
