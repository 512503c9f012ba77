//! Genre-based movie recommendations behind a small authenticated JSON API.
//!
//! The recommendation core lives in [`services::similarity`] (TF-IDF genre
//! vectors and cosine similarity) and [`services::recommendations`]
//! (rating-weighted aggregation and ranking).

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
