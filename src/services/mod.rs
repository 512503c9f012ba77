pub mod auth;
pub mod catalog;
pub mod recommendations;
pub mod similarity;

pub use recommendations::{get_recommendations, recommend, RecommendError, DEFAULT_TOP_N};
pub use similarity::SimilarityMatrix;
