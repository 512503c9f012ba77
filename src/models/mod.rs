pub mod movie;
pub mod rating;
pub mod session;

pub use movie::{parse_genres, Movie, GENRE_SEPARATOR};
pub use rating::{Rating, RecommendationEntry};
pub use session::{Credentials, Session};
