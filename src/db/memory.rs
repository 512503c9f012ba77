use std::collections::HashMap;

use chrono::{Duration, Utc};
use rand::seq::SliceRandom;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{username_taken, CatalogStore, SessionStore, UserStore};
use crate::{
    error::AppResult,
    models::{Movie, Session},
};

/// Fixed in-memory catalog
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    movies: Vec<Movie>,
}

impl InMemoryCatalog {
    pub fn new(mut movies: Vec<Movie>) -> Self {
        movies.sort_by_key(|movie| movie.id);
        Self { movies }
    }
}

#[async_trait::async_trait]
impl CatalogStore for InMemoryCatalog {
    async fn fetch_all_movies(&self) -> AppResult<Vec<Movie>> {
        Ok(self.movies.clone())
    }

    async fn random_movies(&self, limit: usize) -> AppResult<Vec<Movie>> {
        let mut rng = rand::thread_rng();
        Ok(self
            .movies
            .choose_multiple(&mut rng, limit)
            .cloned()
            .collect())
    }
}

/// User accounts held in a map of username to password hash
#[derive(Debug, Default)]
pub struct InMemoryUsers {
    users: RwLock<HashMap<String, String>>,
}

impl InMemoryUsers {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl UserStore for InMemoryUsers {
    async fn find_password_hash(&self, username: &str) -> AppResult<Option<String>> {
        Ok(self.users.read().await.get(username).cloned())
    }

    async fn create_user(&self, username: &str, password_hash: &str) -> AppResult<()> {
        let mut users = self.users.write().await;
        if users.contains_key(username) {
            return Err(username_taken());
        }
        users.insert(username.to_string(), password_hash.to_string());
        Ok(())
    }
}

/// Sessions held in process memory
#[derive(Debug)]
pub struct InMemorySessions {
    sessions: RwLock<HashMap<Uuid, Session>>,
    ttl: Duration,
}

impl InMemorySessions {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }
}

#[async_trait::async_trait]
impl SessionStore for InMemorySessions {
    async fn create(&self, username: &str) -> AppResult<Session> {
        let session = Session::new(username, self.ttl);
        self.sessions
            .write()
            .await
            .insert(session.token, session.clone());
        Ok(session)
    }

    async fn get(&self, token: Uuid) -> AppResult<Option<Session>> {
        let mut sessions = self.sessions.write().await;
        let session = match sessions.get(&token) {
            Some(session) => session.clone(),
            None => return Ok(None),
        };
        if session.is_expired(Utc::now()) {
            sessions.remove(&token);
            return Ok(None);
        }
        Ok(Some(session))
    }

    async fn revoke(&self, token: Uuid) -> AppResult<()> {
        self.sessions.write().await.remove(&token);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    fn movies() -> Vec<Movie> {
        vec![
            Movie::new(3, "Heat", ["Action"]),
            Movie::new(1, "Toy Story", ["Animation"]),
            Movie::new(2, "Jumanji", ["Adventure"]),
        ]
    }

    #[tokio::test]
    async fn test_catalog_is_ordered_by_id() {
        let catalog = InMemoryCatalog::new(movies());
        let ids: Vec<i64> = catalog
            .fetch_all_movies()
            .await
            .unwrap()
            .iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_random_movies_respects_limit() {
        let catalog = InMemoryCatalog::new(movies());
        assert_eq!(catalog.random_movies(2).await.unwrap().len(), 2);
        assert_eq!(catalog.random_movies(10).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_duplicate_user_is_a_conflict() {
        let users = InMemoryUsers::new();
        users.create_user("alice", "hash").await.unwrap();
        let err = users.create_user("alice", "other").await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(
            users.find_password_hash("alice").await.unwrap(),
            Some("hash".to_string())
        );
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        let sessions = InMemorySessions::new(Duration::hours(1));
        let session = sessions.create("alice").await.unwrap();
        assert_eq!(sessions.get(session.token).await.unwrap(), Some(session.clone()));

        sessions.revoke(session.token).await.unwrap();
        assert_eq!(sessions.get(session.token).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_expired_session_is_absent() {
        let sessions = InMemorySessions::new(Duration::seconds(-1));
        let session = sessions.create("alice").await.unwrap();
        assert_eq!(sessions.get(session.token).await.unwrap(), None);
    }
}
