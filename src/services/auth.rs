use std::sync::Arc;

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::RngCore;

use crate::{
    db::{SessionStore, UserStore},
    error::{AppError, AppResult},
    models::{Credentials, Session},
};

const SALT_LEN: usize = 16;

fn invalid_credentials() -> AppError {
    AppError::Unauthorized("Invalid username or password".to_string())
}

/// Hashes a password into an argon2 PHC string with a random salt
pub fn hash_password(password: &str) -> AppResult<String> {
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    let salt = SaltString::encode_b64(&salt)
        .map_err(|e| AppError::Internal(format!("Salt encoding failed: {}", e)))?;

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

    Ok(hash.to_string())
}

/// Checks a password against a stored PHC string; malformed hashes never match
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::warn!(error = %e, "Stored password hash is malformed");
            false
        }
    }
}

/// Registers a new account
///
/// Rejects blank usernames or passwords and reports a conflict when the
/// username is already taken. Hashing runs on the blocking pool.
pub async fn register(users: Arc<dyn UserStore>, credentials: Credentials) -> AppResult<()> {
    let Credentials { username, password } = credentials;
    if username.trim().is_empty() || password.is_empty() {
        return Err(AppError::InvalidInput(
            "Username and password are required".to_string(),
        ));
    }

    if users.find_password_hash(&username).await?.is_some() {
        return Err(crate::db::username_taken());
    }

    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::Internal(format!("Hashing task failed: {}", e)))??;

    users.create_user(&username, &password_hash).await?;

    tracing::info!(username = %username, "Account created");
    Ok(())
}

/// Verifies credentials and opens a session
///
/// Unknown users and wrong passwords produce the same error.
pub async fn login(
    users: Arc<dyn UserStore>,
    sessions: Arc<dyn SessionStore>,
    credentials: Credentials,
) -> AppResult<Session> {
    let Credentials { username, password } = credentials;

    let stored_hash = users
        .find_password_hash(&username)
        .await?
        .ok_or_else(invalid_credentials)?;

    let valid = tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash))
        .await
        .map_err(|e| AppError::Internal(format!("Verification task failed: {}", e)))?;

    if !valid {
        tracing::info!(username = %username, "Rejected login");
        return Err(invalid_credentials());
    }

    let session = sessions.create(&username).await?;
    tracing::info!(username = %username, "Logged in");
    Ok(session)
}

/// Ends a session
pub async fn logout(sessions: Arc<dyn SessionStore>, session: &Session) -> AppResult<()> {
    sessions.revoke(session.token).await?;
    tracing::info!(username = %session.username, "Logged out");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{InMemorySessions, InMemoryUsers, MockUserStore};
    use chrono::Duration;

    fn credentials(username: &str, password: &str) -> Credentials {
        Credentials {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_hash_round_trips_and_salts() {
        let first = hash_password("hunter2").unwrap();
        let second = hash_password("hunter2").unwrap();

        assert!(first.starts_with("$argon2id$"));
        assert_ne!(first, second);
        assert!(verify_password("hunter2", &first));
        assert!(!verify_password("hunter3", &first));
    }

    #[test]
    fn test_malformed_hash_never_verifies() {
        assert!(!verify_password("hunter2", "not-a-hash"));
        assert!(!verify_password("hunter2", ""));
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let users: Arc<dyn UserStore> = Arc::new(InMemoryUsers::new());
        let sessions: Arc<dyn SessionStore> = Arc::new(InMemorySessions::new(Duration::hours(1)));

        register(users.clone(), credentials("alice", "s3cret"))
            .await
            .unwrap();
        let session = login(users, sessions.clone(), credentials("alice", "s3cret"))
            .await
            .unwrap();

        assert_eq!(session.username, "alice");
        assert!(sessions.get(session.token).await.unwrap().is_some());

        logout(sessions.clone(), &session).await.unwrap();
        assert!(sessions.get(session.token).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_register_rejects_taken_username() {
        let users: Arc<dyn UserStore> = Arc::new(InMemoryUsers::new());
        register(users.clone(), credentials("alice", "one"))
            .await
            .unwrap();

        let err = register(users, credentials("alice", "two"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_register_rejects_blank_fields() {
        let mut users = MockUserStore::new();
        users.expect_find_password_hash().never();
        users.expect_create_user().never();
        let users: Arc<dyn UserStore> = Arc::new(users);

        for (username, password) in [("", "pw"), ("   ", "pw"), ("alice", "")] {
            let err = register(users.clone(), credentials(username, password))
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::InvalidInput(_)));
        }
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let users: Arc<dyn UserStore> = Arc::new(InMemoryUsers::new());
        let sessions: Arc<dyn SessionStore> = Arc::new(InMemorySessions::new(Duration::hours(1)));
        register(users.clone(), credentials("alice", "s3cret"))
            .await
            .unwrap();

        let wrong_password = login(users.clone(), sessions.clone(), credentials("alice", "nope"))
            .await
            .unwrap_err();
        let unknown_user = login(users, sessions, credentials("bob", "s3cret"))
            .await
            .unwrap_err();

        assert_eq!(wrong_password.to_string(), unknown_user.to_string());
        assert!(matches!(wrong_password, AppError::Unauthorized(_)));
    }
}
