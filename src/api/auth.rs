//! Sign-in and the persisted auth session

use crate::api::client::ApiClient;
use crate::core::error::{GameError, Result};
use crate::core::types::UserId;
use crate::storage::KeyValueStore;

const TOKEN_KEY: &str = "auth_token";
const USER_ID_KEY: &str = "auth_user_id";
const USERNAME_KEY: &str = "auth_username";

/// An authenticated user, as persisted between runs
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user_id: UserId,
    pub username: String,
    pub token: String,
}

impl AuthSession {
    pub fn save(&self, store: &dyn KeyValueStore) -> Result<()> {
        store.set(TOKEN_KEY, &self.token)?;
        store.set(USER_ID_KEY, &self.user_id.0.to_string())?;
        store.set(USERNAME_KEY, &self.username)
    }

    /// Restore the persisted session. A missing or garbled entry means
    /// nobody is signed in.
    pub fn load(store: &dyn KeyValueStore) -> Result<Option<Self>> {
        let (Some(token), Some(raw_id), Some(username)) = (
            store.get(TOKEN_KEY)?,
            store.get(USER_ID_KEY)?,
            store.get(USERNAME_KEY)?,
        ) else {
            return Ok(None);
        };
        let Ok(id) = raw_id.parse::<u32>() else {
            return Ok(None);
        };
        Ok(Some(Self {
            user_id: UserId(id),
            username,
            token,
        }))
    }

    pub fn clear(store: &dyn KeyValueStore) -> Result<()> {
        store.remove(TOKEN_KEY)?;
        store.remove(USER_ID_KEY)?;
        store.remove(USERNAME_KEY)
    }
}

/// Sign in, wire the token into the client, and persist the session
pub async fn sign_in(
    client: &mut ApiClient,
    store: &dyn KeyValueStore,
    username: &str,
    password: &str,
) -> Result<AuthSession> {
    let response = client.sign_in(username, password).await?;
    if response.token.is_empty() {
        return Err(GameError::NetworkFailure(
            "sign-in response missing token".to_string(),
        ));
    }

    let session = AuthSession {
        user_id: response.id,
        username: username.to_string(),
        token: response.token,
    };
    client.set_token(&session.token);
    session.save(store)?;
    tracing::info!("Signed in as {} (user {})", username, session.user_id.0);
    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_save_load_clear_roundtrip() {
        let store = MemoryStore::new();
        assert!(AuthSession::load(&store).unwrap().is_none());

        let session = AuthSession {
            user_id: UserId(42),
            username: "kestrel".to_string(),
            token: "tok-abc".to_string(),
        };
        session.save(&store).unwrap();

        let loaded = AuthSession::load(&store).unwrap().unwrap();
        assert_eq!(loaded.user_id, UserId(42));
        assert_eq!(loaded.username, "kestrel");
        assert_eq!(loaded.token, "tok-abc");

        AuthSession::clear(&store).unwrap();
        assert!(AuthSession::load(&store).unwrap().is_none());
    }

    #[test]
    fn test_garbled_user_id_reads_as_signed_out() {
        let store = MemoryStore::new();
        store.set("auth_token", "tok").unwrap();
        store.set("auth_user_id", "not-a-number").unwrap();
        store.set("auth_username", "kestrel").unwrap();

        assert!(AuthSession::load(&store).unwrap().is_none());
    }
}
