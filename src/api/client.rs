//! HTTP client for the game backend

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::api::models::{LocationRecord, PlayerProfile};
use crate::core::error::{GameError, Result};
use crate::core::types::{LocationId, UserId};
use crate::resolution::submit::BattleAuthority;

/// Client for the game's REST API
///
/// Authenticated routes send the bearer token set after sign-in.
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            token: None,
        }
    }

    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn post_json<T: Serialize>(&self, path: &str, body: &T) -> Result<reqwest::Response> {
        let mut request = self.client.post(self.url(path)).json(body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = request
            .send()
            .await
            .map_err(|e| GameError::NetworkFailure(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(GameError::NetworkFailure(format!(
                "{}: {}",
                status, error_text
            )));
        }
        Ok(response)
    }

    /// Exchange credentials for a token and user id
    pub async fn sign_in(&self, username: &str, password: &str) -> Result<SignInResponse> {
        let body = CredentialsRequest { username, password };
        let response = self.post_json("/api/auth/sign_in", &body).await?;
        response
            .json()
            .await
            .map_err(|e| GameError::NetworkFailure(e.to_string()))
    }

    pub async fn create_account(&self, username: &str, password: &str) -> Result<()> {
        let body = CredentialsRequest { username, password };
        self.post_json("/api/auth/create_account", &body).await?;
        Ok(())
    }

    pub async fn get_profile(&self, id: UserId) -> Result<PlayerProfile> {
        let response = self
            .post_json("/api/profile/get_profile", &ProfileRequest { id })
            .await?;
        response
            .json()
            .await
            .map_err(|e| GameError::NetworkFailure(e.to_string()))
    }

    pub async fn get_locations(&self) -> Result<Vec<LocationRecord>> {
        let response = self
            .client
            .get(self.url("/api/locations/get_locations"))
            .send()
            .await
            .map_err(|e| GameError::NetworkFailure(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(GameError::NetworkFailure(format!(
                "{}: {}",
                status, error_text
            )));
        }

        let listing: LocationsResponse = response
            .json()
            .await
            .map_err(|e| GameError::NetworkFailure(e.to_string()))?;
        Ok(listing.data)
    }
}

impl BattleAuthority for ApiClient {
    async fn report_battle(&self, location: LocationId, score: u32) -> Result<String> {
        let body = BattleRequest {
            id: location,
            score,
        };
        let response = self.post_json("/api/interactions/battle", &body).await?;
        let verdict: BattleVerdict = response
            .json()
            .await
            .map_err(|e| GameError::NetworkFailure(e.to_string()))?;
        Ok(verdict.message)
    }

    async fn claim_ownership(&self, location: LocationId) -> Result<()> {
        self.post_json("/api/interactions/become_owner", &OwnershipRequest { id: location })
            .await?;
        Ok(())
    }
}

/// Token and user id handed out on sign-in
#[derive(Debug, Clone, Deserialize)]
pub struct SignInResponse {
    pub token: String,
    pub id: UserId,
}

// Backend API format

#[derive(Debug, Serialize)]
struct CredentialsRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct ProfileRequest {
    id: UserId,
}

#[derive(Debug, Deserialize)]
struct LocationsResponse {
    data: Vec<LocationRecord>,
}

#[derive(Debug, Serialize)]
struct BattleRequest {
    id: LocationId,
    score: u32,
}

#[derive(Debug, Deserialize)]
struct BattleVerdict {
    message: String,
}

#[derive(Debug, Serialize)]
struct OwnershipRequest {
    id: LocationId,
}
