//! Siigo API client implementation

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::config::SiigoConfig;
use crate::domain::ports::{AccountingClient, AccountingPage, AccountingResource};
use crate::error::SiigoError;

/// Tokens are renewed this long before Siigo says they expire
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

/// Implementation of the Siigo API client
pub struct SiigoClient {
    http: Client,
    base_url: String,
    username: String,
    access_key: String,
    partner_id: String,
    token: RwLock<Option<CachedToken>>,
}

#[derive(Serialize)]
struct AuthRequest<'a> {
    username: &'a str,
    access_key: &'a str,
}

#[derive(Deserialize)]
struct AuthResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    86_400
}

impl SiigoClient {
    pub fn new(base_url: String, username: String, access_key: String, partner_id: String) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            username,
            access_key,
            partner_id,
            token: RwLock::new(None),
        }
    }

    /// Build a client from configuration; `None` when credentials are missing
    pub fn from_config(config: &SiigoConfig) -> Option<Self> {
        match (&config.username, &config.access_key) {
            (Some(username), Some(access_key)) => Some(Self::new(
                config.base_url.clone(),
                username.clone(),
                access_key.clone(),
                config.partner_id.clone(),
            )),
            _ => None,
        }
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/v1/{}", self.base_url, path)
    }

    async fn handle_response<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, SiigoError> {
        let status = response.status();

        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| SiigoError::Deserialization(e.to_string()))
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(SiigoError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }

    async fn authenticate(&self) -> Result<CachedToken, SiigoError> {
        let resp = self
            .http
            .post(format!("{}/auth", self.base_url))
            .header("Partner-Id", &self.partner_id)
            .json(&AuthRequest {
                username: &self.username,
                access_key: &self.access_key,
            })
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(SiigoError::Auth(format!("{} - {}", status.as_u16(), message)));
        }

        let auth: AuthResponse = self.handle_response(resp).await?;
        let lifetime = Duration::from_secs(auth.expires_in).saturating_sub(EXPIRY_MARGIN);

        Ok(CachedToken {
            access_token: auth.access_token,
            expires_at: Instant::now() + lifetime,
        })
    }

    /// Cached token, authenticating when absent or expired
    async fn token(&self) -> Result<String, SiigoError> {
        if let Some(cached) = self.token.read().await.as_ref() {
            if cached.expires_at > Instant::now() {
                return Ok(cached.access_token.clone());
            }
        }

        let mut guard = self.token.write().await;
        if let Some(cached) = guard.as_ref() {
            if cached.expires_at > Instant::now() {
                return Ok(cached.access_token.clone());
            }
        }

        let fresh = self.authenticate().await?;
        let token = fresh.access_token.clone();
        *guard = Some(fresh);
        Ok(token)
    }

    async fn invalidate(&self) {
        *self.token.write().await = None;
    }

    async fn get_page(
        &self,
        token: &str,
        resource: AccountingResource,
        page: AccountingPage,
    ) -> Result<reqwest::Response, SiigoError> {
        Ok(self
            .http
            .get(self.api_url(resource.path()))
            .bearer_auth(token)
            .header("Partner-Id", &self.partner_id)
            .query(&[("page", page.page), ("page_size", page.page_size)])
            .send()
            .await?)
    }
}

#[async_trait]
impl AccountingClient for SiigoClient {
    async fn list(
        &self,
        resource: AccountingResource,
        page: AccountingPage,
    ) -> Result<serde_json::Value, SiigoError> {
        let token = self.token().await?;
        let resp = self.get_page(&token, resource, page).await?;

        if resp.status().as_u16() != 401 {
            return self.handle_response(resp).await;
        }

        tracing::warn!(resource = resource.path(), "Siigo rejected token, re-authenticating");
        self.invalidate().await;
        let token = self.token().await?;
        let resp = self.get_page(&token, resource, page).await?;
        self.handle_response(resp).await
    }

    async fn refresh_token(&self) -> Result<(), SiigoError> {
        let fresh = self.authenticate().await?;
        *self.token.write().await = Some(fresh);
        Ok(())
    }
}

/// Used when Siigo credentials are not configured
pub struct DisabledAccountingClient;

#[async_trait]
impl AccountingClient for DisabledAccountingClient {
    async fn list(
        &self,
        _resource: AccountingResource,
        _page: AccountingPage,
    ) -> Result<serde_json::Value, SiigoError> {
        Err(SiigoError::Disabled)
    }

    async fn refresh_token(&self) -> Result<(), SiigoError> {
        Err(SiigoError::Disabled)
    }
}

/// Refresh the accounting token on a fixed interval
pub fn spawn_token_refresher(
    client: Arc<dyn AccountingClient>,
    every: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            match client.refresh_token().await {
                Ok(()) => tracing::debug!("Siigo token refreshed"),
                Err(e) => tracing::warn!("Siigo token refresh failed: {}", e),
            }
        }
    })
}
