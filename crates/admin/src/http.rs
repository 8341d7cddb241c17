//! REST client for the catalog API.
//!
//! One [`ResourceClient`] per resource path (`categories`, `genres`, ...),
//! sharing a pooled [`reqwest::Client`].

use std::marker::PhantomData;

use catalog_core::types::DbId;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::config::AdminConfig;
use crate::error::AdminError;
use crate::models::{DataResponse, ListResponse};

/// Query parameters for list requests, already formatted as strings.
pub type QueryParams = Vec<(String, String)>;

/// HTTP client for a single resource collection.
pub struct ResourceClient<T> {
    client: reqwest::Client,
    base_url: String,
    _entity: PhantomData<fn() -> T>,
}

impl<T> Clone for ResourceClient<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            _entity: PhantomData,
        }
    }
}

impl<T: DeserializeOwned> ResourceClient<T> {
    /// Build a client with its own connection pool and the configured timeout.
    pub fn new(config: &AdminConfig, resource: &str) -> Result<Self, AdminError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self::with_client(client, &config.api_url, resource))
    }

    /// Reuse an existing [`reqwest::Client`] (shares its connection pool).
    pub fn with_client(client: reqwest::Client, api_url: &str, resource: &str) -> Self {
        Self {
            client,
            base_url: format!(
                "{}/{}",
                api_url.trim_end_matches('/'),
                resource.trim_matches('/')
            ),
            _entity: PhantomData,
        }
    }

    /// `GET /{resource}?{params}`
    pub async fn list(&self, params: &[(String, String)]) -> Result<ListResponse<T>, AdminError> {
        let response = self.client.get(&self.base_url).query(params).send().await?;
        Self::parse_response(response).await
    }

    /// Same as [`list`](Self::list), aborted with [`AdminError::Cancelled`]
    /// as soon as `cancel` fires.
    pub async fn list_cancellable(
        &self,
        params: &[(String, String)],
        cancel: &CancellationToken,
    ) -> Result<ListResponse<T>, AdminError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(AdminError::Cancelled),
            result = self.list(params) => result,
        }
    }

    /// `GET /{resource}/{id}`
    pub async fn get(&self, id: DbId) -> Result<T, AdminError> {
        let response = self.client.get(self.item_url(id)).send().await?;
        Self::parse_response::<DataResponse<T>>(response)
            .await
            .map(|r| r.data)
    }

    /// `POST /{resource}`
    pub async fn create<B: Serialize + ?Sized>(&self, body: &B) -> Result<T, AdminError> {
        let response = self.client.post(&self.base_url).json(body).send().await?;
        Self::parse_response::<DataResponse<T>>(response)
            .await
            .map(|r| r.data)
    }

    /// `PUT /{resource}/{id}`
    pub async fn update<B: Serialize + ?Sized>(&self, id: DbId, body: &B) -> Result<T, AdminError> {
        let response = self.client.put(self.item_url(id)).json(body).send().await?;
        Self::parse_response::<DataResponse<T>>(response)
            .await
            .map(|r| r.data)
    }

    /// `DELETE /{resource}/{id}`
    pub async fn delete(&self, id: DbId) -> Result<(), AdminError> {
        let response = self.client.delete(self.item_url(id)).send().await?;
        Self::ensure_success(response).await.map(|_| ())
    }

    pub fn collection_url(&self) -> &str {
        &self.base_url
    }

    fn item_url(&self, id: DbId) -> String {
        format!("{}/{id}", self.base_url)
    }

    // ---- private helpers ----

    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, AdminError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        Err(AdminError::from_status(status.as_u16(), body))
    }

    async fn parse_response<R: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<R, AdminError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<R>().await?)
    }
}
