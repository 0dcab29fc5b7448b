//! Remote commerce API client.
//!
//! A thin `reqwest` wrapper over the cart and wishlist endpoints. The
//! client carries an optional bearer token; without one it reports
//! unauthenticated and the stores keep every operation local. Mutation
//! endpoints are issued by the sync worker, never directly by a store
//! mutation.

pub mod payloads;

use std::sync::Arc;

use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::instrument;

use fixhub_core::ProductId;

use crate::config::ClientConfig;
use crate::types::{CartLine, WishlistEntry};

use payloads::{AddCartItemBody, AddWishlistItemBody, RemoveCartItemBody, UpdateQuantityBody};

/// Errors that can occur when talking to the commerce API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (transport-level).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server responded with a non-success status.
    #[error("Unexpected status: {0}")]
    Status(StatusCode),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Token missing or rejected.
    #[error("Unauthorized")]
    Unauthorized,

    /// Rate limited by the API.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),
}

impl ApiError {
    /// Whether the sync worker should retry after this error.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        !matches!(self, Self::Unauthorized)
    }
}

/// Client for the FixHub commerce API.
///
/// Cheaply cloneable; all clones share one connection pool.
#[derive(Clone)]
pub struct CommerceClient {
    inner: Arc<CommerceClientInner>,
}

struct CommerceClientInner {
    http: reqwest::Client,
    base_url: String,
    token: Option<SecretString>,
}

impl CommerceClient {
    /// Create a new commerce API client.
    #[must_use]
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            inner: Arc::new(CommerceClientInner {
                http: reqwest::Client::new(),
                base_url: config.api_base_url.as_str().trim_end_matches('/').to_owned(),
                token: config.api_token.clone(),
            }),
        }
    }

    /// Whether a bearer token is configured.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.inner.token.is_some()
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    /// Send a request, attaching the bearer token and triaging the
    /// response status.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let request = match &self.inner.token {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();

        // Check for rate limiting
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ApiError::RateLimited(retry_after));
        }

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ApiError::Unauthorized);
        }

        if !status.is_success() {
            return Err(ApiError::Status(status));
        }

        Ok(response)
    }

    /// Read a response body as text first for better parse diagnostics.
    async fn json_body<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %text.chars().take(500).collect::<String>(),
                "Failed to parse commerce API response"
            );
            ApiError::Parse(e)
        })
    }

    // =========================================================================
    // Cart Endpoints
    // =========================================================================

    /// Fetch the remote cart collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is not a
    /// valid line-item collection.
    #[instrument(skip(self))]
    pub async fn fetch_cart(&self) -> Result<Vec<CartLine>, ApiError> {
        let response = self
            .send(self.inner.http.get(self.endpoint("/api/cart")))
            .await?;
        Self::json_body(response).await
    }

    /// Add an item to the remote cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_cart_item(
        &self,
        product_id: &ProductId,
        quantity: u32,
        variant: Option<&str>,
    ) -> Result<(), ApiError> {
        let body = AddCartItemBody {
            product_id: product_id.clone(),
            quantity,
            variant: variant.map(ToOwned::to_owned),
        };
        self.send(self.inner.http.post(self.endpoint("/api/cart")).json(&body))
            .await?;
        Ok(())
    }

    /// Remove an item from the remote cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn remove_cart_item(
        &self,
        product_id: &ProductId,
        variant: Option<&str>,
    ) -> Result<(), ApiError> {
        let body = RemoveCartItemBody {
            variant: variant.map(ToOwned::to_owned),
        };
        let url = self.endpoint(&format!("/api/cart/{product_id}"));
        self.send(self.inner.http.delete(url).json(&body)).await?;
        Ok(())
    }

    /// Set an item's quantity in the remote cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn update_cart_quantity(
        &self,
        product_id: &ProductId,
        quantity: u32,
        variant: Option<&str>,
    ) -> Result<(), ApiError> {
        let body = UpdateQuantityBody {
            quantity,
            variant: variant.map(ToOwned::to_owned),
        };
        let url = self.endpoint(&format!("/api/cart/{product_id}"));
        self.send(self.inner.http.put(url).json(&body)).await?;
        Ok(())
    }

    /// Clear the remote cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn clear_cart(&self) -> Result<(), ApiError> {
        self.send(self.inner.http.delete(self.endpoint("/api/cart")))
            .await?;
        Ok(())
    }

    // =========================================================================
    // Wishlist Endpoints
    // =========================================================================

    /// Fetch the remote wishlist collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is not a
    /// valid wishlist collection.
    #[instrument(skip(self))]
    pub async fn fetch_wishlist(&self) -> Result<Vec<WishlistEntry>, ApiError> {
        let response = self
            .send(self.inner.http.get(self.endpoint("/api/wishlist")))
            .await?;
        Self::json_body(response).await
    }

    /// Add an item to the remote wishlist.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_wishlist_item(&self, product_id: &ProductId) -> Result<(), ApiError> {
        let body = AddWishlistItemBody {
            product_id: product_id.clone(),
        };
        self.send(
            self.inner
                .http
                .post(self.endpoint("/api/wishlist"))
                .json(&body),
        )
        .await?;
        Ok(())
    }

    /// Remove an item from the remote wishlist.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn remove_wishlist_item(&self, product_id: &ProductId) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("/api/wishlist/{product_id}"));
        self.send(self.inner.http.delete(url)).await?;
        Ok(())
    }

    /// Clear the remote wishlist.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn clear_wishlist(&self) -> Result<(), ApiError> {
        self.send(self.inner.http.delete(self.endpoint("/api/wishlist")))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use url::Url;

    use super::*;

    fn client(base: &str) -> CommerceClient {
        let config = ClientConfig::new(Url::parse(base).expect("valid url"));
        CommerceClient::new(&config)
    }

    #[test]
    fn test_api_error_display() {
        let err = ApiError::Unauthorized;
        assert_eq!(err.to_string(), "Unauthorized");

        let err = ApiError::RateLimited(60);
        assert_eq!(err.to_string(), "Rate limited, retry after 60 seconds");

        let err = ApiError::Status(StatusCode::BAD_GATEWAY);
        assert_eq!(err.to_string(), "Unexpected status: 502 Bad Gateway");
    }

    #[test]
    fn test_unauthorized_is_not_retryable() {
        assert!(!ApiError::Unauthorized.is_retryable());
        assert!(ApiError::Status(StatusCode::INTERNAL_SERVER_ERROR).is_retryable());
        assert!(ApiError::RateLimited(5).is_retryable());
    }

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let client = client("http://localhost:4100/");
        assert_eq!(
            client.endpoint("/api/cart"),
            "http://localhost:4100/api/cart"
        );
    }

    #[test]
    fn test_client_without_token_is_unauthenticated() {
        assert!(!client("http://localhost:4100").is_authenticated());
    }
}
