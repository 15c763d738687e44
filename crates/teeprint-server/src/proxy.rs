//! `/api/users`: forwards listing queries to the upstream API.

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error};

/// Upstream failures. All of them surface to the client as the same 500.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("Upstream request failed: {0}")]
    Request(String),
    #[error("Upstream returned status {0}")]
    Status(u16),
    #[error("Upstream body is not JSON: {0}")]
    Body(String),
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        error!("API Error: {}", self);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Failed to fetch data" })),
        )
            .into_response()
    }
}

/// Query parameters accepted by the proxy. Anything else is dropped.
#[derive(Debug, Default, Deserialize)]
pub struct ListingParams {
    pub paginate: Option<String>,
    pub search: Option<String>,
    pub page: Option<String>,
}

impl ListingParams {
    /// Parameters forwarded upstream, in order. Absent values are omitted and
    /// so is an empty `search`.
    pub fn upstream_pairs(&self) -> Vec<(&'static str, &str)> {
        let mut pairs = Vec::with_capacity(3);
        if let Some(paginate) = self.paginate.as_deref() {
            pairs.push(("paginate", paginate));
        }
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("search", search));
        }
        if let Some(page) = self.page.as_deref() {
            pairs.push(("page", page));
        }
        pairs
    }
}

/// Shared proxy state.
pub struct ProxyState {
    pub client: reqwest::Client,
    pub upstream_url: String,
}

impl ProxyState {
    pub fn new(upstream_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            upstream_url: upstream_url.into(),
        }
    }

    /// Fetch one listing page and return the upstream JSON unchanged.
    pub async fn fetch(&self, params: &ListingParams) -> Result<Value, ProxyError> {
        let pairs = params.upstream_pairs();
        debug!("Forwarding {:?} to {}", pairs, self.upstream_url);

        let response = self
            .client
            .get(&self.upstream_url)
            .query(&pairs)
            .send()
            .await
            .map_err(|e| ProxyError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProxyError::Status(status.as_u16()));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| ProxyError::Body(e.to_string()))
    }
}

/// Users listing handler
pub async fn list_users(
    State(state): State<Arc<ProxyState>>,
    Query(params): Query<ListingParams>,
) -> Result<Json<Value>, ProxyError> {
    state.fetch(&params).await.map(Json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pairs_keep_order_and_skip_empty_search() {
        let params = ListingParams {
            paginate: Some("10".into()),
            search: Some(String::new()),
            page: Some("2".into()),
        };
        assert_eq!(params.upstream_pairs(), vec![("paginate", "10"), ("page", "2")]);

        let params = ListingParams {
            paginate: Some("5".into()),
            search: Some("ann".into()),
            page: Some("1".into()),
        };
        assert_eq!(
            params.upstream_pairs(),
            vec![("paginate", "5"), ("search", "ann"), ("page", "1")]
        );
    }

    #[test]
    fn test_missing_params_are_omitted() {
        assert!(ListingParams::default().upstream_pairs().is_empty());
    }

    #[tokio::test]
    async fn test_error_response_body() {
        let response = ProxyError::Status(502).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({ "error": "Failed to fetch data" }));
    }
}
