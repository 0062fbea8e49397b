//! HTTP client for the Notion database holding the chore board.
//!
//! Speaks the two endpoints a sync cycle needs: a database query (fetch all
//! rows) and a page property patch (write-back). Non-success responses are
//! surfaced with their raw body preserved.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use tracing::debug;

use choreboard_core::{PropertyPatch, RawRow, RecordStore, StoreError};

/// Public Notion API base.
const API_BASE: &str = "https://api.notion.com/v1";
/// Pinned Notion API revision.
const NOTION_VERSION: &str = "2022-06-28";
/// Default timeout for API requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Response envelope of a database query.
#[derive(Debug, Deserialize)]
struct QueryResponse {
    results: Vec<RawRow>,
}

fn transport(err: impl std::error::Error + Send + Sync + 'static) -> StoreError {
    StoreError::Transport(Box::new(err))
}

/// Client bound to one Notion database.
#[derive(Debug, Clone)]
pub struct NotionClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
    database_id: String,
}

impl NotionClient {
    /// Create a client for the public Notion API.
    pub fn new(token: impl Into<String>, database_id: impl Into<String>) -> Self {
        Self::with_base_url(API_BASE, token, database_id)
    }

    /// Create a client against a custom base URL (tests, proxies).
    pub fn with_base_url(
        base_url: &str,
        token: impl Into<String>,
        database_id: impl Into<String>,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.into(),
            database_id: database_id.into(),
        }
    }

    /// Headers common to every API request.
    fn headers(&self) -> Result<HeaderMap, StoreError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert("Notion-Version", HeaderValue::from_static(NOTION_VERSION));

        let auth_value = HeaderValue::from_str(&format!("Bearer {}", self.token))
            .map_err(|_| StoreError::Auth("invalid API token format".to_string()))?;
        headers.insert(AUTHORIZATION, auth_value);

        Ok(headers)
    }

    /// Read a response body, surfacing non-success statuses with the raw
    /// body preserved.
    async fn read_body(response: reqwest::Response) -> Result<String, StoreError> {
        let status = response.status();
        let body = response.text().await.map_err(transport)?;
        debug!("API response status: {}", status);

        if !status.is_success() {
            return Err(StoreError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }

    /// Fetch every row of the database.
    ///
    /// POST /v1/databases/{database_id}/query
    pub async fn query_database(&self) -> Result<Vec<RawRow>, StoreError> {
        let url = format!("{}/databases/{}/query", self.base_url, self.database_id);
        debug!("querying database {}", self.database_id);

        let response = self
            .client
            .post(&url)
            .headers(self.headers()?)
            .json(&serde_json::json!({}))
            .send()
            .await
            .map_err(transport)?;

        let body = Self::read_body(response).await?;
        let parsed: QueryResponse = serde_json::from_str(&body).map_err(transport)?;
        Ok(parsed.results)
    }

    /// Apply a partial property update to one page.
    ///
    /// PATCH /v1/pages/{page_id}
    pub async fn update_page(
        &self,
        page_id: &str,
        properties: &PropertyPatch,
    ) -> Result<(), StoreError> {
        let url = format!("{}/pages/{}", self.base_url, page_id);

        let response = self
            .client
            .patch(&url)
            .headers(self.headers()?)
            .json(&serde_json::json!({ "properties": properties }))
            .send()
            .await
            .map_err(transport)?;

        // The endpoint echoes the updated page; only the status matters here.
        Self::read_body(response).await?;
        Ok(())
    }
}

#[async_trait]
impl RecordStore for NotionClient {
    async fn fetch_all_rows(&self) -> Result<Vec<RawRow>, StoreError> {
        self.query_database().await
    }

    async fn update_row_properties(
        &self,
        row_id: &str,
        properties: PropertyPatch,
    ) -> Result<(), StoreError> {
        self.update_page(row_id, &properties).await
    }
}
