//! Astra DB Data API reference store.

use crate::error::MemoryError;
use crate::reference::{ReferenceDocument, ReferenceSet};
use crate::store::VectorStore;
use crate::Result;
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

/// Reference store reading one document per category from an Astra DB
/// collection through the JSON Data API.
pub struct AstraVectorStore {
    client: Client,
    token: SecretString,
    endpoint: String,
    keyspace: String,
    collection: String,
}

#[derive(Deserialize)]
struct ApiResponse {
    #[serde(default)]
    data: Option<ApiData>,
    #[serde(default)]
    status: Option<ApiStatus>,
    #[serde(default)]
    errors: Vec<ApiError>,
}

#[derive(Deserialize)]
struct ApiData {
    #[serde(default)]
    document: Option<ReferenceDocument>,
}

#[derive(Deserialize)]
struct ApiStatus {
    #[serde(default)]
    count: Option<usize>,
}

#[derive(Deserialize)]
struct ApiError {
    message: String,
}

impl AstraVectorStore {
    /// Create a store for `collection` in `keyspace` at `endpoint`.
    pub fn new(
        endpoint: impl Into<String>,
        token: impl Into<String>,
        keyspace: impl Into<String>,
        collection: impl Into<String>,
    ) -> Result<Self> {
        let token = token.into();
        if token.is_empty() {
            return Err(MemoryError::Config("Astra application token is required".to_string()));
        }
        let endpoint = endpoint.into();
        if endpoint.is_empty() {
            return Err(MemoryError::Config("Astra endpoint is required".to_string()));
        }

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| MemoryError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            token: SecretString::new(token),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            keyspace: keyspace.into(),
            collection: collection.into(),
        })
    }

    fn collection_url(&self) -> String {
        format!(
            "{}/api/json/v1/{}/{}",
            self.endpoint, self.keyspace, self.collection
        )
    }

    async fn command(&self, body: Value) -> Result<ApiResponse> {
        let response = self
            .client
            .post(self.collection_url())
            .header("Token", self.token.expose_secret())
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let text = response.text().await.unwrap_or_default();
            return Err(MemoryError::Store(format!("Data API error ({}): {}", status, text)));
        }

        let parsed: ApiResponse = response.json().await?;
        if let Some(first) = parsed.errors.first() {
            return Err(MemoryError::Store(first.message.clone()));
        }
        Ok(parsed)
    }
}

#[async_trait]
impl VectorStore for AstraVectorStore {
    async fn lookup(&self, label: &str) -> Result<Option<ReferenceSet>> {
        debug!(label, collection = %self.collection, "findOne by class");

        let response = self
            .command(json!({ "findOne": { "filter": { "class": label } } }))
            .await?;

        match response.data.and_then(|d| d.document) {
            Some(doc) => ReferenceSet::try_from(doc).map(Some),
            None => {
                warn!(label, "no reference document for class");
                Ok(None)
            }
        }
    }

    async fn count(&self) -> Result<usize> {
        let response = self.command(json!({ "countDocuments": {} })).await?;
        response
            .status
            .and_then(|s| s.count)
            .ok_or_else(|| MemoryError::Store("countDocuments returned no count".to_string()))
    }
}
