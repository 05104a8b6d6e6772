//! HTTP client for the workflow backend.
//!
//! Every call maps transport failures, non-success statuses and undecodable bodies onto
//! [`ClientError`]. Nothing is retried; callers decide whether to degrade or surface.

use crate::backend::{CatalogSource, CredentialSource, WorkflowStore};
use crate::catalog::CatalogPage;
use crate::credential::{Credential, CredentialPayload, CredentialSchema};
use crate::error::ClientError;
use crate::graph::WorkflowPayload;
use crate::schema::{IntoDescriptor, NodeTypeDescriptor, WireDescriptor};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder, Url};
use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, warn};

mod config;

pub use config::*;

const ERROR_BODY_LIMIT: usize = 200;

/// A saved workflow as listed on the home view.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowSummary {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Deserialize)]
struct DataEnvelope<T> {
    #[serde(default = "Vec::new")]
    data: Vec<T>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogEnvelope {
    #[serde(default)]
    data: Vec<WireDescriptor>,
    #[serde(default = "one")]
    total_pages: u32,
}

fn one() -> u32 {
    1
}

pub struct ApiClient {
    http: Client,
    base: Url,
    config: ClientConfig,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let base = Url::parse(&config.base_url).map_err(|e| ClientError::InvalidBaseUrl {
            url: config.base_url.clone(),
            message: e.to_string(),
        })?;
        if base.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl {
                url: config.base_url.clone(),
                message: "URL cannot carry a path".to_string(),
            });
        }

        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClientError::Transport {
                url: config.base_url.clone(),
                source: e,
            })?;

        Ok(Self { http, base, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Joins path segments onto the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidBaseUrl {
                url: self.base.to_string(),
                message: "URL cannot carry a path".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        url: Url,
        request: RequestBuilder,
    ) -> Result<T, ClientError> {
        debug!(%url, "backend request");
        let response = request.send().await.map_err(|e| ClientError::Transport {
            url: url.to_string(),
            source: e,
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                url: url.to_string(),
                body: body.chars().take(ERROR_BODY_LIMIT).collect(),
            });
        }

        response.json().await.map_err(|e| ClientError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<T, ClientError> {
        let url = self.endpoint(segments)?;
        let request = self.http.get(url.clone()).query(query);
        self.send(url, request).await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<T, ClientError> {
        let url = self.endpoint(segments)?;
        let request = self.http.post(url.clone()).json(body);
        self.send(url, request).await
    }

    /// `GET /get-nodes-names`: one page of the node catalog.
    pub async fn list_nodes(
        &self,
        search: &str,
        page: u32,
        limit: u32,
    ) -> Result<CatalogPage, ClientError> {
        let envelope: CatalogEnvelope = self
            .get(
                &["get-nodes-names"],
                &[
                    ("search", search.to_string()),
                    ("page", page.to_string()),
                    ("limit", limit.to_string()),
                ],
            )
            .await?;

        let entries = envelope
            .data
            .into_iter()
            .filter_map(|wire| match wire.into_descriptor() {
                Ok(descriptor) => Some(descriptor),
                Err(e) => {
                    warn!(error = %e, "skipping malformed catalog entry");
                    None
                }
            })
            .collect();

        Ok(CatalogPage {
            entries,
            total_pages: envelope.total_pages,
        })
    }

    /// `GET /get-node/{id}`: the full descriptor of one node type.
    pub async fn get_node(&self, id: &str) -> Result<NodeTypeDescriptor, ClientError> {
        let segments = ["get-node", id];
        let wire: WireDescriptor = self.get(&segments, &[]).await?;
        wire.into_descriptor().map_err(|e| ClientError::Decode {
            url: segments.join("/"),
            message: e.to_string(),
        })
    }

    /// `GET /get-existing-credentials`.
    pub async fn existing_credentials(&self) -> Result<Vec<Credential>, ClientError> {
        self.get(&["get-existing-credentials"], &[]).await
    }

    /// `GET /get-credentials-names`: one page of credential-type names.
    pub async fn credential_names(
        &self,
        page: u32,
        limit: u32,
        search: &str,
    ) -> Result<Vec<String>, ClientError> {
        let mut query = vec![("page", page.to_string()), ("limit", limit.to_string())];
        if !search.is_empty() {
            query.push(("search", search.to_string()));
        }
        self.get(&["get-credentials-names"], &query).await
    }

    /// `GET /api/get-credentials-schema/{id}`.
    pub async fn credential_schema(
        &self,
        credential_type: &str,
    ) -> Result<CredentialSchema, ClientError> {
        self.get(&["api", "get-credentials-schema", credential_type], &[])
            .await
    }

    /// `POST /api/create-credentials`.
    pub async fn create_credential(
        &self,
        payload: &CredentialPayload,
    ) -> Result<Value, ClientError> {
        self.post(&["api", "create-credentials"], payload).await
    }

    /// `POST /api/create-workflows`.
    pub async fn create_workflow(&self, payload: &WorkflowPayload) -> Result<Value, ClientError> {
        self.post(&["api", "create-workflows"], payload).await
    }

    /// `GET /api/workflows`.
    pub async fn list_workflows(&self) -> Result<Vec<WorkflowSummary>, ClientError> {
        let envelope: DataEnvelope<WorkflowSummary> = self.get(&["api", "workflows"], &[]).await?;
        Ok(envelope.data)
    }
}

#[async_trait]
impl CatalogSource for ApiClient {
    async fn fetch_catalog(
        &self,
        search: &str,
        page: u32,
        limit: u32,
    ) -> Result<CatalogPage, ClientError> {
        self.list_nodes(search, page, limit).await
    }

    async fn fetch_descriptor(&self, id: &str) -> Result<NodeTypeDescriptor, ClientError> {
        self.get_node(id).await
    }
}

#[async_trait]
impl CredentialSource for ApiClient {
    async fn fetch_credential_names(
        &self,
        page: u32,
        limit: u32,
        search: &str,
    ) -> Result<Vec<String>, ClientError> {
        self.credential_names(page, limit, search).await
    }

    async fn fetch_credential_schema(
        &self,
        credential_type: &str,
    ) -> Result<CredentialSchema, ClientError> {
        self.credential_schema(credential_type).await
    }
}

#[async_trait]
impl WorkflowStore for ApiClient {
    async fn save_workflow(&self, payload: &WorkflowPayload) -> Result<Value, ClientError> {
        self.create_workflow(payload).await
    }

    async fn save_credential(&self, payload: &CredentialPayload) -> Result<Value, ClientError> {
        self.create_credential(payload).await
    }
}
