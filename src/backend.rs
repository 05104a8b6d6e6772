use crate::catalog::CatalogPage;
use crate::credential::{CredentialPayload, CredentialSchema};
use crate::error::ClientError;
use crate::graph::WorkflowPayload;
use crate::schema::NodeTypeDescriptor;
use async_trait::async_trait;
use serde_json::Value;

/// Where node types come from: the paginated catalog and full per-type descriptors.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_catalog(
        &self,
        search: &str,
        page: u32,
        limit: u32,
    ) -> Result<CatalogPage, ClientError>;

    async fn fetch_descriptor(&self, id: &str) -> Result<NodeTypeDescriptor, ClientError>;
}

/// Where credential types and their schemas come from.
#[async_trait]
pub trait CredentialSource: Send + Sync {
    async fn fetch_credential_names(
        &self,
        page: u32,
        limit: u32,
        search: &str,
    ) -> Result<Vec<String>, ClientError>;

    async fn fetch_credential_schema(
        &self,
        credential_type: &str,
    ) -> Result<CredentialSchema, ClientError>;
}

/// Persistence for finished workflows and credentials. Returns the created record.
#[async_trait]
pub trait WorkflowStore: Send + Sync {
    async fn save_workflow(&self, payload: &WorkflowPayload) -> Result<Value, ClientError>;

    async fn save_credential(&self, payload: &CredentialPayload) -> Result<Value, ClientError>;
}
