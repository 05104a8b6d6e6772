//! Common test utilities: fixture descriptors and in-memory backends.
use ahash::AHashMap;
use async_trait::async_trait;
use flowcraft::backend::{CatalogSource, CredentialSource, WorkflowStore};
use flowcraft::catalog::CatalogPage;
use flowcraft::credential::{CredentialPayload, CredentialSchema};
use flowcraft::error::ClientError;
use flowcraft::graph::WorkflowPayload;
use flowcraft::schema::NodeTypeDescriptor;
use serde_json::{Value, json};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// The smallest useful descriptor: one resource, one operation, one gated field.
///
/// `msg` -> `send` -> `channel`
#[allow(dead_code)]
pub fn message_descriptor() -> NodeTypeDescriptor {
    NodeTypeDescriptor::from_json(
        &json!({
            "_id": "chat",
            "displayName": "Chat",
            "color": "#4A154B",
            "properties": [
                {
                    "displayName": "Resource",
                    "name": "resource",
                    "type": "options",
                    "options": [{"value": "msg", "name": "Message"}]
                },
                {
                    "displayName": "Operation",
                    "name": "operation",
                    "type": "options",
                    "displayOptions": {"show": {"resource": ["msg"]}},
                    "options": [{"value": "send", "name": "Send", "action": "Send a message"}]
                },
                {
                    "displayName": "Channel",
                    "name": "channel",
                    "type": "string",
                    "displayOptions": {"show": {"resource": ["msg"], "operation": ["send"]}}
                }
            ]
        })
        .to_string(),
    )
    .unwrap()
}

/// A richer descriptor with two resources, two operation groups and fields of every kind.
///
/// - `message`: `post` (channel, text, sendAt), `delete` (channel, messageId)
/// - `channel`: `create` (channelName, visibility), `archive` (no fields)
#[allow(dead_code)]
pub fn chat_descriptor() -> NodeTypeDescriptor {
    NodeTypeDescriptor::from_json(&chat_descriptor_json().to_string()).unwrap()
}

#[allow(dead_code)]
pub fn chat_descriptor_json() -> Value {
    json!({
        "_id": "64f0c0ffee",
        "name": "n8n-nodes-base.slack",
        "displayName": "Slack",
        "color": "#4A154B",
        "iconUrl": {"light": "icons/slack.svg", "dark": "icons/slack.dark.svg"},
        "version": 2,
        "properties": [
            {
                "displayName": "Resource",
                "name": "resource",
                "type": "options",
                "options": [
                    {"value": "message", "name": "Message"},
                    {"value": "channel", "name": "Channel"}
                ]
            },
            {
                "displayName": "Operation",
                "name": "operation",
                "type": "options",
                "displayOptions": {"show": {"resource": ["message"]}},
                "options": [
                    {"value": "post", "name": "Send", "action": "Send a message"},
                    {"value": "delete", "name": "Delete", "action": "Delete a message"}
                ]
            },
            {
                "displayName": "Operation",
                "name": "operation",
                "type": "options",
                "displayOptions": {"show": {"resource": ["channel"]}},
                "options": [
                    {"value": "create", "name": "Create", "action": "Create a channel"},
                    {"value": "archive", "name": "Archive", "action": ""}
                ]
            },
            {
                "displayName": "Channel",
                "name": "channel",
                "type": "string",
                "placeholder": "#general",
                "displayOptions": {
                    "show": {"resource": ["message"], "operation": ["post", "delete"]}
                }
            },
            {
                "displayName": "Text",
                "name": "text",
                "type": "string",
                "displayOptions": {"show": {"resource": ["message"], "operation": ["post"]}}
            },
            {
                "displayName": "Send At",
                "name": "sendAt",
                "type": "dateTime",
                "displayOptions": {"show": {"resource": ["message"], "operation": ["post"]}}
            },
            {
                "displayName": "Message ID",
                "name": "messageId",
                "type": "string",
                "displayOptions": {"show": {"resource": ["message"], "operation": ["delete"]}}
            },
            {
                "displayName": "Channel Name",
                "name": "channelName",
                "type": "string",
                "displayOptions": {"show": {"resource": ["channel"], "operation": ["create"]}}
            },
            {
                "displayName": "Visibility",
                "name": "visibility",
                "type": "options",
                "displayOptions": {"show": {"resource": ["channel"], "operation": ["create"]}},
                "options": [
                    {"value": "public", "name": "Public"},
                    {"value": "private", "name": "Private"}
                ]
            },
            {
                "displayName": "Attachments",
                "name": "attachments",
                "type": "fixedCollection",
                "displayOptions": {"show": {"resource": ["message"], "operation": ["post"]}}
            },
            {
                "displayName": "Notice",
                "name": "notice",
                "type": "notice",
                "displayOptions": {"show": {"resource": ["message"]}}
            }
        ]
    })
}

/// A catalog-listing entry: no schema attached.
#[allow(dead_code)]
pub fn bare_descriptor(id: &str, display_name: &str) -> NodeTypeDescriptor {
    NodeTypeDescriptor::from_json(&json!({"_id": id, "displayName": display_name}).to_string())
        .unwrap()
}

/// Credential schema `{properties: {accessToken, user}}`.
#[allow(dead_code)]
pub fn token_credential_schema() -> CredentialSchema {
    serde_json::from_value(json!({"properties": {"accessToken": {}, "user": {}}})).unwrap()
}

#[allow(dead_code)]
pub fn unavailable(what: &str) -> ClientError {
    ClientError::Status {
        status: 503,
        url: format!("http://test/{}", what),
        body: "unavailable".to_string(),
    }
}

/// In-memory catalog: filters by case-insensitive substring and pages by `limit`.
#[allow(dead_code)]
pub struct FakeCatalog {
    pub entries: Vec<NodeTypeDescriptor>,
    pub failing: AtomicBool,
    pub calls: Mutex<Vec<(String, u32, u32)>>,
}

#[allow(dead_code)]
impl FakeCatalog {
    pub fn with_entries(count: usize) -> Self {
        let entries = (0..count)
            .map(|i| bare_descriptor(&format!("node-{}", i), &format!("Node {}", i)))
            .collect();
        Self::new(entries)
    }

    pub fn new(entries: Vec<NodeTypeDescriptor>) -> Self {
        Self {
            entries,
            failing: AtomicBool::new(false),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl CatalogSource for FakeCatalog {
    async fn fetch_catalog(
        &self,
        search: &str,
        page: u32,
        limit: u32,
    ) -> Result<CatalogPage, ClientError> {
        self.calls
            .lock()
            .unwrap()
            .push((search.to_string(), page, limit));
        if self.failing.load(Ordering::SeqCst) {
            return Err(unavailable("get-nodes-names"));
        }

        let needle = search.to_lowercase();
        let matching: Vec<_> = self
            .entries
            .iter()
            .filter(|e| e.display_name.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        let limit = limit.max(1) as usize;
        let total_pages = matching.len().div_ceil(limit) as u32;
        let entries = matching
            .into_iter()
            .skip((page.saturating_sub(1) as usize) * limit)
            .take(limit)
            .collect();
        Ok(CatalogPage {
            entries,
            total_pages,
        })
    }

    async fn fetch_descriptor(&self, id: &str) -> Result<NodeTypeDescriptor, ClientError> {
        self.entries
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or_else(|| unavailable(id))
    }
}

/// In-memory credential-type service.
#[allow(dead_code)]
pub struct FakeCredentials {
    pub names: Vec<String>,
    pub schemas: AHashMap<String, CredentialSchema>,
    pub failing: AtomicBool,
}

#[allow(dead_code)]
impl FakeCredentials {
    pub fn new(names: &[&str]) -> Self {
        Self {
            names: names.iter().map(|n| n.to_string()).collect(),
            schemas: AHashMap::new(),
            failing: AtomicBool::new(false),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl CredentialSource for FakeCredentials {
    async fn fetch_credential_names(
        &self,
        page: u32,
        limit: u32,
        search: &str,
    ) -> Result<Vec<String>, ClientError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(unavailable("get-credentials-names"));
        }
        let limit = limit.max(1) as usize;
        Ok(self
            .names
            .iter()
            .filter(|n| n.to_lowercase().contains(&search.to_lowercase()))
            .skip((page.saturating_sub(1) as usize) * limit)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn fetch_credential_schema(
        &self,
        credential_type: &str,
    ) -> Result<CredentialSchema, ClientError> {
        self.schemas
            .get(credential_type)
            .cloned()
            .ok_or_else(|| unavailable(credential_type))
    }
}

/// Records every payload it is handed.
#[allow(dead_code)]
#[derive(Default)]
pub struct RecordingStore {
    pub workflows: Mutex<Vec<WorkflowPayload>>,
    pub credentials: Mutex<Vec<CredentialPayload>>,
    pub failing: bool,
}

#[async_trait]
impl WorkflowStore for RecordingStore {
    async fn save_workflow(&self, payload: &WorkflowPayload) -> Result<Value, ClientError> {
        if self.failing {
            return Err(unavailable("api/create-workflows"));
        }
        let mut saved = self.workflows.lock().unwrap();
        saved.push(payload.clone());
        Ok(json!({"id": format!("wf{}", saved.len()), "name": payload.name}))
    }

    async fn save_credential(&self, payload: &CredentialPayload) -> Result<Value, ClientError> {
        if self.failing {
            return Err(unavailable("api/create-credentials"));
        }
        self.credentials.lock().unwrap().push(payload.clone());
        Ok(json!({"id": "cred1"}))
    }
}
