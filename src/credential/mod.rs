//! Credential capture: a flat text form synthesised from a credential-type schema.
//!
//! The schema only names its keys (`{"properties": {"accessToken": {}, ...}}`); every key
//! becomes one text input starting out empty. Two more inputs, `name` and `type`, are always
//! present. The submitted payload's `data` holds exactly the schema keys.

use crate::error::FormError;
use crate::form::RequiredFields;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

mod pager;

pub use pager::*;

/// Key fragments that make a field render masked. Presentation only.
const SECRET_MARKERS: [&str; 6] = [
    "token",
    "secret",
    "password",
    "apikey",
    "api_key",
    "privatekey",
];

/// The schema of one credential type as served by the backend.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CredentialSchema {
    #[serde(default)]
    pub properties: Option<Map<String, Value>>,
}

impl CredentialSchema {
    /// Property keys of the schema; empty when the schema has no `properties`.
    pub fn keys(&self) -> Vec<&str> {
        self.properties
            .as_ref()
            .map(|props| props.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.as_ref().is_none_or(Map::is_empty)
    }
}

/// Caller-supplied identity attached verbatim to every credential submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectBinding {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_project: Option<Value>,
}

/// One rendered input of the credential form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialField {
    pub key: String,
    pub label: String,
    pub placeholder: String,
    /// Render as a password-style input. This does not protect the value.
    pub masked: bool,
}

/// Body of `POST /api/create-credentials`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CredentialPayload {
    pub name: String,
    #[serde(rename = "type")]
    pub credential_type: String,
    pub data: BTreeMap<String, String>,
    #[serde(flatten)]
    pub binding: ProjectBinding,
}

/// A saved credential as listed by the backend.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Credential {
    #[serde(rename = "_id", default)]
    pub object_id: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub credential_type: String,
    #[serde(default)]
    pub data: Option<Map<String, Value>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Credential {
    /// The record's identifier, preferring `_id` over `id`.
    pub fn identifier(&self) -> Option<&str> {
        self.object_id.as_deref().or(self.id.as_deref())
    }
}

/// Whether a key looks like it holds a secret.
pub fn is_secret_key(key: &str) -> bool {
    let lowered = key.to_ascii_lowercase();
    SECRET_MARKERS.iter().any(|m| lowered.contains(m))
}

fn label_for(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Form state for entering one credential.
#[derive(Debug, Clone)]
pub struct CredentialForm {
    keys: Vec<String>,
    name: String,
    credential_type: String,
    data: AHashMap<String, String>,
}

impl CredentialForm {
    pub fn new(schema: &CredentialSchema) -> Self {
        let keys: Vec<String> = schema.keys().into_iter().map(str::to_string).collect();
        let data = keys.iter().map(|k| (k.clone(), String::new())).collect();
        Self {
            keys,
            name: String::new(),
            credential_type: String::new(),
            data,
        }
    }

    /// Inputs for the schema keys, in schema order. `name` and `type` are not included.
    pub fn fields(&self) -> Vec<CredentialField> {
        self.keys
            .iter()
            .map(|key| CredentialField {
                key: key.clone(),
                label: label_for(key),
                placeholder: format!("Enter {}", key),
                masked: is_secret_key(key),
            })
            .collect()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn credential_type(&self) -> &str {
        &self.credential_type
    }

    pub fn set_type(&mut self, credential_type: impl Into<String>) {
        self.credential_type = credential_type.into();
    }

    pub fn value(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }

    /// Sets a schema property. Keys outside the schema are refused so `data` never grows.
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> Result<(), FormError> {
        let slot = self
            .data
            .get_mut(key)
            .ok_or_else(|| FormError::UnknownCredentialField(key.to_string()))?;
        *slot = value.into();
        Ok(())
    }

    /// Builds the submission payload. `binding` is attached as-is.
    ///
    /// Under a required policy, `name` and `type` are checked along with the schema keys.
    pub fn submit(
        &self,
        binding: &ProjectBinding,
        required: &RequiredFields,
    ) -> Result<CredentialPayload, FormError> {
        let top_level = ["name", "type"];
        let fields = top_level
            .into_iter()
            .chain(self.keys.iter().map(String::as_str));
        required.check(fields, |field| {
            let value = match field {
                "name" => Some(self.name.as_str()),
                "type" => Some(self.credential_type.as_str()),
                key => self.value(key),
            };
            value.is_some_and(|v| !v.trim().is_empty())
        })?;

        Ok(CredentialPayload {
            name: self.name.clone(),
            credential_type: self.credential_type.clone(),
            data: self
                .data
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            binding: binding.clone(),
        })
    }
}
