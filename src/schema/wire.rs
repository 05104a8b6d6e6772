use super::{
    DisplayOptions, IconRef, NodeTypeDescriptor, OPERATION_DISPLAY_NAME, OPERATION_PROPERTY,
    OptionValue, Property, PropertyKind, ShowCondition,
};
use crate::error::ConversionError;
use serde::Deserialize;
use serde_json::{Map, Value};

/// A trait for payloads that can be converted into a typed [`NodeTypeDescriptor`].
///
/// The catalog service ships descriptors as loosely shaped JSON. Implementing this trait on
/// another representation (a cached file format, a different backend's schema) lets it feed
/// the same form and graph machinery.
///
/// # Example
///
/// ```rust,no_run
/// use flowcraft::error::ConversionError;
/// use flowcraft::schema::{IntoDescriptor, NodeTypeDescriptor};
///
/// struct LocalType { key: String, label: String }
///
/// impl IntoDescriptor for LocalType {
///     fn into_descriptor(self) -> Result<NodeTypeDescriptor, ConversionError> {
///         Ok(NodeTypeDescriptor {
///             id: self.key,
///             display_name: self.label,
///             color: None,
///             icon: None,
///             properties: Some(vec![]),
///             extra: Default::default(),
///         })
///     }
/// }
/// ```
pub trait IntoDescriptor {
    /// Consumes the object and converts it into a typed descriptor.
    fn into_descriptor(self) -> Result<NodeTypeDescriptor, ConversionError>;
}

/// Descriptor exactly as the catalog service sends it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireDescriptor {
    #[serde(rename = "_id", default)]
    pub object_id: Option<Value>,
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub icon_url: Option<IconRef>,
    #[serde(default)]
    pub properties: Option<Vec<WireProperty>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One property entry of a wire descriptor.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireProperty {
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub options: Option<Vec<Value>>,
    #[serde(default)]
    pub display_options: Option<WireDisplayOptions>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireDisplayOptions {
    #[serde(default)]
    pub show: Option<Map<String, Value>>,
}

impl IntoDescriptor for WireDescriptor {
    fn into_descriptor(self) -> Result<NodeTypeDescriptor, ConversionError> {
        let id = self
            .object_id
            .or(self.id)
            .map(|v| value_to_string(&v))
            .or_else(|| self.name.clone())
            .filter(|id| !id.is_empty())
            .ok_or(ConversionError::MissingId)?;

        let display_name = self
            .display_name
            .or(self.name)
            .unwrap_or_else(|| id.clone());

        Ok(NodeTypeDescriptor {
            id,
            display_name,
            color: self.color,
            icon: self.icon_url,
            properties: self
                .properties
                .map(|props| props.into_iter().map(Property::from).collect()),
            extra: self.extra,
        })
    }
}

impl IntoDescriptor for Value {
    fn into_descriptor(self) -> Result<NodeTypeDescriptor, ConversionError> {
        let wire: WireDescriptor = serde_json::from_value(self)
            .map_err(|e| ConversionError::ValidationError(e.to_string()))?;
        wire.into_descriptor()
    }
}

impl NodeTypeDescriptor {
    /// Parses a descriptor from its JSON wire form.
    pub fn from_json(json: &str) -> Result<Self, ConversionError> {
        let wire: WireDescriptor = serde_json::from_str(json)
            .map_err(|e| ConversionError::ValidationError(e.to_string()))?;
        wire.into_descriptor()
    }
}

impl From<WireProperty> for Property {
    fn from(wire: WireProperty) -> Self {
        let options = || -> Vec<OptionValue> {
            wire.options
                .as_deref()
                .unwrap_or_default()
                .iter()
                .filter_map(option_from_value)
                .collect()
        };

        let kind_name = wire.kind.as_deref().unwrap_or_default();
        let is_operation = wire.display_name == OPERATION_DISPLAY_NAME
            || (wire.name == OPERATION_PROPERTY && kind_name == "options");

        let kind = if is_operation {
            PropertyKind::OperationGroup(options())
        } else {
            match kind_name {
                "string" => PropertyKind::String {
                    placeholder: wire.placeholder.clone(),
                },
                "dateTime" => PropertyKind::DateTime,
                "options" => PropertyKind::Options(options()),
                other => PropertyKind::Unsupported(other.to_string()),
            }
        };

        let display_options = wire
            .display_options
            .and_then(|d| d.show)
            .map(|show| DisplayOptions {
                show: show
                    .into_iter()
                    .map(|(property, allowed)| ShowCondition {
                        property,
                        allowed: match allowed {
                            Value::Array(values) => values.iter().map(value_to_string).collect(),
                            single => vec![value_to_string(&single)],
                        },
                    })
                    .collect(),
            });

        Property {
            name: wire.name,
            display_name: wire.display_name,
            kind,
            display_options,
            extra: wire.extra,
        }
    }
}

/// Reads a `{value, name, action?, description?}` option; anything without a `value` is skipped.
fn option_from_value(raw: &Value) -> Option<OptionValue> {
    let obj = raw.as_object()?;
    let value = value_to_string(obj.get("value")?);
    let text = |key: &str| obj.get(key).and_then(Value::as_str).map(str::to_string);
    Some(OptionValue {
        name: text("name").unwrap_or_else(|| value.clone()),
        action: text("action"),
        description: text("description"),
        value,
    })
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_option_without_value_is_skipped() {
        assert!(option_from_value(&json!({"name": "Only a label"})).is_none());
        assert!(option_from_value(&json!("plain")).is_none());
    }

    #[test]
    fn test_non_string_option_values_are_stringified() {
        let option = option_from_value(&json!({"value": 3, "name": "Three"})).unwrap();
        assert_eq!(option.value, "3");
        assert_eq!(option.name, "Three");
    }

    #[test]
    fn test_descriptor_falls_back_to_name_for_id() {
        let wire: WireDescriptor =
            serde_json::from_value(json!({"name": "n8n-nodes-base.slack"})).unwrap();
        let descriptor = wire.into_descriptor().unwrap();
        assert_eq!(descriptor.id, "n8n-nodes-base.slack");
        assert_eq!(descriptor.display_name, "n8n-nodes-base.slack");
        assert!(descriptor.properties.is_none());
    }

    #[test]
    fn test_descriptor_without_any_id_is_rejected() {
        let wire: WireDescriptor = serde_json::from_value(json!({"color": "#fff"})).unwrap();
        assert_eq!(wire.into_descriptor(), Err(ConversionError::MissingId));
    }
}
