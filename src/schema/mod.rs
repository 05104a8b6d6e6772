//! Typed model of the server-supplied node-type descriptors.
//!
//! A descriptor lists the properties an integration exposes. Two of them are special:
//! the resource selector (`name == "resource"`) and the operation selectors (properties
//! labelled `Operation`). Every other property carries a `displayOptions` predicate that
//! decides under which resource/operation selection it is shown.
//!
//! All queries are total: a descriptor without `properties` simply yields empty results.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub mod query;
pub mod wire;

pub use query::*;
pub use wire::*;

/// Property name of the resource selector.
pub const RESOURCE_PROPERTY: &str = "resource";
/// Property name of the operation selector.
pub const OPERATION_PROPERTY: &str = "operation";
/// Display name that marks a property as an operation group.
pub const OPERATION_DISPLAY_NAME: &str = "Operation";

/// Icon of a node type, either a single path or a light/dark pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IconRef {
    Url(String),
    Themed {
        light: String,
        #[serde(default)]
        dark: Option<String>,
    },
}

impl IconRef {
    /// The icon path used on a light background.
    pub fn light(&self) -> &str {
        match self {
            IconRef::Url(url) => url,
            IconRef::Themed { light, .. } => light,
        }
    }
}

/// One selectable `{value, name}` entry of an options or operation property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionValue {
    pub value: String,
    pub name: String,
    /// Human-readable action label used by the flat action list.
    pub action: Option<String>,
    pub description: Option<String>,
}

/// A single set-membership condition: `property` must currently hold one of `allowed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowCondition {
    pub property: String,
    pub allowed: Vec<String>,
}

/// Conditional-visibility predicate attached to a property.
///
/// The predicate is a conjunction of [`ShowCondition`]s. A property variable that has no
/// condition is treated as *not admitted*, so a field gated only on `resource` never shows
/// up in an operation-level query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayOptions {
    pub show: Vec<ShowCondition>,
}

impl DisplayOptions {
    /// The allowed values for `property`, if the predicate constrains it.
    pub fn allowed(&self, property: &str) -> Option<&[String]> {
        self.show
            .iter()
            .find(|c| c.property == property)
            .map(|c| c.allowed.as_slice())
    }

    /// Whether `value` is in the allowed set of `property`.
    pub fn admits(&self, property: &str, value: &str) -> bool {
        self.allowed(property)
            .is_some_and(|allowed| allowed.iter().any(|v| v == value))
    }

    /// Whether every `(property, value)` pair is admitted.
    pub fn matches(&self, selection: &[(&str, &str)]) -> bool {
        selection
            .iter()
            .all(|(property, value)| self.admits(property, value))
    }
}

/// The kind of a schema property, with the data specific to that kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyKind {
    String { placeholder: Option<String> },
    DateTime,
    Options(Vec<OptionValue>),
    OperationGroup(Vec<OptionValue>),
    /// Any kind this crate does not render. Kept so the descriptor stays lossless.
    Unsupported(String),
}

impl PropertyKind {
    /// The wire name of this kind.
    pub fn type_name(&self) -> &str {
        match self {
            PropertyKind::String { .. } => "string",
            PropertyKind::DateTime => "dateTime",
            PropertyKind::Options(_) | PropertyKind::OperationGroup(_) => "options",
            PropertyKind::Unsupported(name) => name,
        }
    }
}

/// One field of a node-type descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub name: String,
    pub display_name: String,
    pub kind: PropertyKind,
    pub display_options: Option<DisplayOptions>,
    /// Attributes not modelled here, passed through untouched.
    pub extra: Map<String, Value>,
}

impl Property {
    /// Declared options for options and operation properties, empty for every other kind.
    pub fn options(&self) -> &[OptionValue] {
        match &self.kind {
            PropertyKind::Options(options) | PropertyKind::OperationGroup(options) => options,
            _ => &[],
        }
    }

    pub fn is_operation_group(&self) -> bool {
        matches!(self.kind, PropertyKind::OperationGroup(_))
    }

    pub fn is_resource_selector(&self) -> bool {
        self.name == RESOURCE_PROPERTY
    }

    /// Whether the property's visibility predicate admits the given pair.
    pub fn shown_for(&self, property: &str, value: &str) -> bool {
        self.display_options
            .as_ref()
            .is_some_and(|d| d.admits(property, value))
    }
}

/// A node type as described by the catalog service.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeTypeDescriptor {
    pub id: String,
    pub display_name: String,
    pub color: Option<String>,
    pub icon: Option<IconRef>,
    /// `None` for catalog listings, which do not ship the schema.
    pub properties: Option<Vec<Property>>,
    pub extra: Map<String, Value>,
}

impl NodeTypeDescriptor {
    /// Properties in descriptor order; empty when the schema is absent.
    pub fn properties(&self) -> &[Property] {
        self.properties.as_deref().unwrap_or_default()
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties().iter().find(|p| p.name == name)
    }

    /// Options of the resource selector.
    pub fn resources(&self) -> &[OptionValue] {
        self.properties()
            .iter()
            .find(|p| p.is_resource_selector())
            .map(Property::options)
            .unwrap_or_default()
    }

    /// Options of the first operation selector shown for `resource`.
    pub fn operations(&self, resource: &str) -> &[OptionValue] {
        if resource.is_empty() {
            return &[];
        }
        self.properties()
            .iter()
            .find(|p| p.is_operation_group() && p.shown_for(RESOURCE_PROPERTY, resource))
            .map(Property::options)
            .unwrap_or_default()
    }

    /// Properties gated on both `resource` and `operation`, in descriptor order.
    pub fn fields_for(&self, resource: &str, operation: &str) -> Vec<&Property> {
        let selection = [(RESOURCE_PROPERTY, resource), (OPERATION_PROPERTY, operation)];
        self.properties()
            .iter()
            .filter(|p| {
                p.display_options
                    .as_ref()
                    .is_some_and(|d| d.matches(&selection))
            })
            .collect()
    }

    /// Every non-empty action label across all operation groups, duplicates kept.
    pub fn actions(&self) -> Vec<&str> {
        self.properties()
            .iter()
            .filter(|p| p.is_operation_group())
            .flat_map(Property::options)
            .filter_map(|o| o.action.as_deref())
            .filter(|a| !a.is_empty())
            .collect()
    }
}
