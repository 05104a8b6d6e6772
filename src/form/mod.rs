//! Schema-driven configuration form for a single node.
//!
//! A [`FormSession`] walks through three stages:
//!
//! 1. `NoResource` - nothing picked yet.
//! 2. `ResourceChosen` - a resource is picked; its operations are offered.
//! 3. `OperationChosen` - an operation is picked; the fields gated on both are visible.
//!
//! Picking a resource again (from any stage) drops the operation and every entered value.
//! Picking another operation recomputes the visible fields and keeps only the values of
//! fields that are still visible.

use crate::error::FormError;
use crate::schema::{NodeTypeDescriptor, OptionValue, Property};
use ahash::AHashMap;
use std::collections::BTreeMap;
use tracing::debug;

mod field;

pub use field::*;

/// Which fields must carry a value at submission. Required-ness differs per integration,
/// so it is chosen by the caller rather than read from the schema.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RequiredFields {
    #[default]
    None,
    All,
    Named(Vec<String>),
}

impl RequiredFields {
    /// Fails with the first required field (in `fields` order) that has no value.
    pub fn check<'a, F>(
        &self,
        fields: impl IntoIterator<Item = &'a str>,
        has_value: F,
    ) -> Result<(), FormError>
    where
        F: Fn(&str) -> bool,
    {
        let is_required = |field: &str| match self {
            RequiredFields::None => false,
            RequiredFields::All => true,
            RequiredFields::Named(names) => names.iter().any(|n| n == field),
        };
        match fields
            .into_iter()
            .find(|field| is_required(*field) && !has_value(*field))
        {
            Some(missing) => Err(FormError::MissingRequired(missing.to_string())),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormStage {
    NoResource,
    ResourceChosen,
    OperationChosen,
}

/// The result of a successful form submission.
#[derive(Debug, Clone, PartialEq)]
pub struct FormSubmission {
    pub resource: String,
    pub operation: String,
    /// The operation's action label, or its display name when the label is missing or empty.
    pub action: String,
    pub values: BTreeMap<String, FieldValue>,
}

/// Transient selection state for configuring one node from its descriptor.
#[derive(Debug, Clone)]
pub struct FormSession<'d> {
    descriptor: &'d NodeTypeDescriptor,
    resource: Option<String>,
    operation: Option<String>,
    visible: Vec<&'d Property>,
    values: AHashMap<String, FieldValue>,
}

impl<'d> FormSession<'d> {
    pub fn new(descriptor: &'d NodeTypeDescriptor) -> Self {
        Self {
            descriptor,
            resource: None,
            operation: None,
            visible: Vec::new(),
            values: AHashMap::new(),
        }
    }

    pub fn descriptor(&self) -> &'d NodeTypeDescriptor {
        self.descriptor
    }

    pub fn stage(&self) -> FormStage {
        match (&self.resource, &self.operation) {
            (None, _) => FormStage::NoResource,
            (Some(_), None) => FormStage::ResourceChosen,
            (Some(_), Some(_)) => FormStage::OperationChosen,
        }
    }

    pub fn resource(&self) -> Option<&str> {
        self.resource.as_deref()
    }

    pub fn operation(&self) -> Option<&str> {
        self.operation.as_deref()
    }

    /// Resource choices offered by the descriptor.
    pub fn resources(&self) -> &'d [OptionValue] {
        self.descriptor.resources()
    }

    /// Operation choices for the selected resource; empty before a resource is picked.
    pub fn operations(&self) -> &'d [OptionValue] {
        self.descriptor
            .operations(self.resource.as_deref().unwrap_or_default())
    }

    /// Selects a resource, resetting the operation and all field values.
    /// An empty value returns the session to `NoResource`.
    pub fn select_resource(&mut self, value: impl Into<String>) {
        let value = value.into();
        debug!(node_type = %self.descriptor.id, resource = %value, "resource selected");
        self.resource = (!value.is_empty()).then_some(value);
        self.operation = None;
        self.visible.clear();
        self.values.clear();
    }

    /// Selects one of the operations offered for the current resource and recomputes the
    /// visible fields. The previous selection is kept when the operation is refused.
    pub fn select_operation(&mut self, value: impl Into<String>) -> Result<(), FormError> {
        let value = value.into();
        let Some(resource) = self.resource.as_deref() else {
            return Err(FormError::OperationWithoutResource { operation: value });
        };
        if !self.operations().iter().any(|o| o.value == value) {
            return Err(FormError::OperationNotOffered {
                resource: resource.to_string(),
                operation: value,
            });
        }

        self.visible = self.descriptor.fields_for(resource, &value);
        let visible = &self.visible;
        self.values
            .retain(|name, _| visible.iter().any(|p| &p.name == name));

        debug!(
            node_type = %self.descriptor.id,
            resource,
            operation = %value,
            visible = self.visible.len(),
            "operation selected"
        );
        self.operation = Some(value);
        Ok(())
    }

    /// Properties visible for the current selection, in descriptor order.
    pub fn visible_fields(&self) -> &[&'d Property] {
        &self.visible
    }

    /// Widgets for the visible fields. Fields without a widget are skipped.
    pub fn widgets(&self) -> Vec<FieldWidget<'d>> {
        self.visible.iter().copied().filter_map(widget_for).collect()
    }

    fn visible_field(&self, field: &str) -> Result<&'d Property, FormError> {
        self.visible
            .iter()
            .copied()
            .find(|p| p.name == field)
            .ok_or_else(|| FormError::FieldNotVisible {
                field: field.to_string(),
            })
    }

    /// Stores a typed value for a visible field.
    pub fn set_value(&mut self, field: &str, value: FieldValue) -> Result<(), FormError> {
        let property = self.visible_field(field)?;
        check_value(property, &value)?;
        self.values.insert(property.name.clone(), value);
        Ok(())
    }

    /// Parses raw input according to the field's kind and stores it.
    pub fn set_input(&mut self, field: &str, raw: &str) -> Result<(), FormError> {
        let property = self.visible_field(field)?;
        let value = parse_input(property, raw)?;
        self.set_value(field, value)
    }

    pub fn clear_value(&mut self, field: &str) -> Option<FieldValue> {
        self.values.remove(field)
    }

    pub fn value(&self, field: &str) -> Option<&FieldValue> {
        self.values.get(field)
    }

    /// Packages the current selection and values.
    ///
    /// Only the `required` policy is enforced here, and only over fields that render a
    /// widget; values were already checked against their fields when they were set.
    pub fn submit(&self, required: &RequiredFields) -> Result<FormSubmission, FormError> {
        let (Some(resource), Some(operation)) = (&self.resource, &self.operation) else {
            return Err(FormError::Incomplete);
        };

        let renderable = self
            .visible
            .iter()
            .filter(|p| widget_for(p).is_some())
            .map(|p| p.name.as_str());
        required.check(renderable, |name| {
            self.values.get(name).is_some_and(FieldValue::is_present)
        })?;

        let action = self
            .operations()
            .iter()
            .find(|o| &o.value == operation)
            .map(|o| {
                o.action
                    .clone()
                    .filter(|a| !a.is_empty())
                    .unwrap_or_else(|| o.name.clone())
            })
            .unwrap_or_else(|| operation.clone());

        Ok(FormSubmission {
            resource: resource.clone(),
            operation: operation.clone(),
            action,
            values: self
                .values
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        })
    }
}
