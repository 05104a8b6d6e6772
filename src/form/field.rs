use crate::error::FormError;
use crate::schema::{OptionValue, Property, PropertyKind};
use chrono::{DateTime, NaiveDateTime};
use serde::Serialize;
use std::fmt;

const DEFAULT_PLACEHOLDER: &str = "Enter value...";

/// Accepted wall-clock formats, most specific first.
const DATE_TIME_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"];

/// A value entered into a dynamic form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    DateTime(NaiveDateTime),
    /// The `value` of one of the field's declared options.
    Choice(String),
}

impl FieldValue {
    /// Whether the value counts as "filled in" for required-field checks.
    pub fn is_present(&self) -> bool {
        match self {
            FieldValue::Text(text) | FieldValue::Choice(text) => !text.trim().is_empty(),
            FieldValue::DateTime(_) => true,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(text) | FieldValue::Choice(text) => write!(f, "{}", text),
            FieldValue::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S")),
        }
    }
}

/// What kind of input a field renders as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputKind<'d> {
    /// Free-text input.
    Text { placeholder: &'d str },
    /// Date and time input.
    DateTime,
    /// Single-select constrained to the listed choices.
    Select { choices: &'d [OptionValue] },
}

/// A renderable field: the property's key, its label and its input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldWidget<'d> {
    pub name: &'d str,
    pub label: &'d str,
    pub input: InputKind<'d>,
}

/// Maps a property to its widget. Kinds without a widget, and option fields that declare
/// no options, render nothing.
pub fn widget_for(property: &Property) -> Option<FieldWidget<'_>> {
    let input = match &property.kind {
        PropertyKind::String { placeholder } => InputKind::Text {
            placeholder: placeholder.as_deref().unwrap_or(DEFAULT_PLACEHOLDER),
        },
        PropertyKind::DateTime => InputKind::DateTime,
        PropertyKind::Options(choices) | PropertyKind::OperationGroup(choices) => {
            if choices.is_empty() {
                return None;
            }
            InputKind::Select { choices }
        }
        PropertyKind::Unsupported(_) => return None,
    };
    Some(FieldWidget {
        name: &property.name,
        label: &property.display_name,
        input,
    })
}

/// Interprets raw user input according to the property's kind.
pub fn parse_input(property: &Property, raw: &str) -> Result<FieldValue, FormError> {
    match &property.kind {
        PropertyKind::String { .. } => Ok(FieldValue::Text(raw.to_string())),
        PropertyKind::DateTime => parse_date_time(raw)
            .map(FieldValue::DateTime)
            .ok_or_else(|| FormError::InvalidDateTime {
                field: property.name.clone(),
                value: raw.to_string(),
            }),
        PropertyKind::Options(_) | PropertyKind::OperationGroup(_) => {
            Ok(FieldValue::Choice(raw.to_string()))
        }
        PropertyKind::Unsupported(_) => Err(FormError::FieldNotVisible {
            field: property.name.clone(),
        }),
    }
}

/// Checks that `value` fits the property's kind and, for selects, its declared options.
pub fn check_value(property: &Property, value: &FieldValue) -> Result<(), FormError> {
    match (&property.kind, value) {
        (PropertyKind::String { .. }, FieldValue::Text(_)) => Ok(()),
        (PropertyKind::DateTime, FieldValue::DateTime(_)) => Ok(()),
        (
            PropertyKind::Options(choices) | PropertyKind::OperationGroup(choices),
            FieldValue::Choice(v),
        ) => {
            if choices.iter().any(|c| &c.value == v) {
                Ok(())
            } else {
                Err(FormError::ValueOutsideOptions {
                    field: property.name.clone(),
                    value: v.clone(),
                })
            }
        }
        (PropertyKind::Unsupported(_), _) => Err(FormError::FieldNotVisible {
            field: property.name.clone(),
        }),
        (kind, _) => Err(FormError::KindMismatch {
            field: property.name.clone(),
            expected: match kind {
                PropertyKind::String { .. } => "text",
                PropertyKind::DateTime => "date/time",
                _ => "choice",
            },
        }),
    }
}

fn parse_date_time(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    DATE_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.naive_local())
        })
}
