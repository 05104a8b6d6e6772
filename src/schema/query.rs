//! Free-standing schema queries over a descriptor that may not have been fetched yet.
//!
//! These mirror the methods on [`NodeTypeDescriptor`] but accept `Option`, so callers holding
//! "the currently selected descriptor, if any" never have to special-case its absence.

use super::{NodeTypeDescriptor, OptionValue, Property};

/// Options of the resource selector, or nothing.
pub fn resources_of(descriptor: Option<&NodeTypeDescriptor>) -> &[OptionValue] {
    descriptor.map(|d| d.resources()).unwrap_or_default()
}

/// Operations available for `resource`, or nothing when `resource` is empty.
pub fn operations_of<'d>(
    descriptor: Option<&'d NodeTypeDescriptor>,
    resource: &str,
) -> &'d [OptionValue] {
    descriptor
        .map(|d| d.operations(resource))
        .unwrap_or_default()
}

/// Properties visible for the given resource/operation pair.
pub fn fields_for<'d>(
    descriptor: Option<&'d NodeTypeDescriptor>,
    resource: &str,
    operation: &str,
) -> Vec<&'d Property> {
    descriptor
        .map(|d| d.fields_for(resource, operation))
        .unwrap_or_default()
}

/// Flattened action labels of every operation group.
pub fn actions_of(descriptor: Option<&NodeTypeDescriptor>) -> Vec<&str> {
    descriptor.map(|d| d.actions()).unwrap_or_default()
}
