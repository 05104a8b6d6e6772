//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the flowcraft crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use flowcraft::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let json = std::fs::read_to_string("path/to/descriptor.json")?;
//! let descriptor = NodeTypeDescriptor::from_json(&json)?;
//!
//! let mut form = FormSession::new(&descriptor);
//! if let Some(resource) = form.resources().first() {
//!     form.select_resource(resource.value.clone());
//! }
//! println!("Operations: {:?}", form.operations());
//! # Ok(())
//! # }
//! ```

// Schema model
pub use crate::schema::{
    DisplayOptions, IconRef, IntoDescriptor, NodeTypeDescriptor, OptionValue, Property,
    PropertyKind, actions_of, fields_for, operations_of, resources_of,
};

// Forms and credentials
pub use crate::credential::{
    CredentialForm, CredentialNamePager, CredentialPayload, CredentialSchema, ProjectBinding,
};
pub use crate::form::{FieldValue, FieldWidget, FormSession, FormStage, InputKind, RequiredFields};

// Graph
pub use crate::graph::{
    GraphEdge, GraphNode, NodeCardFormatter, NodeId, WorkflowGraph, WorkflowPayload,
};

// Catalog and backend
pub use crate::backend::{CatalogSource, CredentialSource, WorkflowStore};
pub use crate::catalog::{ApplyOutcome, CatalogBrowser, CatalogPage, SearchDebouncer};
pub use crate::client::{ApiClient, ClientConfig};

// Error types
pub use crate::error::{ClientError, ConfigError, ConversionError, FormError, GraphError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
