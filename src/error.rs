use thiserror::Error;

/// Errors raised at the form-submission boundary when a selection is malformed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormError {
    #[error("Operation '{operation}' was chosen before any resource was selected")]
    OperationWithoutResource { operation: String },

    #[error("Operation '{operation}' is not offered for resource '{resource}'")]
    OperationNotOffered { resource: String, operation: String },

    #[error("Field '{field}' is not visible for the current resource/operation selection")]
    FieldNotVisible { field: String },

    #[error("Value '{value}' is not one of the declared options of field '{field}'")]
    ValueOutsideOptions { field: String, value: String },

    #[error("Field '{field}' expects a {expected} value")]
    KindMismatch { field: String, expected: &'static str },

    #[error("Field '{field}' holds an unparseable date/time: '{value}'")]
    InvalidDateTime { field: String, value: String },

    #[error("The form cannot be submitted before an operation is chosen")]
    Incomplete,

    #[error("Required field '{0}' has no value")]
    MissingRequired(String),

    #[error("Credential schema has no property named '{0}'")]
    UnknownCredentialField(String),
}

/// Errors that can occur while editing a workflow graph.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("Node '{node_id}' not found, which is required as the {role} of this operation")]
    NodeNotFound { node_id: String, role: &'static str },

    #[error("'{0}' is not a node identifier (expected 'node_<n>')")]
    MalformedNodeId(String),
}

/// Network failures while talking to the workflow backend.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Invalid base URL '{url}': {message}")]
    InvalidBaseUrl { url: String, message: String },

    #[error("Request to '{url}' failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Backend answered {status} for '{url}': {body}")]
    Status {
        status: u16,
        url: String,
        body: String,
    },

    #[error("Failed to decode response from '{url}': {message}")]
    Decode { url: String, message: String },
}

/// Errors that can occur when converting a wire-format descriptor into the typed schema model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConversionError {
    #[error("Descriptor has no identifier")]
    MissingId,

    #[error("Invalid descriptor data: {0}")]
    ValidationError(String),
}

/// Errors raised while assembling a client configuration from the environment.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Environment variable '{0}' is not set")]
    MissingVar(&'static str),

    #[error("Environment variable '{var}' holds an invalid value: '{value}'")]
    InvalidVar { var: &'static str, value: String },
}
