//! # Flowcraft - Schema-Driven Workflow Graph Builder
//!
//! **Flowcraft** is the model behind a visual workflow builder: a catalog of integration
//! node types, forms generated from the JSON schemas the backend serves for those types,
//! a graph of configured nodes and edges, and the HTTP contract used to persist the result.
//!
//! ## Core Workflow
//!
//! 1.  **Browse**: A [`catalog::CatalogBrowser`] pages through the node types the backend
//!     offers, filtered by a debounced search term.
//! 2.  **Describe**: The chosen type's descriptor is fetched and parsed into a typed
//!     [`schema::NodeTypeDescriptor`]: resources, operations and conditionally visible fields.
//! 3.  **Configure**: A [`form::FormSession`] walks resource -> operation -> fields and
//!     collects typed values.
//! 4.  **Assemble**: The submission becomes a node in a [`graph::WorkflowGraph`]; nodes are
//!     connected with directed edges.
//! 5.  **Save**: The graph is turned into its persistence payload and posted to the backend.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use flowcraft::prelude::*;
//!
//! # async fn run() -> Result<()> {
//! let client = ApiClient::new(ClientConfig::from_env()?)?;
//!
//! // 1. Browse the catalog.
//! let mut browser = CatalogBrowser::new(client.config().page_size);
//! let request = browser.set_search("slack");
//! browser.fetch(&client, request).await;
//!
//! // 2. Fetch the full descriptor of the first match.
//! let entry_id = browser.entry(0).map(|e| e.id.clone()).unwrap_or_default();
//! let descriptor = client.get_node(&entry_id).await?;
//!
//! // 3. Fill in the form.
//! let mut form = FormSession::new(&descriptor);
//! form.select_resource("message");
//! form.select_operation("post")?;
//! form.set_input("channel", "#general")?;
//! let submission = form.submit(&RequiredFields::All)?;
//!
//! // 4. Add it to a graph.
//! let mut graph = WorkflowGraph::new();
//! graph.rename("Announce releases");
//! let node = graph.add_configured(&descriptor, submission);
//! println!("{}", NodeCardFormatter::format_card(graph.node(node).unwrap()));
//!
//! // 5. Save.
//! graph.save(&client).await?;
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod catalog;
pub mod client;
pub mod credential;
pub mod error;
pub mod form;
pub mod graph;
pub mod prelude;
pub mod schema;
