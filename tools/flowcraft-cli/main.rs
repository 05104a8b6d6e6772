use ahash::AHashMap;
use clap::{Parser, Subcommand};
use flowcraft::prelude::*;
use flowcraft::schema::RESOURCE_PROPERTY;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

// --- Build plan format (CLI specific) ---
// A plan lists the nodes to add, keyed by a local name, and the connections between them.

#[derive(Deserialize)]
struct BuildPlan {
    #[serde(default)]
    name: Option<String>,
    nodes: Vec<PlannedNode>,
    #[serde(default)]
    edges: Vec<(String, String)>,
}

#[derive(Deserialize)]
struct PlannedNode {
    key: String,
    #[serde(rename = "type")]
    node_type: String,
    #[serde(default)]
    resource: Option<String>,
    #[serde(default)]
    operation: Option<String>,
    /// Flat action label, used when no resource/operation is given.
    #[serde(default)]
    action: Option<String>,
    #[serde(default)]
    fields: BTreeMap<String, String>,
}

/// Command-line front end for browsing node types and assembling workflows
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Backend base URL
    #[arg(long, env = "FLOWCRAFT_BASE_URL", global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List saved workflows
    Workflows,
    /// Browse the node-type catalog
    Catalog {
        #[arg(short, long, default_value = "")]
        search: String,
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },
    /// Show the resources, operations and actions of one node type
    Node { id: String },
    /// Show the inputs of a credential type
    CredentialSchema { credential_type: String },
    /// Assemble a workflow from a JSON build plan
    Build {
        plan_path: String,
        /// Submit the workflow to the backend
        #[arg(long)]
        save: bool,
        /// Treat every visible field as required
        #[arg(long)]
        require_all: bool,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        exit_with_error(&e.to_string());
    }
}

fn client_for(base_url: Option<String>) -> Result<ApiClient> {
    let config = match base_url {
        Some(url) => {
            let env = ClientConfig::from_env().ok();
            ClientConfig::builder(url)
                .with_project(env.map(|c| c.project).unwrap_or_default())
                .build()
        }
        None => ClientConfig::from_env()?,
    };
    Ok(ApiClient::new(config)?)
}

async fn run(cli: Cli) -> Result<()> {
    let client = client_for(cli.base_url)?;

    match cli.command {
        Command::Workflows => list_workflows(&client).await,
        Command::Catalog { search, page } => browse_catalog(&client, search, page).await,
        Command::Node { id } => describe_node(&client, &id).await,
        Command::CredentialSchema { credential_type } => {
            describe_credential(&client, &credential_type).await
        }
        Command::Build {
            plan_path,
            save,
            require_all,
        } => build_workflow(&client, &plan_path, save, require_all).await,
    }
}

async fn list_workflows(client: &ApiClient) -> Result<()> {
    let workflows = client.list_workflows().await?;
    if workflows.is_empty() {
        println!("No workflows. Get started by creating a new workflow.");
        return Ok(());
    }
    for wf in workflows {
        let status = if wf.active { "Active" } else { "Inactive" };
        let updated = wf
            .updated_at
            .map(|t| t.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<32} {:<8} updated {}  {}",
            wf.name,
            status,
            updated,
            wf.description
                .as_deref()
                .unwrap_or("No description available")
        );
    }
    Ok(())
}

async fn browse_catalog(client: &ApiClient, search: String, page: u32) -> Result<()> {
    let mut browser = CatalogBrowser::new(client.config().page_size);
    browser.set_search(search);
    while browser.page() < page {
        if browser.next_page().is_none() {
            // Total pages are only known after a fetch.
            browser.refresh(client).await;
            if browser.next_page().is_none() {
                break;
            }
        }
    }

    if browser.refresh(client).await == ApplyOutcome::Failed {
        return Err("catalog fetch failed".into());
    }

    if browser.entries().is_empty() {
        println!("No nodes found");
    }
    for (index, entry) in browser.entries().iter().enumerate() {
        println!(
            "{:>3}. {:<28} {}",
            index + 1,
            entry.display_name,
            entry.id
        );
    }
    println!("Page {} of {}", browser.page(), browser.total_pages());
    Ok(())
}

async fn describe_node(client: &ApiClient, id: &str) -> Result<()> {
    let descriptor = client.get_node(id).await?;
    println!("{} ({})", descriptor.display_name, descriptor.id);

    let resources = descriptor.resources();
    if resources.is_empty() {
        println!("  no '{}' selector", RESOURCE_PROPERTY);
    }
    for resource in resources {
        println!("  resource {} ({})", resource.value, resource.name);
        for operation in descriptor.operations(&resource.value) {
            let fields = descriptor.fields_for(&resource.value, &operation.value);
            println!(
                "    operation {} ({}) - {} field(s)",
                operation.value,
                operation.name,
                fields.len()
            );
            for field in fields {
                println!("      {} [{}]", field.name, field.kind.type_name());
            }
        }
    }

    let actions = descriptor.actions();
    if !actions.is_empty() {
        println!("  actions:");
        for action in actions {
            println!("    - {}", action);
        }
    }
    Ok(())
}

async fn describe_credential(client: &ApiClient, credential_type: &str) -> Result<()> {
    let schema = client.credential_schema(credential_type).await?;
    let form = CredentialForm::new(&schema);
    println!("Credential type {}", credential_type);
    println!("  Name  (text)");
    println!("  Type  (text)");
    for field in form.fields() {
        let input = if field.masked { "masked" } else { "text" };
        println!("  {:<20} ({}) {}", field.label, input, field.placeholder);
    }
    Ok(())
}

async fn build_workflow(
    client: &ApiClient,
    plan_path: &str,
    save: bool,
    require_all: bool,
) -> Result<()> {
    let start = Instant::now();
    let plan_json = fs::read_to_string(plan_path)
        .map_err(|e| format!("Failed to read plan file '{}': {}", plan_path, e))?;
    let plan: BuildPlan = serde_json::from_str(&plan_json)
        .map_err(|e| format!("Failed to parse plan JSON: {}", e))?;

    let required = if require_all {
        RequiredFields::All
    } else {
        RequiredFields::None
    };

    let mut graph = WorkflowGraph::new();
    if let Some(name) = plan.name {
        graph.rename(name);
    }

    let mut descriptors: AHashMap<String, NodeTypeDescriptor> = AHashMap::new();
    let mut ids: AHashMap<String, NodeId> = AHashMap::new();

    for planned in plan.nodes {
        if !descriptors.contains_key(&planned.node_type) {
            let descriptor = client.get_node(&planned.node_type).await?;
            descriptors.insert(planned.node_type.clone(), descriptor);
        }
        let descriptor = &descriptors[&planned.node_type];

        let id = match (&planned.resource, &planned.operation) {
            (Some(resource), Some(operation)) => {
                let mut form = FormSession::new(descriptor);
                form.select_resource(resource.clone());
                form.select_operation(operation.clone())?;
                for (field, raw) in &planned.fields {
                    form.set_input(field, raw)?;
                }
                graph.add_configured(descriptor, form.submit(&required)?)
            }
            _ => {
                let action = planned.action.clone().ok_or_else(|| {
                    format!(
                        "Node '{}' needs resource+operation or an action",
                        planned.key
                    )
                })?;
                if !descriptor.actions().contains(&action.as_str()) {
                    return Err(format!(
                        "Node '{}': '{}' is not an action of {}",
                        planned.key, action, descriptor.display_name
                    )
                    .into());
                }
                graph.add_node(descriptor, action)
            }
        };
        ids.insert(planned.key, id);
    }

    for (source, target) in &plan.edges {
        let lookup = |key: &String| {
            ids.get(key)
                .copied()
                .ok_or_else(|| format!("Edge references unknown node key '{}'", key))
        };
        graph.connect(lookup(source)?, lookup(target)?)?;
    }

    println!("Workflow '{}'", graph.name());
    for node in graph.nodes() {
        println!("{}", NodeCardFormatter::format_card(node));
    }
    for edge in graph.edges() {
        println!("  {} -> {}", edge.source, edge.target);
    }

    let payload = graph.to_payload();
    println!("\n{}", serde_json::to_string_pretty(&payload)?);

    if save {
        let created = graph.save(client).await?;
        println!("\nSaved: {}", created);
    }
    println!("\nDone in {:?}", start.elapsed());
    Ok(())
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
