//! `propdesk`: back-office CLI for the leasing module.
//!
//! Manages contexts, walks City → Property → Unit → Tenant/Vendor
//! hierarchies offline, and reads or writes leasing records through the
//! same cascade and drawer logic the back-office pages use.

mod commands;
mod config;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::Output;
use commands::context::ContextUpdate;
use commands::hierarchy::TierSet;
use commands::resource::{ListFlags, Session};

/// PropDesk CLI tool.
#[derive(Parser, Debug)]
#[command(name = "propdesk", about = "PropDesk back-office CLI")]
struct Cli {
    /// Path to client config file (default: ~/.propdesk/config.toml).
    #[arg(long = "config", global = true)]
    config: Option<String>,

    /// Output format: table or json.
    #[arg(long = "output", short = 'o', global = true, default_value = "table")]
    output: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage contexts.
    Context {
        #[command(subcommand)]
        action: ContextAction,
    },

    /// Switch the current context.
    #[command(name = "use")]
    Use {
        #[command(subcommand)]
        what: UseWhat,
    },

    /// Resolve a tenant or vendor to its City → Property → Unit chain.
    Chain {
        /// Hierarchy JSON file (nested tree or per-parent maps).
        #[arg(long)]
        tree: PathBuf,
        /// Which hierarchy the file holds.
        #[arg(long, value_enum, default_value = "tenant")]
        tier: TierSet,
        /// Leaf id (or name, with --by-name).
        #[arg(long)]
        leaf: String,
        /// Match the leaf by name instead of id.
        #[arg(long)]
        by_name: bool,
    },

    /// Apply selections tier by tier and show the options at each tier.
    Options {
        #[arg(long)]
        tree: PathBuf,
        #[arg(long, value_enum, default_value = "tenant")]
        tier: TierSet,
        /// Selections as tier=id, e.g. --select city=1 --select property=10.
        #[arg(long = "select")]
        select: Vec<String>,
    },

    /// Get resource(s).
    Get {
        /// Resource type (offers, payment-plans, units, vendor-tasks).
        resource: String,
        /// Optional record ID for single get (list flags are rejected with it).
        id: Option<String>,
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long)]
        offset: Option<usize>,
        /// Free-text search.
        #[arg(long)]
        q: Option<String>,
        /// Hierarchy filter as tier=id, e.g. --filter city=1.
        #[arg(long = "filter")]
        filter: Vec<String>,
    },

    /// Create a record.
    Create {
        resource: String,
        /// JSON body.
        #[arg(long = "json")]
        json_body: Option<String>,
        /// Read JSON from file.
        #[arg(short = 'f', long = "file")]
        file: Option<String>,
    },

    /// Update a record (fields are merged into the stored record).
    Update {
        resource: String,
        id: String,
        /// JSON body.
        #[arg(long = "json")]
        json_body: String,
    },

    /// Delete a record.
    Delete {
        resource: String,
        id: String,
        /// Skip confirmation.
        #[arg(long = "yes", short = 'y')]
        yes: bool,
    },

    /// Show version.
    Version,
}

#[derive(Subcommand, Debug)]
enum ContextAction {
    /// List all contexts.
    List,
    /// Create a context or set properties on one.
    Set {
        name: String,
        #[arg(long)]
        server: Option<String>,
        #[arg(long)]
        token: Option<String>,
        /// Local hierarchy snapshot to use instead of the server's.
        #[arg(long)]
        hierarchy: Option<String>,
        /// Permission grant, repeatable (e.g. leasing:*:view).
        #[arg(long = "grant")]
        grants: Vec<String>,
    },
    /// Delete a context.
    Delete { name: String },
}

#[derive(Subcommand, Debug)]
enum UseWhat {
    /// Switch to a context.
    Context { name: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .map(PathBuf::from)
        .unwrap_or_else(config::ClientConfig::default_path);
    let client_config = config::ClientConfig::load(&config_path)?;

    // Initialize logging. RUST_LOG wins over the config file.
    let default_level = if client_config.log_level.is_empty() {
        "warn".to_string()
    } else {
        client_config.log_level.clone()
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()))
        .with_writer(std::io::stderr)
        .init();

    let output = Output::parse(&cli.output)?;

    match cli.command {
        Commands::Context { action } => match action {
            ContextAction::List => commands::context::list(&config_path)?,
            ContextAction::Set {
                name,
                server,
                token,
                hierarchy,
                grants,
            } => {
                let update = ContextUpdate {
                    server,
                    token,
                    hierarchy,
                    grants: if grants.is_empty() { None } else { Some(grants) },
                };
                commands::context::set(&name, update, &config_path)?;
            }
            ContextAction::Delete { name } => commands::context::delete(&name, &config_path)?,
        },

        Commands::Use { what } => match what {
            UseWhat::Context { name } => commands::context::use_context(&name, &config_path)?,
        },

        Commands::Chain {
            tree,
            tier,
            leaf,
            by_name,
        } => commands::hierarchy::chain(&tree, tier, &leaf, by_name, output)?,

        Commands::Options { tree, tier, select } => {
            commands::hierarchy::options(&tree, tier, &select, output)?
        }

        Commands::Get {
            resource,
            id,
            limit,
            offset,
            q,
            filter,
        } => {
            let resource = commands::resource::parse_resource(&resource)?;
            let session = Session::new(client_config.require_current()?)?;
            let flags = ListFlags {
                limit,
                offset,
                q,
                filters: filter,
            };
            commands::resource::get(&session, resource, id.as_deref(), &flags, output).await?;
        }

        Commands::Create {
            resource,
            json_body,
            file,
        } => {
            let body = if let Some(path) = file {
                std::fs::read_to_string(&path)?
            } else if let Some(json) = json_body {
                json
            } else {
                anyhow::bail!("Provide --json or -f <file>.");
            };
            let resource = commands::resource::parse_resource(&resource)?;
            let session = Session::new(client_config.require_current()?)?;
            commands::resource::create(&session, resource, commands::resource::parse_body(&body)?).await?;
        }

        Commands::Update {
            resource,
            id,
            json_body,
        } => {
            let resource = commands::resource::parse_resource(&resource)?;
            let session = Session::new(client_config.require_current()?)?;
            commands::resource::update(&session, resource, &id, commands::resource::parse_body(&json_body)?).await?;
        }

        Commands::Delete { resource, id, yes } => {
            let resource = commands::resource::parse_resource(&resource)?;
            if !yes {
                eprint!("Delete {} {}? [y/N]: ", resource, id);
                let mut answer = String::new();
                std::io::stdin().read_line(&mut answer)?;
                if !answer.trim().eq_ignore_ascii_case("y") {
                    println!("Aborted.");
                    return Ok(());
                }
            }
            let session = Session::new(client_config.require_current()?)?;
            commands::resource::delete(&session, resource, &id).await?;
        }

        Commands::Version => {
            println!("propdesk {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
