//! Context management commands.

use std::path::Path;

use anyhow::Result;

use crate::config::{ClientConfig, Context};

/// Changes requested by `propdesk context set`.
#[derive(Debug, Default)]
pub struct ContextUpdate {
    pub server: Option<String>,
    pub token: Option<String>,
    pub hierarchy: Option<String>,
    pub grants: Option<Vec<String>>,
}

/// List all contexts.
pub fn list(client_config_path: &Path) -> Result<()> {
    let config = ClientConfig::load(client_config_path)?;

    if config.contexts.is_empty() {
        println!("No contexts configured.");
        println!("Run: propdesk context set <name> --server <url>");
        return Ok(());
    }

    println!("{:2} {:20} {:40} {:8}", "", "NAME", "SERVER", "AUTH");
    for ctx in &config.contexts {
        let marker = if ctx.name == config.current_context { "*" } else { " " };
        let server = if ctx.server.is_empty() { "-" } else { &ctx.server };
        let auth = if ctx.token.is_empty() { "none" } else { "token" };
        println!("{:2} {:20} {:40} {:8}", marker, ctx.name, server, auth);
    }

    Ok(())
}

/// Switch current context.
pub fn use_context(name: &str, client_config_path: &Path) -> Result<()> {
    let mut config = ClientConfig::load(client_config_path)?;

    if !config.contexts.iter().any(|c| c.name == name) {
        anyhow::bail!(
            "Context \"{}\" not found. Run `propdesk context list` to see available contexts.",
            name
        );
    }

    config.current_context = name.to_string();
    config.save(client_config_path)?;
    println!("Switched to context \"{}\".", name);
    Ok(())
}

/// Create or update a context. The first context becomes current.
pub fn set(name: &str, update: ContextUpdate, client_config_path: &Path) -> Result<()> {
    let mut config = ClientConfig::load(client_config_path)?;
    let existed = config.contexts.iter().any(|c| c.name == name);

    let mut ctx = config
        .contexts
        .iter()
        .find(|c| c.name == name)
        .cloned()
        .unwrap_or_else(|| Context {
            name: name.to_string(),
            ..Context::default()
        });
    if let Some(server) = update.server {
        ctx.server = server.trim_end_matches('/').to_string();
    }
    if let Some(token) = update.token {
        ctx.token = token;
    }
    if let Some(hierarchy) = update.hierarchy {
        ctx.hierarchy = hierarchy;
    }
    if let Some(grants) = update.grants {
        ctx.grants = grants;
    }
    config.upsert_context(ctx);
    if config.current_context.is_empty() {
        config.current_context = name.to_string();
    }
    config.save(client_config_path)?;

    if existed {
        println!("Context \"{}\" updated.", name);
    } else {
        println!("Context \"{}\" created.", name);
    }
    Ok(())
}

/// Delete a context.
pub fn delete(name: &str, client_config_path: &Path) -> Result<()> {
    let mut config = ClientConfig::load(client_config_path)?;
    if !config.remove_context(name) {
        anyhow::bail!("Context \"{}\" not found.", name);
    }
    config.save(client_config_path)?;
    println!("Context \"{}\" deleted.", name);
    Ok(())
}
