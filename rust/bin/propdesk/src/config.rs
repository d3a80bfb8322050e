//! Client-side context management.
//!
//! Reads/writes `~/.propdesk/config.toml`.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use propdesk_core::{AllowAll, PermissionCheck, PolicySet};
use serde::{Deserialize, Serialize};

/// A single context: one back-office server and how to talk to it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Context {
    /// Context name (e.g. "austin-prod").
    pub name: String,

    /// Server URL (e.g. "http://localhost:8080").
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub server: String,

    /// Bearer token sent with every request.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub token: String,

    /// Local hierarchy snapshot used instead of the server's, if set.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub hierarchy: String,

    /// Permission grants (`leasing:offers:*`). Empty means everything.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub grants: Vec<String>,
}

impl Context {
    pub fn permissions(&self) -> Box<dyn PermissionCheck> {
        if self.grants.is_empty() {
            Box::new(AllowAll)
        } else {
            Box::new(PolicySet::new(self.grants.iter().cloned()))
        }
    }
}

/// Client configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Name of the currently active context.
    #[serde(rename = "current-context", default)]
    pub current_context: String,

    /// Default log filter when `RUST_LOG` is unset.
    #[serde(rename = "log-level", default, skip_serializing_if = "String::is_empty")]
    pub log_level: String,

    #[serde(default)]
    pub contexts: Vec<Context>,
}

impl ClientConfig {
    /// Default config file path: ~/.propdesk/config.toml.
    pub fn default_path() -> PathBuf {
        dirs_path().join("config.toml")
    }

    /// Load config from disk, or return default if file doesn't exist.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("{} is not a valid config file", path.display()))
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn current(&self) -> Option<&Context> {
        self.contexts.iter().find(|c| c.name == self.current_context)
    }

    /// The current context, or an error telling the user how to pick one.
    pub fn require_current(&self) -> anyhow::Result<&Context> {
        self.current().ok_or_else(|| {
            anyhow::anyhow!("No current context. Run `propdesk context set <name> --server <url>`.")
        })
    }

    /// Replace the context with the same name, or append it.
    pub fn upsert_context(&mut self, ctx: Context) {
        match self.contexts.iter().position(|c| c.name == ctx.name) {
            Some(i) => self.contexts[i] = ctx,
            None => self.contexts.push(ctx),
        }
    }

    /// Remove a context by name. Returns true if it was found.
    pub fn remove_context(&mut self, name: &str) -> bool {
        let len = self.contexts.len();
        self.contexts.retain(|c| c.name != name);
        if self.current_context == name {
            self.current_context = String::new();
        }
        self.contexts.len() < len
    }
}

/// Return the PropDesk config directory (~/.propdesk).
fn dirs_path() -> PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".propdesk")
}
