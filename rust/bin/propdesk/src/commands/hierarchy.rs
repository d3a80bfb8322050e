//! Offline hierarchy commands: resolve a chain, walk a cascade.
//!
//! Both read a hierarchy snapshot (nested tree or per-parent maps) from
//! a JSON file, so they work without a server.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use propdesk_cascade::{
    Chain, HierarchyIndex, Level, NodeId, SelectOutcome, SelectionState, TenantTier, VendorTier,
};
use serde_json::json;
use tracing::debug;

use super::{Output, parse_tier_pairs, print_json};

/// Which hierarchy a command walks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum TierSet {
    Tenant,
    Vendor,
}

pub fn read_index<L: Level>(path: &Path) -> Result<HierarchyIndex<L>> {
    let body = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Cannot read {}: {}", path.display(), e))?;
    let value: serde_json::Value = serde_json::from_str(&body)
        .map_err(|e| anyhow::anyhow!("{} is not JSON: {}", path.display(), e))?;
    let index = HierarchyIndex::from_value(value);
    debug!(path = %path.display(), nodes = index.len(), "hierarchy file loaded");
    Ok(index)
}

/// `propdesk chain`: print the ancestors of a leaf.
pub fn chain(tree: &Path, tiers: TierSet, leaf: &str, by_name: bool, output: Output) -> Result<()> {
    match tiers {
        TierSet::Tenant => chain_for::<TenantTier>(tree, leaf, by_name, output),
        TierSet::Vendor => chain_for::<VendorTier>(tree, leaf, by_name, output),
    }
}

fn chain_for<L: Level>(tree: &Path, leaf: &str, by_name: bool, output: Output) -> Result<()> {
    let index = read_index::<L>(tree)?;
    let chain = resolve_chain(&index, leaf, by_name);
    if chain.is_empty() {
        anyhow::bail!("No {} \"{}\" in {}.", L::leaf().label(), leaf, tree.display());
    }

    match output {
        Output::Json => {
            let map: serde_json::Map<String, serde_json::Value> = chain
                .iter()
                .map(|(l, id)| (l.payload_key().to_string(), id.to_json()))
                .collect();
            print_json(&map)?;
        }
        Output::Table => {
            println!("{:10} {:12} {}", "TIER", "ID", "NAME");
            for (level, id) in &chain {
                let name = index.node(*level, id).map(|n| n.label.as_str()).unwrap_or("-");
                println!("{:10} {:12} {}", level.label(), id.to_string(), name);
            }
        }
    }
    Ok(())
}

fn resolve_chain<L: Level>(index: &HierarchyIndex<L>, leaf: &str, by_name: bool) -> Chain<L> {
    if by_name {
        index.find_ancestor_chain_by_label(L::leaf(), leaf)
    } else {
        index.find_ancestor_chain(L::leaf(), &NodeId::parse(leaf))
    }
}

/// `propdesk options`: apply selections in tier order and show what each
/// tier offers afterwards.
pub fn options(tree: &Path, tiers: TierSet, select: &[String], output: Output) -> Result<()> {
    match tiers {
        TierSet::Tenant => options_for::<TenantTier>(tree, select, output),
        TierSet::Vendor => options_for::<VendorTier>(tree, select, output),
    }
}

fn options_for<L: Level>(tree: &Path, select: &[String], output: Output) -> Result<()> {
    let index = Arc::new(read_index::<L>(tree)?);
    let state = walk(index, &parse_tier_pairs::<L>(select)?)?;

    match output {
        Output::Json => print_json(&json!({
            "complete": state.is_complete(L::ALL),
            "tiers": state.view().tiers,
        }))?,
        Output::Table => {
            for tier in state.view().tiers {
                let selected = tier.selected.map(|id| id.to_string()).unwrap_or_else(|| "-".into());
                let options: Vec<String> = tier
                    .options
                    .iter()
                    .map(|n| format!("{} ({})", n.label, n.id))
                    .collect();
                println!("{:10} {:8} {}", tier.label, selected, options.join(", "));
            }
        }
    }
    Ok(())
}

fn walk<L: Level>(index: Arc<HierarchyIndex<L>>, picks: &[(L, NodeId)]) -> Result<SelectionState<L>> {
    let mut state = SelectionState::new(index);
    for (level, id) in picks {
        if state.select(*level, Some(id.clone())) == SelectOutcome::Rejected {
            let parent = level
                .parent()
                .and_then(|p| state.selected_node(p))
                .map(|n| format!(" under {}", n.label))
                .unwrap_or_default();
            anyhow::bail!("{} {} is not available{}.", level.label(), id, parent);
        }
    }
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn tree_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"id": 1, "name": "Austin", "properties": [
                {{"id": 10, "name": "Elm Court", "units": [
                    {{"id": 100, "name": "1A", "tenants": [{{"id": 1000, "name": "Alice"}}]}}
                ]}}
            ]}}]"#
        )
        .unwrap();
        file
    }

    #[test]
    fn resolves_by_id_and_name() {
        let file = tree_file();
        let index = read_index::<TenantTier>(file.path()).unwrap();
        let by_id = resolve_chain(&index, "1000", false);
        assert_eq!(by_id.len(), 4);
        assert_eq!(by_id[&TenantTier::Unit], NodeId::from(100));
        assert_eq!(resolve_chain(&index, "ALICE", true), by_id);
        assert!(resolve_chain(&index, "9", false).is_empty());
    }

    #[test]
    fn walk_rejects_out_of_order_picks() {
        let file = tree_file();
        let index = Arc::new(read_index::<TenantTier>(file.path()).unwrap());
        let picks = vec![(TenantTier::City, NodeId::from(1)), (TenantTier::Property, NodeId::from(10))];
        let state = walk(index.clone(), &picks).unwrap();
        assert_eq!(state.options(TenantTier::Unit).len(), 1);

        let bad = vec![(TenantTier::City, NodeId::from(1)), (TenantTier::Property, NodeId::from(99))];
        let err = walk(index, &bad).err().map(|e| e.to_string());
        assert_eq!(err.as_deref(), Some("Property 99 is not available under Austin."));
    }

    #[test]
    fn unreadable_file_is_an_error() {
        assert!(read_index::<VendorTier>(Path::new("/definitely/not/here.json")).is_err());
        assert!(chain(Path::new("/definitely/not/here.json"), TierSet::Vendor, "1", false, Output::Json).is_err());
    }
}
