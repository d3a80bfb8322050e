pub mod context;
pub mod hierarchy;
pub mod resource;

use anyhow::Result;
use propdesk_cascade::{Level, NodeId};

/// Output format selected with `-o`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    Table,
    Json,
}

impl Output {
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "table" => Ok(Output::Table),
            "json" => Ok(Output::Json),
            other => anyhow::bail!("Unknown output format \"{}\" (expected table or json).", other),
        }
    }
}

pub fn print_json(value: &impl serde::Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Parse `tier=id` pairs (`city=1`, `unit_id=100`) and order them root
/// first.
pub fn parse_tier_pairs<L: Level>(pairs: &[String]) -> Result<Vec<(L, NodeId)>> {
    let mut parsed = Vec::with_capacity(pairs.len());
    for pair in pairs {
        let (key, id) = pair
            .split_once('=')
            .ok_or_else(|| anyhow::anyhow!("Expected tier=id, got \"{}\".", pair))?;
        let level = L::from_key(key).ok_or_else(|| {
            let known: Vec<&str> = L::ALL.iter().map(|l| l.key()).collect();
            anyhow::anyhow!("Unknown tier \"{}\" (expected one of {}).", key, known.join(", "))
        })?;
        let id = id.trim();
        if id.is_empty() {
            anyhow::bail!("Missing id for tier \"{}\".", key);
        }
        parsed.push((level, NodeId::parse(id)));
    }
    parsed.sort_by_key(|(level, _)| *level);
    Ok(parsed)
}
