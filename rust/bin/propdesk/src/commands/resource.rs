//! Resource commands: list, get, create, update and delete leasing
//! records through the same drawer and list-page state the back office
//! uses.

use std::sync::Arc;

use anyhow::Result;
use propdesk_cascade::{HierarchyIndex, Level, SelectOutcome};
use propdesk_client::{CrudApi, Resource, ResourceClient, StaticToken};
use propdesk_core::{Capability, FieldErrors, ListParams, PermissionCheck, merge_patch};
use propdesk_leasing::{
    Drawer, Feature, ListPage, OfferRenewals, PaymentPlans, SubmitOutcome, Units, VendorTasks,
    load_index,
};
use serde_json::{Map, Value};
use tracing::info;

use super::hierarchy::read_index;
use super::{Output, parse_tier_pairs, print_json};
use crate::config::Context;

/// Run `$body` with `$f` bound to the feature type for `$resource`.
macro_rules! with_feature {
    ($resource:expr, $f:ident => $body:expr) => {
        match $resource {
            Resource::Offers => {
                type $f = OfferRenewals;
                $body
            }
            Resource::PaymentPlans => {
                type $f = PaymentPlans;
                $body
            }
            Resource::Units => {
                type $f = Units;
                $body
            }
            Resource::VendorTasks => {
                type $f = VendorTasks;
                $body
            }
        }
    };
}

/// Everything a resource command needs from the current context.
pub struct Session {
    api: ResourceClient,
    perms: Box<dyn PermissionCheck>,
    hierarchy: String,
}

impl Session {
    pub fn new(ctx: &Context) -> Result<Self> {
        if ctx.server.is_empty() {
            anyhow::bail!(
                "No server URL set for context \"{}\". Run `propdesk context set {} --server <url>`.",
                ctx.name,
                ctx.name
            );
        }
        Ok(Self {
            api: ResourceClient::new(ctx.server.clone(), Arc::new(StaticToken::new(ctx.token.clone()))),
            perms: ctx.permissions(),
            hierarchy: ctx.hierarchy.clone(),
        })
    }

    /// The context's local snapshot when it has one, else the server's.
    async fn index<F: Feature>(&self) -> Result<Arc<HierarchyIndex<F::Tier>>> {
        if self.hierarchy.is_empty() {
            Ok(load_index::<F>(&self.api).await)
        } else {
            Ok(Arc::new(read_index::<F::Tier>(std::path::Path::new(&self.hierarchy))?))
        }
    }
}

pub fn parse_resource(name: &str) -> Result<Resource> {
    Resource::from_name(name).ok_or_else(|| {
        let known: Vec<&str> = Resource::ALL.iter().map(|r| r.path()).collect();
        anyhow::anyhow!("Unknown resource type: {} (expected one of {}).", name, known.join(", "))
    })
}

/// Parse a JSON object given on the command line or in a file.
pub fn parse_body(body: &str) -> Result<Map<String, Value>> {
    match serde_json::from_str::<Value>(body)? {
        Value::Object(map) => Ok(map),
        _ => anyhow::bail!("Expected a JSON object."),
    }
}

/// Flags that only apply when listing.
#[derive(Debug, Default)]
pub struct ListFlags {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    pub q: Option<String>,
    pub filters: Vec<String>,
}

impl ListFlags {
    fn is_empty(&self) -> bool {
        self.limit.is_none() && self.offset.is_none() && self.q.is_none() && self.filters.is_empty()
    }

    fn params(&self) -> ListParams {
        let mut params = ListParams::default();
        if let Some(limit) = self.limit {
            params.limit = limit;
        }
        params.offset = self.offset.unwrap_or(0);
        params.q = self.q.clone();
        params
    }
}

/// GET one record, or a filtered page of them.
pub async fn get(
    session: &Session,
    resource: Resource,
    id: Option<&str>,
    flags: &ListFlags,
    output: Output,
) -> Result<()> {
    if let Some(id) = id {
        if !flags.is_empty() {
            anyhow::bail!("--limit, --offset, --q and --filter only apply when listing; drop the ID or the flags.");
        }
        let view = with_feature!(resource, F => F::permission(Capability::View));
        session.perms.require(&view)?;
        let record = session.api.get(resource, id).await?;
        return print_json(&record);
    }
    with_feature!(resource, F => list::<F>(session, &flags.params(), &flags.filters, output).await)
}

async fn list<F: Feature>(session: &Session, params: &ListParams, filters: &[String], output: Output) -> Result<()> {
    let index = session.index::<F>().await?;
    let mut page = ListPage::<F>::new(index, session.perms.as_ref())?;
    page.load(&session.api, params).await?;
    for (level, id) in parse_tier_pairs::<F::Tier>(filters)? {
        if page.select_filter(level, Some(id.clone())) == SelectOutcome::Rejected {
            anyhow::bail!("Filter {}={} does not match the hierarchy.", level.key(), id);
        }
    }

    let rows = page.filtered();
    match output {
        Output::Json => print_json(&rows)?,
        Output::Table => {
            print_rows::<F>(&rows);
            println!("({} shown, {} total)", rows.len(), page.total());
        }
    }
    Ok(())
}

fn print_rows<F: Feature>(rows: &[&Value]) {
    let leaf = F::LEAF.payload_key();
    let mut columns = vec!["id", leaf];
    columns.extend(F::FIELDS.iter().copied());

    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| columns.iter().map(|c| cell(row.get(*c))).collect())
        .collect();
    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, c)| cells.iter().map(|r| r[i].len()).max().unwrap_or(0).max(c.len()).min(32))
        .collect();

    let header: Vec<String> = columns
        .iter()
        .zip(&widths)
        .map(|(c, w)| format!("{:w$}", c.to_uppercase(), w = *w))
        .collect();
    println!("{}", header.join("  "));
    for row in cells {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(v, w)| format!("{:w$}", v, w = *w))
            .collect();
        println!("{}", line.join("  "));
    }
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "-".to_string(),
        Some(Value::String(s)) if s.is_empty() => "-".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Create a record through a drawer seeded from `body`.
pub async fn create(session: &Session, resource: Resource, body: Map<String, Value>) -> Result<()> {
    with_feature!(resource, F => {
        let index = session.index::<F>().await?;
        let mut drawer = Drawer::<F>::open_create(index, session.perms.as_ref())?;
        drawer.prefill(&Value::Object(body));
        let outcome = drawer.submit(&session.api).await;
        report(outcome, drawer.errors(), drawer.banner())
    })
}

/// Patch a record: fetch it, apply `patch`, and resubmit through an edit
/// drawer so the cascade and form checks run.
pub async fn update(session: &Session, resource: Resource, id: &str, patch: Map<String, Value>) -> Result<()> {
    let mut record = session.api.get(resource, id).await?;
    merge_patch(&mut record, &Value::Object(patch));
    with_feature!(resource, F => {
        let index = session.index::<F>().await?;
        let mut drawer = Drawer::<F>::open_edit(index, session.perms.as_ref(), id, &record)?;
        let outcome = drawer.submit(&session.api).await;
        report(outcome, drawer.errors(), drawer.banner())
    })
}

pub async fn delete(session: &Session, resource: Resource, id: &str) -> Result<()> {
    with_feature!(resource, F => {
        let index = session.index::<F>().await?;
        let mut page = ListPage::<F>::new(index, session.perms.as_ref())?;
        page.delete(&session.api, id).await?;
    });
    println!("Deleted {} {}.", resource, id);
    Ok(())
}

fn report(outcome: SubmitOutcome, errors: &FieldErrors, banner: Option<&str>) -> Result<()> {
    match outcome {
        SubmitOutcome::Saved(record) => {
            info!(id = %cell(record.get("id")), "saved");
            print_json(&record)
        }
        SubmitOutcome::Blocked | SubmitOutcome::Rejected => {
            for (field, message) in errors {
                eprintln!("  {}: {}", field, message);
            }
            match banner {
                Some(banner) => anyhow::bail!("{}", banner),
                None => anyhow::bail!("Record not saved: {} field error(s).", errors.len()),
            }
        }
        SubmitOutcome::Failed => anyhow::bail!("{}", banner.unwrap_or("Request failed.")),
    }
}
