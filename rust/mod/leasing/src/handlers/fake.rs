//! In-memory `CrudApi` for handler tests.

use std::collections::HashMap;
use std::sync::Mutex;

use propdesk_client::{CrudApi, Resource};
use propdesk_core::{ListParams, ListResult, ServiceError, merge_patch};
use serde_json::{Map, Value, json};

/// What create/update send back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Echo {
    /// The stored record.
    Full,
    /// Only `{"id": ...}`.
    IdOnly,
    /// An empty body.
    Nothing,
}

pub struct MemoryApi {
    rows: Mutex<HashMap<Resource, Vec<Value>>>,
    fail_next: Mutex<Option<ServiceError>>,
    calls: Mutex<Vec<String>>,
    echo: Mutex<Echo>,
    next_id: Mutex<u32>,
}

impl MemoryApi {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(HashMap::new()),
            fail_next: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
            echo: Mutex::new(Echo::Full),
            next_id: Mutex::new(1),
        }
    }

    pub fn with_rows(self, resource: Resource, rows: Vec<Value>) -> Self {
        self.rows.lock().unwrap().insert(resource, rows);
        self
    }

    /// Make the next call fail with `err`.
    pub fn fail_next(&self, err: ServiceError) {
        *self.fail_next.lock().unwrap() = Some(err);
    }

    pub fn set_echo(&self, echo: Echo) {
        *self.echo.lock().unwrap() = echo;
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn rows(&self, resource: Resource) -> Vec<Value> {
        self.rows.lock().unwrap().get(&resource).cloned().unwrap_or_default()
    }

    fn enter(&self, call: String) -> Result<(), ServiceError> {
        self.calls.lock().unwrap().push(call);
        match self.fail_next.lock().unwrap().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn echo(&self, record: &Value) -> Value {
        match *self.echo.lock().unwrap() {
            Echo::Full => record.clone(),
            Echo::IdOnly => json!({ "id": record["id"] }),
            Echo::Nothing => Value::Null,
        }
    }
}

fn tenant_tree() -> Value {
    json!([
        {"id": 1, "name": "Austin", "properties": [
            {"id": 10, "name": "Elm Court", "units": [
                {"id": 100, "name": "1A", "tenants": [{"id": 1000, "name": "Alice"}]},
                {"id": 101, "name": "1B", "tenants": [{"id": 1001, "name": "Bob"}]}
            ]},
            {"id": 11, "name": "Oak Plaza"}
        ]},
        {"id": 2, "name": "Dallas", "properties": [
            {"id": 20, "name": "Pine Row", "units": [
                {"id": 200, "name": "2C", "tenants": [{"id": 2000, "name": "Carol"}]}
            ]}
        ]}
    ])
}

fn vendor_maps() -> Value {
    json!({
        "roots": [{"id": 1, "name": "Austin"}, {"id": 2, "name": "Dallas"}],
        "children": [
            {"1": [{"id": 10, "name": "Elm Court"}], "2": [{"id": 20, "name": "Pine Row"}]},
            {"10": [{"id": 100, "name": "1A"}], "20": [{"id": 200, "name": "2C"}]},
            {"100": [{"id": 5000, "name": "Ace Plumbing"}, {"id": 5001, "name": "Bright Electric"}],
             "200": [{"id": 5002, "name": "Ace Plumbing"}]}
        ]
    })
}

#[async_trait::async_trait]
impl CrudApi for MemoryApi {
    async fn list(&self, resource: Resource, params: &ListParams) -> Result<ListResult<Value>, ServiceError> {
        self.enter(format!("list {}", resource))?;
        let rows = self.rows(resource);
        let total = rows.len();
        let items = rows.into_iter().skip(params.offset).take(params.limit).collect();
        Ok(ListResult { items, total })
    }

    async fn get(&self, resource: Resource, id: &str) -> Result<Value, ServiceError> {
        self.enter(format!("get {} {}", resource, id))?;
        self.rows(resource)
            .into_iter()
            .find(|r| r["id"] == id)
            .ok_or_else(|| ServiceError::NotFound(format!("{} {} not found", resource, id)))
    }

    async fn create(&self, resource: Resource, payload: &Map<String, Value>) -> Result<Value, ServiceError> {
        self.enter(format!("create {}", resource))?;
        let mut record = Value::Object(payload.clone());
        let mut next = self.next_id.lock().unwrap();
        record["id"] = json!(format!("rec-{}", *next));
        *next += 1;
        self.rows.lock().unwrap().entry(resource).or_default().push(record.clone());
        Ok(self.echo(&record))
    }

    async fn update(
        &self,
        resource: Resource,
        id: &str,
        payload: &Map<String, Value>,
    ) -> Result<Value, ServiceError> {
        self.enter(format!("update {} {}", resource, id))?;
        let mut rows = self.rows.lock().unwrap();
        let record = rows
            .entry(resource)
            .or_default()
            .iter_mut()
            .find(|r| r["id"] == id)
            .ok_or_else(|| ServiceError::NotFound(format!("{} {} not found", resource, id)))?;
        merge_patch(record, &Value::Object(payload.clone()));
        let record = record.clone();
        drop(rows);
        Ok(self.echo(&record))
    }

    async fn delete(&self, resource: Resource, id: &str) -> Result<(), ServiceError> {
        self.enter(format!("delete {} {}", resource, id))?;
        let mut rows = self.rows.lock().unwrap();
        let list = rows.entry(resource).or_default();
        let before = list.len();
        list.retain(|r| r["id"] != id);
        if list.len() == before {
            return Err(ServiceError::NotFound(format!("{} {} not found", resource, id)));
        }
        Ok(())
    }

    async fn hierarchy(&self, leaf: &str) -> Result<Value, ServiceError> {
        self.enter(format!("hierarchy {}", leaf))?;
        match leaf {
            "tenant" => Ok(tenant_tree()),
            "vendor" => Ok(vendor_maps()),
            other => Err(ServiceError::NotFound(format!("no hierarchy for {}", other))),
        }
    }
}
