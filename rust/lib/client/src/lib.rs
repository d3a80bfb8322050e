//! PropDesk HTTP client.
//!
//! The drawers and list pages only see the [`CrudApi`] trait; this crate
//! also provides [`ResourceClient`], the reqwest-backed implementation.
//! Authentication is handled by pluggable [`TokenSource`] implementations.
//!
//! # Usage
//!
//! ```ignore
//! use propdesk_client::{ResourceClient, Resource, StaticToken};
//!
//! let client = ResourceClient::new("http://localhost:8080", Arc::new(StaticToken::new(jwt)));
//! let offers = client.list(Resource::Offers, &ListParams::default()).await?;
//! ```

use std::fmt;
use std::sync::Arc;

use propdesk_core::{ErrorBody, ListParams, ListResult, ServiceError};
use serde_json::{Map, Value};
use tracing::debug;

// ── Resource ────────────────────────────────────────────────────────

/// Back-office resources served under `/leasing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Offers,
    PaymentPlans,
    Units,
    VendorTasks,
}

impl Resource {
    pub const ALL: [Resource; 4] = [
        Resource::Offers,
        Resource::PaymentPlans,
        Resource::Units,
        Resource::VendorTasks,
    ];

    /// Module segment of the API path and of permission strings.
    pub const MODULE: &'static str = "leasing";

    /// Path segment, also the resource part of permission strings.
    pub fn path(&self) -> &'static str {
        match self {
            Resource::Offers => "offers",
            Resource::PaymentPlans => "payment-plans",
            Resource::Units => "units",
            Resource::VendorTasks => "vendor-tasks",
        }
    }

    /// Map a singular/plural resource name onto a resource.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "offer" | "offers" | "renewal" | "renewals" => Some(Resource::Offers),
            "payment-plan" | "payment-plans" | "paymentplan" | "paymentplans" => {
                Some(Resource::PaymentPlans)
            }
            "unit" | "units" => Some(Resource::Units),
            "vendor-task" | "vendor-tasks" | "vendortask" | "vendortasks" | "task" | "tasks" => {
                Some(Resource::VendorTasks)
            }
            _ => None,
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

// ── CrudApi ─────────────────────────────────────────────────────────

/// The remote CRUD endpoint as seen by drawers and list pages.
#[async_trait::async_trait]
pub trait CrudApi: Send + Sync {
    async fn list(&self, resource: Resource, params: &ListParams) -> Result<ListResult<Value>, ServiceError>;

    async fn get(&self, resource: Resource, id: &str) -> Result<Value, ServiceError>;

    /// Create a record. Returns the stored record as echoed by the server.
    async fn create(&self, resource: Resource, payload: &Map<String, Value>) -> Result<Value, ServiceError>;

    /// Patch a record. The server may echo the full record, a partial one,
    /// or nothing (`Value::Null`).
    async fn update(
        &self,
        resource: Resource,
        id: &str,
        payload: &Map<String, Value>,
    ) -> Result<Value, ServiceError>;

    async fn delete(&self, resource: Resource, id: &str) -> Result<(), ServiceError>;

    /// Hierarchy snapshot for a leaf tier (`"tenant"` or `"vendor"`),
    /// either a nested tree or per-parent maps.
    async fn hierarchy(&self, leaf: &str) -> Result<Value, ServiceError>;
}

// ── TokenSource ─────────────────────────────────────────────────────

/// Pluggable token provider. Called before every API request.
///
/// Returns `Ok(None)` to skip the Authorization header (anonymous).
#[async_trait::async_trait]
pub trait TokenSource: Send + Sync + 'static {
    async fn token(&self) -> Result<Option<String>, ServiceError>;
}

/// No authentication; requests go out anonymous.
pub struct NoAuth;

#[async_trait::async_trait]
impl TokenSource for NoAuth {
    async fn token(&self) -> Result<Option<String>, ServiceError> {
        Ok(None)
    }
}

/// Static bearer token (already obtained externally).
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

#[async_trait::async_trait]
impl TokenSource for StaticToken {
    async fn token(&self) -> Result<Option<String>, ServiceError> {
        if self.0.is_empty() {
            return Ok(None);
        }
        Ok(Some(self.0.clone()))
    }
}

// ── ResourceClient ──────────────────────────────────────────────────

/// HTTP implementation of [`CrudApi`].
///
/// Paths: `{base_url}/leasing/{resource}` and `{base_url}/leasing/{resource}/{id}`;
/// hierarchies at `{base_url}/leasing/hierarchy/{leaf}`.
pub struct ResourceClient {
    http: reqwest::Client,
    base_url: String,
    token_source: Arc<dyn TokenSource>,
}

impl ResourceClient {
    pub fn new(base_url: impl Into<String>, token_source: Arc<dyn TokenSource>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token_source,
        }
    }

    fn collection_url(&self, resource: Resource) -> String {
        format!("{}/{}/{}", self.base_url, Resource::MODULE, resource.path())
    }

    /// Collection URL plus `id` as one percent-encoded path segment.
    fn item_url(&self, resource: Resource, id: &str) -> Result<reqwest::Url, ServiceError> {
        let mut url = reqwest::Url::parse(&self.collection_url(resource))
            .map_err(|e| ServiceError::Internal(format!("server url {}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| ServiceError::Internal(format!("server url {} cannot hold a path", self.base_url)))?
            .push(id);
        Ok(url)
    }

    fn hierarchy_url(&self, leaf: &str) -> String {
        format!("{}/{}/hierarchy/{}", self.base_url, Resource::MODULE, leaf)
    }

    /// Attach the auth header, send, and map transport failures.
    async fn send(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::Response, ServiceError> {
        let builder = match self.token_source.token().await? {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        };
        builder
            .send()
            .await
            .map_err(|e| ServiceError::Network(e.to_string()))
    }

    /// Parse an API response, mapping HTTP errors to `ServiceError`.
    /// An empty success body reads as `Value::Null`.
    async fn parse(resp: reqwest::Response) -> Result<Value, ServiceError> {
        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| ServiceError::Network(e.to_string()))?;
        if !status.is_success() {
            let body: ErrorBody = serde_json::from_str(&text).unwrap_or_else(|_| ErrorBody {
                message: text.trim().to_string(),
                ..ErrorBody::default()
            });
            return Err(ServiceError::from_status(status.as_u16(), body));
        }
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text)
            .map_err(|e| ServiceError::Internal(format!("response body: {}", e)))
    }
}

#[async_trait::async_trait]
impl CrudApi for ResourceClient {
    async fn list(&self, resource: Resource, params: &ListParams) -> Result<ListResult<Value>, ServiceError> {
        let url = self.collection_url(resource);
        debug!(%url, "GET");
        let resp = self.send(self.http.get(&url).query(params)).await?;
        let body = Self::parse(resp).await?;
        serde_json::from_value(body)
            .map_err(|e| ServiceError::Internal(format!("list response: {}", e)))
    }

    async fn get(&self, resource: Resource, id: &str) -> Result<Value, ServiceError> {
        let url = self.item_url(resource, id)?;
        debug!(%url, "GET");
        let resp = self.send(self.http.get(url)).await?;
        Self::parse(resp).await
    }

    async fn create(&self, resource: Resource, payload: &Map<String, Value>) -> Result<Value, ServiceError> {
        let url = self.collection_url(resource);
        debug!(%url, "POST");
        let resp = self.send(self.http.post(&url).json(payload)).await?;
        Self::parse(resp).await
    }

    async fn update(
        &self,
        resource: Resource,
        id: &str,
        payload: &Map<String, Value>,
    ) -> Result<Value, ServiceError> {
        let url = self.item_url(resource, id)?;
        debug!(%url, "PATCH");
        let resp = self.send(self.http.patch(url).json(payload)).await?;
        Self::parse(resp).await
    }

    async fn delete(&self, resource: Resource, id: &str) -> Result<(), ServiceError> {
        let url = self.item_url(resource, id)?;
        debug!(%url, "DELETE");
        let resp = self.send(self.http.delete(url)).await?;
        Self::parse(resp).await.map(|_| ())
    }

    async fn hierarchy(&self, leaf: &str) -> Result<Value, ServiceError> {
        let url = self.hierarchy_url(leaf);
        debug!(%url, "GET");
        let resp = self.send(self.http.get(&url)).await?;
        Self::parse(resp).await
    }
}
