//! # Entity clients
//!
//! Configuration entities (credentials, secrets, servers, labels, seeds) are
//! opaque JSON documents manipulated through CRUD-style endpoints. Every
//! entity kind exposes the same narrow capability interface, [`EntityStore`],
//! so the upsert engine and the name-or-id resolver are written once and
//! reused for all kinds.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use flowgate::prelude::*;
//! use serde_json::json;
//!
//! # async fn example(client: &FlowgateClient) -> Result<(), FlowgateError> {
//! let credentials = client.entities(EntityKind::Credential)?;
//!
//! // create (no id field)
//! let created = credentials.create(&json!({"name": "ci-deploy"})).await?;
//!
//! // address by name or id
//! let found = flowgate::resolve::resolve_name_or_id(&credentials, "ci-deploy").await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use serde_json::Value;
use strum::{Display, EnumString};

use crate::{Result, http_client::HttpClient, product::Product};

/// Entity kinds addressable through [`EntityClient`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum EntityKind {
    Credential,
    Secret,
    Server,
    Label,
    Seed,
}

impl EntityKind {
    /// The product hosting this entity kind.
    pub fn product(self) -> Product {
        match self {
            Self::Credential | Self::Secret | Self::Server => Product::Core,
            Self::Seed => Product::Ingestion,
            Self::Label => Product::QueryFlow,
        }
    }

    /// API path prefix for this entity kind.
    pub fn path(self) -> &'static str {
        match self {
            Self::Credential => "/api/credentials",
            Self::Secret => "/api/secrets",
            Self::Server => "/api/servers",
            Self::Label => "/api/labels",
            Self::Seed => "/api/seeds",
        }
    }
}

/// Returns the entity's `id` field, if present and non-empty.
///
/// Identity is decided solely by this predicate: the upsert engine issues
/// `update` iff it returns `Some`, and never generates ids itself.
pub fn entity_id(entity: &Value) -> Option<&str> {
    entity
        .get("id")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
}

/// Capability interface over one entity kind's remote CRUD operations.
///
/// The engines in [`crate::upsert`] and [`crate::resolve`] are generic over
/// this trait; [`EntityClient`] is the HTTP implementation.
pub trait EntityStore {
    /// Creates a new entity from `body`. The remote assigns the id.
    async fn create(&self, body: &Value) -> Result<Value>;

    /// Replaces the entity with identifier `id`.
    async fn update(&self, id: &str, body: &Value) -> Result<Value>;

    /// Fetches one entity by identifier.
    async fn get(&self, id: &str) -> Result<Value>;

    /// Looks up one entity by its human-readable name.
    async fn search_by_name(&self, name: &str) -> Result<Value>;

    /// Deletes one entity by identifier.
    async fn delete(&self, id: &str) -> Result<Value>;
}

/// HTTP client for one entity kind.
#[derive(Clone, Debug)]
pub struct EntityClient {
    http: Arc<HttpClient>,
    kind: EntityKind,
}

impl EntityClient {
    pub(crate) fn new(http: Arc<HttpClient>, kind: EntityKind) -> Self {
        Self { http, kind }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Lists entities, optionally filtered by a text query, with an optional
    /// result-count hint forwarded to the remote.
    pub async fn search(&self, query: Option<&str>, limit: Option<usize>) -> Result<Value> {
        let mut params = Vec::new();
        if let Some(query) = query {
            params.push(("query".to_string(), query.to_string()));
        }
        if let Some(limit) = limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        self.http.get_json(self.kind.path(), params).await
    }

    /// Invokes a lifecycle action endpoint (`ping`, `halt`, `start`) on one
    /// entity. Only servers expose these.
    pub async fn invoke(&self, id: &str, action: &str) -> Result<Value> {
        self.http
            .post_json(
                &format!("{}/{id}/{action}", self.kind.path()),
                &serde_json::json!({}),
            )
            .await
    }
}

impl EntityStore for EntityClient {
    async fn create(&self, body: &Value) -> Result<Value> {
        self.http.post_json(self.kind.path(), body).await
    }

    async fn update(&self, id: &str, body: &Value) -> Result<Value> {
        self.http
            .put_json(&format!("{}/{id}", self.kind.path()), body)
            .await
    }

    async fn get(&self, id: &str) -> Result<Value> {
        self.http
            .get_json(&format!("{}/{id}", self.kind.path()), Vec::new())
            .await
    }

    async fn search_by_name(&self, name: &str) -> Result<Value> {
        self.http
            .get_json(&format!("{}/name/{name}", self.kind.path()), Vec::new())
            .await
    }

    async fn delete(&self, id: &str) -> Result<Value> {
        self.http
            .delete_json(&format!("{}/{id}", self.kind.path()))
            .await
    }
}
