//! Name-or-id resolution.
//!
//! Entities are addressable by opaque id everywhere, but users want to type
//! names. Commands that accept either form resolve their target here before
//! issuing the mutating call.

use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::{Result, entity::EntityStore};

/// Parses a token as an entity identifier: the 36-character canonical
/// hyphenated UUID form only.
pub fn parse_entity_id(token: &str) -> Option<Uuid> {
    if token.len() != 36 {
        return None;
    }
    Uuid::try_parse(token).ok()
}

/// Resolves a user-supplied token (name or identifier) to the entity JSON.
///
/// The name lookup is authoritative when it succeeds. Only a 404 triggers
/// the id fallback: search and direct-get are complementary address spaces,
/// and any other failure (401, 500, ...) must not be masked by a confusing
/// UUID-parse error. A token that 404s on name search and does not parse as
/// an id propagates the original 404.
pub async fn resolve_name_or_id<S: EntityStore>(store: &S, token: &str) -> Result<Value> {
    match store.search_by_name(token).await {
        Ok(found) => Ok(found),
        Err(err) if err.is_not_found() => match parse_entity_id(token) {
            Some(id) => {
                debug!("name lookup for {token:?} returned 404, trying id");
                store.get(&id.to_string()).await
            }
            None => Err(err),
        },
        Err(err) => Err(err),
    }
}
