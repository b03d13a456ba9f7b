//! Bulk create-or-update over an [`EntityStore`].
//!
//! Each input element dispatches on the presence of an `id` field: present
//! means `update`, absent means `create`, never both. An update answered
//! with "not found" is recorded as a failure - the engine never falls back
//! from update to create, so stale ids surface instead of silently forking
//! new entities.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    Result,
    entity::{EntityStore, entity_id},
};

/// What the engine did with one input element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UpsertAction {
    Created,
    Updated,
    Failed,
}

/// Per-element result, in input order.
#[derive(Clone, Debug, Serialize)]
pub struct UpsertOutcome {
    /// Index of the originating element in the input array.
    pub index: usize,
    pub action: UpsertAction,
    /// The stored entity as returned by the remote, on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Creates or updates every entity in `entities`, in input order.
///
/// With `abort_on_error = false` every element is attempted and the returned
/// list has one [`UpsertOutcome`] per element, failures included. With
/// `abort_on_error = true` the first failure is returned as a hard error;
/// elements already stored are not rolled back.
pub async fn upsert_entities<S: EntityStore>(
    store: &S,
    entities: Vec<Value>,
    abort_on_error: bool,
) -> Result<Vec<UpsertOutcome>> {
    let mut outcomes = Vec::with_capacity(entities.len());
    for (index, entity) in entities.into_iter().enumerate() {
        let (action, result) = match entity_id(&entity) {
            Some(id) => (UpsertAction::Updated, store.update(id, &entity).await),
            None => (UpsertAction::Created, store.create(&entity).await),
        };
        match result {
            Ok(stored) => {
                debug!(index, ?action, "stored entity");
                outcomes.push(UpsertOutcome {
                    index,
                    action,
                    entity: Some(stored),
                    error: None,
                });
            }
            Err(err) if abort_on_error => {
                warn!(index, %err, "aborting bulk store");
                return Err(err);
            }
            Err(err) => {
                warn!(index, %err, "recording failed element");
                outcomes.push(UpsertOutcome {
                    index,
                    action: UpsertAction::Failed,
                    entity: None,
                    error: Some(err.to_string()),
                });
            }
        }
    }
    Ok(outcomes)
}
