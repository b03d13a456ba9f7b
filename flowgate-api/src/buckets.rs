//! # Buckets and index reconciliation
//!
//! Buckets are created with a set of index definitions. Creating a bucket
//! that already exists answers HTTP 409, at which point the desired index
//! set is reconciled against the remote one: indices that disappeared from
//! the desired set are deleted, indices that are missing or whose definition
//! changed are (re)created through the single create-index primitive, and
//! unchanged indices produce no call at all.

use std::{collections::BTreeMap, sync::Arc};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use snafu::prelude::*;
use tracing::debug;

use crate::{
    Result,
    error::{
        BucketFetchSnafu, BucketStateSnafu, DeserializationSnafu, IndexDeleteSnafu,
        IndexUpdateSnafu,
    },
    http_client::HttpClient,
};

const BUCKETS_PATH: &str = "/api/buckets";

/// Sort direction of one indexed field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexDirection {
    Asc,
    Desc,
}

/// One field of an index definition. Field order within an index matters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexField {
    pub field: String,
    pub direction: IndexDirection,
}

/// A bucket index definition.
///
/// Two definitions are equal iff name, field sequence (order included), and
/// the unique flag all match exactly; the derived `PartialEq` is the
/// reconciler's change detector.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketIndex {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<IndexField>,
    #[serde(default)]
    pub unique: bool,
}

/// User-supplied bucket definition: creation options plus the desired
/// index set.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BucketSpec {
    pub name: String,
    #[serde(default)]
    pub options: Value,
    #[serde(default)]
    pub indices: Vec<BucketIndex>,
}

/// Capability interface over the bucket endpoints.
pub trait BucketStore {
    async fn create(&self, name: &str, options: &Value) -> Result<Value>;
    async fn get(&self, name: &str) -> Result<Value>;
    async fn delete(&self, name: &str) -> Result<Value>;
    async fn create_index(&self, bucket: &str, index: &BucketIndex) -> Result<Value>;
    async fn delete_index(&self, bucket: &str, index: &str) -> Result<Value>;
}

/// Creates the bucket, or reconciles its indices when it already exists.
///
/// A 409 from create means the bucket is present and must be brought in line
/// with the desired definition instead; any other failure propagates.
pub async fn apply_bucket<S: BucketStore>(store: &S, spec: &BucketSpec) -> Result<Value> {
    match store.create(&spec.name, &spec.options).await {
        Ok(created) => Ok(created),
        Err(err) if err.is_conflict() => {
            debug!(bucket = %spec.name, "bucket exists, reconciling indices");
            reconcile_indices(store, &spec.name, &spec.indices).await
        }
        Err(err) => Err(err),
    }
}

/// Diffs the desired index set against the bucket's current one and issues
/// the minimal delete/create calls, keyed by index name.
///
/// Deletions are issued before creations; the relative order is not part of
/// the remote contract, both just have to complete before the final state
/// read. The first failing call aborts the reconciliation. The returned
/// value is the bucket state re-read after all changes.
pub async fn reconcile_indices<S: BucketStore>(
    store: &S,
    bucket: &str,
    desired: &[BucketIndex],
) -> Result<Value> {
    let state = store
        .get(bucket)
        .await
        .context(BucketFetchSnafu { bucket })?;
    let current = indices_from_state(&state)?;

    let desired_by_name: BTreeMap<&str, &BucketIndex> =
        desired.iter().map(|index| (index.name.as_str(), index)).collect();
    let current_by_name: BTreeMap<&str, &BucketIndex> =
        current.iter().map(|index| (index.name.as_str(), index)).collect();

    for index in &current {
        if !desired_by_name.contains_key(index.name.as_str()) {
            debug!(bucket, index = %index.name, "deleting index");
            store
                .delete_index(bucket, &index.name)
                .await
                .context(IndexDeleteSnafu {
                    index: index.name.clone(),
                    bucket,
                })?;
        }
    }

    for index in desired {
        match current_by_name.get(index.name.as_str()) {
            Some(existing) if **existing == *index => {
                // unchanged, no call
            }
            _ => {
                debug!(bucket, index = %index.name, "creating index");
                store
                    .create_index(bucket, index)
                    .await
                    .context(IndexUpdateSnafu {
                        index: index.name.clone(),
                        bucket,
                    })?;
            }
        }
    }

    store
        .get(bucket)
        .await
        .context(BucketStateSnafu { bucket })
}

/// Pulls the index definitions out of a bucket state document. A state
/// without an `indices` field reads as an empty index set.
fn indices_from_state(state: &Value) -> Result<Vec<BucketIndex>> {
    match state.get("indices") {
        Some(indices) => {
            serde_json::from_value(indices.clone()).context(DeserializationSnafu)
        }
        None => Ok(Vec::new()),
    }
}

/// HTTP bucket controller (core product).
#[derive(Clone, Debug)]
pub struct BucketClient {
    http: Arc<HttpClient>,
}

impl BucketClient {
    pub(crate) fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// Lists buckets, forwarding `max` as the page-size hint.
    pub async fn list(&self, max: Option<usize>) -> Result<Value> {
        let mut params = Vec::new();
        if let Some(max) = max {
            params.push(("limit".to_string(), max.to_string()));
        }
        self.http.get_json(BUCKETS_PATH, params).await
    }
}

impl BucketStore for BucketClient {
    async fn create(&self, name: &str, options: &Value) -> Result<Value> {
        self.http
            .post_json(
                BUCKETS_PATH,
                &serde_json::json!({ "name": name, "options": options }),
            )
            .await
    }

    async fn get(&self, name: &str) -> Result<Value> {
        self.http
            .get_json(&format!("{BUCKETS_PATH}/{name}"), Vec::new())
            .await
    }

    async fn delete(&self, name: &str) -> Result<Value> {
        self.http.delete_json(&format!("{BUCKETS_PATH}/{name}")).await
    }

    async fn create_index(&self, bucket: &str, index: &BucketIndex) -> Result<Value> {
        // create-by-name doubles as replace: there is no separate alter endpoint
        self.http
            .put_json(
                &format!("{BUCKETS_PATH}/{bucket}/indices/{}", index.name),
                index,
            )
            .await
    }

    async fn delete_index(&self, bucket: &str, index: &str) -> Result<Value> {
        self.http
            .delete_json(&format!("{BUCKETS_PATH}/{bucket}/indices/{index}"))
            .await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn index(name: &str, field: &str, direction: IndexDirection, unique: bool) -> BucketIndex {
        BucketIndex {
            name: name.to_string(),
            fields: vec![IndexField {
                field: field.to_string(),
                direction,
            }],
            unique,
        }
    }

    #[test]
    fn index_equality_is_exact() {
        let base = index("by_name", "name", IndexDirection::Asc, false);
        assert_eq!(base, base.clone());
        assert_ne!(base, index("by_name", "name", IndexDirection::Desc, false));
        assert_ne!(base, index("by_name", "name", IndexDirection::Asc, true));
        assert_ne!(base, index("by_name", "title", IndexDirection::Asc, false));

        // field order matters
        let mut two_fields = base.clone();
        two_fields.fields.push(IndexField {
            field: "created".to_string(),
            direction: IndexDirection::Asc,
        });
        let mut reversed = two_fields.clone();
        reversed.fields.reverse();
        assert_ne!(two_fields, reversed);
    }

    #[test]
    fn state_without_indices_reads_as_empty() {
        assert_eq!(indices_from_state(&json!({"name": "events"})).unwrap(), vec![]);
        let parsed = indices_from_state(&json!({
            "name": "events",
            "indices": [{"name": "by_name", "fields": [], "unique": true}]
        }))
        .unwrap();
        assert_eq!(parsed.len(), 1);
        assert!(parsed[0].unique);
    }
}
