/*
 * Flowgate rust api client
 *
 * SPDX-License-Identifier: Apache-2.0
 */
//! # Flowgate Rust API Client
//!
//! Client library for the Flowgate configuration services
//! (core, ingestion, queryflow, staging).
//!
//! ## Features
//!
//! - per-entity clients for credentials, secrets, servers, labels, and seeds,
//!   all sharing one capability interface ([`entity::EntityStore`])
//! - bulk create-or-update with per-element failure reporting ([`upsert`])
//! - name-or-id resolution for every addressable entity ([`resolve`])
//! - bucket index reconciliation ([`buckets`])
//! - per-product export/import with partial-failure tolerance ([`backup`])
//!
//! Entities are opaque JSON documents: the client never interprets their
//! shape beyond the presence of an `id` field. All operations return
//! `serde_json::Value` or a typed [`error::FlowgateError`].

#![allow(clippy::missing_errors_doc)] // pedantic
#![warn(clippy::default_trait_access)]
#![warn(clippy::doc_markdown)]
#![warn(clippy::explicit_iter_loop)]
#![warn(clippy::implicit_clone)]
#![warn(clippy::match_same_arms)]
#![warn(clippy::redundant_clone)]
#![warn(clippy::redundant_closure)]
#![warn(clippy::uninlined_format_args)]
#![warn(clippy::unnecessary_wraps)]
#![warn(clippy::unused_async)]

pub mod backup;
pub mod buckets;
pub mod client;
pub mod entity;
pub mod error;
mod http_client;
pub mod product;
pub mod resolve;
pub mod upsert;

/// Result type alias using `FlowgateError` as the default error.
pub type Result<T, E = crate::error::FlowgateError> = std::result::Result<T, E>;

/// Prelude module - import (nearly) all the things with `use flowgate::prelude::*;`
pub mod prelude {
    // Error types
    pub use crate::error::*;
    pub use crate::{
        // Per-product backup/restore
        backup::{
            BackupClient, BackupEndpoint, ExportArchive, ExportOutcome, OnConflict,
            ProductArchive, export_products, import_entries,
        },
        // Buckets and index reconciliation
        buckets::{
            BucketClient, BucketIndex, BucketSpec, BucketStore, IndexDirection, IndexField,
            apply_bucket, reconcile_indices,
        },
        client::{ClientConfig, FlowgateClient},
        // Entity capability interface
        entity::{EntityClient, EntityKind, EntityStore, entity_id},
        product::{BUNDLE_PRODUCTS, Product},
        resolve::{parse_entity_id, resolve_name_or_id},
        // Bulk create-or-update
        upsert::{UpsertAction, UpsertOutcome, upsert_entities},
    };
}

/// Header carrying the API key on every authenticated request
pub const FLOWGATE_TOKEN_HEADER: &str = "x-flowgate-token";
