mod common;

use std::{collections::BTreeMap, sync::Mutex};

use bytes::Bytes;
use common::api_error;
use flowgate::prelude::*;
use serde_json::{Value, json};

/// In-memory backup endpoint for one product.
struct FakeBackup {
    payload: Bytes,
    fail_export: bool,
    fail_import: bool,
    imports: Mutex<Vec<(OnConflict, Bytes)>>,
}

impl FakeBackup {
    fn new(payload: &'static [u8]) -> Self {
        Self {
            payload: Bytes::from_static(payload),
            fail_export: false,
            fail_import: false,
            imports: Mutex::new(Vec::new()),
        }
    }

    fn failing_export(mut self) -> Self {
        self.fail_export = true;
        self
    }

    fn failing_import(mut self) -> Self {
        self.fail_import = true;
        self
    }
}

impl BackupEndpoint for FakeBackup {
    async fn export(&self) -> Result<ExportArchive, FlowgateError> {
        if self.fail_export {
            return Err(api_error(503, "product unreachable"));
        }
        Ok(ExportArchive {
            filename: "export.zip".to_string(),
            bytes: self.payload.clone(),
        })
    }

    async fn import(&self, on_conflict: OnConflict, archive: Bytes) -> Result<Value, FlowgateError> {
        self.imports
            .lock()
            .unwrap()
            .push((on_conflict, archive));
        if self.fail_import {
            return Err(api_error(500, "archive rejected"));
        }
        Ok(json!({"successful": 2, "failed": 0}))
    }
}

#[tokio::test]
async fn export_tolerates_one_failing_product() {
    let products = vec![
        (Product::Core, FakeBackup::new(b"core-payload")),
        (
            Product::Ingestion,
            FakeBackup::new(b"ingestion-payload").failing_export(),
        ),
        (Product::QueryFlow, FakeBackup::new(b"queryflow-payload")),
    ];

    let outcome = export_products(&products).await;

    // the two healthy products contribute entries, named {product}-{filename}
    assert_eq!(outcome.entries.len(), 2);
    assert_eq!(outcome.entries[0].0, "core-export.zip");
    assert_eq!(outcome.entries[1].0, "queryflow-export.zip");

    assert_eq!(outcome.results["core"], json!({"acknowledged": true}));
    assert_eq!(outcome.results["queryflow"], json!({"acknowledged": true}));
    assert!(
        outcome.results["ingestion"]["error"]
            .as_str()
            .unwrap()
            .contains("503")
    );
}

#[tokio::test]
async fn round_trip_dispatches_bytes_unchanged() {
    let exporter = vec![(Product::Core, FakeBackup::new(b"core-payload"))];
    let outcome = export_products(&exporter).await;
    let (entry_name, entry_bytes) = outcome.entries.into_iter().next().unwrap();

    let mut endpoints = BTreeMap::new();
    endpoints.insert(Product::Core, FakeBackup::new(b""));
    let results = import_entries(
        &endpoints,
        vec![ProductArchive {
            product: Product::Core,
            name: entry_name,
            bytes: entry_bytes,
        }],
        OnConflict::Update,
    )
    .await;

    assert_eq!(results["core"], json!({"successful": 2, "failed": 0}));
    let imports = endpoints[&Product::Core].imports.lock().unwrap().clone();
    assert_eq!(imports.len(), 1);
    assert_eq!(imports[0].0, OnConflict::Update);
    assert_eq!(imports[0].1, Bytes::from_static(b"core-payload"));
}

#[tokio::test]
async fn import_aggregates_per_product_failures() {
    let mut endpoints = BTreeMap::new();
    endpoints.insert(Product::Core, FakeBackup::new(b""));
    endpoints.insert(Product::Ingestion, FakeBackup::new(b"").failing_import());

    let entries = vec![
        ProductArchive {
            product: Product::Core,
            name: "core-export.zip".to_string(),
            bytes: Bytes::from_static(b"a"),
        },
        ProductArchive {
            product: Product::Ingestion,
            name: "ingestion-export.zip".to_string(),
            bytes: Bytes::from_static(b"b"),
        },
    ];
    let results = import_entries(&endpoints, entries, OnConflict::Fail).await;

    assert_eq!(results["core"]["successful"], 2);
    assert!(results["ingestion"]["error"].as_str().unwrap().contains("500"));
}

#[tokio::test]
async fn import_records_unconfigured_product_as_error() {
    let mut endpoints = BTreeMap::new();
    endpoints.insert(Product::Core, FakeBackup::new(b""));

    let entries = vec![ProductArchive {
        product: Product::QueryFlow,
        name: "queryflow-export.zip".to_string(),
        bytes: Bytes::from_static(b"x"),
    }];
    let results = import_entries(&endpoints, entries, OnConflict::Fail).await;

    assert!(
        results["queryflow"]["error"]
            .as_str()
            .unwrap()
            .contains("not configured")
    );
    // nothing was dispatched
    assert!(endpoints[&Product::Core].imports.lock().unwrap().is_empty());
}
