//! # Per-product backup and restore
//!
//! Every bundle product exposes an export endpoint (returning its own
//! archive bytes plus a suggested filename) and an import endpoint (taking
//! archive bytes plus an [`OnConflict`] policy). One product being
//! unreachable is a normal, reportable condition: operators frequently run
//! with only a subset of products configured, so the aggregation here
//! continues past per-product failures and records them in the result map
//! instead of failing the whole operation.

use std::{collections::BTreeMap, sync::Arc};

use bytes::Bytes;
use serde_json::{Value, json};
use strum::{Display, EnumString};
use tracing::{debug, warn};

use crate::{Result, http_client::HttpClient, product::Product};

const EXPORT_PATH: &str = "/api/system/export";
const IMPORT_PATH: &str = "/api/system/import";

/// How a product's import endpoint should treat an entity whose identifier
/// already exists. Forwarded opaquely; never evaluated here.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "UPPERCASE")]
pub enum OnConflict {
    #[default]
    Fail,
    Ignore,
    Update,
}

/// One product's exported archive: raw bytes plus the filename the product
/// suggested for them. The bytes are opaque to this client.
#[derive(Clone, Debug)]
pub struct ExportArchive {
    pub filename: String,
    pub bytes: Bytes,
}

/// One bundle entry addressed to a product, as unpacked from an outer
/// bundle archive.
#[derive(Clone, Debug)]
pub struct ProductArchive {
    pub product: Product,
    pub name: String,
    pub bytes: Bytes,
}

/// Capability interface over one product's backup endpoints.
pub trait BackupEndpoint {
    async fn export(&self) -> Result<ExportArchive>;
    async fn import(&self, on_conflict: OnConflict, archive: Bytes) -> Result<Value>;
}

/// Result of exporting all configured products: the bundle entries to pack
/// (successes only) and the per-product result map that gets printed.
#[derive(Debug, Default)]
pub struct ExportOutcome {
    /// `("{product}-{suggestedFilename}", bytes)` pairs for the outer zip.
    pub entries: Vec<(String, Bytes)>,
    /// Per product name: `{"acknowledged": true}` or `{"error": ...}`.
    pub results: BTreeMap<String, Value>,
}

/// Calls each product's export independently. Failures are recorded, not
/// raised; only successfully exported products contribute a bundle entry.
pub async fn export_products<B: BackupEndpoint>(products: &[(Product, B)]) -> ExportOutcome {
    let mut outcome = ExportOutcome::default();
    for (product, endpoint) in products {
        match endpoint.export().await {
            Ok(archive) => {
                debug!(%product, filename = %archive.filename, bytes = archive.bytes.len(), "exported");
                outcome
                    .entries
                    .push((format!("{product}-{}", archive.filename), archive.bytes));
                outcome
                    .results
                    .insert(product.to_string(), json!({"acknowledged": true}));
            }
            Err(err) => {
                warn!(%product, %err, "export failed, continuing with remaining products");
                outcome
                    .results
                    .insert(product.to_string(), json!({"error": err.to_string()}));
            }
        }
    }
    outcome
}

/// Dispatches each unpacked bundle entry to its owning product's import,
/// forwarding the conflict policy. Per-product failures (including an entry
/// addressed to a product that is not configured) are recorded in the
/// result map; each success records the product's own multi-status result.
pub async fn import_entries<B: BackupEndpoint>(
    endpoints: &BTreeMap<Product, B>,
    entries: Vec<ProductArchive>,
    on_conflict: OnConflict,
) -> BTreeMap<String, Value> {
    let mut results = BTreeMap::new();
    for entry in entries {
        let product = entry.product;
        let Some(endpoint) = endpoints.get(&product) else {
            warn!(%product, entry = %entry.name, "entry for unconfigured product");
            results.insert(
                product.to_string(),
                json!({"error": format!("product {product} is not configured")}),
            );
            continue;
        };
        match endpoint.import(on_conflict, entry.bytes).await {
            Ok(status) => {
                debug!(%product, entry = %entry.name, "imported");
                results.insert(product.to_string(), status);
            }
            Err(err) => {
                warn!(%product, %err, "import failed, continuing with remaining entries");
                results.insert(product.to_string(), json!({"error": err.to_string()}));
            }
        }
    }
    results
}

/// HTTP backup/restore client for one product.
#[derive(Clone, Debug)]
pub struct BackupClient {
    http: Arc<HttpClient>,
    product: Product,
}

impl BackupClient {
    pub(crate) fn new(http: Arc<HttpClient>, product: Product) -> Self {
        Self { http, product }
    }

    pub fn product(&self) -> Product {
        self.product
    }
}

impl BackupEndpoint for BackupClient {
    async fn export(&self) -> Result<ExportArchive> {
        let (bytes, filename) = self.http.get_bytes(EXPORT_PATH).await?;
        Ok(ExportArchive {
            filename: filename.unwrap_or_else(|| format!("{}-export.zip", self.product)),
            bytes,
        })
    }

    async fn import(&self, on_conflict: OnConflict, archive: Bytes) -> Result<Value> {
        self.http
            .post_bytes(
                IMPORT_PATH,
                vec![("on_conflict".to_string(), on_conflict.to_string())],
                archive,
            )
            .await
    }
}
