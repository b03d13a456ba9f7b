//! Top-level client handing out per-kind and per-product handles.

use std::{collections::BTreeMap, sync::Arc, time::Duration};

use snafu::prelude::*;

use crate::{
    Result,
    backup::BackupClient,
    buckets::BucketClient,
    entity::{EntityClient, EntityKind},
    error::HttpSnafu,
    http_client::HttpClient,
    product::{BUNDLE_PRODUCTS, Product},
};

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for a [`FlowgateClient`].
///
/// Each product has its own base URL; a product with no URL is simply not
/// configured, and operations addressing it fail with a validation error
/// (export/import skip it). The API key is shared across products.
#[derive(Clone, Debug, Default)]
pub struct ClientConfig {
    /// API key sent with every request, if set.
    pub api_key: Option<String>,

    /// Base URL of the core product (credentials, secrets, servers, buckets).
    pub core_url: Option<String>,

    /// Base URL of the ingestion product (seeds).
    pub ingestion_url: Option<String>,

    /// Base URL of the queryflow product (labels).
    pub queryflow_url: Option<String>,

    /// Base URL of the staging product.
    pub staging_url: Option<String>,
}

impl ClientConfig {
    fn product_urls(&self) -> Vec<(Product, &str)> {
        [
            (Product::Core, &self.core_url),
            (Product::Ingestion, &self.ingestion_url),
            (Product::QueryFlow, &self.queryflow_url),
            (Product::Staging, &self.staging_url),
        ]
        .into_iter()
        .filter_map(|(product, url)| url.as_deref().map(|url| (product, url)))
        .collect()
    }
}

/// Client for the Flowgate service suite.
#[derive(Clone, Debug)]
pub struct FlowgateClient {
    http: BTreeMap<Product, Arc<HttpClient>>,
}

impl FlowgateClient {
    /// Builds a client from connection settings.
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .context(HttpSnafu {
                method: "client-init",
                url: "",
            })?;
        let http = config
            .product_urls()
            .into_iter()
            .map(|(product, url)| {
                (
                    product,
                    Arc::new(HttpClient::new(client.clone(), url, config.api_key.clone())),
                )
            })
            .collect();
        Ok(Self { http })
    }

    /// Products with a configured base URL.
    pub fn configured_products(&self) -> Vec<Product> {
        self.http.keys().copied().collect()
    }

    fn product(&self, product: Product) -> Result<&Arc<HttpClient>> {
        self.http
            .get(&product)
            .ok_or_else(|| crate::error::FlowgateError::Validation {
                message: format!("product {product} is not configured"),
            })
    }

    /// Entity client for one kind, bound to the product hosting it.
    pub fn entities(&self, kind: EntityKind) -> Result<EntityClient> {
        let http = self.product(kind.product())?;
        Ok(EntityClient::new(http.clone(), kind))
    }

    /// Bucket controller (core product).
    pub fn buckets(&self) -> Result<BucketClient> {
        let http = self.product(Product::Core)?;
        Ok(BucketClient::new(http.clone()))
    }

    /// Backup/restore endpoint for one product.
    pub fn backup(&self, product: Product) -> Result<BackupClient> {
        let http = self.product(product)?;
        Ok(BackupClient::new(http.clone(), product))
    }

    /// Backup/restore endpoints for every configured bundle product, in
    /// bundle order. Products without a URL are skipped, which is what makes
    /// partial export a normal condition rather than a failure.
    pub fn backup_clients(&self) -> Vec<(Product, BackupClient)> {
        BUNDLE_PRODUCTS
            .iter()
            .filter_map(|product| {
                self.http
                    .get(product)
                    .map(|http| (*product, BackupClient::new(http.clone(), *product)))
            })
            .collect()
    }
}
