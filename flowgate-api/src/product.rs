//! Product identifiers for the Flowgate service suite.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// One of the remote services addressed by this client.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash,
    Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Product {
    Core,
    Ingestion,
    QueryFlow,
    Staging,
}

/// Products that participate in export/import bundles.
/// Staging is addressable but never bundled.
pub const BUNDLE_PRODUCTS: [Product; 3] = [Product::Core, Product::Ingestion, Product::QueryFlow];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_token_round_trip() {
        assert_eq!(Product::QueryFlow.to_string(), "queryflow");
        assert_eq!("queryflow".parse::<Product>().unwrap(), Product::QueryFlow);
        assert_eq!("core".parse::<Product>().unwrap(), Product::Core);
        assert!("metrics".parse::<Product>().is_err());
    }

    #[test]
    fn staging_is_not_a_bundle_product() {
        assert!(!BUNDLE_PRODUCTS.contains(&Product::Staging));
    }
}
