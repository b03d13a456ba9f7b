//! Errors returned by `FlowgateClient`
//!
use snafu::prelude::*;

/// Errors returned by the flowgate crate
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum FlowgateError {
    // Http connection or timeout error
    #[snafu(display("HTTP error {method} url:{url}"))]
    Http {
        method: String,
        url: String,
        source: reqwest::Error,
    },

    /// A product responded with a non-success status.
    /// Carries the HTTP status code and the raw response body.
    #[snafu(display("Api server reported error ({code}) {method} {url}: {message}"))]
    Api {
        code: u16,
        method: String,
        url: String,
        message: String,
    },

    /// Deserialization error. This means we didn't deserialize a server response correctly.
    /// If you see this error, please report it as a bug.
    #[snafu(display("Deserialization: {source}"))]
    Deserialization { source: serde_json::Error },

    /// Serialization error. unlikely to occur. If you see this error, please report it as a bug.
    #[snafu(display("Serialization: {source}"))]
    Serialization { source: serde_json::Error },

    /// Validation error: an internal parameter validation check failed.
    #[snafu(display("Validation error: {message}"))]
    Validation { message: String },

    /// The bucket disappeared between the create conflict and the reconciliation.
    #[snafu(display("Could not get bucket {bucket:?} to update it"))]
    BucketFetch {
        bucket: String,
        #[snafu(source(from(FlowgateError, Box::new)))]
        source: Box<FlowgateError>,
    },

    /// The final state read after reconciling a bucket failed.
    #[snafu(display("Could not get the information of bucket {bucket:?}"))]
    BucketState {
        bucket: String,
        #[snafu(source(from(FlowgateError, Box::new)))]
        source: Box<FlowgateError>,
    },

    /// An index create/replace call failed during bucket reconciliation.
    #[snafu(display("Could not update index {index:?} of bucket {bucket:?}"))]
    IndexUpdate {
        index: String,
        bucket: String,
        #[snafu(source(from(FlowgateError, Box::new)))]
        source: Box<FlowgateError>,
    },

    /// An index delete call failed during bucket reconciliation.
    #[snafu(display("Could not delete index {index:?} of bucket {bucket:?}"))]
    IndexDelete {
        index: String,
        bucket: String,
        #[snafu(source(from(FlowgateError, Box::new)))]
        source: Box<FlowgateError>,
    },

    /// Some other error occurred
    #[snafu(display("{message}"))]
    Other { message: String },
}

impl FlowgateError {
    /// HTTP status code, if this error came back from a product endpoint.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// True for an HTTP 404 response.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// True for an HTTP 409 response.
    pub fn is_conflict(&self) -> bool {
        self.status() == Some(409)
    }

    /// True for an HTTP 401 or 403 response.
    pub fn is_auth(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }
}
