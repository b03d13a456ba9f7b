//! HttpClient middleware used by FlowgateClient
//!
//! Responsible for
//!  - handling all product api requests
//!  - logging/tracing
//!  - mapping http error codes into typed errors

use std::fmt;

use bytes::Bytes;
use reqwest::{
    Method,
    header::{CONTENT_DISPOSITION, CONTENT_TYPE},
};
use serde::{Serialize, de::DeserializeOwned};
use snafu::prelude::*;
use tracing::{error, trace};

use crate::{FLOWGATE_TOKEN_HEADER, Result, prelude::*};

#[derive(Clone, Default)]
pub(crate) struct HttpRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Bytes>,
    pub content_type: Option<&'static str>,
}

impl fmt::Debug for HttpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpRequest")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("query", &self.query)
            .field("body", &self.body.as_ref().map(|b| b.len()).unwrap_or(0))
            .finish()
    }
}

#[derive(Debug, Clone)]
pub(crate) struct HttpClient {
    client: reqwest::Client,

    /// Base URL for one product's API (e.g., "http://localhost:9020")
    base_url: String,

    api_key: Option<String>,
}

impl HttpClient {
    pub fn new(client: reqwest::Client, base_url: &str, api_key: Option<String>) -> Self {
        HttpClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Vec<(String, String)>,
    ) -> Result<T> {
        let req = HttpRequest {
            method: Method::GET,
            path: path.into(),
            query,
            ..Default::default()
        };
        let (body, _) = self.send(req).await?;
        deserialize_json(&body)
    }

    pub(crate) async fn post_json<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let req = HttpRequest {
            method: Method::POST,
            path: path.into(),
            body: Some(Bytes::from(
                serde_json::to_vec(body).context(SerializationSnafu)?,
            )),
            content_type: Some("application/json"),
            ..Default::default()
        };
        let (body, _) = self.send(req).await?;
        deserialize_json(&body)
    }

    pub(crate) async fn put_json<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let req = HttpRequest {
            method: Method::PUT,
            path: path.into(),
            body: Some(Bytes::from(
                serde_json::to_vec(body).context(SerializationSnafu)?,
            )),
            content_type: Some("application/json"),
            ..Default::default()
        };
        let (body, _) = self.send(req).await?;
        deserialize_json(&body)
    }

    pub(crate) async fn delete_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let req = HttpRequest {
            method: Method::DELETE,
            path: path.into(),
            ..Default::default()
        };
        let (body, _) = self.send(req).await?;
        deserialize_json(&body)
    }

    /// Downloads raw bytes, returning the body and the filename suggested by
    /// the Content-Disposition header, if any.
    pub(crate) async fn get_bytes(&self, path: &str) -> Result<(Bytes, Option<String>)> {
        let req = HttpRequest {
            method: Method::GET,
            path: path.into(),
            ..Default::default()
        };
        let (body, disposition) = self.send(req).await?;
        Ok((body, disposition.as_deref().and_then(parse_filename)))
    }

    /// Uploads raw archive bytes and deserializes the JSON response.
    pub(crate) async fn post_bytes<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Vec<(String, String)>,
        bytes: Bytes,
    ) -> Result<T> {
        let req = HttpRequest {
            method: Method::POST,
            path: path.into(),
            query,
            body: Some(bytes),
            content_type: Some("application/zip"),
        };
        let (body, _) = self.send(req).await?;
        deserialize_json(&body)
    }

    /// Sends one request and maps the response:
    /// - transport failures become `FlowgateError::Http`
    /// - non-2xx statuses become `FlowgateError::Api` carrying code and body
    /// - success returns the body bytes plus the Content-Disposition header
    async fn send(&self, req: HttpRequest) -> Result<(Bytes, Option<String>)> {
        let full_url = format!("{}{}", self.base_url, req.path);
        let mut builder = self
            .client
            .request(req.method.clone(), &full_url)
            .query(&req.query);
        if let Some(key) = &self.api_key {
            builder = builder.header(FLOWGATE_TOKEN_HEADER, key);
        }
        if let Some(content_type) = req.content_type {
            builder = builder.header(CONTENT_TYPE, content_type);
        }
        if let Some(body) = req.body.clone() {
            builder = builder.body(body);
        }

        log_request(&req, &full_url);

        let response = builder.send().await.map_err(|e| {
            error!(source=?e, ?req, "http");
            FlowgateError::Http {
                method: req.method.to_string(),
                url: full_url.clone(),
                source: e,
            }
        })?;

        let code = response.status();
        if !code.is_success() {
            let message = response.text().await.unwrap_or_default();
            error!(?code, ?req, message, "http");
            return Err(FlowgateError::Api {
                code: code.as_u16(),
                method: req.method.to_string(),
                url: req.path,
                message,
            });
        }

        let disposition = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await.context(HttpSnafu {
            method: req.method.to_string(),
            url: req.path.clone(),
        })?;
        log_response(&req.path, &body);
        Ok((body, disposition))
    }
}

// dump request, for debugging
// requires RUST_LOG=flowgate::http_json=trace
fn log_request(req: &HttpRequest, url: &str) {
    if tracing::enabled!(target: "flowgate::http_json", tracing::Level::TRACE) {
        let body = req
            .body
            .as_ref()
            .map(|b| String::from_utf8_lossy(b).to_string())
            .unwrap_or_default();
        // don't log headers so we don't leak the api token
        trace!(target: "flowgate::http_json", "{} url={url} body={body}", req.method);
    }
}

// dump json response, for debugging
fn log_response(path: &str, body: &Bytes) {
    if tracing::enabled!(target: "flowgate::http_json", tracing::Level::TRACE) {
        trace!(target: "flowgate::http_json", "Response path={path} body={}",
            String::from_utf8_lossy(body)
        );
    }
}

// deserialize, reporting errors with 'serde_path_to_error', which provides
// detailed json path to the error
fn deserialize_json<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    let mut deserializer = serde_json::Deserializer::from_slice(body);
    match serde_path_to_error::deserialize(&mut deserializer) {
        Ok(value) => Ok(value),
        Err(err) => {
            error!("Deserialization failed at {}: {}", err.path(), err);
            Err(FlowgateError::Deserialization {
                source: err.into_inner(),
            })
        }
    }
}

/// Extract the filename parameter from a Content-Disposition header value,
/// e.g. `attachment; filename="core-export.zip"`.
fn parse_filename(header: &str) -> Option<String> {
    let (_, rest) = header.split_once("filename=")?;
    let name = rest.split(';').next().unwrap_or(rest).trim();
    let name = name.trim_matches('"');
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}
