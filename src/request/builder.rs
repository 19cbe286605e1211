//! Request builder
//!
//! Interprets an [`OperationDescriptor`] against a parameter bag and a
//! credential. Building is a pure function of its inputs: maps are ordered,
//! so identical inputs serialize to identical bytes.

use crate::auth::ApiKeyCredential;
use crate::catalog::OperationDescriptor;
use crate::params::ParameterBag;
use crate::types::{JsonObject, JsonValue, Method, QueryMap, DEFAULT_BASE_URL};
use serde::Serialize;
use std::collections::BTreeMap;

/// A fully formed HTTP request, ready for a transport
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiRequest {
    pub method: Method,
    /// Absolute URL without query string
    pub url: String,
    pub headers: BTreeMap<String, String>,
    /// JSON body; always carries `api_key`
    pub body: JsonObject,
    /// Query string parameters (only `page` on continuation fetches)
    pub query: QueryMap,
}

impl ApiRequest {
    /// Body as a JSON value
    pub fn body_json(&self) -> JsonValue {
        JsonValue::Object(self.body.clone())
    }

    /// Serialize the body to bytes
    pub fn body_bytes(&self) -> Vec<u8> {
        // Serializing a map of JSON values cannot fail
        serde_json::to_vec(&self.body).unwrap_or_default()
    }

    /// Add or replace query parameters
    #[must_use]
    pub fn with_query(mut self, query: &QueryMap) -> Self {
        self.query
            .extend(query.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }
}

/// Builds [`ApiRequest`]s from descriptors
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    base_url: String,
    headers: BTreeMap<String, String>,
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl RequestBuilder {
    /// Create a builder for the given base URL with the JSON headers
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("Accept".to_string(), "application/json".to_string());
        headers.insert("Content-Type".to_string(), "application/json".to_string());

        Self {
            base_url: base_url.into(),
            headers,
        }
    }

    /// Base URL requests are built against
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Static headers sent with every request
    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// Build a request
    ///
    /// Absent (or null) parameters are omitted from the body entirely.
    /// `query` is merged into the request's query string.
    pub fn build(
        &self,
        descriptor: &OperationDescriptor,
        params: &ParameterBag,
        credential: &ApiKeyCredential,
        query: Option<&QueryMap>,
    ) -> ApiRequest {
        let mut body = JsonObject::new();
        credential.apply(&mut body);

        for mapping in &descriptor.fields {
            if let Some(value) = params.present(&mapping.param) {
                body.insert(mapping.body_key.clone(), mapping.render(value));
            }
        }

        ApiRequest {
            method: descriptor.method,
            url: self.build_url(&descriptor.path),
            headers: self.headers.clone(),
            body,
            query: query.cloned().unwrap_or_default(),
        }
    }

    /// Build a bare request for a path (used by the credential check)
    pub fn build_path(&self, path: &str, credential: &ApiKeyCredential) -> ApiRequest {
        let mut body = JsonObject::new();
        credential.apply(&mut body);

        ApiRequest {
            method: Method::POST,
            url: self.build_url(path),
            headers: self.headers.clone(),
            body,
            query: QueryMap::new(),
        }
    }

    /// Build full URL from path
    fn build_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }

        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }
}
