//! Typed request descriptions

use std::collections::BTreeMap;

use reqwest::Method;
use rulesync_common::RetryPolicy;
use serde::Serialize;

use super::errors::ApiError;

/// Query parameters, emitted in key order
pub type QueryParams = BTreeMap<String, String>;

/// One API call: method, path relative to the base URL, query, JSON body and
/// retry policy.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    pub method: Method,
    pub path: String,
    pub query: QueryParams,
    pub body: Option<Vec<u8>>,
    pub retry: RetryPolicy,
}

impl RequestSpec {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: QueryParams::new(),
            body: None,
            retry: RetryPolicy::none(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.insert(key.into(), value.to_string());
        self
    }

    /// Serialize `body` as the JSON payload.
    ///
    /// # Errors
    /// [`ApiError::Serialization`] when the value cannot be encoded.
    pub fn json_body<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ApiError> {
        let bytes =
            serde_json::to_vec(body).map_err(|err| ApiError::Serialization(err.to_string()))?;
        self.body = Some(bytes);
        Ok(self)
    }

    pub fn retry(mut self, policy: RetryPolicy) -> Self {
        self.retry = policy;
        self
    }
}
