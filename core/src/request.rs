//! Per-call request description: verb, relative path, JSON body, query.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::error::{ApiError, Result};
use crate::http::HttpMethod;

/// Query parameters, kept sorted by key so the encoded query string is stable.
///
/// Values are JSON scalars: strings are sent verbatim, numbers and booleans
/// are stringified, lists of scalars are joined with `,` and nulls are
/// dropped. Objects cannot be expressed and are rejected when the request is
/// built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query(BTreeMap<String, Value>);

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Flatten into `(key, value)` string pairs in key order.
    pub fn pairs(&self) -> Result<Vec<(String, String)>> {
        let mut pairs = Vec::with_capacity(self.0.len());
        for (key, value) in &self.0 {
            if let Some(flat) = flatten(key, value)? {
                pairs.push((key.clone(), flat));
            }
        }
        Ok(pairs)
    }
}

fn flatten(key: &str, value: &Value) -> Result<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::Array(items) => {
            let mut parts = Vec::with_capacity(items.len());
            for item in items {
                match scalar(item) {
                    Some(part) => parts.push(part),
                    None if item.is_null() => {}
                    None => return Err(ApiError::InvalidQueryParam { key: key.to_string() }),
                }
            }
            Ok(Some(parts.join(",")))
        }
        other => scalar(other)
            .map(Some)
            .ok_or_else(|| ApiError::InvalidQueryParam { key: key.to_string() }),
    }
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

impl<K, V> FromIterator<(K, V)> for Query
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Query
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

/// One call against the API, before configuration is applied.
///
/// `body` is any JSON value and is sent unmodified; `Value::Null`, `{}` and
/// `[]` count as "no body".
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    pub verb: HttpMethod,
    pub path: String,
    pub body: Value,
    pub query: Query,
}

impl RequestDescriptor {
    pub fn new(verb: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            verb,
            path: path.into(),
            body: Value::Null,
            query: Query::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, path)
    }

    pub fn query(mut self, query: Query) -> Self {
        self.query = query;
        self
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = body;
        self
    }

    /// Serialize any payload into the body.
    pub fn json<B: Serialize + ?Sized>(self, body: &B) -> Result<Self> {
        Ok(self.body(serde_json::to_value(body)?))
    }

    /// True when a JSON body should go over the wire.
    pub fn has_body(&self) -> bool {
        if !self.verb.has_body() {
            return false;
        }
        match &self.body {
            Value::Null => false,
            Value::Object(map) => !map.is_empty(),
            Value::Array(items) => !items.is_empty(),
            _ => true,
        }
    }
}
