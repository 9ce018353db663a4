use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

/// Per-call settings: gRPC metadata and an optional deadline.
///
/// It deserializes from configuration such as
///
/// ```json
/// { "headers": { "authorization": "Bearer abc" }, "timeout_ms": 1500 }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CallOptions {
    headers: BTreeMap<String, String>,
    timeout_ms: Option<u64>,
}

impl CallOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a metadata entry, replacing any previous value for the same key.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn with_headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.headers
            .extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Sets the call deadline, with millisecond precision.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}
