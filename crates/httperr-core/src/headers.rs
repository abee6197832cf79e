use std::sync::OnceLock;

use http::header::{self, HeaderMap, HeaderName, HeaderValue};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Auxiliary headers carried alongside an error
///
/// Plain string pairs in insertion order. Names are not validated here;
/// [`Headers::to_header_map`] filters out anything that cannot or must not
/// be sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Headers(IndexMap<String, String>);

impl Headers {
    /// Create an empty header mapping
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a header, replacing any previous value under the same name
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(name.into(), value.into())
    }

    /// Look up a header value by exact name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Iterate over `(name, value)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of headers
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no headers are set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Convert into an HTTP header map suitable for a response
    ///
    /// Headers whose name or value is not valid HTTP, headers on the deny
    /// list, and headers named in `redact` are skipped.
    #[must_use]
    pub fn to_header_map(&self, redact: &[HeaderName]) -> HeaderMap {
        let mut result = HeaderMap::with_capacity(self.0.len());

        for (name, value) in &self.0 {
            let Ok(header_name) = HeaderName::try_from(name.as_str()) else {
                tracing::warn!(header = %name, "skipping error header with invalid name");
                continue;
            };

            if is_header_denied(&header_name) || redact.contains(&header_name) {
                continue;
            }

            let Ok(header_value) = HeaderValue::try_from(value.as_str()) else {
                tracing::warn!(header = %name, "skipping error header with invalid value");
                continue;
            };

            result.insert(header_name, header_value);
        }

        result
    }
}

impl<K, V> FromIterator<(K, V)> for Headers
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Headers an error must never set on a response
///
/// Framing and connection management belong to the server, not to the
/// error being rendered.
static DENY_LIST: OnceLock<[HeaderName; 11]> = OnceLock::new();

/// Get the header deny list
#[must_use]
pub fn get_deny_list() -> &'static [HeaderName] {
    DENY_LIST.get_or_init(|| {
        [
            header::CONTENT_LENGTH,
            header::CONTENT_TYPE,
            header::CONTENT_ENCODING,
            header::CONNECTION,
            HeaderName::from_static("keep-alive"),
            header::PROXY_AUTHENTICATE,
            header::TE,
            header::TRAILER,
            header::TRANSFER_ENCODING,
            header::UPGRADE,
            header::HOST,
        ]
    })
}

/// Check if a header name is in the deny list
#[must_use]
pub fn is_header_denied(name: &HeaderName) -> bool {
    get_deny_list().contains(name)
}
