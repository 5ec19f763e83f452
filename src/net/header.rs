//! Multi-valued header map.
//!
//! Used for response headers (a host may report the same name more than once) and as a helper to
//! build the flat request header map of [`RequestOptions`](crate::net::RequestOptions).
//!
//! Keys are stored exactly as supplied. No canonicalization or validation takes place; browsers
//! report response header names in lowercase, so lookups on responses should use lowercase too.
use http::{HeaderMap, HeaderName, HeaderValue};
use std::collections::HashMap;

use crate::errors::FetchError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Header {
    entries: HashMap<String, Vec<String>>,
}

impl Header {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `value` to the values of `key`.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.entry(key.into()).or_default().push(value.into());
    }

    /// Replaces all values of `key` with `value`.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), vec![value.into()]);
    }

    /// Returns the first value of `key`, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns all values of `key` in insertion order. Empty when the key is absent.
    pub fn values(&self, key: &str) -> &[String] {
        self.entries.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Removes `key` and all its values.
    pub fn del(&mut self, key: &str) {
        self.entries.remove(key);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Converts into an `http::HeaderMap`. Fails on names or values `http` considers invalid.
    pub fn to_header_map(&self) -> Result<HeaderMap, FetchError> {
        let mut map = HeaderMap::new();
        for (key, values) in &self.entries {
            let name = HeaderName::from_bytes(key.as_bytes())
                .map_err(|e| FetchError::Host(format!("invalid header name {key:?}: {e}")))?;
            for value in values {
                let value = HeaderValue::from_str(value)
                    .map_err(|e| FetchError::Host(format!("invalid value for header {key:?}: {e}")))?;
                map.append(name.clone(), value);
            }
        }
        Ok(map)
    }
}

impl FromIterator<(String, String)> for Header {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut header = Header::new();
        for (key, value) in iter {
            header.add(key, value);
        }
        header
    }
}

/// Flattens into the request-side shape. Repeated values are joined with `", "`.
impl From<Header> for HashMap<String, String> {
    fn from(header: Header) -> Self {
        header
            .entries
            .into_iter()
            .map(|(key, values)| (key, values.join(", ")))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_keeps_every_value_and_get_returns_the_first() {
        let mut h = Header::new();
        h.add("set-cookie", "a=1");
        h.add("set-cookie", "b=2");

        assert_eq!(h.get("set-cookie"), Some("a=1"));
        assert_eq!(h.values("set-cookie"), ["a=1".to_string(), "b=2".to_string()]);
        assert_eq!(h.len(), 1);
    }

    #[test]
    fn set_replaces_and_del_removes() {
        let mut h = Header::new();
        h.add("accept", "text/html");
        h.add("accept", "text/plain");
        h.set("accept", "application/json");
        assert_eq!(h.values("accept"), ["application/json".to_string()]);

        h.del("accept");
        assert!(!h.contains("accept"));
        assert!(h.is_empty());
        assert!(h.values("accept").is_empty());
    }

    #[test]
    fn keys_are_case_sensitive_as_supplied() {
        let mut h = Header::new();
        h.set("X-Token", "abc");
        assert_eq!(h.get("X-Token"), Some("abc"));
        assert_eq!(h.get("x-token"), None);
    }

    #[test]
    fn flattening_joins_repeated_values() {
        let mut h = Header::new();
        h.add("accept", "text/html");
        h.add("accept", "text/plain");
        h.set("x-one", "1");

        let flat: HashMap<String, String> = h.into();
        assert_eq!(flat.len(), 2);
        assert_eq!(flat["accept"], "text/html, text/plain");
        assert_eq!(flat["x-one"], "1");
    }

    #[test]
    fn converts_to_http_header_map() {
        let h: Header = vec![
            ("content-type".to_string(), "text/plain".to_string()),
            ("vary".to_string(), "accept".to_string()),
            ("vary".to_string(), "origin".to_string()),
        ]
        .into_iter()
        .collect();

        let map = h.to_header_map().unwrap();
        assert_eq!(map.get("content-type").unwrap(), "text/plain");
        assert_eq!(map.get_all("vary").iter().count(), 2);
    }

    #[test]
    fn invalid_header_name_is_reported() {
        let mut h = Header::new();
        h.set("bad name", "x");
        assert!(matches!(h.to_header_map(), Err(FetchError::Host(_))));
    }
}
