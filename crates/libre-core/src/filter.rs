// ── Device list query filter ──
//
// LibreNMS narrows `GET devices` with `type`/`query` parameters, e.g.
// `type=os&query=arubaos` or `type=down`. Later keys overwrite earlier ones.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;

/// Ordered key/value query parameters with last-write-wins semantics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryFilter(IndexMap<String, String>);

/// One entry of a legacy `query_params` list.
///
/// Either a string holding a single-key mapping (`"{'type': 'os'}"`) or the
/// mapping itself when the caller's format allows it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LegacyQueryEntry {
    Text(String),
    Map(IndexMap<String, Value>),
}

impl QueryFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key`, replacing any earlier value. The key keeps its first position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Pairs in query-string order.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        self.0
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Flatten a list of mappings into one filter.
    pub fn flatten<I, M, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        entries.into_iter().flatten().collect()
    }

    /// Flatten legacy `query_params` entries.
    ///
    /// String entries use single quotes (`{'type': 'os'}`); they are turned
    /// into JSON by swapping `'` for `"` before decoding.
    pub fn from_legacy_entries(entries: &[LegacyQueryEntry]) -> Result<Self, CoreError> {
        let mut filter = Self::new();
        for entry in entries {
            let map = match entry {
                LegacyQueryEntry::Map(map) => map.clone(),
                LegacyQueryEntry::Text(text) => decode_legacy_text(text)?,
            };
            for (key, value) in map {
                let value = scalar_to_string(&value).ok_or_else(|| {
                    CoreError::InvalidQueryFilter {
                        entry: key.clone(),
                        reason: "value must be a string, number or boolean".into(),
                    }
                })?;
                filter.insert(key, value);
            }
        }
        Ok(filter)
    }

    /// Parse a `key=value` pair as given on the command line.
    pub fn parse_pair(raw: &str) -> Result<(String, String), CoreError> {
        let (key, value) = raw
            .split_once('=')
            .ok_or_else(|| CoreError::InvalidQueryFilter {
                entry: raw.into(),
                reason: "expected key=value".into(),
            })?;
        let key = key.trim();
        if key.is_empty() {
            return Err(CoreError::InvalidQueryFilter {
                entry: raw.into(),
                reason: "key cannot be empty".into(),
            });
        }
        Ok((key.to_owned(), value.trim().to_owned()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryFilter {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut filter = Self::new();
        filter.extend(iter);
        filter
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for QueryFilter {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

fn decode_legacy_text(text: &str) -> Result<IndexMap<String, Value>, CoreError> {
    let normalized = text.replace('\'', "\"");
    serde_json::from_str(&normalized).map_err(|e| CoreError::InvalidQueryFilter {
        entry: text.into(),
        reason: format!("not a key/value mapping: {e}"),
    })
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn later_duplicate_keys_win() {
        let filter = QueryFilter::flatten(vec![
            vec![("a", "1")],
            vec![("b", "2")],
            vec![("a", "3")],
        ]);
        assert_eq!(filter.len(), 2);
        assert_eq!(filter.get("a"), Some("3"));
        assert_eq!(filter.get("b"), Some("2"));
        assert_eq!(
            filter.to_pairs(),
            vec![
                ("a".to_owned(), "3".to_owned()),
                ("b".to_owned(), "2".to_owned())
            ]
        );
    }

    #[test]
    fn legacy_single_quoted_entries_are_flattened() {
        let entries = vec![
            LegacyQueryEntry::Text("{'type': 'os'}".into()),
            LegacyQueryEntry::Text("{'query': 'arubaos'}".into()),
        ];
        let filter = QueryFilter::from_legacy_entries(&entries).expect("valid entries");
        assert_eq!(filter.get("type"), Some("os"));
        assert_eq!(filter.get("query"), Some("arubaos"));
    }

    #[test]
    fn legacy_entries_accept_mappings_and_scalars() {
        let entries: Vec<LegacyQueryEntry> =
            serde_json::from_str(r#"[{"type": "down"}, "{'query': 3}"]"#).expect("valid json");
        let filter = QueryFilter::from_legacy_entries(&entries).expect("valid entries");
        assert_eq!(filter.get("type"), Some("down"));
        assert_eq!(filter.get("query"), Some("3"));
    }

    #[test]
    fn legacy_entry_that_is_not_a_mapping_is_rejected() {
        let entries = vec![LegacyQueryEntry::Text("type=os".into())];
        let err = QueryFilter::from_legacy_entries(&entries).expect_err("not a mapping");
        assert!(matches!(err, CoreError::InvalidQueryFilter { .. }));
    }

    #[test]
    fn legacy_nested_values_are_rejected() {
        let entries = vec![LegacyQueryEntry::Text("{'type': ['os']}".into())];
        assert!(QueryFilter::from_legacy_entries(&entries).is_err());
    }

    #[test]
    fn parse_pair_splits_on_first_equals() {
        assert_eq!(
            QueryFilter::parse_pair("query=a=b").expect("valid"),
            ("query".into(), "a=b".into())
        );
        assert!(QueryFilter::parse_pair("type").is_err());
        assert!(QueryFilter::parse_pair("=os").is_err());
    }

    #[test]
    fn empty_filter() {
        let filter = QueryFilter::new();
        assert!(filter.is_empty());
        assert!(filter.to_pairs().is_empty());
    }
}
