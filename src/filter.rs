//! Filter and search predicate engine.
//!
//! Combines a free-text query with discrete field filters into a single
//! AND-ed predicate over the in-memory collection. Purely client-side and
//! never persisted.

use std::collections::BTreeMap;

use crate::record::{FieldValue, Record};

/// Currently active filter criteria for one list view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    query: String,
    discrete: BTreeMap<String, FieldValue>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn clear_query(&mut self) {
        self.query.clear();
    }

    /// Activate a discrete equality filter on `key`. Setting a null value
    /// deactivates the filter, matching the "unset filter is a no-op"
    /// convention.
    pub fn set_filter(&mut self, key: impl Into<String>, value: FieldValue) {
        let key = key.into();
        if value == FieldValue::Null {
            self.discrete.remove(&key);
        } else {
            self.discrete.insert(key, value);
        }
    }

    pub fn clear_filter(&mut self, key: &str) {
        self.discrete.remove(key);
    }

    pub fn clear(&mut self) {
        self.query.clear();
        self.discrete.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.query.is_empty() && self.discrete.is_empty()
    }

    /// Whether a record satisfies every active criterion.
    ///
    /// Discrete filters require exact equality; an absent field never
    /// matches. Free text is a case-insensitive substring match over the
    /// given searchable fields, treating absent fields as empty strings.
    pub fn matches(&self, record: &Record, searchable: &[String]) -> bool {
        for (key, wanted) in &self.discrete {
            match record.get(key) {
                Some(value) if value == wanted => {}
                _ => return false,
            }
        }

        if self.query.is_empty() {
            return true;
        }
        let needle = self.query.to_lowercase();
        searchable.iter().any(|key| {
            record
                .get(key)
                .map(FieldValue::display)
                .unwrap_or_default()
                .to_lowercase()
                .contains(&needle)
        })
    }

    /// Filter a collection, preserving order.
    pub fn apply<'a>(&self, records: &'a [Record], searchable: &[String]) -> Vec<&'a Record> {
        records
            .iter()
            .filter(|r| self.matches(r, searchable))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FieldMap;

    fn record(id: i64, title: &str, owner: &str) -> Record {
        let mut fields = FieldMap::new();
        fields.insert("title".to_string(), FieldValue::text(title));
        fields.insert("owner".to_string(), FieldValue::text(owner));
        Record::new(id, fields)
    }

    fn searchable() -> Vec<String> {
        vec!["title".to_string()]
    }

    #[test]
    fn test_empty_state_matches_everything() {
        let state = FilterState::new();
        assert!(state.matches(&record(1, "Alpha", "ada"), &searchable()));
    }

    #[test]
    fn test_query_is_case_insensitive_substring() {
        let records = vec![record(1, "Alpha", "ada"), record(2, "Beta", "grace")];
        let mut state = FilterState::new();
        state.set_query("alp");
        let hits = state.apply(&records, &searchable());
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, crate::record::RecordId::Int(1));
    }

    #[test]
    fn test_query_only_searches_configured_fields() {
        let mut state = FilterState::new();
        state.set_query("ada");
        // "ada" appears in owner, which is not searchable here.
        assert!(!state.matches(&record(1, "Alpha", "ada"), &searchable()));
    }

    #[test]
    fn test_discrete_filter_exact_equality() {
        let mut state = FilterState::new();
        state.set_filter("owner", FieldValue::text("ada"));
        assert!(state.matches(&record(1, "Alpha", "ada"), &searchable()));
        assert!(!state.matches(&record(2, "Beta", "grace"), &searchable()));
    }

    #[test]
    fn test_discrete_filter_absent_field_does_not_match() {
        let mut state = FilterState::new();
        state.set_filter("status", FieldValue::text("open"));
        assert!(!state.matches(&record(1, "Alpha", "ada"), &searchable()));
    }

    #[test]
    fn test_query_treats_absent_field_as_empty() {
        let mut state = FilterState::new();
        state.set_query("x");
        let bare = Record::new(1, FieldMap::new());
        assert!(!state.matches(&bare, &searchable()));
    }

    #[test]
    fn test_criteria_combine_with_and() {
        let mut state = FilterState::new();
        state.set_query("alp");
        state.set_filter("owner", FieldValue::text("grace"));
        // Title matches, owner does not.
        assert!(!state.matches(&record(1, "Alpha", "ada"), &searchable()));
    }

    #[test]
    fn test_setting_null_unsets_filter() {
        let mut state = FilterState::new();
        state.set_filter("owner", FieldValue::text("ada"));
        state.set_filter("owner", FieldValue::Null);
        assert!(state.is_empty());
        assert!(state.matches(&record(2, "Beta", "grace"), &searchable()));
    }
}
