//! Per-resource configuration.
//!
//! A [`ResourceConfig`] is the one object a page supplies to get a full
//! list view: the REST path segment, the form field schemas, the table
//! columns, and which fields free-text search looks at. Built through
//! [`ResourceConfigBuilder`] so misconfigurations fail at construction,
//! not at render time.

use crate::error::{Result, TabulaError};
use crate::record::Record;
use crate::schema::{ColumnSpec, FieldSchema, SelectOption};

#[derive(Debug, Clone)]
pub struct ResourceConfig {
    /// REST path segment, e.g. "clients" for `GET /clients`.
    name: String,
    fields: Vec<FieldSchema>,
    columns: Vec<ColumnSpec>,
    searchable: Vec<String>,
}

impl ResourceConfig {
    pub fn builder(name: impl Into<String>) -> ResourceConfigBuilder {
        ResourceConfigBuilder {
            name: name.into(),
            fields: Vec::new(),
            columns: Vec::new(),
            searchable: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn searchable(&self) -> &[String] {
        &self.searchable
    }

    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Replace a field's options after they were fetched asynchronously.
    pub fn set_field_options(&mut self, name: &str, options: Vec<SelectOption>) {
        if let Some(field) = self.fields.iter_mut().find(|f| f.name == name) {
            field.set_options(options);
        }
    }

    /// Derived display value for one table cell or export cell.
    ///
    /// Select and radio values are joined to their option labels; every
    /// other kind renders its plain display form. An absent field renders
    /// as an empty string.
    pub fn display_value(&self, record: &Record, key: &str) -> String {
        let Some(value) = record.get(key) else {
            return String::new();
        };
        let raw = value.display();
        if let Some(schema) = self.field(key)
            && let Some(label) = schema.option_label(&raw)
        {
            return label.to_string();
        }
        raw
    }
}

pub struct ResourceConfigBuilder {
    name: String,
    fields: Vec<FieldSchema>,
    columns: Vec<ColumnSpec>,
    searchable: Vec<String>,
}

impl ResourceConfigBuilder {
    pub fn field(mut self, field: FieldSchema) -> Self {
        self.fields.push(field);
        self
    }

    pub fn column(mut self, key: impl Into<String>, label: impl Into<String>) -> Self {
        self.columns.push(ColumnSpec::new(key, label));
        self
    }

    /// Mark a field as participating in free-text search.
    pub fn searchable(mut self, key: impl Into<String>) -> Self {
        self.searchable.push(key.into());
        self
    }

    pub fn build(self) -> Result<ResourceConfig> {
        if self.name.trim().is_empty() {
            return Err(TabulaError::Config(
                "resource name cannot be empty".to_string(),
            ));
        }
        for (i, field) in self.fields.iter().enumerate() {
            if self.fields[..i].iter().any(|f| f.name == field.name) {
                return Err(TabulaError::Config(format!(
                    "duplicate field '{}'",
                    field.name
                )));
            }
        }
        for key in &self.searchable {
            if !self.fields.iter().any(|f| &f.name == key) {
                return Err(TabulaError::Config(format!(
                    "searchable key '{key}' does not match any field"
                )));
            }
        }
        Ok(ResourceConfig {
            name: self.name,
            fields: self.fields,
            columns: self.columns,
            searchable: self.searchable,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FieldMap;
    use crate::record::FieldValue;

    fn config() -> ResourceConfig {
        ResourceConfig::builder("tasks")
            .field(FieldSchema::text("title", "Title"))
            .field(FieldSchema::select(
                "owner",
                "Owner",
                vec![SelectOption::new("7", "Ada Lovelace")],
            ))
            .column("title", "Title")
            .column("owner", "Owner")
            .searchable("title")
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_rejects_duplicate_fields() {
        let err = ResourceConfig::builder("tasks")
            .field(FieldSchema::text("title", "Title"))
            .field(FieldSchema::text("title", "Title again"))
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("duplicate field"));
    }

    #[test]
    fn test_builder_rejects_unknown_searchable_key() {
        let err = ResourceConfig::builder("tasks")
            .field(FieldSchema::text("title", "Title"))
            .searchable("missing")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("searchable key"));
    }

    #[test]
    fn test_display_value_joins_option_label() {
        let config = config();
        let mut fields = FieldMap::new();
        fields.insert("title".to_string(), FieldValue::text("Ship it"));
        fields.insert("owner".to_string(), FieldValue::text("7"));
        let record = Record::new(1, fields);

        assert_eq!(config.display_value(&record, "title"), "Ship it");
        assert_eq!(config.display_value(&record, "owner"), "Ada Lovelace");
        assert_eq!(config.display_value(&record, "missing"), "");
    }

    #[test]
    fn test_set_field_options_after_fetch() {
        let mut config = ResourceConfig::builder("tasks")
            .field(FieldSchema::select("owner", "Owner", vec![]))
            .build()
            .unwrap();
        config.set_field_options("owner", vec![SelectOption::new("1", "Grace Hopper")]);
        assert_eq!(
            config.field("owner").unwrap().option_label("1"),
            Some("Grace Hopper")
        );
    }
}
