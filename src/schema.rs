//! Declarative field and column descriptions.
//!
//! A [`FieldSchema`] describes one form input; a [`ColumnSpec`] describes
//! one table column. Both are defined statically per resource, except that
//! select/radio options may be filled in later when they come from another
//! resource's list.

use crate::record::FieldValue;

/// Closed set of form input kinds. Rendering and validation dispatch
/// exhaustively on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Textarea,
    Number,
    Date,
    Select,
    Radio,
    Checkbox,
}

/// One choice in a select or radio field. The stored value is `value`;
/// `label` is display-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Declarative description of one form field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSchema {
    /// Key into the record's field map.
    pub name: String,
    /// Display label.
    pub label: String,
    pub kind: FieldKind,
    /// Ordered options for select/radio kinds; empty otherwise.
    pub options: Vec<SelectOption>,
    /// Fields are required unless explicitly marked optional.
    pub required: bool,
}

impl FieldSchema {
    pub fn new(name: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind,
            options: Vec::new(),
            required: true,
        }
    }

    pub fn text(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::Text)
    }

    pub fn textarea(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::Textarea)
    }

    pub fn number(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::Number)
    }

    pub fn date(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::Date)
    }

    pub fn checkbox(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::Checkbox)
    }

    pub fn select(
        name: impl Into<String>,
        label: impl Into<String>,
        options: Vec<SelectOption>,
    ) -> Self {
        let mut schema = Self::new(name, label, FieldKind::Select);
        schema.options = options;
        schema
    }

    pub fn radio(
        name: impl Into<String>,
        label: impl Into<String>,
        options: Vec<SelectOption>,
    ) -> Self {
        let mut schema = Self::new(name, label, FieldKind::Radio);
        schema.options = options;
        schema
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Replace the option list, e.g. after fetching it from another
    /// resource. Only meaningful for select/radio kinds.
    pub fn set_options(&mut self, options: Vec<SelectOption>) {
        self.options = options;
    }

    /// Value a create dialog seeds this field with.
    pub fn default_value(&self) -> FieldValue {
        match self.kind {
            FieldKind::Checkbox => FieldValue::Bool(false),
            _ => FieldValue::Null,
        }
    }

    /// Resolve a stored option value to its display label.
    pub fn option_label(&self, value: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|o| o.value == value)
            .map(|o| o.label.as_str())
    }

    /// Validate a submitted value against this schema. Returns the error
    /// message, or `None` if the value is acceptable.
    pub fn validate(&self, value: &FieldValue) -> Option<String> {
        if self.required && self.kind != FieldKind::Checkbox && value.is_empty() {
            return Some(format!("{} is required", self.label));
        }
        if value.is_empty() {
            return None;
        }
        match self.kind {
            FieldKind::Number => {
                if !matches!(value, FieldValue::Number(_)) {
                    return Some(format!("{} must be a number", self.label));
                }
            }
            FieldKind::Select | FieldKind::Radio => {
                // An empty option list means options have not loaded yet;
                // membership cannot be checked then.
                if !self.options.is_empty() {
                    let stored = value.display();
                    if self.option_label(&stored).is_none() {
                        return Some(format!("{} has an invalid selection", self.label));
                    }
                }
            }
            _ => {}
        }
        None
    }
}

/// Declarative description of one table column. The key addresses a record
/// field or a derived display value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub key: String,
    pub label: String,
}

impl ColumnSpec {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
        }
    }
}
