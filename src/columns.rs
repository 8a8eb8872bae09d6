//! Column visibility model.
//!
//! One toggleable mapping drives both which table cells render and which
//! fields an export includes, so the two can never diverge.

use std::collections::BTreeMap;

use crate::schema::ColumnSpec;

#[derive(Debug, Clone)]
pub struct ColumnVisibility {
    columns: Vec<ColumnSpec>,
    visible: BTreeMap<String, bool>,
}

impl ColumnVisibility {
    /// Seed from a column list with every column visible.
    pub fn new(columns: &[ColumnSpec]) -> Self {
        let visible = columns.iter().map(|c| (c.key.clone(), true)).collect();
        Self {
            columns: columns.to_vec(),
            visible,
        }
    }

    /// Flip one column. Keys are never removed, only flipped; toggling an
    /// unknown key is a no-op.
    pub fn toggle(&mut self, key: &str) {
        if let Some(flag) = self.visible.get_mut(key) {
            *flag = !*flag;
        }
    }

    pub fn is_visible(&self, key: &str) -> bool {
        self.visible.get(key).copied().unwrap_or(false)
    }

    /// All columns in declaration order, hidden ones included.
    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    /// Visible columns in declaration order.
    pub fn visible_columns(&self) -> impl Iterator<Item = &ColumnSpec> {
        self.columns.iter().filter(|c| self.is_visible(&c.key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> ColumnVisibility {
        ColumnVisibility::new(&[
            ColumnSpec::new("title", "Title"),
            ColumnSpec::new("owner", "Owner"),
            ColumnSpec::new("status", "Status"),
        ])
    }

    #[test]
    fn test_seeded_all_visible() {
        let model = model();
        assert!(model.is_visible("title"));
        assert!(model.is_visible("owner"));
        assert!(model.is_visible("status"));
        assert_eq!(model.visible_columns().count(), 3);
    }

    #[test]
    fn test_toggle_hides_and_double_toggle_restores() {
        let mut model = model();
        model.toggle("owner");
        assert!(!model.is_visible("owner"));
        assert_eq!(model.visible_columns().count(), 2);

        model.toggle("owner");
        assert!(model.is_visible("owner"));
        assert_eq!(model.visible_columns().count(), 3);
    }

    #[test]
    fn test_toggle_unknown_key_is_noop() {
        let mut model = model();
        model.toggle("nope");
        assert!(!model.is_visible("nope"));
        assert_eq!(model.visible_columns().count(), 3);
    }

    #[test]
    fn test_visible_columns_preserve_declaration_order() {
        let mut model = model();
        model.toggle("owner");
        let keys: Vec<&str> = model.visible_columns().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["title", "status"]);
    }
}
