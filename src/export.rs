//! Spreadsheet export of a list projection.
//!
//! Writes the given records as CSV, with column order and inclusion taken
//! from the same [`ColumnVisibility`] the table renders from, so the file
//! and the screen can never disagree about which fields are shown.

use crate::columns::ColumnVisibility;
use crate::error::{Result, TabulaError};
use crate::record::Record;
use crate::resource::ResourceConfig;

pub fn write_csv(
    config: &ResourceConfig,
    columns: &ColumnVisibility,
    records: &[&Record],
) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let header: Vec<&str> = columns
        .visible_columns()
        .map(|c| c.label.as_str())
        .collect();
    writer
        .write_record(&header)
        .map_err(|e| TabulaError::Export(e.to_string()))?;

    for record in records {
        let row: Vec<String> = columns
            .visible_columns()
            .map(|c| config.display_value(record, &c.key))
            .collect();
        writer
            .write_record(&row)
            .map_err(|e| TabulaError::Export(e.to_string()))?;
    }

    writer
        .into_inner()
        .map_err(|e| TabulaError::Export(e.to_string()))
}
