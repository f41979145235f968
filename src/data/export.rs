use std::path::Path;

use super::error::{DataError, Result};
use super::model::{Column, Table};

/// File name offered by the save dialog.
pub const DEFAULT_EXPORT_FILE_NAME: &str = "filtered_sustainable_fashion_data.csv";

/// Serialize a table as UTF-8 CSV with the canonical header, rows in table
/// order. The output loads back through [`load_csv_reader`](super::load_csv_reader).
pub fn export_csv(table: &Table) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(Column::ALL.iter().map(|c| c.name()))?;
    for record in table {
        writer.write_record(record.to_row())?;
    }
    writer
        .into_inner()
        .map_err(|e| DataError::Export(e.into_error()))
}

/// Write the CSV export of `table` to `path`.
pub fn write_csv(table: &Table, path: &Path) -> Result<()> {
    let bytes = export_csv(table)?;
    std::fs::write(path, bytes).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("Exported {} records to {}", table.len(), path.display());
    Ok(())
}
