use std::path::Path;

use anyhow::{Context, Result, bail};
use rust_xlsxwriter::{Format, Workbook};

use crate::model::TableRecord;

/// Writes one worksheet per table, named `Page<page>_Table<index+1>`, with the
/// headers as a bold first row and the data rows below.
pub fn write_workbook(tables: &[TableRecord], output_path: &Path) -> Result<()> {
    if tables.is_empty() {
        bail!("no table data to export");
    }

    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    for table in tables {
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(table.sheet_name())
            .with_context(|| format!("invalid worksheet name for {}", table.sheet_name()))?;

        for (column, header) in table.headers.iter().enumerate() {
            worksheet
                .write_string_with_format(0, column as u16, header, &header_format)
                .context("failed to write header cell")?;
        }

        for (row_index, row) in table.rows.iter().enumerate() {
            for (column, cell) in row.iter().enumerate() {
                worksheet
                    .write_string((row_index + 1) as u32, column as u16, cell)
                    .context("failed to write data cell")?;
            }
        }
    }

    workbook
        .save(output_path)
        .with_context(|| format!("failed to save workbook: {}", output_path.display()))?;

    Ok(())
}
