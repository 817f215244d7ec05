use std::fs;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::cli::ScanArgs;
use crate::tables::{self, ExtractOptions};
use crate::workbook;

/// Runs the table engine over an already-extracted text file. Useful for
/// tuning thresholds against OCR dumps without re-rasterizing the source PDF.
pub fn run(args: ScanArgs) -> Result<()> {
    let options = ExtractOptions {
        min_row_chars: args.min_row_chars,
        max_cell_chars: args.max_cell_chars,
        ..ExtractOptions::default()
    };

    let text = fs::read_to_string(&args.text_path)
        .with_context(|| format!("failed to read {}", args.text_path.display()))?;

    let outcome = tables::extract_tables_with_stats(&text, args.page_count, &options)?;

    info!(
        line_count = outcome.line_count,
        candidate_block_count = outcome.candidate_block_count,
        table_count = outcome.tables.len(),
        used_fallback = outcome.used_fallback,
        "scan complete"
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome.tables)?);
    }

    if let Some(output_path) = &args.output_path {
        if outcome.tables.is_empty() {
            warn!("no tables to write; skipping workbook output");
        } else {
            workbook::write_workbook(&outcome.tables, output_path)?;
            info!(path = %output_path.display(), "wrote workbook");
        }
    }

    if outcome.tables.is_empty() {
        info!("no recognizable tables in input text");
    }

    Ok(())
}
