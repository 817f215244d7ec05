//! Heuristic table detection and reconstruction over unstructured text.
//!
//! The engine takes raw extracted text (text layer or OCR output), normalizes
//! it into trimmed lines, classifies each line as table-like or not, groups
//! consecutive table-like lines into candidate blocks, and rebuilds each block
//! into a header row plus width-aligned data rows. When the primary pass finds
//! nothing, three looser recovery strategies re-scan the same lines.
//!
//! The engine is pure: no I/O, no shared state, deterministic for a given
//! input and options. Callers log around it.

mod build;
mod classify;
mod fallback;
mod normalize;
mod segment;
mod split;
#[cfg(test)]
mod tests;

use anyhow::Result;
use tracing::debug;

use crate::model::TableRecord;

pub use classify::RowHeuristics;
pub use normalize::{normalize_lines, preprocess_text};

/// Tunable thresholds for the detection heuristics. The defaults follow the
/// most lenient observed tuning for scanned/OCR financial documents.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Lines shorter than this (in chars) are never table rows.
    pub min_row_chars: usize,
    /// A split column longer than this (in chars) disqualifies the split.
    pub max_cell_chars: usize,
    /// Minimum fraction of non-empty cells a data row must keep, floored at 2.
    pub min_fill_ratio: f64,
    /// Minimum line length for the mixed numeric/text fallback predicate.
    pub min_mixed_line_chars: usize,
    /// Minimum line length for the sequential-numbering fallback.
    pub min_sequential_chars: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            min_row_chars: 5,
            max_cell_chars: 200,
            min_fill_ratio: 0.5,
            min_mixed_line_chars: 8,
            min_sequential_chars: 11,
        }
    }
}

/// Counters describing one extraction pass, alongside its tables.
#[derive(Debug)]
pub struct ExtractionOutcome {
    pub tables: Vec<TableRecord>,
    pub line_count: usize,
    pub candidate_block_count: usize,
    pub used_fallback: bool,
}

/// Extracts every recognizable table from `text`.
///
/// `page_count` is informational; all records are stamped with page 1 and the
/// caller re-stamps pages when extracting per OCR page. An empty result is a
/// valid outcome, not an error.
pub fn extract_tables_from_text(
    text: &str,
    page_count: usize,
    options: &ExtractOptions,
) -> Result<Vec<TableRecord>> {
    Ok(extract_tables_with_stats(text, page_count, options)?.tables)
}

pub fn extract_tables_with_stats(
    text: &str,
    page_count: usize,
    options: &ExtractOptions,
) -> Result<ExtractionOutcome> {
    let lines = normalize::normalize_lines(text);
    debug!(
        page_count,
        line_count = lines.len(),
        "starting table extraction pass"
    );

    if lines.is_empty() {
        return Ok(ExtractionOutcome {
            tables: Vec::new(),
            line_count: 0,
            candidate_block_count: 0,
            used_fallback: false,
        });
    }

    let heuristics = RowHeuristics::new()?;
    let blocks = segment::collect_candidate_blocks(&lines, &heuristics, options);
    let candidate_block_count = blocks.len();

    let mut tables = Vec::new();
    for block in &blocks {
        if let Some(table) = build::build_table(block, 1, tables.len(), &heuristics, options) {
            tables.push(table);
        }
    }

    let mut used_fallback = false;
    if tables.is_empty() {
        if let Some(table) = fallback::recover_table(&lines, &heuristics, options) {
            used_fallback = true;
            tables.push(table);
        }
    }

    debug!(
        candidate_block_count,
        table_count = tables.len(),
        used_fallback,
        "table extraction pass finished"
    );

    Ok(ExtractionOutcome {
        tables,
        line_count: lines.len(),
        candidate_block_count,
        used_fallback,
    })
}
