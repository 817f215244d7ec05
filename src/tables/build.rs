use super::ExtractOptions;
use super::classify::{RowHeuristics, Separator};
use super::split::smart_split_row;
use crate::model::TableRecord;

/// Rebuilds one candidate block into a TableRecord: the first line defines the
/// headers and the delimiter, the rest become data rows padded or truncated to
/// the header width. Returns None when the block cannot yield at least two
/// headers and one surviving row.
pub(crate) fn build_table(
    block: &[String],
    page: u32,
    table_index: usize,
    heuristics: &RowHeuristics,
    options: &ExtractOptions,
) -> Option<TableRecord> {
    if block.len() < 2 {
        return None;
    }

    let first_line = &block[0];
    let mut header_separator: Option<&Separator> = None;
    let mut headers: Vec<String> = Vec::new();

    for separator in heuristics.separators() {
        let candidate = separator.split(first_line);
        if candidate.len() > headers.len() {
            headers = candidate;
            header_separator = Some(separator);
        }
    }

    if headers.len() < 2 {
        headers = smart_split_row(heuristics, first_line);
        header_separator = None;
    }

    if headers.len() < 2 {
        return None;
    }

    let mut rows: Vec<Vec<String>> = Vec::new();
    for line in &block[1..] {
        let mut cells = match header_separator {
            Some(separator) => separator.split(line),
            None => smart_split_row(heuristics, line),
        };
        if cells.is_empty() {
            continue;
        }

        // Align to header width: pad short rows, truncate long ones.
        cells.resize(headers.len(), String::new());
        rows.push(cells);
    }

    let rows = clean_rows(rows, headers.len(), options);
    if rows.is_empty() {
        return None;
    }

    Some(TableRecord {
        page,
        table_index,
        headers,
        rows,
    })
}

/// Drops rows with too few filled cells and scrubs the survivors.
fn clean_rows(
    rows: Vec<Vec<String>>,
    header_count: usize,
    options: &ExtractOptions,
) -> Vec<Vec<String>> {
    let min_filled = required_filled_cells(header_count, options);

    rows.into_iter()
        .filter(|row| {
            let filled = row.iter().filter(|cell| !cell.trim().is_empty()).count();
            filled >= min_filled
        })
        .map(|row| row.into_iter().map(clean_cell).collect())
        .collect()
}

pub(crate) fn required_filled_cells(header_count: usize, options: &ExtractOptions) -> usize {
    let ratio_floor = (header_count as f64 * options.min_fill_ratio).ceil() as usize;
    ratio_floor.max(2)
}

/// Collapses internal whitespace runs and strips zero-width marks.
fn clean_cell(cell: String) -> String {
    let without_marks: String = cell
        .chars()
        .filter(|character| {
            !matches!(character, '\u{200B}'..='\u{200D}' | '\u{FEFF}')
        })
        .collect();

    without_marks
        .split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ")
}
