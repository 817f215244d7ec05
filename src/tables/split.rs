use anyhow::{Context, Result};
use regex::Regex;

use super::classify::{RowHeuristics, is_cjk};

/// Anchored templates for row shapes that generic splitting mis-segments,
/// mostly because OCR output embeds spaces inside CJK names. Tried in order;
/// the first full match wins and its capture groups become the columns.
#[derive(Debug)]
pub(crate) struct RowTemplates {
    seq_name_account_amount: Regex,
    seq_name_numbers: Regex,
    name_colon_values: Regex,
    date_description_amount: Regex,
    code_name_amount: Regex,
}

impl RowTemplates {
    pub(crate) fn new() -> Result<Self> {
        Ok(Self {
            seq_name_account_amount: Regex::new(
                r"^(\d+)\s*([\u{4e00}-\u{9fa5}][\u{4e00}-\u{9fa5}\s]*?)\s+(\d{10,})\s+([\d.,]+)$",
            )
            .context("failed to compile sequence/name/account/amount template")?,
            seq_name_numbers: Regex::new(
                r"^(\d+)\s+([\u{4e00}-\u{9fa5}][\u{4e00}-\u{9fa5}\s]*?)\s+([\d.,]+(?:\s+[\d.,]+)+)$",
            )
            .context("failed to compile sequence/name/numbers template")?,
            name_colon_values: Regex::new(
                r"^([\u{4e00}-\u{9fa5}A-Za-z][\u{4e00}-\u{9fa5}A-Za-z\s]*?)\s*[:：]\s*(.+)$",
            )
            .context("failed to compile name/colon/values template")?,
            date_description_amount: Regex::new(
                r"^(\d{4}[-/年]\d{1,2}(?:[-/月]\d{1,2})?日?)\s+(.+?)\s+([\d,]+\.\d{2})$",
            )
            .context("failed to compile date/description/amount template")?,
            code_name_amount: Regex::new(
                r"^([A-Z][A-Z0-9]*-[A-Z0-9-]+)\s+(.+?)\s+([\d,]+(?:\.\d+)?)$",
            )
            .context("failed to compile code/name/amount template")?,
        })
    }
}

/// Pattern- and token-merging splitter used when fixed-delimiter splitting
/// fails to produce two or more columns.
pub(crate) fn smart_split_row(heuristics: &RowHeuristics, line: &str) -> Vec<String> {
    let line = line.trim();
    let templates = &heuristics.templates;

    if let Some(captures) = templates.seq_name_account_amount.captures(line) {
        return capture_columns(&captures, &[1, 2, 3, 4]);
    }

    if let Some(captures) = templates.seq_name_numbers.captures(line) {
        let mut columns = capture_columns(&captures, &[1, 2]);
        if let Some(tail) = captures.get(3) {
            columns.extend(tail.as_str().split_whitespace().map(str::to_string));
        }
        return columns;
    }

    if let Some(captures) = templates.name_colon_values.captures(line) {
        let mut columns = capture_columns(&captures, &[1]);
        if let Some(values) = captures.get(2) {
            columns.extend(values.as_str().split_whitespace().map(str::to_string));
        }
        if columns.len() >= 2 {
            return columns;
        }
    }

    if let Some(captures) = templates.date_description_amount.captures(line) {
        return capture_columns(&captures, &[1, 2, 3]);
    }

    if let Some(captures) = templates.code_name_amount.captures(line) {
        return capture_columns(&captures, &[1, 2, 3]);
    }

    // Generic phase: whitespace tokens, with adjacent pure-CJK tokens merged
    // back together so a name split across fields stays one column.
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() >= 3 {
        let merged = merge_cjk_tokens(&tokens);
        if merged.len() >= 2 {
            return merged;
        }
    }

    // Alternative single-character separators, first one that works.
    for delimiter in [',', ';', '|', '\t'] {
        let columns: Vec<String> = line
            .split(delimiter)
            .map(str::trim)
            .filter(|piece| !piece.is_empty())
            .map(str::to_string)
            .collect();
        if columns.len() >= 2 {
            return columns;
        }
    }

    tokens.iter().map(|token| token.to_string()).collect()
}

fn capture_columns(captures: &regex::Captures<'_>, groups: &[usize]) -> Vec<String> {
    groups
        .iter()
        .filter_map(|&group| captures.get(group))
        .map(|capture| capture.as_str().trim().to_string())
        .filter(|column| !column.is_empty())
        .collect()
}

fn merge_cjk_tokens(tokens: &[&str]) -> Vec<String> {
    let mut merged: Vec<String> = Vec::new();
    let mut pending_cjk = String::new();

    for token in tokens {
        let pure_cjk = !token.is_empty() && token.chars().all(is_cjk);
        if pure_cjk {
            if !pending_cjk.is_empty() {
                pending_cjk.push(' ');
            }
            pending_cjk.push_str(token);
            continue;
        }

        if !pending_cjk.is_empty() {
            merged.push(std::mem::take(&mut pending_cjk));
        }
        merged.push(token.to_string());
    }

    if !pending_cjk.is_empty() {
        merged.push(pending_cjk);
    }

    merged
}
