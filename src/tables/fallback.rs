use super::ExtractOptions;
use super::build::build_table;
use super::classify::{RowHeuristics, char_count, is_cjk, is_cjk_numeral};

/// Section keywords common in the financial reports this tool targets; a line
/// containing one is treated as a probable table header.
const TABLE_KEYWORDS: &[&str] = &[
    "合计", "总计", "小计", "序号", "户名", "账号", "金额", "余额", "支出", "收入",
];

/// Looser recovery pass, run only when the primary segmentation found nothing.
/// Three strategies are tried in order and the first non-empty table wins;
/// results are never merged across strategies.
pub(crate) fn recover_table(
    lines: &[String],
    heuristics: &RowHeuristics,
    options: &ExtractOptions,
) -> Option<crate::model::TableRecord> {
    let mixed: Vec<String> = lines
        .iter()
        .filter(|line| has_mixed_content(heuristics, line, options))
        .cloned()
        .collect();
    if mixed.len() >= 3 {
        if let Some(table) = build_table(&mixed, 1, 0, heuristics, options) {
            return Some(table);
        }
    }

    let sequential = find_sequential_lines(lines, options);
    if sequential.len() >= 3 {
        if let Some(table) = build_table(&sequential, 1, 0, heuristics, options) {
            return Some(table);
        }
    }

    let keyword_block = find_keyword_block(lines, heuristics, options);
    if keyword_block.len() >= 2 {
        if let Some(table) = build_table(&keyword_block, 1, 0, heuristics, options) {
            return Some(table);
        }
    }

    None
}

/// Relaxed table-likelihood predicate: some digit-ish token, some text, and
/// either multiple words or an amount/percentage substring.
pub(crate) fn has_mixed_content(
    heuristics: &RowHeuristics,
    line: &str,
    options: &ExtractOptions,
) -> bool {
    let line = line.trim();
    if char_count(line) < options.min_mixed_line_chars {
        return false;
    }

    let has_digits = line.chars().any(|character| character.is_ascii_digit())
        || line.chars().any(is_cjk_numeral);
    if !has_digits {
        return false;
    }

    let has_text = line
        .chars()
        .any(|character| character.is_ascii_alphabetic() || is_cjk(character));
    if !has_text {
        return false;
    }

    let word_count = line.split_whitespace().count();
    word_count >= 2 || heuristics.has_amount_or_percentage(line)
}

/// Collects lines carrying an expected running number (1, 2, 3, ...) at the
/// start, followed by whitespace or CJK text. The expectation only advances on
/// a match, so gaps in the numbering end the collected run.
fn find_sequential_lines(lines: &[String], options: &ExtractOptions) -> Vec<String> {
    let mut collected = Vec::new();
    let mut expected = 1u32;

    for line in lines {
        let line = line.trim();
        if char_count(line) < options.min_sequential_chars {
            continue;
        }

        let Some(rest) = line.strip_prefix(&expected.to_string()) else {
            continue;
        };
        let follows_number = rest
            .chars()
            .next()
            .map(|character| character.is_whitespace() || is_cjk(character))
            .unwrap_or(false);
        if !follows_number {
            continue;
        }

        collected.push(line.to_string());
        expected += 1;
    }

    collected
}

/// Finds a keyword-anchored table section: the first keyword line becomes the
/// assumed header, later mixed-content lines join it, and a short line after
/// entering the section ends the scan.
fn find_keyword_block(
    lines: &[String],
    heuristics: &RowHeuristics,
    options: &ExtractOptions,
) -> Vec<String> {
    let mut block = Vec::new();
    let mut in_section = false;

    for line in lines {
        let line = line.trim();

        if !in_section {
            if TABLE_KEYWORDS.iter().any(|keyword| line.contains(keyword)) {
                block.push(line.to_string());
                in_section = true;
            }
            continue;
        }

        if char_count(line) < 5 {
            break;
        }
        if has_mixed_content(heuristics, line, options) {
            block.push(line.to_string());
        }
    }

    block
}
