use anyhow::{Context, Result};
use regex::Regex;

use super::ExtractOptions;
use super::split;

/// Unicode CJK unified ideograph range used throughout the heuristics.
pub(crate) fn is_cjk(character: char) -> bool {
    ('\u{4e00}'..='\u{9fa5}').contains(&character)
}

pub(crate) fn is_cjk_numeral(character: char) -> bool {
    "一二三四五六七八九十百千万亿".contains(character)
}

pub(crate) fn char_count(text: &str) -> usize {
    text.chars().count()
}

/// Fixed, ordered list of column-separator shapes. Tried in order both for
/// detection and for picking the split that yields the most columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SeparatorKind {
    MultiSpace,
    TabRun,
    Pipe,
    Punct,
    DigitGap,
    CjkDigitGap,
    DecimalGap,
}

#[derive(Debug)]
pub(crate) struct Separator {
    kind: SeparatorKind,
    regex: Option<Regex>,
}

impl Separator {
    fn from_regex(kind: SeparatorKind, name: &'static str, pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern)
            .with_context(|| format!("failed to compile {name} separator regex"))?;
        Ok(Self {
            kind,
            regex: Some(regex),
        })
    }

    fn gap(kind: SeparatorKind) -> Self {
        Self { kind, regex: None }
    }

    pub(crate) fn matches(&self, line: &str) -> bool {
        match &self.regex {
            Some(regex) => regex.is_match(line),
            None => self.split(line).len() >= 2,
        }
    }

    /// Splits `line` on this separator, returning trimmed non-empty columns.
    pub(crate) fn split(&self, line: &str) -> Vec<String> {
        let pieces: Vec<String> = match &self.regex {
            Some(regex) => regex.split(line).map(str::to_string).collect(),
            None => split_at_gaps(line, self.kind),
        };

        pieces
            .into_iter()
            .map(|piece| piece.trim().to_string())
            .filter(|piece| !piece.is_empty())
            .collect()
    }
}

/// Splits on whitespace runs that read as a column gap (two or more characters
/// or containing a tab) and whose left/right context matches the separator
/// kind. The `regex` crate has no lookaround, so these are scanned directly.
pub(crate) fn split_at_gaps(line: &str, kind: SeparatorKind) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    let mut columns = Vec::new();
    let mut current = String::new();
    let mut index = 0;

    while index < chars.len() {
        let character = chars[index];
        if character != ' ' && character != '\t' {
            current.push(character);
            index += 1;
            continue;
        }

        let mut end = index;
        let mut has_tab = false;
        while end < chars.len() && (chars[end] == ' ' || chars[end] == '\t') {
            if chars[end] == '\t' {
                has_tab = true;
            }
            end += 1;
        }

        let is_column_gap = (end - index >= 2 || has_tab)
            && end < chars.len()
            && gap_context_matches(kind, &chars[..index], chars[end]);

        if is_column_gap {
            columns.push(std::mem::take(&mut current));
        } else {
            for gap_char in &chars[index..end] {
                current.push(*gap_char);
            }
        }
        index = end;
    }

    columns.push(current);
    columns
}

fn gap_context_matches(kind: SeparatorKind, before: &[char], after: char) -> bool {
    let Some(&last) = before.last() else {
        return false;
    };

    match kind {
        SeparatorKind::DigitGap => last.is_ascii_digit() && after.is_ascii_digit(),
        SeparatorKind::CjkDigitGap => is_cjk(last) && after.is_ascii_digit(),
        SeparatorKind::DecimalGap => {
            // Left context must end in a decimal fraction, e.g. "12.50".
            last.is_ascii_digit()
                && before.len() >= 3
                && before[..before.len() - 1]
                    .iter()
                    .rev()
                    .take_while(|c| c.is_ascii_digit() || **c == '.')
                    .any(|c| *c == '.')
        }
        _ => false,
    }
}

/// One positive table signal that holds even without a separator: known
/// real-world row shapes from scanned reports.
#[derive(Debug)]
pub(crate) struct DomainPattern {
    pub(crate) name: &'static str,
    regex: Regex,
}

impl DomainPattern {
    fn new(name: &'static str, pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern)
            .with_context(|| format!("failed to compile {name} domain regex"))?;
        Ok(Self { name, regex })
    }

    pub(crate) fn matches(&self, line: &str) -> bool {
        self.regex.is_match(line)
    }
}

/// Compiled heuristics for one extraction pass: the separator table, the
/// domain-signal table, and the smart-split row templates.
#[derive(Debug)]
pub struct RowHeuristics {
    separators: Vec<Separator>,
    domain: Vec<DomainPattern>,
    amount: Regex,
    percentage: Regex,
    pub(crate) templates: split::RowTemplates,
}

impl RowHeuristics {
    pub fn new() -> Result<Self> {
        let separators = vec![
            Separator::from_regex(SeparatorKind::MultiSpace, "multi_space", r"\s{2,}")?,
            Separator::from_regex(SeparatorKind::TabRun, "tab_run", r"\t+")?,
            Separator::from_regex(SeparatorKind::Pipe, "pipe", r"\|")?,
            Separator::from_regex(SeparatorKind::Punct, "punct", r"[,;]\s*")?,
            Separator::gap(SeparatorKind::DigitGap),
            Separator::gap(SeparatorKind::CjkDigitGap),
            Separator::gap(SeparatorKind::DecimalGap),
        ];

        let domain = vec![
            DomainPattern::new("seq_cjk", r"^\d+[\u{4e00}-\u{9fa5}].*\d")?,
            DomainPattern::new("cjk_colon", r"[\u{4e00}-\u{9fa5}]\s*[:：]")?,
            DomainPattern::new("numeric_run", r"\d+[ \t]\d+[ \t]\d+")?,
            DomainPattern::new("amount", r"\d+\.\d{2}(?:[^\d]|$)")?,
            DomainPattern::new("date", r"\d{4}[-/年]\d{1,2}(?:[-/月]\d{1,2}日?)?")?,
            DomainPattern::new("percentage", r"\d+(?:\.\d+)?%")?,
            DomainPattern::new("code", r"\b[A-Z][A-Z0-9]+-\d[A-Z0-9-]*")?,
        ];

        let amount =
            Regex::new(r"\d+\.\d{2}(?:[^\d]|$)").context("failed to compile amount regex")?;
        let percentage =
            Regex::new(r"\d+(?:\.\d+)?%").context("failed to compile percentage regex")?;

        Ok(Self {
            separators,
            domain,
            amount,
            percentage,
            templates: split::RowTemplates::new()?,
        })
    }

    pub(crate) fn separators(&self) -> &[Separator] {
        &self.separators
    }

    pub(crate) fn has_amount_or_percentage(&self, line: &str) -> bool {
        self.amount.is_match(line) || self.percentage.is_match(line)
    }

    pub(crate) fn matched_domain_pattern(&self, line: &str) -> Option<&'static str> {
        self.domain
            .iter()
            .find(|pattern| pattern.matches(line))
            .map(|pattern| pattern.name)
    }

    /// Decides whether `line` plausibly represents one table row.
    pub fn is_table_row(&self, line: &str, options: &ExtractOptions) -> bool {
        let line = line.trim();
        if char_count(line) < options.min_row_chars {
            return false;
        }

        let has_separator = self
            .separators
            .iter()
            .any(|separator| separator.matches(line));
        let has_domain = self.matched_domain_pattern(line).is_some();

        if !has_separator {
            return has_domain;
        }

        let mut columns: Vec<String> = Vec::new();
        for separator in &self.separators {
            let candidate = separator.split(line);
            if candidate.len() > columns.len() {
                columns = candidate;
            }
        }

        if columns.len() < 2 {
            let smart = split::smart_split_row(self, line);
            if smart.len() >= 2 {
                columns = smart;
            }
        }

        let enough_columns = columns.len() >= 2
            && columns.iter().all(|column| {
                let length = char_count(column.trim());
                length > 0 && length < options.max_cell_chars
            });

        enough_columns || (self.has_amount_or_percentage(line) && !columns.is_empty())
    }
}
