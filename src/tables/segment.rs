use super::ExtractOptions;
use super::classify::RowHeuristics;

/// Groups consecutive table-like lines into candidate blocks.
///
/// One stray non-table line inside a run is tolerated (skipped, not appended);
/// two consecutive misses end the block. Blocks shorter than two lines are
/// discarded. A block still open at end of input is emitted if long enough.
pub(crate) fn collect_candidate_blocks(
    lines: &[String],
    heuristics: &RowHeuristics,
    options: &ExtractOptions,
) -> Vec<Vec<String>> {
    let mut blocks = Vec::new();
    let mut current: Vec<String> = Vec::new();
    let mut consecutive_misses = 0usize;

    for line in lines {
        if heuristics.is_table_row(line, options) {
            current.push(line.clone());
            consecutive_misses = 0;
            continue;
        }

        if current.is_empty() {
            continue;
        }

        consecutive_misses += 1;
        if consecutive_misses >= 2 {
            if current.len() >= 2 {
                blocks.push(std::mem::take(&mut current));
            } else {
                current.clear();
            }
            consecutive_misses = 0;
        }
    }

    if current.len() >= 2 {
        blocks.push(current);
    }

    blocks
}
