/// Canonicalizes raw extracted text: one `\n` per line break, single-character
/// whitespace gaps, no blank lines. Idempotent: normalizing already-normalized
/// text returns it unchanged.
pub fn preprocess_text(text: &str) -> String {
    let unified = text
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace('\u{000C}', "\n");

    let collapsed = collapse_horizontal_whitespace(&unified);
    collapse_blank_lines(&collapsed)
}

/// Splits normalized text into trimmed, non-empty lines.
pub fn normalize_lines(text: &str) -> Vec<String> {
    preprocess_text(text)
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Collapses each run of spaces/tabs into one character. A run containing a
/// tab collapses to a tab so tab-delimited columns stay splittable; a pure
/// space run collapses to a space.
fn collapse_horizontal_whitespace(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    let mut in_run = false;
    let mut run_has_tab = false;

    for character in text.chars() {
        match character {
            ' ' | '\t' => {
                in_run = true;
                if character == '\t' {
                    run_has_tab = true;
                }
            }
            _ => {
                if in_run {
                    output.push(if run_has_tab { '\t' } else { ' ' });
                    in_run = false;
                    run_has_tab = false;
                }
                output.push(character);
            }
        }
    }

    if in_run {
        output.push(if run_has_tab { '\t' } else { ' ' });
    }

    output
}

/// Collapses a newline followed by one or more whitespace-only lines into a
/// single newline. The segment before the first newline is kept even when
/// blank, matching the source transformation.
fn collapse_blank_lines(text: &str) -> String {
    let mut output = String::with_capacity(text.len());

    for (index, line) in text.split('\n').enumerate() {
        if index == 0 {
            output.push_str(line);
            continue;
        }

        let blank = line
            .chars()
            .all(|character| character == ' ' || character == '\t');
        if blank {
            continue;
        }

        output.push('\n');
        output.push_str(line);
    }

    output
}
