use super::*;

fn options() -> ExtractOptions {
    ExtractOptions::default()
}

fn heuristics() -> RowHeuristics {
    RowHeuristics::new().expect("heuristics compile")
}

fn lines(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|line| line.to_string()).collect()
}

mod normalizing {
    use super::*;

    #[test]
    fn preprocess_unifies_line_endings_and_page_breaks() {
        let text = "a\r\nb\rc\u{000C}d";
        assert_eq!(preprocess_text(text), "a\nb\nc\nd");
    }

    #[test]
    fn preprocess_collapses_space_runs_but_keeps_tabs() {
        let text = "Name\tAge   City";
        assert_eq!(preprocess_text(text), "Name\tAge City");
    }

    #[test]
    fn preprocess_drops_repeated_blank_lines() {
        let text = "first\n\n\nsecond\n\nthird";
        assert_eq!(preprocess_text(text), "first\nsecond\nthird");
    }

    #[test]
    fn preprocess_is_idempotent() {
        let text = "A  B\r\nC\t\tD\r\n\r\nE\u{000C}F";
        let once = preprocess_text(text);
        assert_eq!(preprocess_text(&once), once);
    }

    #[test]
    fn normalize_lines_trims_and_drops_blank_lines() {
        let text = "  hello   world \n\n   \n next ";
        assert_eq!(normalize_lines(text), lines(&["hello world", "next"]));
    }

    #[test]
    fn normalize_lines_of_whitespace_only_input_is_empty() {
        assert!(normalize_lines("").is_empty());
        assert!(normalize_lines("   \n\t\n  ").is_empty());
    }
}

mod classifying {
    use super::*;
    use super::classify::{SeparatorKind, split_at_gaps};

    #[test]
    fn digit_gap_splits_between_numbers() {
        assert_eq!(
            split_at_gaps("123\t456", SeparatorKind::DigitGap),
            lines(&["123", "456"])
        );
    }

    #[test]
    fn cjk_digit_gap_splits_a_name_from_a_number() {
        assert_eq!(
            split_at_gaps("张三\t123", SeparatorKind::CjkDigitGap),
            lines(&["张三", "123"])
        );
        assert_eq!(
            split_at_gaps("张三  123", SeparatorKind::CjkDigitGap),
            lines(&["张三", "123"])
        );
    }

    #[test]
    fn decimal_gap_requires_a_fraction_on_the_left() {
        assert_eq!(
            split_at_gaps("12.50\t结余", SeparatorKind::DecimalGap),
            lines(&["12.50", "结余"])
        );
        // A bare integer is not a decimal context.
        assert_eq!(
            split_at_gaps("1250\t结余", SeparatorKind::DecimalGap),
            lines(&["1250\t结余"])
        );
    }

    #[test]
    fn single_space_runs_are_token_spacing_not_column_gaps() {
        // Unseparated numbered rows must stay whole here so the recovery
        // pass gets to see them.
        assert_eq!(
            split_at_gaps("1 张三", SeparatorKind::DigitGap),
            lines(&["1 张三"])
        );
        assert_eq!(
            split_at_gaps("张三 123", SeparatorKind::CjkDigitGap),
            lines(&["张三 123"])
        );
    }

    #[test]
    fn mismatched_context_or_line_end_keeps_the_gap() {
        assert_eq!(
            split_at_gaps("abc\t123", SeparatorKind::DigitGap),
            lines(&["abc\t123"])
        );
        assert_eq!(
            split_at_gaps("123\t", SeparatorKind::DigitGap),
            lines(&["123\t"])
        );
    }

    #[test]
    fn tab_separated_line_is_a_table_row() {
        let heuristics = heuristics();
        assert!(heuristics.is_table_row("Name\tAge\tCity", &options()));
    }

    #[test]
    fn pipe_separated_line_is_a_table_row() {
        let heuristics = heuristics();
        assert!(heuristics.is_table_row("Alice|30", &options()));
    }

    #[test]
    fn wide_space_runs_count_as_column_gaps() {
        let heuristics = heuristics();
        assert!(heuristics.is_table_row("Alice   30   Boston", &options()));
    }

    #[test]
    fn prose_is_not_a_table_row() {
        let heuristics = heuristics();
        let line = "This is just a paragraph of prose without any tabular structure at all.";
        assert!(!heuristics.is_table_row(line, &options()));
    }

    #[test]
    fn short_line_is_never_a_table_row() {
        let heuristics = heuristics();
        assert!(!heuristics.is_table_row("a|b", &options()));
    }

    #[test]
    fn domain_pattern_accepts_line_without_separator() {
        let heuristics = heuristics();
        // A date and an amount carry the line even though every gap is a
        // single space.
        assert!(heuristics.is_table_row("2024-01-15 办公用品 1200.00", &options()));
        assert!(heuristics.is_table_row("合计金额 1234.56", &options()));
    }

    #[test]
    fn oversized_cells_disqualify_a_split() {
        let heuristics = heuristics();
        let long = "x".repeat(250);
        let line = format!("{long}|{long}");
        assert!(!heuristics.is_table_row(&line, &options()));
    }

    #[test]
    fn amount_detection_requires_two_decimal_places() {
        let heuristics = heuristics();
        assert!(heuristics.has_amount_or_percentage("charge of 45.00 applied"));
        assert!(heuristics.has_amount_or_percentage("growth of 12.5%"));
        assert!(!heuristics.has_amount_or_percentage("version 1.2.x release notes"));
    }
}

mod splitting {
    use super::*;
    use super::split::smart_split_row;

    #[test]
    fn sequence_name_account_amount_template_wins() {
        let heuristics = heuristics();
        let cells = smart_split_row(&heuristics, "1 张三 1234567890123 5000.00");
        assert_eq!(cells, lines(&["1", "张三", "1234567890123", "5000.00"]));
    }

    #[test]
    fn name_colon_template_splits_the_value_tail() {
        let heuristics = heuristics();
        let cells = smart_split_row(&heuristics, "账户余额: 1000 2000");
        assert_eq!(cells, lines(&["账户余额", "1000", "2000"]));
    }

    #[test]
    fn adjacent_cjk_tokens_merge_into_one_cell() {
        let heuristics = heuristics();
        let cells = smart_split_row(&heuristics, "1 张三 账户信息 12345");
        assert_eq!(cells, lines(&["1", "张三 账户信息", "12345"]));
    }

    #[test]
    fn alternative_delimiter_used_when_whitespace_fails() {
        let heuristics = heuristics();
        let cells = smart_split_row(&heuristics, "alpha;beta");
        assert_eq!(cells, lines(&["alpha", "beta"]));
    }

    #[test]
    fn single_token_falls_through_unchanged() {
        let heuristics = heuristics();
        let cells = smart_split_row(&heuristics, "standalone");
        assert_eq!(cells, lines(&["standalone"]));
    }
}

mod segmenting {
    use super::*;
    use super::segment::collect_candidate_blocks;

    #[test]
    fn single_stray_line_does_not_split_a_block() {
        let heuristics = heuristics();
        let input = lines(&[
            "aaa|111",
            "bbb|222",
            "stray words here",
            "ccc|333",
            "ddd|444",
            "plain prose line one",
            "plain prose line two",
        ]);
        let blocks = collect_candidate_blocks(&input, &heuristics, &options());
        assert_eq!(
            blocks,
            vec![lines(&["aaa|111", "bbb|222", "ccc|333", "ddd|444"])]
        );
    }

    #[test]
    fn two_consecutive_misses_end_a_block() {
        let heuristics = heuristics();
        let input = lines(&[
            "aaa|111",
            "plain prose apple",
            "plain prose banana",
            "bbb|222",
            "ccc|333",
        ]);
        let blocks = collect_candidate_blocks(&input, &heuristics, &options());
        // The single-line group before the break is too short to keep.
        assert_eq!(blocks, vec![lines(&["bbb|222", "ccc|333"])]);
    }

    #[test]
    fn open_block_at_end_of_input_is_emitted() {
        let heuristics = heuristics();
        let input = lines(&["some leading prose", "aaa|111", "bbb|222"]);
        let blocks = collect_candidate_blocks(&input, &heuristics, &options());
        assert_eq!(blocks, vec![lines(&["aaa|111", "bbb|222"])]);
    }
}

mod building {
    use super::*;
    use super::build::{build_table, required_filled_cells};

    #[test]
    fn short_rows_are_padded_to_header_width() {
        let heuristics = heuristics();
        let block = lines(&["h1|h2|h3|h4", "v1|v2"]);
        let table = build_table(&block, 1, 0, &heuristics, &options()).expect("table");
        assert_eq!(table.headers.len(), 4);
        assert_eq!(table.rows, vec![lines(&["v1", "v2", "", ""])]);
    }

    #[test]
    fn long_rows_are_truncated_to_header_width() {
        let heuristics = heuristics();
        let block = lines(&["a|b|c", "1|2|3|4|5|6"]);
        let table = build_table(&block, 1, 0, &heuristics, &options()).expect("table");
        assert_eq!(table.rows, vec![lines(&["1", "2", "3"])]);
    }

    #[test]
    fn underfilled_rows_are_dropped() {
        let heuristics = heuristics();
        // Five headers need ceil(5 * 0.5) = 3 filled cells per row.
        assert_eq!(required_filled_cells(5, &options()), 3);
        let block = lines(&["a|b|c|d|e", "x|y"]);
        assert!(build_table(&block, 1, 0, &heuristics, &options()).is_none());
    }

    #[test]
    fn cells_are_scrubbed_of_zero_width_marks_and_runs() {
        let heuristics = heuristics();
        let block = lines(&["col1|col2", "va\u{200B}l|w  x"]);
        let table = build_table(&block, 1, 0, &heuristics, &options()).expect("table");
        assert_eq!(table.rows, vec![lines(&["val", "w x"])]);
    }

    #[test]
    fn block_without_two_headers_yields_nothing() {
        let heuristics = heuristics();
        let block = lines(&["single", "data"]);
        assert!(build_table(&block, 1, 0, &heuristics, &options()).is_none());
    }

    #[test]
    fn page_and_index_are_stamped_through() {
        let heuristics = heuristics();
        let block = lines(&["h1|h2", "v1|v2"]);
        let table = build_table(&block, 7, 3, &heuristics, &options()).expect("table");
        assert_eq!(table.page, 7);
        assert_eq!(table.table_index, 3);
        assert_eq!(table.sheet_name(), "Page7_Table4");
    }
}

mod recovering {
    use super::*;
    use super::fallback::{has_mixed_content, recover_table};

    #[test]
    fn mixed_content_lines_recover_a_table() {
        let heuristics = heuristics();
        let input = lines(&[
            "1 张三 账户信息 12345",
            "2 李四 账户信息 67890",
            "3 王五 账户信息 54321",
        ]);
        let table = recover_table(&input, &heuristics, &options()).expect("table");
        assert_eq!(table.headers, lines(&["1", "张三 账户信息", "12345"]));
        assert_eq!(
            table.rows,
            vec![
                lines(&["2", "李四 账户信息", "67890"]),
                lines(&["3", "王五 账户信息", "54321"]),
            ]
        );
    }

    #[test]
    fn sequential_numbering_recovers_numeric_only_lines() {
        let heuristics = heuristics();
        // No alphabetic or CJK text, so the mixed-content strategy skips
        // these and the running-number strategy has to pick them up.
        let input = lines(&[
            "1 9876543210 500",
            "2 8765432109 600",
            "3 7654321098 700",
        ]);
        for line in &input {
            assert!(!has_mixed_content(&heuristics, line, &options()));
        }
        let table = recover_table(&input, &heuristics, &options()).expect("table");
        assert_eq!(table.headers, lines(&["1", "9876543210", "500"]));
        assert_eq!(table.rows.len(), 2);
    }

    #[test]
    fn gap_in_the_numbering_ends_the_sequential_run() {
        let heuristics = heuristics();
        let input = lines(&["1 9876543210 500", "3 7654321098 700", "4 6543210987 800"]);
        assert!(recover_table(&input, &heuristics, &options()).is_none());
    }

    #[test]
    fn keyword_header_anchors_a_recovered_section() {
        let heuristics = heuristics();
        let input = lines(&[
            "序号 户名 金额",
            "张三 1234567 北京市",
            "李四 7654321 上海市",
        ]);
        let table = recover_table(&input, &heuristics, &options()).expect("table");
        assert_eq!(table.headers, lines(&["序号", "户名", "金额"]));
        assert_eq!(
            table.rows,
            vec![
                lines(&["张三", "1234567", "北京市"]),
                lines(&["李四", "7654321", "上海市"]),
            ]
        );
    }

    #[test]
    fn prose_recovers_nothing() {
        let heuristics = heuristics();
        let input = lines(&[
            "This is just a paragraph of prose.",
            "It keeps going without any figures.",
        ]);
        assert!(recover_table(&input, &heuristics, &options()).is_none());
    }
}

mod extracting {
    use super::*;

    #[test]
    fn tab_separated_table_round_trips() {
        let text = "Name\tAge\tCity\nAlice\t30\tBoston\nBob\t25\tDenver";
        let tables = extract_tables_from_text(text, 1, &options()).expect("extract");
        assert_eq!(tables.len(), 1);
        let table = &tables[0];
        assert_eq!(table.page, 1);
        assert_eq!(table.table_index, 0);
        assert_eq!(table.headers, lines(&["Name", "Age", "City"]));
        assert_eq!(
            table.rows,
            vec![
                lines(&["Alice", "30", "Boston"]),
                lines(&["Bob", "25", "Denver"]),
            ]
        );
    }

    #[test]
    fn prose_input_yields_no_tables() {
        let text = "This is just a paragraph of prose.\nIt keeps going without any figures.";
        let tables = extract_tables_from_text(text, 1, &options()).expect("extract");
        assert!(tables.is_empty());
    }

    #[test]
    fn unseparated_cjk_rows_arrive_via_the_recovery_pass() {
        let text = "1 张三 账户信息 12345\n2 李四 账户信息 67890\n3 王五 账户信息 54321";
        let outcome = extract_tables_with_stats(text, 1, &options()).expect("extract");
        assert!(outcome.used_fallback);
        assert_eq!(outcome.candidate_block_count, 0);
        assert_eq!(outcome.tables.len(), 1);
        assert_eq!(outcome.tables[0].page, 1);
        assert_eq!(outcome.tables[0].table_index, 0);
    }

    #[test]
    fn keyword_recovery_works_through_the_full_pass() {
        let text = "序号 户名 金额\n张三 1234567 北京市\n李四 7654321 上海市";
        let outcome = extract_tables_with_stats(text, 1, &options()).expect("extract");
        assert!(outcome.used_fallback);
        assert_eq!(outcome.tables.len(), 1);
        assert_eq!(outcome.tables[0].headers, lines(&["序号", "户名", "金额"]));
    }

    #[test]
    fn multiple_tables_get_monotonic_indices() {
        let text = "H1\tH2\nr1\tr2\nx1\tx2\n\
                    plain prose apple\nplain prose banana\n\
                    A1\tA2\nb1\tb2\nc1\tc2";
        let tables = extract_tables_from_text(text, 1, &options()).expect("extract");
        assert_eq!(tables.len(), 2);
        for (index, table) in tables.iter().enumerate() {
            assert_eq!(table.table_index, index);
            assert!(!table.rows.is_empty());
            for row in &table.rows {
                assert_eq!(row.len(), table.headers.len());
            }
        }
    }

    #[test]
    fn extraction_is_deterministic() {
        let text = "Name\tAge\tCity\nAlice\t30\tBoston\nBob\t25\tDenver";
        let first = extract_tables_from_text(text, 1, &options()).expect("extract");
        let second = extract_tables_from_text(text, 1, &options()).expect("extract");
        assert_eq!(first, second);
    }

    #[test]
    fn empty_and_blank_inputs_yield_nothing() {
        assert!(
            extract_tables_from_text("", 0, &options())
                .expect("extract")
                .is_empty()
        );
        assert!(
            extract_tables_from_text("  \n\t \n", 1, &options())
                .expect("extract")
                .is_empty()
        );
    }
}
