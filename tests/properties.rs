use keysort::{check_sorted, is_sorted_lines, sort_records, SortConfig};
use proptest::prelude::*;

fn line_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-c \t]{0,4}",
        "[a-c]{1,2},-?[0-9]{1,3}(\\.[0-9])?[bkmgtKMGT]?",
        "(Jan|feb|MAR|apr|Dec|xyz|Ju) ?,[0-9]{1,2}",
    ]
}

fn config_strategy() -> impl Strategy<Value = SortConfig> {
    (
        0usize..4,
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(|(column, numeric, human, month, reverse, trailing)| {
            SortConfig::new()
                .with_key_column(column)
                .with_delimiter(",")
                .with_numeric(numeric)
                .with_human_numeric(human)
                .with_month(month)
                .with_reverse(reverse)
                .with_ignore_trailing_blanks(trailing)
        })
}

fn as_bytes(lines: &[String]) -> Vec<&[u8]> {
    lines.iter().map(|line| line.as_bytes()).collect()
}

proptest! {
    #[test]
    fn sorting_is_idempotent(
        lines in prop::collection::vec(line_strategy(), 0..24),
        config in config_strategy(),
        unique in any::<bool>(),
    ) {
        let config = config.with_unique(unique);
        let once = sort_records(&as_bytes(&lines), &config);
        let twice = sort_records(&once, &config);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn sorting_is_a_permutation(
        lines in prop::collection::vec(line_strategy(), 0..24),
        config in config_strategy(),
    ) {
        let input = as_bytes(&lines);
        let mut sorted = sort_records(&input, &config);
        let mut original = input.clone();
        prop_assert_eq!(sorted.len(), original.len());
        sorted.sort();
        original.sort();
        prop_assert_eq!(sorted, original);
    }

    #[test]
    fn check_agrees_with_sort(
        lines in prop::collection::vec(line_strategy(), 0..16),
        config in config_strategy(),
    ) {
        let input = as_bytes(&lines);
        let already_sorted = sort_records(&input, &config) == input;
        prop_assert_eq!(is_sorted_lines(&input, &config).is_sorted(), already_sorted);
    }

    #[test]
    fn streaming_check_matches_in_memory_check(
        lines in prop::collection::vec(line_strategy(), 0..16),
        config in config_strategy(),
        unique in any::<bool>(),
    ) {
        let config = config.with_unique(unique);
        let text: String = lines.iter().map(|line| format!("{line}\r\n")).collect();
        let streamed = check_sorted(text.as_bytes(), &config).expect("in-memory read");
        prop_assert_eq!(streamed, is_sorted_lines(&as_bytes(&lines), &config));
    }

    #[test]
    fn unique_output_passes_unique_check(
        lines in prop::collection::vec(line_strategy(), 0..24),
        config in config_strategy(),
    ) {
        let config = config.with_unique(true);
        let sorted = sort_records(&as_bytes(&lines), &config);
        prop_assert!(is_sorted_lines(&sorted, &config).is_sorted());
    }
}
