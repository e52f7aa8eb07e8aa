//! Property tests over the execution engine
//!
//! Patterns are drawn from a fixed pool (the interesting operator shapes);
//! inputs are generated. The properties pin down determinism, span
//! consistency, and finditer progress.

use proptest::prelude::*;
use retrace_core::Regex;

const PATTERNS: &[&str] = &[
    "a*",
    "a+b",
    "(a|b)+",
    "a(b|c)*",
    "[a-c]+",
    "[^ab]*c",
    r"(a+)\1",
    r"(a|b)(c|)\2",
    "a|",
    r"\d+",
    r"(a*)b\1",
];

fn some_regex() -> impl Strategy<Value = &'static str> {
    prop::sample::select(PATTERNS.to_vec())
}

proptest! {
    /// Two executions over the same input yield the same match sequence
    #[test]
    fn prop_determinism(pattern in some_regex(), input in "[abc012 ]{0,14}") {
        let regex = Regex::new(pattern).unwrap();
        let first: Vec<_> = regex.finditer(&input).collect();
        let second: Vec<_> = regex.finditer(&input).collect();
        prop_assert_eq!(first, second);
    }

    /// Every reported group's text equals the input slice of its span
    #[test]
    fn prop_span_consistency(pattern in some_regex(), input in "[abc012 ]{0,14}") {
        let regex = Regex::new(pattern).unwrap();
        let chars: Vec<char> = input.chars().collect();
        for found in regex.finditer(&input) {
            for index in 0..4 {
                if let (Some(text), Some((start, end))) =
                    (found.group(index), found.span(index))
                {
                    let slice: String = chars[start..end].iter().collect();
                    prop_assert_eq!(text, slice.as_str());
                }
            }
        }
    }

    /// finditer makes progress: at most |input| + 1 yields, strictly
    /// increasing cursors
    #[test]
    fn prop_finditer_progress(pattern in some_regex(), input in "[abc012 ]{0,14}") {
        let regex = Regex::new(pattern).unwrap();
        let spans: Vec<(usize, usize)> = regex
            .finditer(&input)
            .map(|found| found.span(0).unwrap())
            .collect();
        prop_assert!(spans.len() <= input.chars().count() + 1);
        for window in spans.windows(2) {
            let (prev_start, prev_end) = window[0];
            let (next_start, next_end) = window[1];
            // non-overlapping, ordered
            prop_assert!(next_start >= prev_end);
            prop_assert!(next_end >= prev_end);
            // an empty match is followed by strictly later work
            if prev_start == prev_end {
                prop_assert!(next_start > prev_start);
            }
        }
    }

    /// A pattern with an empty right alternative matches any input as ""
    #[test]
    fn prop_empty_alternative_accepts(input in "[a-z]{0,10}") {
        let regex = Regex::new("x|").unwrap();
        let found = regex.match_(&input).unwrap();
        prop_assert_eq!(found.group(0), Some(""));
    }
}
