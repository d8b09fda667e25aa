//! Property-based tests using proptest
//!
//! These tests check the result model and the iteration advance across a
//! wide range of subjects.

use pcre2_context::binding::options::PCRE2_UTF;
use pcre2_context::RegexContext;
use proptest::prelude::*;

// =============================================================================
// Result Materialization
// =============================================================================

proptest! {
    /// The whole-match span re-extracts exactly the matched digits
    #[test]
    fn test_span_round_trip(prefix in "[a-z ]{0,10}", digits in "[0-9]{1,10}", suffix in "[a-z ]{0,10}") {
        let subject = format!("{}{}{}", prefix, digits, suffix);
        let mut ctx = RegexContext::new();
        prop_assert!(ctx.compile(br"\d+"));

        prop_assert!(ctx.match_at(subject.as_bytes(), 0) > 0);
        ctx.fetch_match_results();

        let span = ctx.matched_result();
        prop_assert_eq!(span.start, prefix.len());
        prop_assert_eq!(&subject.as_bytes()[span.range()], digits.as_bytes());
    }

    /// Group results are always in capture-index order
    #[test]
    fn test_capture_order(groups in 1usize..8, subject in "[a-c]{8,16}") {
        let pattern = "([a-c])".repeat(groups);
        let mut ctx = RegexContext::new();
        prop_assert!(ctx.compile(pattern.as_bytes()));

        let rc = ctx.match_at(subject.as_bytes(), 0);
        prop_assert_eq!(rc, groups as i64 + 1);
        ctx.fetch_match_results();

        prop_assert_eq!(ctx.matched_group_count(), groups);
        for (i, group) in ctx.matched_group_results().iter().enumerate() {
            prop_assert_eq!(group.capture_index as usize, i + 1);
        }
    }

    /// Every named group resolves to its own name after a match, whatever the
    /// order of the names in the pattern
    #[test]
    fn test_names_follow_indices(
        names in proptest::collection::btree_set("[a-z]{1,6}", 1..5)
            .prop_map(|set| set.into_iter().collect::<Vec<_>>())
            .prop_shuffle()
    ) {
        let pattern: String = names.iter().map(|n| format!("(?<{}>x)", n)).collect();
        let subject = "x".repeat(names.len());

        let mut ctx = RegexContext::new();
        prop_assert!(ctx.compile(pattern.as_bytes()));
        prop_assert_eq!(ctx.group_name_count(), names.len());

        prop_assert!(ctx.match_at(subject.as_bytes(), 0) > 0);
        ctx.fetch_match_results();

        for (i, name) in names.iter().enumerate() {
            let view = ctx.group(i as u32 + 1).unwrap();
            prop_assert_eq!(view.name.and_then(|n| n.as_str()), Some(name.as_str()));
        }
    }
}

// =============================================================================
// Iteration Advance
// =============================================================================

proptest! {
    /// A pattern matching the empty string never loops forever
    #[test]
    fn test_iteration_terminates(subject in "[ab]{0,20}") {
        let mut ctx = RegexContext::new();
        prop_assert!(ctx.compile(b"a*"));

        let count = ctx.find_iter(subject.as_bytes()).count();
        prop_assert!(count <= subject.len() + 1);
        prop_assert!(count >= 1);
    }

    /// In UTF mode every match starts on a character boundary
    #[test]
    fn test_utf8_advance_on_boundaries(subject in "\\PC{0,12}") {
        let mut ctx = RegexContext::new();
        ctx.options.regex_options = PCRE2_UTF;
        prop_assert!(ctx.compile(b""));

        let starts: Vec<usize> = ctx
            .find_iter(subject.as_bytes())
            .map(|m| m.unwrap().whole.start)
            .collect();

        prop_assert_eq!(starts.len(), subject.chars().count() + 1);
        for start in starts {
            prop_assert!(subject.is_char_boundary(start));
        }
    }
}
