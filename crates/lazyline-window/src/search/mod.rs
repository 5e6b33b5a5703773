//! Incremental search over the materialized window text.
//!
//! Matching is regex-based, case-insensitive, and `.` also matches line
//! breaks, so a match may span several buffered lines.

mod engine;
mod types;

pub use engine::*;
pub use types::*;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use lazyline_common::LazylineError;

    const TEXT: &str = "xx ab yy\nAB zz\n";

    #[test]
    fn search_walks_matches_without_rescanning() {
        let mut state = SearchState::new();

        let first = state.search(Some("ab"), TEXT).unwrap().unwrap();
        assert_eq!(first, SearchMatch { start: 3, len: 2 });
        assert_eq!(state.current_index(), 0);

        // A different text proves the second hit comes from the cached set.
        let second = state.search(Some("ab"), "unrelated").unwrap().unwrap();
        assert_eq!(second, SearchMatch { start: 9, len: 2 });
        assert_eq!(state.current_index(), 1);
    }

    #[test]
    fn exhausted_sequence_does_not_wrap() {
        let mut state = SearchState::new();
        state.search(Some("ab"), TEXT).unwrap();
        state.search(Some("ab"), TEXT).unwrap();

        assert_eq!(state.search(Some("ab"), TEXT).unwrap(), None);
        assert!(!state.is_active());
        assert_eq!(state.current_index(), 0);

        // A fresh call starts over from the top.
        let again = state.search(Some("ab"), TEXT).unwrap().unwrap();
        assert_eq!(again.start, 3);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let mut state = SearchState::new();
        state.search(Some("AB"), TEXT).unwrap();
        assert_eq!(state.matches().map(<[SearchMatch]>::len), Some(2));
    }

    #[test]
    fn dot_matches_line_terminator() {
        let mut state = SearchState::new();
        let m = state.search(Some("yy.ab"), TEXT).unwrap().unwrap();
        assert_eq!(m.as_str(TEXT), Some("yy\nAB"));
    }

    #[test]
    fn empty_or_absent_pattern_clears() {
        let mut state = SearchState::new();
        state.search(Some("ab"), TEXT).unwrap();
        assert!(state.is_active());

        assert_eq!(state.search(Some(""), TEXT).unwrap(), None);
        assert!(!state.is_active());

        state.search(Some("ab"), TEXT).unwrap();
        assert_eq!(state.search(None, TEXT).unwrap(), None);
        assert!(!state.is_active());
        assert_eq!(state.pattern(), None);
    }

    #[test]
    fn no_match_clears_state() {
        let mut state = SearchState::new();
        state.search(Some("ab"), TEXT).unwrap();

        assert_eq!(state.search(Some("qq"), TEXT).unwrap(), None);
        assert!(!state.is_active());
        assert!(state.current().is_none());
    }

    #[test]
    fn new_pattern_starts_new_sequence() {
        let mut state = SearchState::new();
        state.search(Some("ab"), TEXT).unwrap();

        let m = state.search(Some("zz"), TEXT).unwrap().unwrap();
        assert_eq!(m.as_str(TEXT), Some("zz"));
        assert_eq!(state.pattern(), Some("zz"));
    }

    #[test]
    fn invalid_pattern_is_error_and_keeps_state() {
        let mut state = SearchState::new();
        state.search(Some("ab"), TEXT).unwrap();

        let err = state.search(Some("(ab"), TEXT).unwrap_err();
        assert!(matches!(err, LazylineError::InvalidPattern { .. }));
        assert!(state.is_active());
        assert_eq!(state.pattern(), Some("ab"));
        assert_eq!(state.current_index(), 0);
    }

    #[test]
    fn anchor_starts_at_offset() {
        let regex = compile_pattern("ab").unwrap();
        let mut state = SearchState::new();

        let m = state.anchor("ab", &regex, TEXT, 5).unwrap();
        assert_eq!(m.start, 9);
        assert_eq!(state.matches().map(<[SearchMatch]>::len), Some(1));

        // The anchored sequence continues under plain search.
        assert_eq!(state.search(Some("ab"), TEXT).unwrap(), None);
    }

    #[test]
    fn anchor_keeps_preceding_context_for_boundaries() {
        let regex = compile_pattern(r"\bcd").unwrap();
        let mut state = SearchState::new();
        // "abcd": scanning from 2 must not see a word boundary before "cd".
        assert_eq!(state.anchor(r"\bcd", &regex, "abcd cd", 2).map(|m| m.start), Some(5));
    }

    #[test]
    fn find_matches_handles_empty_matches() {
        let regex = compile_pattern("x*").unwrap();
        let matches = find_matches(&regex, "axé", 0);
        // Empty at 0, "x" at 1, empty at 2 (before 'é'), empty at end.
        let starts: Vec<_> = matches.iter().map(|m| (m.start, m.len)).collect();
        assert_eq!(starts, vec![(0, 0), (1, 1), (2, 0), (4, 0)]);
    }

    #[test]
    fn find_matches_are_non_overlapping() {
        let regex = compile_pattern("aa").unwrap();
        let matches = find_matches(&regex, "aaaaa", 0);
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[1].start, 2);
    }

    #[test]
    fn search_outcome_into_match() {
        let m = SearchMatch { start: 1, len: 2 };
        assert_eq!(SearchOutcome::Found(m).into_match(), Some(m));
        assert_eq!(SearchOutcome::NotFound.into_match(), None);
        assert_eq!(SearchOutcome::Canceled.into_match(), None);
        assert_eq!(m.end(), 3);
    }

    #[test]
    fn edge_anchors_hold_only_at_text_edges() {
        let mut state = SearchState::new();
        // No multi-line mode: `^` and `$` refer to the whole window text.
        assert_eq!(state.search(Some("^ab"), TEXT).unwrap(), None);
        assert_eq!(state.search(Some("^xx"), TEXT).unwrap().map(|m| m.start), Some(0));
        assert_eq!(state.search(Some("zz$"), TEXT).unwrap(), None);
        assert_eq!(state.search(Some(r"zz\n$"), TEXT).unwrap().map(|m| m.start), Some(12));
    }

    #[test]
    fn anchor_line_matches_edge_anchored_line_alone() {
        let mut state = SearchState::new();

        let regex = compile_pattern("^ab").unwrap();
        let m = state.anchor_line("^ab", &regex, TEXT, 9..14).unwrap();
        assert_eq!(m, SearchMatch { start: 9, len: 2 });
        assert_eq!(m.as_str(TEXT), Some("AB"));

        let regex = compile_pattern("yy$").unwrap();
        let m = state.anchor_line("yy$", &regex, TEXT, 0..8).unwrap();
        assert_eq!(m.as_str(TEXT), Some("yy"));
        assert_eq!(state.pattern(), Some("yy$"));
    }

    #[test]
    fn anchor_line_prefers_in_place_scan() {
        let regex = compile_pattern(r"\bzz").unwrap();
        let mut state = SearchState::new();
        let m = state.anchor_line(r"\bzz", &regex, TEXT, 9..14).unwrap();
        assert_eq!(m.start, 12);

        let regex = compile_pattern("qq$").unwrap();
        assert_eq!(state.anchor_line("qq$", &regex, TEXT, 9..14), None);
        assert!(!state.is_active());
    }
}
