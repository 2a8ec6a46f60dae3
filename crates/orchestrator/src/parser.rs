//! Parsers for oracle replies
//!
//! Decomposition and planning both ask the oracle for a numbered list and read
//! the reply back through [`parse_numbered_list`]. Parsing is tolerant: a line
//! without an ordinal is kept as-is rather than dropped.
//! [`final_answer`] pulls the conclusion out of a reason/act transcript.

use std::sync::OnceLock;

use regex::Regex;

use crate::prompts::FINAL_ANSWER_MARKER;

fn ordinal_prefix() -> Option<&'static Regex> {
    static ORDINAL: OnceLock<Option<Regex>> = OnceLock::new();
    ORDINAL.get_or_init(|| Regex::new(r"^\d+\.\s*").ok()).as_ref()
}

/// Split `content` into item descriptions.
///
/// - every line is trimmed and blank lines are skipped
/// - a leading `N.` ordinal (with or without following whitespace) is removed
/// - lines that are nothing but an ordinal are skipped
pub fn parse_numbered_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            let item = match ordinal_prefix() {
                Some(re) => re.replace(line, "").trim().to_string(),
                None => line.to_string(),
            };
            (!item.is_empty()).then_some(item)
        })
        .collect()
}

/// Text after the last final-answer marker, or the whole trimmed reply when
/// the model skipped the marker or left the answer blank.
pub fn final_answer(transcript: &str) -> String {
    transcript
        .rfind(FINAL_ANSWER_MARKER)
        .map(|at| transcript[at + FINAL_ANSWER_MARKER.len()..].trim())
        .filter(|answer| !answer.is_empty())
        .unwrap_or_else(|| transcript.trim())
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_final_answer_follows_last_marker() {
        let transcript = "REASONING: think\nACTION: recall\nOBSERVATION: FINAL ANSWER: is a phrase\n\nFINAL ANSWER:  Rayleigh scattering.\n";
        assert_eq!(final_answer(transcript), "Rayleigh scattering.");
    }

    #[test]
    fn test_final_answer_without_marker_is_whole_reply() {
        assert_eq!(final_answer("  Just an answer \n"), "Just an answer");
        assert_eq!(final_answer("REASONING: hmm\nFINAL ANSWER:   "), "REASONING: hmm\nFINAL ANSWER:");
    }

    #[test]
    fn test_strips_ordinals_and_drops_blank_lines() {
        let items = parse_numbered_list("1. Buy milk\n2. Bake bread\n\n3.No space");
        assert_eq!(items, vec!["Buy milk", "Bake bread", "No space"]);
    }

    #[test]
    fn test_passes_through_unnumbered_lines() {
        let items = parse_numbered_list("Here is the plan:\n1. Step one\n- bullet\nStep 2) odd");
        assert_eq!(
            items,
            vec!["Here is the plan:", "Step one", "- bullet", "Step 2) odd"]
        );
    }

    #[test]
    fn test_multi_digit_and_indented_ordinals() {
        let items = parse_numbered_list("   10.   Let cool before serving  \n 11.\tServe");
        assert_eq!(items, vec!["Let cool before serving", "Serve"]);
    }

    #[test]
    fn test_ordinal_only_line_is_dropped() {
        let items = parse_numbered_list("1. First\n2.\n3. Third");
        assert_eq!(items, vec!["First", "Third"]);
    }

    #[test]
    fn test_only_leading_ordinal_is_removed() {
        let items = parse_numbered_list("1. Upgrade to 2.0 then 3. test");
        assert_eq!(items, vec!["Upgrade to 2.0 then 3. test"]);
    }

    #[test]
    fn test_windows_line_endings() {
        let items = parse_numbered_list("1. A\r\n2. B\r\n");
        assert_eq!(items, vec!["A", "B"]);
    }

    #[test]
    fn test_empty_and_whitespace_input_yield_nothing() {
        assert!(parse_numbered_list("").is_empty());
        assert!(parse_numbered_list("\n  \n\t\n").is_empty());
    }

    #[test]
    fn test_decimal_without_dot_is_not_an_ordinal() {
        let items = parse_numbered_list("2024 roadmap");
        assert_eq!(items, vec!["2024 roadmap"]);
    }
}
