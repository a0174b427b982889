//! Naive sentence splitting.
//!
//! Text is lower-cased and cut on any run of `.`, `!`, `?` or newline.
//! There is no abbreviation handling: "Dr. Smith" becomes two sentences.

use std::sync::LazyLock;

use regex::Regex;

static TERMINATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?\n]+").expect("terminator pattern is a valid regex"));

/// Split `text` into normalized sentences.
///
/// Each sentence is lower-cased and trimmed; empty fragments are dropped.
pub fn split_sentences(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    TERMINATORS
        .split(&lowered)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_all_terminators() {
        let sentences = split_sentences("First step. Second!Third?\nFourth");
        assert_eq!(sentences, vec!["first step", "second", "third", "fourth"]);
    }

    #[test]
    fn runs_of_terminators_collapse() {
        let sentences = split_sentences("Wait...really?!\n\nYes");
        assert_eq!(sentences, vec!["wait", "really", "yes"]);
    }

    #[test]
    fn only_terminators_yield_nothing() {
        assert!(split_sentences("...").is_empty());
        assert!(split_sentences(" . ! ? \n ").is_empty());
    }

    #[test]
    fn carriage_returns_are_trimmed() {
        assert_eq!(split_sentences("one\r\ntwo\r\n"), vec!["one", "two"]);
    }

    #[test]
    fn abbreviations_split() {
        assert_eq!(split_sentences("See Dr. Smith"), vec!["see dr", "smith"]);
    }
}
