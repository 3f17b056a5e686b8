//! Wiki link normalization.

use regex::Regex;
use std::sync::LazyLock;

// [[ - one or more characters other than ] (group 1) - ]]
// A stray ] ends the candidate, so nested or malformed brackets never match.
static WIKILINK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[\[([^\]]+)\]\]").unwrap());

/// Replace every `[[text]]` with `text`.
///
/// Matches are global and non-overlapping. Stacked brackets such as
/// `[[[[A]]]]` expose a new pair once the inner one is gone, so passes repeat
/// until none is left and the output is a fixpoint.
pub fn normalize_links(content: &str) -> String {
    strip_links(content).0
}

/// Count the `[[text]]` pairs that `normalize_links` would remove.
pub fn count_links(content: &str) -> usize {
    strip_links(content).1
}

fn strip_links(content: &str) -> (String, usize) {
    let mut current = content.to_string();
    let mut removed = 0;
    loop {
        let found = WIKILINK.find_iter(&current).count();
        if found == 0 {
            return (current, removed);
        }
        removed += found;
        current = WIKILINK.replace_all(&current, "$1").into_owned();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_two_links() {
        assert_eq!(normalize_links("[[A]] and [[B]]"), "A and B");
    }

    #[test]
    fn test_surrounding_text_preserved() {
        let content = "Intro\nSee [[My Note]], then [[folder/Other|alias]].\n";
        assert_eq!(
            normalize_links(content),
            "Intro\nSee My Note, then folder/Other|alias.\n"
        );
        assert_eq!(count_links(content), 2);
    }

    #[test]
    fn test_embed_marker_kept() {
        assert_eq!(normalize_links("![[image.png]]"), "!image.png");
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "[[A]] and [[B]]",
            "[[[A]]]",
            "[[[[A]]]]",
            "[[[[A]]]] and [[[[[[B]]]]]]",
            "no links here",
            "[[unterminated",
            "[[a]b]] tail",
        ];
        for input in inputs {
            let once = normalize_links(input);
            assert_eq!(normalize_links(&once), once, "input: {input:?}");
        }
    }

    #[test]
    fn test_stacked_brackets_fully_unwrapped() {
        assert_eq!(normalize_links("[[[[A]]]]"), "A");
        assert_eq!(count_links("[[[[A]]]]"), 2);
        assert_eq!(normalize_links("x [[[[[[deep]]]]]] y"), "x deep y");
    }

    #[test]
    fn test_malformed_brackets_untouched() {
        assert_eq!(normalize_links("[[a]b]]"), "[[a]b]]");
        assert_eq!(normalize_links("[[]]"), "[[]]");
        assert_eq!(normalize_links("[single]"), "[single]");
        assert_eq!(count_links("[[a]b]]"), 0);
    }

    #[test]
    fn test_removes_exactly_n_pairs() {
        let content = "x [[one]] y [[two]] z [[three]]";
        let out = normalize_links(content);
        assert_eq!(count_links(content), 3);
        assert_eq!(content.matches("[[").count() - out.matches("[[").count(), 3);
        assert_eq!(out, "x one y two z three");
    }
}
