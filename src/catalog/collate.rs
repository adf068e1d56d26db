//! Name ordering for the published catalog.
//!
//! Readers expect dictionary order, not code-point order: `bat` sits next to
//! `Bazel`, `école` sits with the other `e` names, and `7zip` comes before any
//! letter. Names are compared in three passes over their canonical
//! decomposition. The first pass ignores accents and case and groups
//! characters (separators and punctuation, digits, letters, everything else).
//! The second lets unaccented letters precede accented ones. The third puts
//! lowercase before uppercase.

use std::cmp::Ordering;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum CharClass {
    Punctuation,
    Digit,
    Letter,
    Other,
}

fn class_of(c: char) -> CharClass {
    if c.is_whitespace() || c.is_ascii_punctuation() {
        CharClass::Punctuation
    } else if c.is_numeric() {
        CharClass::Digit
    } else if c.is_alphabetic() {
        CharClass::Letter
    } else {
        CharClass::Other
    }
}

/// Base characters of `name` with accents stripped, case preserved.
fn base_chars(name: &str) -> impl Iterator<Item = char> + '_ {
    name.nfd().filter(|c| !is_combining_mark(*c))
}

fn primary_key(name: &str) -> impl Iterator<Item = (CharClass, char)> + '_ {
    base_chars(name)
        .flat_map(char::to_lowercase)
        .map(|c| (class_of(c), c))
}

// Combining marks sort above every Latin base letter, so a plain letter
// precedes the same letter carrying an accent.
fn accent_key(name: &str) -> impl Iterator<Item = char> + '_ {
    name.nfd().flat_map(char::to_lowercase)
}

// Lowercase before uppercase at the first position where case differs.
fn case_order(a: &str, b: &str) -> Ordering {
    for (ca, cb) in base_chars(a).zip(base_chars(b)) {
        if ca == cb {
            continue;
        }
        match (ca.is_lowercase(), cb.is_lowercase()) {
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            _ => {}
        }
    }
    Ordering::Equal
}

/// Compare two tool names in catalog order.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    primary_key(a)
        .cmp(primary_key(b))
        .then_with(|| accent_key(a).cmp(accent_key(b)))
        .then_with(|| case_order(a, b))
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(names: &[&str]) -> Vec<String> {
        let mut owned: Vec<String> = names.iter().map(|s| s.to_string()).collect();
        owned.sort_by(|a, b| compare_names(a, b));
        owned
    }

    #[test]
    fn ignores_case_for_primary_order() {
        assert_eq!(
            sorted(&["Zed", "bat", "Alpha", "Bazel"]),
            vec!["Alpha", "bat", "Bazel", "Zed"]
        );
    }

    #[test]
    fn digits_and_punctuation_sort_before_letters() {
        assert_eq!(
            sorted(&["zoxide", "7zip", "_underscore", "act"]),
            vec!["_underscore", "7zip", "act", "zoxide"]
        );
    }

    #[test]
    fn prefixes_sort_first() {
        assert_eq!(sorted(&["gitui", "git", "git-delta"]), vec!["git", "git-delta", "gitui"]);
    }

    #[test]
    fn lowercase_wins_a_case_only_tie() {
        assert_eq!(compare_names("tool", "Tool"), Ordering::Less);
        assert_eq!(compare_names("Tool", "tool"), Ordering::Greater);
        assert_eq!(compare_names("Tool", "Tool"), Ordering::Equal);
    }

    #[test]
    fn accented_names_sort_with_their_base_letter() {
        assert_eq!(compare_names("école", "zebra"), Ordering::Less);
        assert_eq!(
            sorted(&["zebra", "école", "eza", "Émacs", "fd"]),
            vec!["école", "Émacs", "eza", "fd", "zebra"]
        );
    }

    #[test]
    fn unaccented_spelling_wins_an_accent_only_tie() {
        assert_eq!(
            sorted(&["résumé", "Resume", "resume"]),
            vec!["resume", "Resume", "résumé"]
        );
    }

    #[test]
    fn composed_and_decomposed_forms_agree_on_placement() {
        let composed = "\u{e9}cole";
        let decomposed = "e\u{301}cole";
        assert_eq!(compare_names(composed, "eza"), Ordering::Less);
        assert_eq!(compare_names(decomposed, "eza"), Ordering::Less);
        assert_eq!(compare_names("ecole", composed), Ordering::Less);
    }
}
