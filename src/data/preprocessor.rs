// ============================================================
// Layer 4 — Text Preprocessor
// ============================================================
// Normalises question and answer strings before they are looked
// up in the vocabulary.
//
// Why normalise?
//   Annotators type "Yes", "yes" and "yes." for the same answer,
//   and questions end in "?" that would otherwise glue onto the
//   last word ("cat?" ≠ "cat"). Without cleaning, each variant
//   wastes a vocabulary slot and splits the training signal.
//
// Question cleaning:
//   1. Lowercase
//   2. Every character that is not alphanumeric or an apostrophe
//      becomes a space ("what's" stays one token)
//   3. Split on whitespace
//
// Answer cleaning uses the same rules, except that a '.' between
// two digits is kept so "2.5" does not turn into "2 5".
//
// Reference: Rust Book §8 (Strings in Rust)
//            Rust Book §13 (Iterators)

pub struct Preprocessor;

impl Preprocessor {
    pub fn new() -> Self {
        Self
    }

    /// Lowercase, strip punctuation and split a question into words.
    pub fn question_tokens(&self, text: &str) -> Vec<String> {
        self.clean(text, false)
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }

    /// Question words re-joined with single spaces, ready for the
    /// whitespace-splitting tokenizer.
    pub fn clean_question(&self, text: &str) -> String {
        self.question_tokens(text).join(" ")
    }

    /// Canonical form of one annotator answer.
    pub fn clean_answer(&self, text: &str) -> String {
        self.clean(text, true)
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn clean(&self, text: &str, keep_decimal_point: bool) -> String {
        let chars: Vec<char> = text.to_lowercase().chars().collect();

        chars
            .iter()
            .enumerate()
            .map(|(i, &c)| match c {
                c if c.is_alphanumeric() || c == '\'' => c,
                '.' if keep_decimal_point && is_decimal_point(&chars, i) => '.',
                _ => ' ',
            })
            .collect()
    }
}

fn is_decimal_point(chars: &[char], i: usize) -> bool {
    let before = i.checked_sub(1).and_then(|j| chars.get(j));
    let after  = chars.get(i + 1);
    matches!((before, after), (Some(b), Some(a)) if b.is_ascii_digit() && a.is_ascii_digit())
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_is_lowercased_and_split() {
        let p = Preprocessor::new();
        assert_eq!(p.question_tokens("What color is the Cat?"), vec!["what", "color", "is", "the", "cat"]);
    }

    #[test]
    fn test_apostrophes_survive() {
        let p = Preprocessor::new();
        assert_eq!(p.question_tokens("what's on the man's head?"), vec!["what's", "on", "the", "man's", "head"]);
    }

    #[test]
    fn test_punctuation_only_question_is_empty() {
        let p = Preprocessor::new();
        assert!(p.question_tokens(" ?! ").is_empty());
        assert_eq!(p.clean_question(" ?! "), "");
    }

    #[test]
    fn test_clean_question_collapses_whitespace() {
        let p = Preprocessor::new();
        assert_eq!(p.clean_question("  is  it,raining? "), "is it raining");
    }

    #[test]
    fn test_answer_variants_collapse() {
        let p = Preprocessor::new();
        assert_eq!(p.clean_answer("Yes."), "yes");
        assert_eq!(p.clean_answer(" yes "), "yes");
        assert_eq!(p.clean_answer("fire-hydrant"), "fire hydrant");
    }

    #[test]
    fn test_answer_keeps_decimals() {
        let p = Preprocessor::new();
        assert_eq!(p.clean_answer("2.5"), "2.5");
        assert_eq!(p.clean_answer("2."), "2");
    }
}
