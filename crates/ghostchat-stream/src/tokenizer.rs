//! Splits a reply into display fragments for streaming.
//!
//! Fragments are word runs plus the delimiters between them: whitespace runs,
//! single punctuation characters and whole fenced code blocks. Every delimiter
//! is kept as its own fragment, so joining the fragments in order gives back
//! the input byte for byte.
//!
//! ```
//! use ghostchat_stream::tokenizer::tokenize;
//!
//! let tokens: Vec<&str> = tokenize("Hi, there!").collect();
//! assert_eq!(tokens, ["Hi", ",", " ", "there", "!"]);
//! ```
//!
//! A fence is matched lazily up to the next closing ```` ``` ````. When a
//! fence is never closed the backticks are treated as ordinary text and
//! splitting carries on as usual.

use regex::Regex;
use std::sync::LazyLock;

/// Delimiters, in priority order: whitespace runs, fenced blocks, punctuation.
static DELIMITER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s+|```[\s\S]*?```|[.,!?;:\n]").expect("delimiter pattern is valid")
});

/// Tokenize `text` into non-empty fragments.
///
/// The returned iterator is lazy and cheap to clone; cloning restarts nothing
/// but copies the current position, and calling `tokenize` again always
/// yields the same sequence.
pub fn tokenize(text: &str) -> Tokens<'_> {
    Tokens {
        text,
        pos: 0,
        pending: None,
    }
}

/// Iterator over the fragments of a string. See [`tokenize`].
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    text: &'a str,
    pos: usize,
    /// Delimiter found after the word just returned.
    pending: Option<&'a str>,
}

impl<'a> Iterator for Tokens<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(delimiter) = self.pending.take() {
            return Some(delimiter);
        }
        if self.pos >= self.text.len() {
            return None;
        }

        match DELIMITER.find_at(self.text, self.pos) {
            Some(found) => {
                let word = &self.text[self.pos..found.start()];
                self.pos = found.end();
                if word.is_empty() {
                    Some(found.as_str())
                } else {
                    self.pending = Some(found.as_str());
                    Some(word)
                }
            }
            None => {
                let rest = &self.text[self.pos..];
                self.pos = self.text.len();
                Some(rest)
            }
        }
    }
}

impl std::iter::FusedIterator for Tokens<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(text: &str) -> Vec<&str> {
        tokenize(text).collect()
    }

    #[test]
    fn test_words_and_spaces() {
        assert_eq!(split("hello big  world"), ["hello", " ", "big", "  ", "world"]);
    }

    #[test]
    fn test_punctuation_is_its_own_token() {
        assert_eq!(
            split("Wait. Why?!"),
            ["Wait", ".", " ", "Why", "?", "!"]
        );
        assert_eq!(split("a;b:c,d"), ["a", ";", "b", ":", "c", ",", "d"]);
    }

    #[test]
    fn test_newlines_join_whitespace_runs() {
        assert_eq!(split("one\n\ntwo"), ["one", "\n\n", "two"]);
    }

    #[test]
    fn test_empty_input_yields_nothing() {
        assert!(split("").is_empty());
    }

    #[test]
    fn test_only_delimiters() {
        assert_eq!(split(" ..."), [" ", ".", ".", "."]);
    }

    #[test]
    fn test_fenced_block_is_one_token() {
        let text = "See:\n\n```rust\nfn main() {\n    println!(\"hi, there.\");\n}\n```\n\nDone.";
        let tokens = split(text);
        assert!(tokens.contains(&"```rust\nfn main() {\n    println!(\"hi, there.\");\n}\n```"));
        assert_eq!(tokens.concat(), text);
    }

    #[test]
    fn test_two_fences_stay_separate() {
        let tokens = split("```a``` and ```b```");
        assert_eq!(tokens, ["```a```", " ", "and", " ", "```b```"]);
    }

    #[test]
    fn test_unterminated_fence_splits_normally() {
        let tokens = split("text ```js\nlet x = 1;");
        assert_eq!(
            tokens,
            ["text", " ", "```js", "\n", "let", " ", "x", " ", "=", " ", "1", ";"]
        );
    }

    #[test]
    fn test_non_ascii_is_preserved() {
        let text = "Hello! 👋 I'm 你好, ça va?";
        let tokens = split(text);
        assert!(tokens.contains(&"👋"));
        assert!(tokens.contains(&"ça"));
        assert_eq!(tokens.concat(), text);
    }

    #[test]
    fn test_lossless_and_non_empty() {
        let samples = [
            "",
            " ",
            "\n",
            "a",
            "  leading and trailing  ",
            "```",
            "``````",
            "```unterminated ``` then ``` again",
            "mixed\t\ttabs\r\nand CRLF!",
            "emoji ✨ **bold** - list\n- item",
            "I understand you're asking about \"\". Try 'help'!",
        ];
        for sample in samples {
            let tokens = split(sample);
            assert_eq!(tokens.concat(), sample, "lossless for {:?}", sample);
            assert!(tokens.iter().all(|t| !t.is_empty()), "empty token in {:?}", sample);
        }
    }

    #[test]
    fn test_restartable() {
        let tokens = tokenize("one, two");
        let first: Vec<_> = tokens.clone().collect();
        let second: Vec<_> = tokens.collect();
        assert_eq!(first, second);
        assert_eq!(first, split("one, two"));
    }
}
