//! Default analyzer — a word scanner covering the guaranteed contract:
//! explicit numeral-plus-unit patterns and explicit digit-group clock times.

use tempo_core::message::{NumberToken, TokenSpan};
use tempo_core::traits::Analyzer;

/// Word-level scanner used when no richer text-analysis unit is wired in.
pub struct WordScanner;

impl Analyzer for WordScanner {
    fn extract_numbers(&self, text: &str) -> Vec<NumberToken> {
        let words = tokenize(text);
        let mut numbers = Vec::new();
        for (i, word) in words.iter().enumerate() {
            if let Ok(value) = word.parse::<u32>() {
                numbers.push(NumberToken {
                    value,
                    next_word: words.get(i + 1).cloned().unwrap_or_default(),
                });
            }
        }
        numbers
    }

    fn extract_time_spans(&self, text: &str) -> Vec<TokenSpan> {
        let words = tokenize(text);
        let mut spans = Vec::new();
        for (i, word) in words.iter().enumerate() {
            if word.is_empty() || !word.chars().all(|c| c.is_ascii_digit()) {
                continue;
            }
            let next_is_oclock = words
                .get(i + 1)
                .is_some_and(|next| next == "o'clock" || next == "oclock");
            if next_is_oclock {
                spans.push(TokenSpan::time(&format!("{word} o'clock")));
            } else {
                spans.push(TokenSpan::num(word));
            }
        }
        spans
    }
}

/// Lowercased words with surrounding punctuation stripped. Apostrophes
/// survive so "o'clock" stays one token.
fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|word| {
            word.trim_matches(|c: char| c.is_ascii_punctuation() && c != '\'')
                .to_lowercase()
        })
        .collect()
}
