//! Tokenizer for command lines.

use std::str::CharIndices;

/// Converts a command's text into whitespace separated tokens.
///
/// Tokens borrow from the command text, nothing is copied.
pub struct Scanner<'a> {
    /// The command text being scanned.
    text: &'a str,

    /// An iterator over the command text.
    chars: CharIndices<'a>,

    /// Current value from command text being considered, with its offset.
    current: Option<(usize, char)>,
}

impl<'a> Scanner<'a> {
    /// Creates a scanner for a given command text.
    pub fn new(text: &'a str) -> Scanner<'a> {
        let mut scanner = Scanner {
            text,
            chars: text.char_indices(),
            current: None,
        };
        scanner.advance();
        scanner
    }

    /// Returns the next token, or `None` at the end of the command text.
    pub fn next_token(&mut self) -> Option<&'a str> {
        self.skip_whitespace();

        let (start, _) = self.current?;
        loop {
            match self.current {
                Some((_, c)) if !is_whitespace(c) => self.advance(),
                Some((end, _)) => return Some(&self.text[start..end]),
                None => return Some(&self.text[start..]),
            }
        }
    }

    /// Advances the scanner past any whitespace.
    fn skip_whitespace(&mut self) {
        while let Some((_, c)) = self.current {
            if !is_whitespace(c) {
                break;
            }
            self.advance();
        }
    }

    /// Advances `current` to the next character in command text.
    fn advance(&mut self) {
        self.current = self.chars.next();
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        self.next_token()
    }
}

/// An ordered run of tokens taken from one raw line.
///
/// The sequence ends where its slice ends; there is no separate length to
/// keep in sync. No token is empty and none contains whitespace.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TokenSequence<'a> {
    tokens: Vec<&'a str>,
}

impl<'a> TokenSequence<'a> {
    /// All tokens in order.
    pub fn as_slice(&self) -> &[&'a str] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The command name, if there is one.
    pub fn first(&self) -> Option<&'a str> {
        self.tokens.first().copied()
    }

    /// Position of the first token equal to `needle`.
    pub fn position(&self, needle: &str) -> Option<usize> {
        self.tokens.iter().position(|token| *token == needle)
    }
}

/// Splits `text` into at most `limit` tokens. Tokens past the limit are
/// dropped without notice.
pub fn tokenize(text: &str, limit: usize) -> TokenSequence<'_> {
    let tokens: Vec<&str> = Scanner::new(text).take(limit).collect();
    tracing::debug!(count = tokens.len(), "tokenized line");
    TokenSequence { tokens }
}

/// Determines if the given character separates tokens.
fn is_whitespace(c: char) -> bool {
    c == ' ' || c == '\t' || c == '\n'
}
