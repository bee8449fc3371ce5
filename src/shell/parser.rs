pub mod lexer;
pub mod syntax_error;

use self::lexer::{
    token::{span::Span, Token},
    Lexer,
};

/// One logical argument: adjacent lexer fragments concatenated, with the
/// span covering the whole run in the source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    pub value: String,
    pub span: Span,
}

/// Result of parsing one input line. The first word is the command, the
/// rest are its arguments; a line that is empty or whitespace-only parses
/// to no words at all.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedLine {
    words: Vec<Word>,
}

impl ParsedLine {
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn command(&self) -> &str {
        self.words.first().map(|word| word.value.as_str()).unwrap_or("")
    }

    pub fn args(&self) -> &[Word] {
        self.words.get(1..).unwrap_or(&[])
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    /// Bytes of the source line covered by the command word, closing quote
    /// included.
    pub fn consumed(&self) -> usize {
        self.words.first().map(|word| word.span.end()).unwrap_or(0)
    }
}

/// Tokenizes a line and regroups the fragments into words: fragments with
/// touching spans concatenate into one argument, whitespace starts a new
/// one. Words that merge to the empty string (a bare `""` or `''`) are
/// dropped.
pub fn parse(line: &str) -> ParsedLine {
    let mut words: Vec<Word> = Vec::new();
    let mut current: Option<Word> = None;

    for Token { value, span } in Lexer::new(line) {
        match &mut current {
            Some(word) if span.start() == word.span.end() => {
                word.value.push_str(&value);
                word.span = Span::new(word.span.start(), span.end());
            }
            _ => {
                if let Some(word) = current.take() {
                    if !word.value.is_empty() {
                        words.push(word);
                    }
                }
                current = Some(Word { value, span });
            }
        }
    }
    if let Some(word) = current {
        if !word.value.is_empty() {
            words.push(word);
        }
    }

    ParsedLine { words }
}
