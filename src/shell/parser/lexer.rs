pub mod token;

use std::{iter::Peekable, str::CharIndices};

use self::token::{span::Span, Token};

/// Splits a line into quoted and unquoted fragments.
///
/// Quote rules:
/// - Single quotes: everything between them is literal, backslash included.
/// - Double quotes: backslash escapes only `"` and `\`, any other backslash
///   is kept as-is.
/// - Unquoted: backslash escapes the next character verbatim; a trailing
///   backslash with nothing to escape stays literal.
///
/// Quote characters themselves never appear in a fragment's value, but they
/// are counted in its span so adjacent fragments stay adjacent.
pub struct Lexer<'a> {
    src: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            chars: src.char_indices().peekable(),
        }
    }

    #[inline]
    fn pos(&mut self) -> usize {
        match self.chars.peek() {
            Some((index, _)) => *index,
            None => self.src.len(),
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.chars.peek(), Some((_, c)) if c.is_whitespace()) {
            self.chars.next();
        }
    }

    fn read_single_quoted(&mut self) -> String {
        self.chars.next();
        let mut value = String::new();
        for (_, c) in self.chars.by_ref() {
            if c == '\'' {
                break;
            }
            value.push(c);
        }
        value
    }

    fn read_double_quoted(&mut self) -> String {
        self.chars.next();
        let mut value = String::new();
        while let Some((_, c)) = self.chars.next() {
            match c {
                '"' => break,
                '\\' => match self.chars.peek().map(|(_, next)| *next) {
                    Some(next @ ('"' | '\\')) => {
                        self.chars.next();
                        value.push(next);
                    }
                    _ => value.push('\\'),
                },
                _ => value.push(c),
            }
        }
        value
    }

    fn read_unquoted(&mut self) -> String {
        let mut value = String::new();
        while let Some(&(_, c)) = self.chars.peek() {
            match c {
                c if c.is_whitespace() => break,
                '\'' | '"' => break,
                '\\' => {
                    self.chars.next();
                    match self.chars.next() {
                        Some((_, escaped)) => value.push(escaped),
                        None => value.push('\\'),
                    }
                }
                _ => {
                    self.chars.next();
                    value.push(c);
                }
            }
        }
        value
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.skip_whitespace();
        let (start, first) = *self.chars.peek()?;
        let value = match first {
            '\'' => self.read_single_quoted(),
            '"' => self.read_double_quoted(),
            _ => self.read_unquoted(),
        };
        let end = self.pos();
        Some(Token {
            value,
            span: Span::new(start, end),
        })
    }
}
