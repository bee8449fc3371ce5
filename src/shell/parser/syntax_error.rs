use std::fmt;

use miette::{Diagnostic, LabeledSpan, NamedSource, SourceCode};
use thiserror::Error;

use super::lexer::token::span::Span;

/// Parse-time failures. Both are detected before any stage of the line is
/// started, so a malformed line never leaves half-spawned processes behind.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    /// An empty stage between pipe operators, or a pipe with nothing on
    /// one side of it.
    MalformedPipeline(Span),
    /// A redirection operator with no target path after it.
    MalformedRedirection(Span),
}

impl fmt::Display for SyntaxErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::MalformedPipeline(_) => write!(f, "Malformed pipeline"),
            Self::MalformedRedirection(_) => write!(f, "Malformed redirection"),
        }
    }
}

#[derive(Debug, Error)]
pub struct SyntaxError {
    pub error: SyntaxErrorKind,
    pub src: NamedSource<String>,
    pub len: usize,
}

impl SyntaxError {
    pub fn new(error: SyntaxErrorKind, src: String, name: String) -> Self {
        SyntaxError {
            error,
            len: src.len(),
            src: NamedSource::new(name, src),
        }
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        self.error.fmt(f)
    }
}

impl Diagnostic for SyntaxError {
    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        use SyntaxErrorKind::*;
        let label = match &self.error {
            MalformedPipeline(span) => LabeledSpan::new_with_span(
                Some(String::from("Pipe operator with no command to run")),
                *span,
            ),
            MalformedRedirection(span) => LabeledSpan::new_with_span(
                Some(String::from("Redirection operator with no target path")),
                *span,
            ),
        };
        Some(Box::new(vec![label].into_iter()))
    }

    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new("Syntax Error"))
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(miette::Severity::Error)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src as &dyn SourceCode)
    }
}
