pub mod span;

use self::span::Span;

/// A lexical fragment with the byte range it covers in the source line.
/// Fragments whose spans touch are merged into a single argument by the
/// parser, so `foo"bar"baz` becomes one word.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct Token {
    pub value: String,
    pub span: Span,
}
