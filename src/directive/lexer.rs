//! Tag scanner for template source using logos

use logos::Logos;

/// Byte range in template source text
pub type Span = std::ops::Range<usize>;

/// Raw lexical shape of template source: `#{…}` tags interleaved with
/// literal text. Classification of tag interiors happens in
/// [`grammar`](crate::directive::grammar), not here.
#[derive(Logos, Debug, Clone, PartialEq)]
pub enum RawToken {
    /// A brace-delimited tag span. The first `}` terminates the tag, so an
    /// unterminated `#{` never forms a token and stays literal text.
    #[regex(r"#\{[^}]*\}")]
    Tag,

    /// A run of literal text containing no `#`.
    #[regex(r"[^#]+")]
    Text,

    /// A `#` that does not open a tag.
    #[token("#")]
    Hash,
}

/// Lex template source into tokens with spans
pub fn lex(source: &str) -> impl Iterator<Item = (RawToken, Span)> + '_ {
    RawToken::lexer(source)
        .spanned()
        .filter_map(|(tok, span)| tok.ok().map(|t| (t, span)))
}

/// Spans of every `#{…}` tag in `source`, in text order
pub fn tag_spans(source: &str) -> Vec<Span> {
    lex(source)
        .filter(|(tok, _)| *tok == RawToken::Tag)
        .map(|(_, span)| span)
        .collect()
}
