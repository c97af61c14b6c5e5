//! Directive detection for template source
//!
//! Template source is literal text interspersed with `#{…}` tags. The lexer
//! finds tag spans; the grammar classifies each tag interior into one of the
//! four directive forms (include, render-foreach, render, variable) or rejects
//! it. Rejected tags are not errors — they stay in the output verbatim.

pub mod grammar;
pub mod lexer;

pub use grammar::{classify, referenced_templates, scan, Directive, DirectiveMatch};
pub use lexer::{tag_spans, Span};
