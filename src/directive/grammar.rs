//! Directive classification — turns raw tag spans into structured match records

use crate::directive::lexer::{tag_spans, Span};

/// A classified directive occurrence in template source
#[derive(Debug, Clone, PartialEq)]
pub struct DirectiveMatch {
    /// Span of the whole tag, `#{` and `}` included
    pub span: Span,
    pub directive: Directive,
}

/// The four directive forms recognized inside `#{…}` tags
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    /// `#{include <name>}` — splice a sub-template rendered with the same context
    Include { name: String },
    /// `#{render <name> foreach [<key>]}` — render once per element/entry
    RenderForeach { name: String, key: Option<String> },
    /// `#{render <name> [with <key>]}` — render with a narrowed context
    Render { name: String, key: Option<String> },
    /// `#{<key>}` — interpolate a context value
    Variable { key: String },
}

impl Directive {
    /// The sub-template name this directive resolves, if any
    pub fn template_name(&self) -> Option<&str> {
        match self {
            Directive::Include { name }
            | Directive::RenderForeach { name, .. }
            | Directive::Render { name, .. } => Some(name),
            Directive::Variable { .. } => None,
        }
    }
}

/// Template names may carry path separators: `blog/post/comments`.
fn is_template_name(word: &str) -> bool {
    !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | '/'))
}

/// Variable keys are word characters, hyphens, and dots — no `/`, and
/// notably no `@`, which keeps `#{@loop.index}` out of the variable pass.
fn is_variable_key(word: &str) -> bool {
    !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

/// Classify the interior of a `#{…}` tag.
///
/// Forms are tried in fixed order: include, render-foreach, render, variable.
/// The foreach form is checked before the plain render form so that
/// `render … foreach …` text can never classify as a `with`-style render.
/// Returns `None` for anything else; unclassified tags are not directives and
/// pass through rendering unchanged.
pub fn classify(inner: &str) -> Option<Directive> {
    let words: Vec<&str> = inner.split_whitespace().collect();
    match words.as_slice() {
        ["include", name] if is_template_name(name) => Some(Directive::Include {
            name: (*name).to_string(),
        }),
        ["render", name, "foreach"] if is_template_name(name) => {
            Some(Directive::RenderForeach {
                name: (*name).to_string(),
                key: None,
            })
        }
        ["render", name, "foreach", key] if is_template_name(name) => {
            Some(Directive::RenderForeach {
                name: (*name).to_string(),
                key: Some((*key).to_string()),
            })
        }
        ["render", name] if is_template_name(name) => Some(Directive::Render {
            name: (*name).to_string(),
            key: None,
        }),
        // A trailing bare `with` means "no key": render with the full context.
        ["render", name, "with"] if is_template_name(name) => Some(Directive::Render {
            name: (*name).to_string(),
            key: None,
        }),
        ["render", name, "with", key] if is_template_name(name) => Some(Directive::Render {
            name: (*name).to_string(),
            key: Some((*key).to_string()),
        }),
        [key] if is_variable_key(key) => Some(Directive::Variable {
            key: (*key).to_string(),
        }),
        _ => None,
    }
}

/// Scan template source for directive tags.
///
/// Returns one record per classifiable tag, in text order. Tags whose
/// interior matches no directive form are omitted (they stay literal text).
pub fn scan(source: &str) -> Vec<DirectiveMatch> {
    tag_spans(source)
        .into_iter()
        .filter_map(|span| {
            let inner = &source[span.start + 2..span.end - 1];
            classify(inner).map(|directive| DirectiveMatch { span, directive })
        })
        .collect()
}

/// Sub-template names referenced by `source` via include/render/foreach
/// directives, in first-appearance order, deduplicated.
pub fn referenced_templates(source: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for m in scan(source) {
        if let Some(name) = m.directive.template_name() {
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
    }
    names
}
