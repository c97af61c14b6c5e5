//! Error types for rendering

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

use crate::directive::{scan, Span};

/// Errors raised while rendering a template.
///
/// Rendering is atomic: any of these aborts the whole `render` call and no
/// partial output is produced. Missing data keys are not errors — they
/// interpolate as empty strings — and malformed tags pass through unchanged.
#[derive(Error, Debug)]
pub enum RenderError {
    /// The resolver has no template under the requested name.
    #[error("unknown template '{name}'")]
    UnknownTemplate { name: String },

    /// A template recursed into itself with the same context.
    #[error("circular template reference: {chain}")]
    CircularReference { chain: String },
}

impl RenderError {
    /// The sub-template name to highlight in diagnostics
    fn offending_name(&self) -> &str {
        match self {
            RenderError::UnknownTemplate { name, .. } => name,
            RenderError::CircularReference { chain } => {
                chain.rsplit(" -> ").next().unwrap_or(chain)
            }
        }
    }

    /// Format the error with source context using ariadne.
    ///
    /// `source` should be the top-level template text the failing render was
    /// called on. The offending directive is located by re-scanning for the
    /// failing template name; when the name only occurs in a nested template
    /// the plain message is returned instead.
    pub fn format(&self, source: &str, filename: &str) -> String {
        let name = self.offending_name();
        let span: Option<Span> = scan(source)
            .into_iter()
            .find(|m| m.directive.template_name() == Some(name))
            .map(|m| m.span);

        let Some(span) = span else {
            return self.to_string();
        };

        let mut buf = Vec::new();
        Report::build(ReportKind::Error, filename, span.start)
            .with_message(self.to_string())
            .with_label(
                Label::new((filename, span))
                    .with_message(format!("no template named '{}'", name))
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf)
            .unwrap();
        String::from_utf8(buf).unwrap()
    }
}
