//! Stencil - a recursive text-substitution templating engine
//!
//! Template source is literal text interspersed with `#{…}` directive tags:
//! variable interpolation (`#{key}`), sub-template splicing
//! (`#{include name}`, `#{render name with key}`), and iteration
//! (`#{render name foreach key}` with `#{@loop.index}`/`#{@loop.iteration}`
//! placeholders). Rendering resolves every directive against a
//! [`serde_json::Value`] data context and returns the final string; nested
//! templates are looked up through a [`Resolver`].
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use stencil::{Template, TemplateRegistry};
//!
//! let mut registry = TemplateRegistry::new();
//! registry.register(Template::new("item", "<li>#{name}</li>"));
//! registry.register(Template::new("list", "<ul>#{render item foreach entries}</ul>"));
//!
//! let data = json!({ "entries": [{ "name": "a" }, { "name": "b" }] });
//! let html = registry.render("list", &data).unwrap();
//! assert_eq!(html, "<ul><li>a</li><li>b</li></ul>");
//! ```

pub mod directive;
pub mod error;
pub mod manifest;
pub mod resolver;
pub mod template;

pub use error::RenderError;
pub use manifest::{Manifest, ManifestError};
pub use resolver::{Resolver, TemplateRegistry};
pub use template::{SourceNode, Template, TemplateSource};

use serde_json::Value;

/// Render a one-off template source against a data context.
///
/// The source becomes an anonymous [`Template`] resolved against an empty
/// registry, so variable tags work but any include/render directive fails
/// with [`RenderError::UnknownTemplate`]. Use a [`TemplateRegistry`] when the
/// source references named sub-templates.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
///
/// let out = stencil::render("Hello, #{name}!", &json!({ "name": "World" })).unwrap();
/// assert_eq!(out, "Hello, World!");
/// ```
pub fn render(source: &str, data: &Value) -> Result<String, RenderError> {
    Template::new("anonymous", source).render(data, &TemplateRegistry::new())
}
