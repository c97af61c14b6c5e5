//! Resolver contract and the in-memory template registry

use std::collections::HashMap;

use serde_json::Value;

use crate::error::RenderError;
use crate::template::Template;

/// Maps template names to templates for the rendering engine.
///
/// Resolution is synchronous from the engine's point of view: any fetching or
/// caching an implementation performs must complete before `resolve` returns.
/// The engine only ever reads through this trait; it never mutates a
/// resolver's contents.
pub trait Resolver {
    /// Look up a template by name. Fails with
    /// [`RenderError::UnknownTemplate`] when no template carries the name.
    fn resolve(&self, name: &str) -> Result<&Template, RenderError>;
}

/// In-memory [`Resolver`] backed by a name-keyed map.
#[derive(Debug, Default)]
pub struct TemplateRegistry {
    templates: HashMap<String, Template>,
}

impl TemplateRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template under its own name. Last write wins: the registry
    /// is a lookup cache, not a declaration table.
    pub fn register(&mut self, template: Template) {
        self.templates
            .insert(template.name().to_string(), template);
    }

    /// Get a template by name
    pub fn get(&self, name: &str) -> Option<&Template> {
        self.templates.get(name)
    }

    /// Check if a template exists
    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    /// All registered template names
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Render the named template against `data`, resolving nested directives
    /// out of this registry.
    pub fn render(&self, name: &str, data: &Value) -> Result<String, RenderError> {
        self.resolve(name)?.render(data, self)
    }

    /// Dependencies referenced by registered templates that no registered
    /// template satisfies, as `(template, missing dependency)` pairs in
    /// sorted order. Lets a loader validate or prefetch before rendering.
    pub fn unresolved(&self) -> Vec<(String, String)> {
        let mut missing: Vec<(String, String)> = Vec::new();
        for (name, template) in &self.templates {
            for dependency in template.dependencies() {
                if !self.contains(&dependency) {
                    missing.push((name.clone(), dependency));
                }
            }
        }
        missing.sort();
        missing
    }
}

impl Resolver for TemplateRegistry {
    fn resolve(&self, name: &str) -> Result<&Template, RenderError> {
        self.templates
            .get(name)
            .ok_or_else(|| RenderError::UnknownTemplate {
                name: name.to_string(),
            })
    }
}
