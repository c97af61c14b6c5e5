//! The [`Template`] type and the rendering engine
//!
//! Rendering is four sequential rewrite passes over a working copy of the
//! source: include, render-foreach, render, variable. Each pass fully resolves
//! its directive class before the next begins; replacement text is never
//! rescanned within the same pass, but later passes do see it.

use serde_json::Value;

use crate::directive::{referenced_templates, scan, Directive, Span};
use crate::error::RenderError;
use crate::resolver::Resolver;

/// Fallback context for narrowing through an absent key.
///
/// A static so every absent-key narrowing shares one identity; see the
/// cycle-detection notes on [`Frame`].
static NULL: Value = Value::Null;

const LOOP_INDEX: &str = "#{@loop.index}";
const LOOP_ITERATION: &str = "#{@loop.iteration}";

/// Markup-node proxy form of a template source: a text body that carries its
/// own template name, the way an embedded `<script data-template-name="…">`
/// node does in a host document.
#[derive(Debug, Clone)]
pub struct SourceNode {
    pub name: String,
    pub text: String,
}

/// Where a template's text comes from: a raw string, or a [`SourceNode`]
/// whose name attribute overrides the template's name.
#[derive(Debug, Clone)]
pub enum TemplateSource {
    Raw(String),
    Node(SourceNode),
}

impl From<&str> for TemplateSource {
    fn from(text: &str) -> Self {
        TemplateSource::Raw(text.to_string())
    }
}

impl From<String> for TemplateSource {
    fn from(text: String) -> Self {
        TemplateSource::Raw(text)
    }
}

impl From<SourceNode> for TemplateSource {
    fn from(node: SourceNode) -> Self {
        TemplateSource::Node(node)
    }
}

/// A named, immutable-after-construction template body.
///
/// `render` never mutates the stored source; each call works on a derived
/// buffer, so concurrent renders of the same template share nothing mutable.
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    source: String,
}

/// One in-flight sub-render, tracked for cycle detection.
///
/// A cycle is the same template entered again with the *same* context value
/// (by identity, not equality): include and key-less render reuse the caller's
/// context, so repeating the pair cannot terminate. Recursion through a
/// narrowed context gets a distinct `data` address and is legitimate —
/// tree-shaped data bottoms out on its own.
struct Frame {
    name: String,
    data: *const Value,
}

impl Template {
    /// Create a template. A [`SourceNode`] source overrides `name` with the
    /// node's own name attribute.
    pub fn new(name: impl Into<String>, source: impl Into<TemplateSource>) -> Self {
        let mut template = Template {
            name: name.into(),
            source: String::new(),
        };
        template.set_source(source);
        template
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Replace the source text. The node form also resets the name from the
    /// node's attribute. Not safe to call concurrently with an in-flight
    /// render, which the borrow checker enforces.
    pub fn set_source(&mut self, source: impl Into<TemplateSource>) {
        match source.into() {
            TemplateSource::Raw(text) => self.source = text,
            TemplateSource::Node(node) => {
                self.source = node.text;
                self.name = node.name;
            }
        }
    }

    /// Sub-template names this template references via include/render/foreach
    /// directives, in first-appearance order, deduplicated.
    pub fn dependencies(&self) -> Vec<String> {
        referenced_templates(&self.source)
    }

    /// Resolve all directives against `data` and return the final string.
    ///
    /// Nested include/render directives recursively resolve sub-templates
    /// through `resolver`. Resolver failures propagate unchanged; missing data
    /// keys interpolate as empty strings; unclassifiable tags pass through.
    pub fn render(&self, data: &Value, resolver: &dyn Resolver) -> Result<String, RenderError> {
        let mut stack = Vec::new();
        self.render_inner(data, resolver, &mut stack)
    }

    fn render_inner(
        &self,
        data: &Value,
        resolver: &dyn Resolver,
        stack: &mut Vec<Frame>,
    ) -> Result<String, RenderError> {
        if stack
            .iter()
            .any(|f| f.name == self.name && std::ptr::eq(f.data, data))
        {
            let mut chain: Vec<&str> = stack.iter().map(|f| f.name.as_str()).collect();
            chain.push(&self.name);
            return Err(RenderError::CircularReference {
                chain: chain.join(" -> "),
            });
        }

        stack.push(Frame {
            name: self.name.clone(),
            data,
        });
        let result = self.run_passes(data, resolver, stack);
        stack.pop();
        result
    }

    fn run_passes(
        &self,
        data: &Value,
        resolver: &dyn Resolver,
        stack: &mut Vec<Frame>,
    ) -> Result<String, RenderError> {
        let buffer = self.include_pass(&self.source, data, resolver, stack)?;
        let buffer = self.foreach_pass(&buffer, data, resolver, stack)?;
        let buffer = self.render_pass(&buffer, data, resolver, stack)?;
        Ok(variable_pass(&buffer, data))
    }

    /// Pass 1: `#{include name}` — recursive render with the same, unmodified
    /// context.
    fn include_pass(
        &self,
        input: &str,
        data: &Value,
        resolver: &dyn Resolver,
        stack: &mut Vec<Frame>,
    ) -> Result<String, RenderError> {
        let mut replacements = Vec::new();
        for m in scan(input) {
            if let Directive::Include { name } = &m.directive {
                let sub = resolver.resolve(name)?;
                replacements.push((m.span, sub.render_inner(data, resolver, stack)?));
            }
        }
        Ok(splice(input, replacements))
    }

    /// Pass 2: `#{render name foreach [key]}` — once per element or entry of
    /// the iterable.
    fn foreach_pass(
        &self,
        input: &str,
        data: &Value,
        resolver: &dyn Resolver,
        stack: &mut Vec<Frame>,
    ) -> Result<String, RenderError> {
        let mut replacements = Vec::new();
        for m in scan(input) {
            if let Directive::RenderForeach { name, key } = &m.directive {
                // Resolve before iterating: an unknown template fails even
                // over an empty iterable.
                let sub = resolver.resolve(name)?;
                let target = narrow(data, key.as_deref());
                let body = match target {
                    Value::Array(items) => render_sequence(sub, items, resolver, stack)?,
                    Value::Object(entries) => {
                        let mut out = String::new();
                        for (i, (entry_key, value)) in entries.iter().enumerate() {
                            let rendered = sub.render_inner(value, resolver, stack)?;
                            out.push_str(&substitute_loop_placeholders(
                                &rendered,
                                entry_key,
                                parity(i),
                            ));
                        }
                        out
                    }
                    // Absent, null, and scalar targets have nothing to iterate.
                    _ => String::new(),
                };
                replacements.push((m.span, body));
            }
        }
        Ok(splice(input, replacements))
    }

    /// Pass 3: `#{render name [with key]}` — sequences get the same
    /// per-element loop treatment as foreach; anything else is a single
    /// sub-render with the narrowed context and no loop placeholders.
    fn render_pass(
        &self,
        input: &str,
        data: &Value,
        resolver: &dyn Resolver,
        stack: &mut Vec<Frame>,
    ) -> Result<String, RenderError> {
        let mut replacements = Vec::new();
        for m in scan(input) {
            if let Directive::Render { name, key } = &m.directive {
                let sub = resolver.resolve(name)?;
                let target = narrow(data, key.as_deref());
                let body = match target {
                    Value::Array(items) => render_sequence(sub, items, resolver, stack)?,
                    other => sub.render_inner(other, resolver, stack)?,
                };
                replacements.push((m.span, body));
            }
        }
        Ok(splice(input, replacements))
    }
}

/// Pass 4: every variable tag becomes the string form of `data[key]`, or the
/// empty string when the key is absent. Never fails.
fn variable_pass(input: &str, data: &Value) -> String {
    let mut replacements = Vec::new();
    for m in scan(input) {
        if let Directive::Variable { key } = &m.directive {
            let text = index(data, key).map(display_value).unwrap_or_default();
            replacements.push((m.span, text));
        }
    }
    splice(input, replacements)
}

/// Render `template` once per element, substituting the loop placeholders in
/// each iteration's output only, and concatenate in index order.
fn render_sequence(
    template: &Template,
    items: &[Value],
    resolver: &dyn Resolver,
    stack: &mut Vec<Frame>,
) -> Result<String, RenderError> {
    let mut out = String::new();
    for (i, item) in items.iter().enumerate() {
        let rendered = template.render_inner(item, resolver, stack)?;
        out.push_str(&substitute_loop_placeholders(
            &rendered,
            &i.to_string(),
            parity(i),
        ));
    }
    Ok(out)
}

/// Rebuild `input` with each span replaced by its substitution text.
/// Spans must be non-overlapping and in ascending order, which `scan`
/// guarantees.
fn splice(input: &str, replacements: Vec<(Span, String)>) -> String {
    if replacements.is_empty() {
        return input.to_string();
    }
    let mut out = String::with_capacity(input.len());
    let mut cursor = 0;
    for (span, text) in replacements {
        out.push_str(&input[cursor..span.start]);
        out.push_str(&text);
        cursor = span.end;
    }
    out.push_str(&input[cursor..]);
    out
}

/// The directive's context: the full data when there is no key, else the
/// sub-value at the key, else Null.
fn narrow<'v>(data: &'v Value, key: Option<&str>) -> &'v Value {
    match key {
        None => data,
        Some(k) => index(data, k).unwrap_or(&NULL),
    }
}

/// Literal key lookup — dots are part of the key, not path traversal.
/// Numeric keys index into sequences.
fn index<'v>(data: &'v Value, key: &str) -> Option<&'v Value> {
    match data {
        Value::Object(entries) => entries.get(key),
        Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}

/// String form of a context value in the variable pass.
fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => serde_json::to_string(other).unwrap_or_default(),
    }
}

fn substitute_loop_placeholders(body: &str, index: &str, iteration: &str) -> String {
    body.replace(LOOP_INDEX, index)
        .replace(LOOP_ITERATION, iteration)
}

fn parity(i: usize) -> &'static str {
    if i % 2 == 0 {
        "even"
    } else {
        "odd"
    }
}
