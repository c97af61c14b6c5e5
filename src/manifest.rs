//! Template manifest loading
//!
//! A manifest is a TOML file mapping template names to source files, so a
//! whole set of named templates can be loaded into a registry in one step.
//! The rendering engine itself never touches the filesystem; this module is
//! the loader side of the resolver contract.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::resolver::TemplateRegistry;
use crate::template::Template;

/// Errors that can occur when loading a manifest or its templates
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("failed to read manifest file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse manifest TOML: {0}")]
    Parse(#[from] toml::de::Error),
    /// A listed template has no usable source behind it.
    #[error("missing source for template '{name}' at {path}: {message}")]
    MissingSource {
        name: String,
        path: PathBuf,
        message: String,
    },
}

/// A parsed manifest: optional metadata plus the name → source-file table.
///
/// ```toml
/// [metadata]
/// name = "blog"
/// description = "Blog page partials"
///
/// [templates]
/// "blog/post" = "partials/post.html"
/// "blog/header" = "partials/header.html"
/// ```
#[derive(Debug, Clone)]
pub struct Manifest {
    pub name: Option<String>,
    pub description: Option<String>,
    /// Template name -> source file path, relative to the manifest's directory
    pub templates: HashMap<String, PathBuf>,
}

#[derive(Deserialize)]
struct TomlManifest {
    metadata: Option<TomlMetadata>,
    templates: HashMap<String, PathBuf>,
}

#[derive(Deserialize)]
struct TomlMetadata {
    name: Option<String>,
    description: Option<String>,
}

impl Manifest {
    /// Load a manifest from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ManifestError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load a manifest from a TOML string
    pub fn from_str(content: &str) -> Result<Self, ManifestError> {
        let parsed: TomlManifest = toml::from_str(content)?;

        Ok(Manifest {
            name: parsed.metadata.as_ref().and_then(|m| m.name.clone()),
            description: parsed.metadata.as_ref().and_then(|m| m.description.clone()),
            templates: parsed.templates,
        })
    }

    /// Read every listed source file (relative paths resolved against
    /// `base_dir`) and build a registry from the results.
    ///
    /// A listed file that is absent or unreadable is
    /// [`ManifestError::MissingSource`]; nothing is partially registered on
    /// failure from the caller's point of view, since the registry is only
    /// returned on success.
    pub fn into_registry(self, base_dir: &Path) -> Result<TemplateRegistry, ManifestError> {
        let mut registry = TemplateRegistry::new();
        for (name, relative) in self.templates {
            let path = base_dir.join(&relative);
            let source = std::fs::read_to_string(&path).map_err(|e| {
                ManifestError::MissingSource {
                    name: name.clone(),
                    path: path.clone(),
                    message: e.to_string(),
                }
            })?;
            registry.register(Template::new(name, source));
        }
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_metadata() {
        let toml_str = r#"
[metadata]
name = "blog"
description = "Blog partials"

[templates]
"blog/post" = "post.html"
"#;
        let manifest = Manifest::from_str(toml_str).expect("Should parse");
        assert_eq!(manifest.name, Some("blog".to_string()));
        assert_eq!(manifest.description, Some("Blog partials".to_string()));
        assert_eq!(
            manifest.templates.get("blog/post"),
            Some(&PathBuf::from("post.html"))
        );
    }

    #[test]
    fn test_parse_without_metadata() {
        let toml_str = r#"
[templates]
header = "header.html"
footer = "footer.html"
"#;
        let manifest = Manifest::from_str(toml_str).expect("Should parse");
        assert_eq!(manifest.name, None);
        assert_eq!(manifest.templates.len(), 2);
    }

    #[test]
    fn test_invalid_toml_error() {
        let invalid = "this is not valid toml {{{{";
        let result = Manifest::from_str(invalid);
        assert!(matches!(result, Err(ManifestError::Parse(_))));
    }

    #[test]
    fn test_templates_table_is_required() {
        let result = Manifest::from_str("[metadata]\nname = \"x\"\n");
        assert!(matches!(result, Err(ManifestError::Parse(_))));
    }

    #[test]
    fn test_missing_source_file() {
        let manifest = Manifest::from_str(
            r#"
[templates]
ghost = "does/not/exist.html"
"#,
        )
        .expect("Should parse");
        let err = manifest
            .into_registry(Path::new("/nonexistent-base"))
            .unwrap_err();
        match err {
            ManifestError::MissingSource { name, .. } => assert_eq!(name, "ghost"),
            other => panic!("Expected MissingSource, got {:?}", other),
        }
    }
}
