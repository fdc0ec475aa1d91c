//! Where template sources come from.
//!
//! The web app embeds its pages at build time ([`MemorySource`]); pointing
//! `PICOFI_TEMPLATE_DIR` at a directory swaps in [`DirSource`] so markup can
//! be edited without a rebuild (followed by a forced refresh).

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use crate::error::SourceError;

/// Name of the layout every page is rendered into.
pub const LAYOUT_NAME: &str = "base";

/// File extension used by [`DirSource`].
pub const TEMPLATE_EXTENSION: &str = "tmpl";

/// Loads raw template text by name.
pub trait TemplateSource: Send + Sync {
    fn load(&self, name: &str) -> Result<String, SourceError>;
}

impl<T: TemplateSource + ?Sized> TemplateSource for Box<T> {
    fn load(&self, name: &str) -> Result<String, SourceError> {
        (**self).load(name)
    }
}

/// Templates held in memory, usually from `include_str!`.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    templates: HashMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a template.
    pub fn with(mut self, name: impl Into<String>, source: impl Into<String>) -> Self {
        self.templates.insert(name.into(), source.into());
        self
    }
}

impl TemplateSource for MemorySource {
    fn load(&self, name: &str) -> Result<String, SourceError> {
        self.templates
            .get(name)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(name.to_string()))
    }
}

/// Templates read from `<root>/<name>.tmpl` on every load.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DirSource { root: root.into() }
    }
}

impl TemplateSource for DirSource {
    fn load(&self, name: &str) -> Result<String, SourceError> {
        // Names come from code, but never let one walk out of the root
        if name.is_empty() || name.contains(['/', '\\']) || name.contains("..") {
            return Err(SourceError::NotFound(name.to_string()));
        }

        let path = self.root.join(format!("{name}.{TEMPLATE_EXTENSION}"));
        fs::read_to_string(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => SourceError::NotFound(name.to_string()),
            _ => SourceError::Io {
                name: name.to_string(),
                source: e,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_source() {
        let source = MemorySource::new().with("base", "{{> content }}");
        assert_eq!(source.load("base").unwrap(), "{{> content }}");
        assert!(matches!(source.load("other"), Err(SourceError::NotFound(_))));
    }

    #[test]
    fn test_dir_source_reads_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("past.tmpl"), "<h1>Past</h1>").unwrap();

        let source = DirSource::new(dir.path());
        assert_eq!(source.load("past").unwrap(), "<h1>Past</h1>");
        assert!(matches!(source.load("future"), Err(SourceError::NotFound(_))));
    }

    #[test]
    fn test_dir_source_rejects_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let source = DirSource::new(dir.path().join("pages"));
        assert!(matches!(source.load("../secret"), Err(SourceError::NotFound(_))));
        assert!(matches!(source.load("a/b"), Err(SourceError::NotFound(_))));
    }
}
