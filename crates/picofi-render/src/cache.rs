//! # Render Cache
//!
//! One compiled [`Template`] per page name, built on first use and reused
//! until a caller asks for a refresh.
//!
//! ```text
//! render(name, table, data, force_refresh)
//!     │
//!     ├─ force_refresh ──► drop cached artifact
//!     │
//!     ├─ read lock: cached? ── yes ──────────────────────────┐
//!     │                                                     │
//!     └─ no: load "base" + name, compile (no lock held)      │
//!            │                                              │
//!            ├─ error ──► RenderError (nothing cached)      │
//!            └─ ok ─────► write lock: insert Arc ───────────┤
//!                                                           ▼
//!                                         template.render(data) ──► bytes
//! ```
//!
//! ## Concurrency
//! Two requests that miss at the same time both compile; the later insert
//! wins. Artifacts are complete before they are published behind an `Arc`,
//! so a reader holds either the old artifact or the new one, never a mix.
//! The lock is only held for a map lookup or insert.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{DataError, RenderError, RenderResult};
use crate::functions::FunctionTable;
use crate::source::{MemorySource, TemplateSource, LAYOUT_NAME};
use crate::template::Template;

/// Compiled-template cache keyed by page name.
pub struct RenderCache<S = MemorySource> {
    source: S,
    artifacts: RwLock<HashMap<String, Arc<Template>>>,
    compiles: AtomicU64,
}

impl<S: TemplateSource> RenderCache<S> {
    pub fn new(source: S) -> Self {
        RenderCache {
            source,
            artifacts: RwLock::new(HashMap::new()),
            compiles: AtomicU64::new(0),
        }
    }

    /// Renders page `name` against `data`.
    ///
    /// The function table is only used when the page has to be compiled; a
    /// cached page keeps the table it was compiled with.
    pub fn render<T>(
        &self,
        name: &str,
        functions: &FunctionTable,
        data: &T,
        force_refresh: bool,
    ) -> RenderResult<Vec<u8>>
    where
        T: Serialize + ?Sized,
    {
        if force_refresh && self.invalidate(name) {
            info!(template = name, "cached template dropped for refresh");
        }

        let template = match self.cached(name) {
            Some(template) => {
                debug!(template = name, "template cache hit");
                template
            }
            None => self.compile(name, functions)?,
        };

        let value = serde_json::to_value(data).map_err(|e| RenderError::Render {
            name: name.to_string(),
            source: DataError::Unserializable(e.to_string()),
        })?;

        template
            .render(&value)
            .map(String::into_bytes)
            .map_err(|source| RenderError::Render {
                name: name.to_string(),
                source,
            })
    }

    /// Drops the cached artifact for `name`. Returns whether one was cached.
    pub fn invalidate(&self, name: &str) -> bool {
        self.artifacts.write().remove(name).is_some()
    }

    /// Drops every cached artifact.
    pub fn clear(&self) {
        self.artifacts.write().clear();
    }

    /// Number of cached artifacts.
    pub fn len(&self) -> usize {
        self.artifacts.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.read().is_empty()
    }

    /// Compilations attempted so far, failed ones included.
    pub fn compile_count(&self) -> u64 {
        self.compiles.load(Ordering::Relaxed)
    }

    fn cached(&self, name: &str) -> Option<Arc<Template>> {
        self.artifacts.read().get(name).cloned()
    }

    fn compile(&self, name: &str, functions: &FunctionTable) -> RenderResult<Arc<Template>> {
        self.compiles.fetch_add(1, Ordering::Relaxed);

        let source_error = |source| RenderError::Source {
            name: name.to_string(),
            source,
        };
        let layout = self.source.load(LAYOUT_NAME).map_err(source_error)?;
        let page = self.source.load(name).map_err(source_error)?;

        let template = Template::compile_with_layout(&layout, &page, functions).map_err(|source| {
            RenderError::Compile {
                name: name.to_string(),
                source,
            }
        })?;
        let template = Arc::new(template);

        self.artifacts
            .write()
            .insert(name.to_string(), Arc::clone(&template));
        info!(template = name, "new template cached");

        Ok(template)
    }
}

impl<S> std::fmt::Debug for RenderCache<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderCache")
            .field("cached", &self.artifacts.read().len())
            .field("compiles", &self.compiles.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}
