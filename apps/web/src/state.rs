//! Shared application state.
//!
//! Built once at startup and cloned into every handler. The stores are
//! explicitly owned here and reached through `State<AppState>`, never
//! through globals.

use std::sync::Arc;

use picofi_core::Calculator;
use picofi_render::{DirSource, FunctionTable, RenderCache, TemplateSource};
use picofi_session::{SessionConfig, SessionStore};
use tracing::info;

use crate::config::WebConfig;
use crate::templates;

/// Render cache over whichever template source the config selected.
pub type PageCache = RenderCache<Box<dyn TemplateSource>>;

#[derive(Clone)]
pub struct AppState {
    /// Per-visitor sessions
    pub sessions: Arc<SessionStore>,

    /// Compiled pages
    pub pages: Arc<PageCache>,

    /// Functions pages are compiled against
    pub functions: FunctionTable,

    /// Calculator for handler-side checks and projections
    pub calculator: Calculator,
}

impl AppState {
    pub fn new(config: &WebConfig) -> Self {
        let calculator = Calculator::new(config.currency);

        let session_config = SessionConfig::new(config.currency).ttl(config.session_ttl);

        let source: Box<dyn TemplateSource> = match &config.template_dir {
            Some(dir) => {
                info!(dir = %dir.display(), "reading templates from disk");
                Box::new(DirSource::new(dir))
            }
            None => Box::new(templates::embedded()),
        };

        AppState {
            sessions: Arc::new(SessionStore::in_memory(session_config)),
            pages: Arc::new(RenderCache::new(source)),
            functions: FunctionTable::new(calculator),
            calculator,
        }
    }
}
