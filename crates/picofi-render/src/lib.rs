//! # PicoFI Render
//!
//! Compiled page templates, cached per name and bound to the calculator.
//!
//! ## Module Organization
//! ```text
//! picofi_render
//! ├── cache      - RenderCache: compile once, render many, forced refresh
//! ├── error      - RenderError and the per-stage error types
//! ├── functions  - Capability enum and FunctionTable
//! ├── source     - TemplateSource trait, embedded and on-disk sources
//! └── template   - Markup parser and renderer
//! ```
//!
//! ## Example
//! ```
//! use picofi_core::{Calculator, Currency};
//! use picofi_render::{FunctionTable, MemorySource, RenderCache};
//! use serde_json::json;
//!
//! let cache = RenderCache::new(
//!     MemorySource::new()
//!         .with("base", "<main>{{> content }}</main>")
//!         .with("hello", "Saving {{ annualSaveRatePercent income expenses }}"),
//! );
//! let table = FunctionTable::new(Calculator::new(Currency::Eur));
//! let data = json!({
//!     "income": { "minor": 7_000_000, "currency": "EUR" },
//!     "expenses": { "minor": 5_000_000, "currency": "EUR" },
//! });
//!
//! let html = cache.render("hello", &table, &data, false).unwrap();
//! assert_eq!(html, b"<main>Saving 28.57%</main>");
//! ```

pub mod cache;
pub mod error;
pub mod functions;
pub mod source;
pub mod template;

pub use cache::RenderCache;
pub use error::{CompileError, DataError, RenderError, RenderResult, SourceError};
pub use functions::{Capability, FunctionTable};
pub use source::{DirSource, MemorySource, TemplateSource, LAYOUT_NAME};
pub use template::Template;
