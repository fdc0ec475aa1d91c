//! # PicoFI Web
//!
//! The savings calculator as a small server-rendered web application.
//!
//! ## Module Organization
//! ```text
//! picofi_web/
//! ├── lib.rs          ◄─── You are here (app assembly, logging)
//! ├── config.rs       ◄─── WebConfig from environment variables
//! ├── error.rs        ◄─── ApiError and its HTTP mapping
//! ├── session.rs      ◄─── Cookie session protocol
//! ├── state.rs        ◄─── AppState shared by all handlers
//! ├── templates.rs    ◄─── Embedded markup and stylesheet
//! ├── view.rs         ◄─── Data handed to templates
//! └── routes/
//!     ├── mod.rs      ◄─── Router
//!     ├── pages.rs    ◄─── Overview and past pages
//!     ├── simulation.rs ◄─ Simulation page and its forms
//!     └── assets.rs   ◄─── Static files
//! ```
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  request ──► resolve session (cookie) ──► read + check form            │
//! │                                              │                          │
//! │                                              ▼                          │
//! │              save whole session ◄──── build new Session value           │
//! │                     │                                                   │
//! │                     ▼                                                   │
//! │  response ◄── RenderCache::render(page, table, view, refresh)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod routes;
pub mod session;
pub mod state;
pub mod templates;
pub mod view;

use axum::Router;
use tracing_subscriber::EnvFilter;

pub use config::{ConfigError, WebConfig};
pub use error::{ApiError, ErrorCode};
pub use state::AppState;

/// Default log filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,picofi=debug";

/// Initializes logging.
///
/// `RUST_LOG` overrides [`DEFAULT_LOG_FILTER`].
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

/// Builds the state and router for `config`.
pub fn app(config: &WebConfig) -> (AppState, Router) {
    let state = AppState::new(config);
    let router = routes::router(state.clone());
    (state, router)
}
