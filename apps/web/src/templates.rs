//! Page markup and assets compiled into the binary.

use picofi_render::{MemorySource, LAYOUT_NAME};

pub const BASE: &str = include_str!("../templates/base.tmpl");
pub const OVERVIEW: &str = include_str!("../templates/overview.tmpl");
pub const PAST: &str = include_str!("../templates/past.tmpl");
pub const SIMULATION: &str = include_str!("../templates/simulation.tmpl");

pub const STYLE_CSS: &str = include_str!("../templates/style.css");

/// Page names as the render cache knows them.
pub mod page {
    pub const OVERVIEW: &str = "overview";
    pub const PAST: &str = "past";
    pub const SIMULATION: &str = "simulation";
}

/// The embedded template set.
pub fn embedded() -> MemorySource {
    MemorySource::new()
        .with(LAYOUT_NAME, BASE)
        .with(page::OVERVIEW, OVERVIEW)
        .with(page::PAST, PAST)
        .with(page::SIMULATION, SIMULATION)
}
