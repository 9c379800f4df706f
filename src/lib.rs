//! themeloom resolves design-token themes (colors, fonts, radii) from a
//! bundled catalog or a remote theme service, confirms the fonts a theme
//! references are loaded, and injects the resolved tokens into a live
//! style target as CSS custom properties
#![forbid(
    clippy::missing_docs_in_private_items,
    missing_docs,
    rustdoc::missing_crate_level_docs
)]

#[cfg(feature = "cli")]
pub mod app;
pub mod apply;
pub mod config;
pub mod error;
pub mod fonts;
pub mod macros;
pub mod resolve;
pub mod source;
pub mod theme;
pub mod utils;
