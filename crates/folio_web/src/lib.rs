//! Portfolio page shell: particle canvas, chat widget and static sections.
//!
//! Without the `web` feature (or off wasm32) only the host-testable pieces
//! compile: [`ui_model`] and [`markdown`]. That keeps `cargo test` at the
//! workspace root free of any wasm toolchain.
//!
//! Build the page with Trunk: `trunk serve --features web`.

pub mod markdown;
pub mod ui_model;

/// Native builds have no page to mount.
#[cfg(not(all(feature = "web", target_arch = "wasm32")))]
pub fn placeholder() {}

#[cfg(all(feature = "web", target_arch = "wasm32"))]
mod web;

#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub use web::start;
