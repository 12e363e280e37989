//! Domain types and pure logic shared by every Pictura crate.
//!
//! Nothing in here performs I/O: model presets, the style catalog, prompt
//! composition and token rules are plain functions over plain data so the
//! HTTP layer and the tests can use them directly.

pub mod error;
pub mod presets;
pub mod prompt;
pub mod styles;
pub mod tokens;
pub mod types;
