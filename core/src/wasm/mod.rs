//! WASM bindings for the songbook core
//!
//! This module provides JavaScript-friendly bindings for loading, editing
//! and saving songbooks from the web front end.

#[cfg(feature = "wasm")]
pub mod bindings;

#[cfg(feature = "wasm")]
pub mod utils;

// Re-export main types
#[cfg(feature = "wasm")]
pub use bindings::WasmSongbook;
