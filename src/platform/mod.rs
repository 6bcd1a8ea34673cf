//! Platform abstraction layer
//!
//! Handles browser specifics for:
//! - Screen size, pixel ratio, touch capability and user agent
//! - Resize / orientation / visibility events
//! - Exposing the game session to a JavaScript renderer

#[cfg(target_arch = "wasm32")]
pub mod web;
