//! # css-keyframes
//!
//! Deterministic `@keyframes` rules for CSS-in-Rust component styling.
//!
//! This crate provides platform-agnostic data structures and logic for:
//! - Describing keyframe animations as ordered stage/declaration lists
//! - Deriving a short, stable animation name from a description
//! - Serializing and caching the `@keyframes` rule per name
//! - Producing a style node for injection (with optional web support)
//!
//! Names are computed from the compact JSON form of a description, so they
//! match the names JavaScript CSS-in-JS runtimes generate for the same
//! object literal. Names are 32-bit hashes: two different descriptions can in
//! principle collide, in which case the second one is served the first one's
//! cached rule.
//!
//! ## Features
//!
//! - `toml` - Load named animations from a TOML sheet
//! - `web` - Mount style nodes into a browser document
//!
//! ## Example
//!
//! ```rust
//! use css_keyframes::{create_keyframe, Declarations, Keyframes, StageKey};
//!
//! let keyframes = Keyframes::new()
//!     .stage(StageKey::From, Declarations::new().set("color", "blue"))
//!     .stage(StageKey::To, Declarations::new().set("fontSize", "16px").set("color", "red"));
//!
//! let (name, node) = create_keyframe(&keyframes, None)?;
//! assert_eq!(name, "_x9ioxkw");
//! assert_eq!(
//!     &*node.css,
//!     "@keyframes _x9ioxkw{from{color:blue}to{font-size:16px;color:red}}"
//! );
//! # Ok::<(), css_keyframes::KeyframeError>(())
//! ```

mod builder;
mod cache;
mod cssify;
mod data;
mod error;
mod hash;
pub mod render;
#[cfg(feature = "toml")]
mod sheet;

pub use builder::{
    animation_name, create_keyframe, global_stylesheet, keyframes_css, reset_keyframe_cache,
    KeyframeBuilder,
};
pub use cache::KeyframeCache;
pub use cssify::{hyphenate_property, Cssify, DeclarationSerializer};
pub use data::{AnimationName, Declarations, Keyframes, Percentage, StageKey, StyleValue};
pub use error::KeyframeError;
pub use hash::hash;
pub use render::{StyleNode, LOW_PRECEDENCE};
#[cfg(feature = "toml")]
pub use sheet::{KeyframeSheet, SheetEntry};

#[cfg(feature = "web")]
pub use render::web::{mount_style, mount_style_in_window};
