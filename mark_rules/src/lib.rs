//! # Mark Rules
//!
//! The "Map Bible" crate - contains mark definitions, the mark store, and the spatial
//! rules that decide whether a point is near or inside a mark.
//! This crate is the single source of truth for mark state and does not contain any
//! narration logic.

pub mod geometry;
pub mod marks;
pub mod store;

pub use geometry::*;
pub use marks::*;
pub use store::*;
