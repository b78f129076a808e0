//! fourc-export
//!
//! Text rendering of the score table and session results for display.

pub mod error;
pub mod render;
pub mod templates;
