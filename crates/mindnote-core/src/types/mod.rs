//! Core types for Mindnote.

mod category;
mod classification;

pub use category::*;
pub use classification::*;
