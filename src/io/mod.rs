//! Input/output helpers.
//!
//! - whitespace-delimited table loading (`table`)
//! - catalogue exports (CSV/JSON) (`export`)

pub mod export;
pub mod table;

pub use export::*;
pub use table::*;
