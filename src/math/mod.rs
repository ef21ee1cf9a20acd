//! Mathematical utilities: physical constants and radiometry.

pub mod constants;
pub mod radiometry;

pub use constants::*;
pub use radiometry::*;
