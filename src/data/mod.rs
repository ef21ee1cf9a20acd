//! Remote catalogue sources and the local cache.

pub mod refresh;

pub use refresh::*;
