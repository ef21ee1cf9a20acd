//! Terminal reports: run summary, unmatched systems, rankings and per-target views.

pub mod format;

pub use format::*;
