//! `tepcat-prep` library crate.
//!
//! Builds the target catalogue that seeds exposure-time-calculator runs for
//! transit and eclipse spectroscopy: two TEPCat tables are loaded, filtered,
//! cross-matched by system name, enriched with derived quantities and
//! optionally ranked by expected transmission signal.
//!
//! The binary (`tepcat`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - simulation front-ends can use the catalogue directly

pub mod app;
pub mod catalogue;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod report;

#[cfg(test)]
mod test_support;
