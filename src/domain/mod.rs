//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - raw catalogue rows (`RawObservableRecord`, `RawPhysicalRecord`)
//! - merged and derived records (`MergedSystemRecord`, `DerivedSystemRecord`)
//! - run configuration (`CatalogueConfig`, `DerivedGroups`)

pub mod types;

pub use types::*;
