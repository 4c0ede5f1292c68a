//! Time-series utilities shared by connectors and the pipeline.
//!
//! - `merge`: positional alignment of two independently sourced series
/// Merge utilities for joining two series into aligned rows.
pub mod merge;
