//! Output generation.
//!
//! - [`json`]: writes the run's records to a dated JSON file

pub mod json;
