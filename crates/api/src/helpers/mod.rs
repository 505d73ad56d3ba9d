//! Helper functions for API operations

pub mod aggregation;
pub mod common;

pub use aggregation::*;
pub use common::*;
