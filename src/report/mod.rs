//! Report module - summarizing a wizard run

pub mod summary;

pub use summary::*;
