//! Configuration module - YAML documents and the on-disk layout

mod document;
mod paths;
mod store;

pub use document::*;
pub use paths::*;
pub use store::*;
