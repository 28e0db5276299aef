//! Packer module - parameter catalog, descriptor rendering and builds

pub mod catalog;
pub mod descriptor;
pub mod runner;

pub use catalog::*;
pub use descriptor::*;
pub use runner::*;
