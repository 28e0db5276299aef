//! k3s-deploy: VM Template Wizard Library
//!
//! Interactive building blocks for preparing K3s VM templates with Packer:
//! YAML configuration handling, prompts, the template parameter catalog,
//! Packer descriptor rendering and the orchestration flow tying them together.

pub mod cli;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod packer;
pub mod report;
pub mod utils;
