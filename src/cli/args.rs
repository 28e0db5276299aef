//! Command-line argument definitions using clap

use clap::Parser;
use std::path::PathBuf;

use crate::config::DeployPaths;
use crate::packer::DEFAULT_PACKER_BIN;

/// K3s infrastructure deployment - interactive VM template wizard
#[derive(Parser, Debug)]
#[command(name = "k3s-deploy")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "Examples:\n  k3s-deploy                  # Run with default paths\n  k3s-deploy --base /path     # Specify base directory")]
pub struct Cli {
    /// Base directory for deployment (default: current directory)
    #[arg(long = "base", value_name = "DIR")]
    pub base: Option<PathBuf>,

    /// Configuration file offered when building from an existing config
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory for the per-run log file
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub log_dir: PathBuf,

    /// Packer executable used for real builds
    #[arg(long, value_name = "PATH", default_value = DEFAULT_PACKER_BIN)]
    pub packer_bin: PathBuf,

    /// Run the Packer build instead of only showing what would be built
    #[arg(long, default_value = "false")]
    pub execute_build: bool,

    /// Extra Packer variable file passed to real builds
    #[arg(long, value_name = "FILE")]
    pub var_file: Option<PathBuf>,
}

impl Cli {
    /// Base directory, falling back to the current directory.
    pub fn base_dir(&self) -> PathBuf {
        self.base
            .clone()
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Directory layout derived from the base directory.
    pub fn paths(&self) -> DeployPaths {
        DeployPaths::new(self.base_dir())
    }
}
