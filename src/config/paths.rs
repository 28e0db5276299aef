//! Directory layout under the deployment base directory

use std::path::{Path, PathBuf};

/// Default file offered when building from an existing configuration
pub const DEFAULT_CONFIG_FILE: &str = "default.yaml";
/// Default file offered when saving a new configuration
pub const NEW_CONFIG_FILE: &str = "custom-config.yaml";

/// Well-known directories of a deployment checkout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployPaths {
    pub base_dir: PathBuf,
    pub config_dir: PathBuf,
    pub packer: PackerLayout,
}

impl DeployPaths {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        let base_dir = base_dir.into();
        Self {
            config_dir: base_dir.join("config"),
            packer: PackerLayout::new(base_dir.join("packer")),
            base_dir,
        }
    }

    pub fn default_config_file(&self) -> PathBuf {
        self.config_dir.join(DEFAULT_CONFIG_FILE)
    }

    pub fn new_config_file(&self) -> PathBuf {
        self.config_dir.join(NEW_CONFIG_FILE)
    }
}

/// Layout of the Packer directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackerLayout {
    pub root: PathBuf,
    pub templates_dir: PathBuf,
    pub scripts_dir: PathBuf,
    pub http_dir: PathBuf,
}

impl PackerLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            templates_dir: root.join("templates"),
            scripts_dir: root.join("scripts"),
            http_dir: root.join("http"),
            root,
        }
    }

    pub fn script(&self, name: &str) -> PathBuf {
        self.scripts_dir.join(name)
    }

    /// Where the descriptor for `template_name` is written
    pub fn template_file(&self, template_name: &str) -> PathBuf {
        self.templates_dir.join(format!("{}.json", template_name))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}
