//! Shared test utilities and fixture generators

#![allow(dead_code)]

use std::io::Cursor;
use std::path::{Path, PathBuf};

use k3s_deploy::cli::LinePrompter;
use k3s_deploy::config::{try_save_config, ConfigDocument, DeployPaths};
use tempfile::TempDir;

pub type ScriptedPrompter = LinePrompter<Cursor<Vec<u8>>, Vec<u8>>;

/// Prompter that answers with `lines`, one per prompt read
pub fn scripted(lines: &[&str]) -> ScriptedPrompter {
    let mut input = lines.join("\n");
    input.push('\n');
    LinePrompter::new(Cursor::new(input.into_bytes()), Vec::new())
}

/// Everything the prompter wrote, with styling removed
pub fn transcript(prompter: ScriptedPrompter) -> String {
    let bytes = prompter.into_output();
    console::strip_ansi_codes(&String::from_utf8_lossy(&bytes)).into_owned()
}

/// A complete k3s-node configuration as the wizard would save it
pub fn sample_config() -> ConfigDocument {
    let mut config = ConfigDocument::new();
    config.insert("template_type", "k3s-node");
    config.insert("template_name", "k3s-base");
    config.insert("vcenter_host", "vcenter.lab.local");
    config.insert("vcenter_user", "administrator@vsphere.local");
    config.insert("vcenter_password", "s3cret");
    config.insert("vcenter_datacenter", "dc1");
    config.insert("vcenter_cluster", "cluster1");
    config.insert("vcenter_datastore", "ssd-01");
    config.insert("vcenter_network", "VM Network");
    config.insert("vcenter_folder", "templates");
    config.insert("iso_datastore", "iso-store");
    config.insert("iso_path", "iso/debian-12.iso");
    config.insert("cpu_cores", 2);
    config.insert("memory_mb", 4096);
    config.insert("disk_size_gb", 40);
    config
}

/// Temporary deployment checkout with `config/` and `packer/` directories
pub fn deploy_dir() -> (TempDir, DeployPaths) {
    let temp_dir = TempDir::new().unwrap();
    let paths = DeployPaths::new(temp_dir.path());
    std::fs::create_dir_all(&paths.config_dir).unwrap();
    std::fs::create_dir_all(&paths.packer.templates_dir).unwrap();
    (temp_dir, paths)
}

/// Save `config` under `dir/name` and return the path
pub fn write_config(dir: &Path, name: &str, config: &ConfigDocument) -> PathBuf {
    let path = dir.join(name);
    try_save_config(config, &path).unwrap();
    path
}
