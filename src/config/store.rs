//! Loading, saving and displaying configuration files
//!
//! Failures here are never fatal. The `try_*` functions return typed errors;
//! the plain variants log them and fall back to an empty document or `false`.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use console::style;
use serde_yaml_ng::{Mapping, Value};
use tracing::{error, info, warn};

use super::document::{display_value, ConfigDocument};
use crate::error::ConfigError;

/// Parse a YAML configuration file.
///
/// An empty file yields an empty document.
pub fn try_load_config(path: &Path) -> Result<ConfigDocument, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| {
        if source.kind() == ErrorKind::NotFound {
            ConfigError::NotFound(path.to_path_buf())
        } else {
            ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let value: Value = serde_yaml_ng::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    match value {
        Value::Mapping(mapping) => Ok(ConfigDocument::from(mapping)),
        Value::Null => {
            warn!("Configuration file {} is empty", path.display());
            Ok(ConfigDocument::new())
        }
        _ => Err(ConfigError::NotAMapping(path.to_path_buf())),
    }
}

/// Load a configuration file, returning an empty document on any error
pub fn load_config(path: &Path) -> ConfigDocument {
    match try_load_config(path) {
        Ok(config) => {
            info!("Loaded configuration from {}", path.display());
            config
        }
        Err(e) => {
            error!("{}", e);
            ConfigDocument::new()
        }
    }
}

/// Write a configuration file, creating parent directories as needed
pub fn try_save_config(config: &ConfigDocument, path: &Path) -> Result<(), ConfigError> {
    let io_err = |source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let yaml = serde_yaml_ng::to_string(config).map_err(ConfigError::Serialize)?;
    fs::write(path, yaml).map_err(io_err)?;
    Ok(())
}

/// Save a configuration file; returns whether it was persisted
pub fn save_config(config: &ConfigDocument, path: &Path) -> bool {
    match try_save_config(config, path) {
        Ok(()) => {
            info!("Saved configuration to {}", path.display());
            true
        }
        Err(e) => {
            error!("Error saving configuration: {}", e);
            false
        }
    }
}

/// Indented plain-text rendering of a configuration
pub fn render_config(config: &ConfigDocument) -> String {
    let mut out = String::new();
    write_tree(&mut out, config.as_mapping(), 0, false);
    out
}

/// Print a configuration for review, nested mappings indented
pub fn print_config(config: &ConfigDocument) {
    let mut out = String::new();
    write_tree(&mut out, config.as_mapping(), 0, true);
    print!("{}", out);
}

fn write_tree(out: &mut String, mapping: &Mapping, depth: usize, styled: bool) {
    let indent = "  ".repeat(depth);
    for (key, value) in mapping {
        let key = format!("{}:", display_value(key));
        match value {
            Value::Mapping(nested) => {
                let key = if styled {
                    style(key).cyan().to_string()
                } else {
                    key
                };
                out.push_str(&format!("{}{}\n", indent, key));
                write_tree(out, nested, depth + 1, styled);
            }
            other => {
                let key = if styled {
                    style(key).bold().to_string()
                } else {
                    key
                };
                out.push_str(&format!("{}{} {}\n", indent, key, display_value(other)));
            }
        }
    }
}
