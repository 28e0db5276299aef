//! Error types shared across the wizard.
//!
//! None of these are fatal on their own: configuration errors degrade to an
//! empty document, prompt errors unwind to `main`, catalog errors are shown
//! to the user.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures while reading or writing a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file does not exist.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The file exists but could not be read or written.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file is not valid YAML.
    #[error("Error parsing YAML in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },

    /// The document could not be serialized.
    #[error("Error serializing configuration: {0}")]
    Serialize(#[source] serde_yaml_ng::Error),

    /// The top level of the file is not a mapping.
    #[error("Configuration in {} is not a key/value mapping", .0.display())]
    NotAMapping(PathBuf),
}

/// Failures raised by the prompt layer.
#[derive(Debug, Error)]
pub enum PromptError {
    /// Input ended or the user pressed Ctrl-C.
    #[error("interrupted by user")]
    Interrupted,

    /// A choice was requested from an empty list.
    #[error("no options to choose from")]
    NoOptions,

    /// Reading from or writing to the terminal failed.
    #[error("terminal I/O error: {0}")]
    Io(#[from] io::Error),
}

impl From<dialoguer::Error> for PromptError {
    fn from(err: dialoguer::Error) -> Self {
        match err {
            dialoguer::Error::IO(e) if e.kind() == io::ErrorKind::Interrupted => {
                PromptError::Interrupted
            }
            dialoguer::Error::IO(e) => PromptError::Io(e),
        }
    }
}

/// Failures looking up template kinds.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("unknown template kind '{0}' (expected 'k3s-node' or 'nfs-server')")]
    UnknownKind(String),
}
