//! Running the external Packer build
//!
//! This is the only place the wizard starts a child process. Its output is
//! streamed line by line into the log while a spinner shows the latest line.

use std::fs;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::{error, info};

use super::descriptor::{render, write_descriptor};
use crate::config::{ConfigDocument, PackerLayout};
use crate::utils::{create_build_spinner, finish_build_spinner};

/// Executable looked up on `PATH` when none is configured
pub const DEFAULT_PACKER_BIN: &str = "packer";

static RUNNING_BUILDS: AtomicUsize = AtomicUsize::new(0);

/// Whether a Packer child process is currently being waited on.
///
/// The interrupt handler checks this so the parent outlives the child: the
/// terminal delivers Ctrl-C to Packer too, and `run_build` returns once
/// Packer has finished its own cleanup.
pub fn build_in_progress() -> bool {
    RUNNING_BUILDS.load(Ordering::SeqCst) > 0
}

/// Marks a build as running until dropped
struct RunningBuild;

impl RunningBuild {
    fn start() -> Self {
        RUNNING_BUILDS.fetch_add(1, Ordering::SeqCst);
        RunningBuild
    }
}

impl Drop for RunningBuild {
    fn drop(&mut self) {
        RUNNING_BUILDS.fetch_sub(1, Ordering::SeqCst);
    }
}

/// A template name usable as a file stem inside the templates directory
pub fn is_valid_template_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
}

/// Packer operations for one deployment checkout
#[derive(Debug, Clone)]
pub struct PackerManager {
    layout: PackerLayout,
    executable: PathBuf,
}

impl PackerManager {
    pub fn new(layout: PackerLayout) -> Self {
        Self {
            layout,
            executable: PathBuf::from(DEFAULT_PACKER_BIN),
        }
    }

    pub fn with_executable(mut self, executable: impl Into<PathBuf>) -> Self {
        self.executable = executable.into();
        self
    }

    pub fn layout(&self) -> &PackerLayout {
        &self.layout
    }

    /// Names of the `*.json` templates in the templates directory, sorted.
    ///
    /// A missing directory yields an empty list.
    pub fn available_templates(&self) -> Vec<String> {
        let Ok(entries) = fs::read_dir(&self.layout.templates_dir) else {
            return Vec::new();
        };

        let mut names: Vec<String> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "json"))
            .filter_map(|p| p.file_stem().and_then(|s| s.to_str()).map(str::to_string))
            .collect();
        names.sort();
        names
    }

    /// Argument list for `packer build`, without the executable
    pub fn build_args(&self, template_file: &Path, var_file: Option<&Path>) -> Vec<String> {
        let mut args = vec!["build".to_string()];
        if let Some(var_file) = var_file {
            args.push(format!("-var-file={}", var_file.display()));
        }
        args.push(template_file.display().to_string());
        args
    }

    /// Run `packer build` from the Packer directory.
    ///
    /// Returns `false` (after logging) when the directory or executable is
    /// missing or the build exits unsuccessfully.
    pub fn run_build(&self, template_file: &Path, var_file: Option<&Path>) -> bool {
        if !self.layout.root.is_dir() {
            error!(
                "Packer directory not found: {}",
                self.layout.root.display()
            );
            return false;
        }

        let args = self.build_args(template_file, var_file);
        info!(
            "Running Packer build: {} {}",
            self.executable.display(),
            args.join(" ")
        );

        let _running = RunningBuild::start();
        let spawned = Command::new(&self.executable)
            .args(&args)
            .current_dir(&self.layout.root)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .spawn();

        let mut child = match spawned {
            Ok(child) => child,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                error!("Packer not found. Please install Packer.");
                return false;
            }
            Err(e) => {
                error!("Failed to start Packer: {}", e);
                return false;
            }
        };

        let spinner = create_build_spinner(template_file);
        if let Some(stdout) = child.stdout.take() {
            for line in BufReader::new(stdout).lines().map_while(Result::ok) {
                info!(target: "packer", "{}", line);
                spinner.set_message(line);
            }
        }

        let succeeded = match child.wait() {
            Ok(status) if status.success() => {
                info!("Packer build completed successfully");
                true
            }
            Ok(status) => {
                error!("Packer build failed: {}", status);
                false
            }
            Err(e) => {
                error!("Packer build failed: {}", e);
                false
            }
        };
        finish_build_spinner(&spinner, succeeded);
        succeeded
    }

    /// Render `config`, write it under the templates directory and build it
    pub fn build(&self, config: &ConfigDocument, var_file: Option<&Path>) -> bool {
        let Some(name) = config.get_text("template_name") else {
            error!("Cannot build: configuration has no template_name");
            return false;
        };
        if !is_valid_template_name(&name) {
            error!("Cannot build: invalid template_name '{}'", name);
            return false;
        }

        let descriptor = render(config, &self.layout);
        let template_file = self.layout.template_file(&name);
        if let Err(e) = write_descriptor(&descriptor, &template_file) {
            error!("{:#}", e);
            return false;
        }
        info!("Wrote Packer template to {}", template_file.display());

        // Packer runs from the root, so hand it a root-relative path
        let relative = template_file
            .strip_prefix(&self.layout.root)
            .unwrap_or(&template_file);
        self.run_build(relative, var_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_args_place_var_file_before_template() {
        let manager = PackerManager::new(PackerLayout::new("packer"));
        let args = manager.build_args(
            Path::new("templates/k3s.json"),
            Some(Path::new("secrets.json")),
        );
        assert_eq!(
            args,
            vec!["build", "-var-file=secrets.json", "templates/k3s.json"]
        );

        let args = manager.build_args(Path::new("templates/k3s.json"), None);
        assert_eq!(args, vec!["build", "templates/k3s.json"]);
    }

    #[test]
    fn test_template_names_stay_inside_templates_dir() {
        assert!(is_valid_template_name("k3s-base"));
        assert!(is_valid_template_name("nfs.v2"));
        assert!(!is_valid_template_name(""));
        assert!(!is_valid_template_name(".."));
        assert!(!is_valid_template_name("../x"));
        assert!(!is_valid_template_name("a/b"));
        assert!(!is_valid_template_name("a\\b"));
    }

    #[test]
    fn test_running_build_marker() {
        let before = RUNNING_BUILDS.load(Ordering::SeqCst);
        {
            let _running = RunningBuild::start();
            assert!(build_in_progress());
            assert_eq!(RUNNING_BUILDS.load(Ordering::SeqCst), before + 1);
        }
        assert_eq!(RUNNING_BUILDS.load(Ordering::SeqCst), before);
    }
}
