//! Packer build descriptor
//!
//! Renders a configuration document into the JSON template understood by
//! `packer build`: user variables, a single `vsphere-iso` builder and the
//! provisioning sequence. Rendering never fails; missing settings simply
//! leave their variable out.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::catalog::{parameters_for, TemplateKind};
use crate::config::{ConfigDocument, PackerLayout};

/// Guest OS type used when the configuration does not name one
pub const DEFAULT_GUEST_OS_TYPE: &str = "debian10_64Guest";

/// Debian installer keystrokes typed over the VM console
const BOOT_COMMAND: [&str; 12] = [
    "<esc><esc><esc>",
    "<enter><wait>",
    "install <wait>",
    "preseed/url=http://{{ .HTTPIP }}:{{ .HTTPPort }}/preseed.cfg <wait>",
    "debian-installer=en_US.UTF-8 <wait>",
    "auto locale=en_US.UTF-8 <wait>",
    "kbd-chooser/method=us <wait>",
    "netcfg/get_hostname={{ .Name }} <wait>",
    "netcfg/get_domain=local <wait>",
    "fb=false debconf/verbose=false <wait>",
    "console-setup/ask_detect=false console-keymaps-at/keymap=us <wait>",
    "<enter><wait>",
];

// Build-time credentials baked into the preseed file
const SSH_USERNAME: &str = "root";
const SSH_PASSWORD: &str = "packer";

/// Complete Packer template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildDescriptor {
    pub variables: BTreeMap<String, String>,
    pub builders: Vec<Builder>,
    pub provisioners: Vec<Provisioner>,
}

/// The `vsphere-iso` builder stanza
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Builder {
    #[serde(rename = "type")]
    pub builder_type: String,
    pub vcenter_server: String,
    pub username: String,
    pub password: String,
    pub datacenter: String,
    pub cluster: String,
    pub datastore: String,
    pub vm_name: String,
    pub network: String,
    pub folder: String,
    pub iso_datastore: String,
    pub iso_path: String,
    pub cpus: String,
    pub memory: String,
    pub disk_size: String,
    pub disk_thin_provisioned: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disk_additional_size: Option<Vec<String>>,
    pub guest_os_type: String,
    pub notes: String,
    pub boot_wait: String,
    pub boot_command: Vec<String>,
    pub http_directory: String,
    pub http_port_min: u16,
    pub http_port_max: u16,
    pub shutdown_command: String,
    pub communicator: String,
    pub ssh_username: String,
    pub ssh_password: String,
    pub ssh_port: u16,
    pub ssh_timeout: String,
    pub ssh_pty: bool,
}

/// A post-boot provisioning step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Provisioner {
    Shell {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        inline: Option<Vec<String>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        script: Option<String>,
    },
    File {
        source: String,
        destination: String,
    },
}

impl Provisioner {
    fn inline(commands: &[&str]) -> Self {
        Provisioner::Shell {
            inline: Some(commands.iter().map(|c| c.to_string()).collect()),
            script: None,
        }
    }

    fn script(path: &Path) -> Self {
        Provisioner::Shell {
            inline: None,
            script: Some(path.display().to_string()),
        }
    }
}

/// Packer user-variable reference, e.g. ``{{ user `vcenter_host` }}``
fn user_var(name: &str) -> String {
    format!("{{{{ user `{}` }}}}", name)
}

/// Render `config` into a Packer template rooted at `layout`
pub fn render(config: &ConfigDocument, layout: &PackerLayout) -> BuildDescriptor {
    let kind_text = config.get_text("template_type");
    let kind = kind_text
        .as_deref()
        .and_then(|text| text.parse::<TemplateKind>().ok());

    // The NFS catalog is a superset of the base one, so it names every variable
    let mut variables = BTreeMap::new();
    for param in parameters_for(TemplateKind::NfsServer) {
        let value = config
            .get_text(param.name)
            .or_else(|| param.default.map(str::to_string));
        if let Some(value) = value {
            variables.insert(param.name.to_string(), value);
        }
    }

    let disk_additional_size = variables
        .contains_key("additional_disk_size_gb")
        .then(|| vec![user_var("additional_disk_size_gb")]);

    let builder = Builder {
        builder_type: "vsphere-iso".to_string(),
        vcenter_server: user_var("vcenter_host"),
        username: user_var("vcenter_user"),
        password: user_var("vcenter_password"),
        datacenter: user_var("vcenter_datacenter"),
        cluster: user_var("vcenter_cluster"),
        datastore: user_var("vcenter_datastore"),
        vm_name: user_var("template_name"),
        network: user_var("vcenter_network"),
        folder: user_var("vcenter_folder"),
        iso_datastore: user_var("iso_datastore"),
        iso_path: user_var("iso_path"),
        cpus: user_var("cpu_cores"),
        memory: user_var("memory_mb"),
        disk_size: user_var("disk_size_gb"),
        disk_thin_provisioned: true,
        disk_additional_size,
        guest_os_type: config
            .get_text("guest_os_type")
            .unwrap_or_else(|| DEFAULT_GUEST_OS_TYPE.to_string()),
        notes: format!(
            "Template created for {}",
            kind_text.as_deref().unwrap_or("unknown")
        ),
        boot_wait: "10s".to_string(),
        boot_command: BOOT_COMMAND.iter().map(|s| s.to_string()).collect(),
        http_directory: layout.http_dir.display().to_string(),
        http_port_min: 8000,
        http_port_max: 9000,
        shutdown_command: format!("echo '{}' | sudo -S shutdown -P now", SSH_PASSWORD),
        communicator: "ssh".to_string(),
        ssh_username: SSH_USERNAME.to_string(),
        ssh_password: SSH_PASSWORD.to_string(),
        ssh_port: 22,
        ssh_timeout: "20m".to_string(),
        ssh_pty: true,
    };

    let mut provisioners = vec![
        Provisioner::inline(&["sleep 5"]),
        Provisioner::File {
            source: layout.scripts_dir.display().to_string(),
            destination: "/tmp/scripts".to_string(),
        },
        Provisioner::script(&layout.script("base-setup.sh")),
    ];
    if let Some(kind) = kind {
        provisioners.push(Provisioner::script(&layout.script(kind.prep_script())));
    }

    BuildDescriptor {
        variables,
        builders: vec![builder],
        provisioners,
    }
}

/// Write a descriptor as pretty-printed JSON
pub fn write_descriptor(descriptor: &BuildDescriptor, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(descriptor)
        .context("Failed to serialize build descriptor")?;
    fs::write(path, json)
        .with_context(|| format!("Failed to write build descriptor: {}", path.display()))?;
    Ok(())
}
