//! Template parameter catalog
//!
//! Fixed, ordered list of the parameters collected for each template kind,
//! and the rule that turns typed-in sizes and counts into integers.

use std::fmt;
use std::str::FromStr;

use serde_yaml_ng::Value;

use crate::error::CatalogError;

/// Kind of VM template the wizard can configure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateKind {
    /// Standard K3s cluster node
    K3sNode,
    /// NFS storage node with a secondary data disk
    NfsServer,
}

impl TemplateKind {
    /// All kinds, in menu order
    pub const ALL: [TemplateKind; 2] = [TemplateKind::K3sNode, TemplateKind::NfsServer];

    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateKind::K3sNode => "k3s-node",
            TemplateKind::NfsServer => "nfs-server",
        }
    }

    /// Name of the kind-specific preparation script under `packer/scripts`
    pub fn prep_script(&self) -> &'static str {
        match self {
            TemplateKind::K3sNode => "k3s-prep.sh",
            TemplateKind::NfsServer => "nfs-prep.sh",
        }
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemplateKind {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "k3s-node" => Ok(TemplateKind::K3sNode),
            "nfs-server" => Ok(TemplateKind::NfsServer),
            other => Err(CatalogError::UnknownKind(other.to_string())),
        }
    }
}

/// A single template parameter the wizard asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parameter {
    pub name: &'static str,
    pub description: &'static str,
    /// Value offered when the user just presses enter
    pub default: Option<&'static str>,
}

impl Parameter {
    const fn new(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            description,
            default: None,
        }
    }

    const fn with_default(
        name: &'static str,
        description: &'static str,
        default: &'static str,
    ) -> Self {
        Self {
            name,
            description,
            default: Some(default),
        }
    }
}

const BASE_PARAMETERS: [Parameter; 14] = [
    Parameter::new("template_name", "Name for the VM template"),
    Parameter::new("vcenter_host", "vCenter host FQDN"),
    Parameter::new("vcenter_user", "vCenter username"),
    Parameter::new("vcenter_password", "vCenter password"),
    Parameter::new("vcenter_datacenter", "vCenter datacenter name"),
    Parameter::new("vcenter_cluster", "vCenter cluster name"),
    Parameter::new("vcenter_datastore", "vCenter datastore for OS disk"),
    Parameter::new("vcenter_network", "vCenter network name"),
    Parameter::new("vcenter_folder", "vCenter folder path"),
    Parameter::new("iso_datastore", "Datastore containing ISO"),
    Parameter::new("iso_path", "Path to Debian ISO file"),
    Parameter::with_default("cpu_cores", "Number of CPU cores", "2"),
    Parameter::with_default("memory_mb", "Memory in MB", "4096"),
    Parameter::with_default("disk_size_gb", "OS disk size in GB", "40"),
];

const NFS_DATA_DISK: Parameter = Parameter::new(
    "additional_disk_size_gb",
    "Additional storage disk size in GB (for NFS)",
);

/// Parameters collected for `kind`, in prompt order
pub fn parameters_for(kind: TemplateKind) -> Vec<Parameter> {
    let mut params = BASE_PARAMETERS.to_vec();
    if kind == TemplateKind::NfsServer {
        params.push(NFS_DATA_DISK);
    }
    params
}

/// Whether values for `name` are sizes or counts stored as integers
pub fn is_numeric_parameter(name: &str) -> bool {
    name.ends_with("_mb") || name.ends_with("_gb") || name == "cpu_cores"
}

/// Convert raw user input for `name` into the value stored in the config.
///
/// Numeric parameters become integers when the text parses as one; anything
/// else is kept verbatim.
pub fn coerce_parameter(name: &str, raw: &str) -> Value {
    if is_numeric_parameter(name) {
        if let Ok(n) = raw.trim().parse::<i64>() {
            return Value::from(n);
        }
    }
    Value::String(raw.to_string())
}
