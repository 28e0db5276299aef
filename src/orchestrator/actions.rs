//! Menu entries offered by the orchestrator

/// Entry menu of the Packer section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryAction {
    /// Load a saved configuration, optionally edit it, then build
    BuildFromExistingConfig,
    /// Run the parameter wizard and save the result
    CreateNewConfig,
    /// Pick a template that already exists on disk
    UseExistingTemplate,
}

impl EntryAction {
    pub const ALL: [EntryAction; 3] = [
        EntryAction::BuildFromExistingConfig,
        EntryAction::CreateNewConfig,
        EntryAction::UseExistingTemplate,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            EntryAction::BuildFromExistingConfig => "Create new template",
            EntryAction::CreateNewConfig => "Create new configuration",
            EntryAction::UseExistingTemplate => "Use existing template",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.label() == label)
    }
}

/// What to do with edits made to a loaded configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditDisposition {
    WritePermanently,
    UseForThisRun,
    ReturnToEditing,
    Discard,
}

impl EditDisposition {
    pub const ALL: [EditDisposition; 4] = [
        EditDisposition::WritePermanently,
        EditDisposition::UseForThisRun,
        EditDisposition::ReturnToEditing,
        EditDisposition::Discard,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            EditDisposition::WritePermanently => "Write changes to config permanently",
            EditDisposition::UseForThisRun => "Use changes only for this run",
            EditDisposition::ReturnToEditing => "Return to editing",
            EditDisposition::Discard => "Discard changes",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.label() == label)
    }
}
