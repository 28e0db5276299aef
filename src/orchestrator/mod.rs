//! Deployment orchestration
//!
//! Drives the Packer section of the deployment: pick an action, gather or
//! edit a template configuration, then build (or simulate building) the
//! template. Every branch that reaches a build goes through
//! [`Orchestrator::proceed_with_build`], which asks for confirmation twice:
//! once before building and once before handing off to the next stage.
//!
//! The next stages (Terraform, Ansible, Helm) are not driven from here; a
//! completed run only means the operator is ready to continue.

mod actions;

use std::path::{Path, PathBuf};

use console::style;
use tracing::{error, info};

pub use actions::{EditDisposition, EntryAction};

use crate::cli::Prompter;
use crate::config::{
    display_value, load_config, print_config, save_config, ConfigDocument, DeployPaths,
};
use crate::error::PromptError;
use crate::packer::{parameters_for, PackerManager, TemplateKind};
use crate::report::{BuildStatus, RunSummary};
use crate::utils::{
    print_completion, print_directories, print_error, print_header, print_info, print_section,
    print_success, print_warning,
};

/// Sentinel that ends the editing loop
pub const DONE_SENTINEL: &str = "done";

/// How the Packer section ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionOutcome {
    /// Ready to hand off to the next stage
    Completed,
    /// The operator declined somewhere, or a required input was missing
    Cancelled,
}

/// Settings that come from the command line rather than the prompts
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Offered as the default path when building from an existing config
    pub config_path: Option<PathBuf>,
    /// Run Packer for real instead of simulating the build
    pub execute_build: bool,
    /// Extra variable file passed to real builds
    pub var_file: Option<PathBuf>,
}

/// Top-level wizard state
pub struct Orchestrator<P> {
    paths: DeployPaths,
    packer: PackerManager,
    prompter: P,
    options: RunOptions,
    current_config: ConfigDocument,
    summary: RunSummary,
}

impl<P: Prompter> Orchestrator<P> {
    pub fn new(paths: DeployPaths, prompter: P) -> Self {
        let packer = PackerManager::new(paths.packer.clone());
        Self {
            paths,
            packer,
            prompter,
            options: RunOptions::default(),
            current_config: ConfigDocument::new(),
            summary: RunSummary::new(),
        }
    }

    pub fn with_options(mut self, options: RunOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_packer(mut self, packer: PackerManager) -> Self {
        self.packer = packer;
        self
    }

    /// Configuration the run ended up with (empty if none was chosen)
    pub fn current_config(&self) -> &ConfigDocument {
        &self.current_config
    }

    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }

    pub fn into_prompter(self) -> P {
        self.prompter
    }

    /// Run the wizard end to end and print the summary
    pub fn run(&mut self) -> Result<SectionOutcome, PromptError> {
        print_header("K3s INFRASTRUCTURE DEPLOYMENT ORCHESTRATION");
        print_directories(&self.paths);

        let outcome = self.packer_section()?;
        match outcome {
            SectionOutcome::Completed => {
                print_header("PACKER SECTION COMPLETED");
                print_completion();
                info!("Packer section completed");
            }
            SectionOutcome::Cancelled => {
                print_header("PACKER SECTION CANCELLED");
                print_warning("Deployment cancelled by user");
                info!("Packer section cancelled");
            }
        }

        self.summary.completed = outcome == SectionOutcome::Completed;
        self.summary.display();
        Ok(outcome)
    }

    /// Offer the three entry actions and follow the chosen branch
    pub fn packer_section(&mut self) -> Result<SectionOutcome, PromptError> {
        print_header("PACKER SECTION - VM TEMPLATE CREATION");

        let labels: Vec<String> = EntryAction::ALL.iter().map(|a| a.label().to_string()).collect();
        let choice = self.prompter.choose("What would you like to do?", &labels)?;
        let action = EntryAction::from_label(&choice).unwrap_or(EntryAction::CreateNewConfig);
        info!("Selected action: {}", action.label());
        self.summary.action = Some(action.label().to_string());

        match action {
            EntryAction::BuildFromExistingConfig => self.build_from_existing_config(),
            EntryAction::CreateNewConfig => self.create_new_config(),
            EntryAction::UseExistingTemplate => self.use_existing_template(),
        }
    }

    fn build_from_existing_config(&mut self) -> Result<SectionOutcome, PromptError> {
        print_section("Create New Template from Existing Config");

        let default_path = self
            .options
            .config_path
            .clone()
            .unwrap_or_else(|| self.paths.default_config_file());
        let config_path = PathBuf::from(self.prompter.ask(
            "Enter configuration file path",
            Some(&default_path.display().to_string()),
        )?);
        self.summary.config_path = Some(config_path.clone());

        let config = load_config(&config_path);
        if config.is_empty() {
            print_error(&format!(
                "No configuration loaded from {}",
                config_path.display()
            ));
            return Ok(SectionOutcome::Cancelled);
        }

        print_section("Current Configuration Parameters");
        print_config(&config);

        if !self
            .prompter
            .confirm("Do you want to modify any parameters?")?
        {
            return self.proceed_with_build(config);
        }

        self.edit_parameters(config, &config_path)
    }

    fn create_new_config(&mut self) -> Result<SectionOutcome, PromptError> {
        print_section("Create New Configuration");

        let default_path = self.paths.new_config_file();
        let save_path = PathBuf::from(self.prompter.ask(
            "Enter path where to save the configuration",
            Some(&default_path.display().to_string()),
        )?);
        self.summary.config_path = Some(save_path.clone());

        let config = self.gather_template_parameters()?;

        print_section("New Configuration Parameters");
        print_config(&config);

        if self.prompter.confirm("Save this configuration?")? && save_config(&config, &save_path)
        {
            self.summary.config_saved = true;
            return self.proceed_with_build(config);
        }

        Ok(SectionOutcome::Cancelled)
    }

    /// Ask for the template kind and then every catalog parameter for it.
    ///
    /// Empty answers without a default leave the parameter out.
    pub fn gather_template_parameters(&mut self) -> Result<ConfigDocument, PromptError> {
        print_section("Template Configuration Wizard");

        let kinds: Vec<String> = TemplateKind::ALL.iter().map(|k| k.to_string()).collect();
        let choice = self.prompter.choose("Select template type", &kinds)?;
        let kind: TemplateKind = choice.parse().unwrap_or(TemplateKind::K3sNode);

        let mut config = ConfigDocument::new();
        config.insert("template_type", kind.as_str());

        println!();
        println!("{}", style("Enter template parameters:").bold());
        println!();

        for param in parameters_for(kind) {
            let prompt = format!("{} ({})", param.description, param.name);
            let value = self.prompter.ask(&prompt, param.default)?;
            if !value.is_empty() {
                config.set_parameter(param.name, &value);
            }
        }

        Ok(config)
    }

    /// Editing loop for a loaded configuration.
    ///
    /// Collects `name -> value` edits until [`DONE_SENTINEL`], then applies
    /// the chosen disposition. "Return to editing" goes round again with the
    /// edits made so far.
    fn edit_parameters(
        &mut self,
        mut config: ConfigDocument,
        config_path: &Path,
    ) -> Result<SectionOutcome, PromptError> {
        loop {
            loop {
                let name = self.prompter.ask(
                    &format!(
                        "Enter parameter name to change (or '{}' to continue)",
                        DONE_SENTINEL
                    ),
                    None,
                )?;
                if name.eq_ignore_ascii_case(DONE_SENTINEL) {
                    break;
                }

                let Some(current) = config.get(&name).map(display_value) else {
                    print_error("Parameter not found");
                    continue;
                };
                let value = self
                    .prompter
                    .ask(&format!("Enter new value for {}", name), Some(&current))?;
                // Keeping the shown value must not flatten it to text
                if value == current {
                    print_info("Value unchanged");
                    continue;
                }
                config.set_parameter(&name, &value);
                info!("Parameter updated: {}", name);
                print_success("Parameter updated");
            }

            let labels: Vec<String> = EditDisposition::ALL
                .iter()
                .map(|d| d.label().to_string())
                .collect();
            let choice = self
                .prompter
                .choose("What would you like to do with these changes?", &labels)?;
            let disposition =
                EditDisposition::from_label(&choice).unwrap_or(EditDisposition::ReturnToEditing);
            self.summary.edit_disposition = Some(disposition.label().to_string());

            match disposition {
                EditDisposition::WritePermanently => {
                    if !save_config(&config, config_path) {
                        print_error("Could not write the configuration");
                        return Ok(SectionOutcome::Cancelled);
                    }
                    self.summary.config_saved = true;
                    return self.proceed_with_build(config);
                }
                EditDisposition::UseForThisRun => {
                    info!("Using modified configuration for this run only");
                    return self.proceed_with_build(config);
                }
                EditDisposition::ReturnToEditing => continue,
                EditDisposition::Discard => {
                    info!("Changes discarded");
                    let original = load_config(config_path);
                    return self.proceed_with_build(original);
                }
            }
        }
    }

    fn use_existing_template(&mut self) -> Result<SectionOutcome, PromptError> {
        print_section("Use Existing Template");

        let templates = self.packer.available_templates();
        if templates.is_empty() {
            error!(
                "No Packer templates found in {}",
                self.packer.layout().templates_dir.display()
            );
            return Ok(SectionOutcome::Cancelled);
        }

        let selected = self
            .prompter
            .choose("Select template to use", &templates)?;
        print_success(&format!("Using template: {}", selected));
        info!("Selected existing template: {}", selected);

        self.current_config
            .insert("selected_template", selected.as_str());
        self.summary.selected_template = Some(selected);

        self.proceed_to_next_stage()
    }

    /// Final confirmation before building, then the build itself
    pub fn proceed_with_build(
        &mut self,
        config: ConfigDocument,
    ) -> Result<SectionOutcome, PromptError> {
        self.current_config = config;
        self.summary.template_kind = self.current_config.get_text("template_type");
        self.summary.template_name = self.current_config.get_text("template_name");

        if !self
            .prompter
            .confirm("Proceed with Packer template creation?")?
        {
            return Ok(SectionOutcome::Cancelled);
        }

        print_section("Building Packer Template");
        let kind = self.summary.template_kind.as_deref().unwrap_or("unknown");
        let name = self.summary.template_name.as_deref().unwrap_or("unknown");

        if self.options.execute_build {
            let built = self
                .packer
                .build(&self.current_config, self.options.var_file.as_deref());
            if !built {
                self.summary.build = BuildStatus::Failed;
                print_error("Packer build failed, see the log for details");
                return Ok(SectionOutcome::Cancelled);
            }
            self.summary.build = BuildStatus::Succeeded;
            print_success(&format!("Template {} built", name));
        } else {
            print_success("Packer build would run here");
            print_info(&format!("Template Type: {}", kind));
            print_info(&format!("Template Name: {}", name));
            self.summary.build = BuildStatus::Simulated;
            info!("Build simulated; pass --execute-build to run Packer");
        }
        info!("Packer build configured: {}", name);

        self.proceed_to_next_stage()
    }

    fn proceed_to_next_stage(&mut self) -> Result<SectionOutcome, PromptError> {
        if self.prompter.confirm("Proceed to Terraform section?")? {
            Ok(SectionOutcome::Completed)
        } else {
            Ok(SectionOutcome::Cancelled)
        }
    }
}
