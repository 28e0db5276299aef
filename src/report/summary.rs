//! End-of-run summary table

use std::fmt;
use std::path::PathBuf;

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

/// What happened to the build step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildStatus {
    #[default]
    NotRun,
    Simulated,
    Succeeded,
    Failed,
}

impl fmt::Display for BuildStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            BuildStatus::NotRun => "not run",
            BuildStatus::Simulated => "simulated",
            BuildStatus::Succeeded => "succeeded",
            BuildStatus::Failed => "failed",
        };
        f.write_str(text)
    }
}

/// Facts collected while the wizard runs
#[derive(Debug, Default, Clone)]
pub struct RunSummary {
    pub action: Option<String>,
    pub config_path: Option<PathBuf>,
    pub config_saved: bool,
    pub edit_disposition: Option<String>,
    pub template_kind: Option<String>,
    pub template_name: Option<String>,
    pub selected_template: Option<String>,
    pub build: BuildStatus,
    pub completed: bool,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Label/value pairs in display order; unset facts are skipped
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        let mut rows = Vec::new();
        if let Some(action) = &self.action {
            rows.push(("Action", action.clone()));
        }
        if let Some(path) = &self.config_path {
            rows.push(("Configuration", path.display().to_string()));
            rows.push((
                "Saved",
                if self.config_saved { "yes" } else { "no" }.to_string(),
            ));
        }
        if let Some(disposition) = &self.edit_disposition {
            rows.push(("Changes", disposition.clone()));
        }
        if let Some(kind) = &self.template_kind {
            rows.push(("Template Type", kind.clone()));
        }
        if let Some(name) = &self.template_name {
            rows.push(("Template Name", name.clone()));
        }
        if let Some(selected) = &self.selected_template {
            rows.push(("Existing Template", selected.clone()));
        }
        rows.push(("Packer Build", self.build.to_string()));
        rows.push((
            "Outcome",
            if self.completed { "completed" } else { "cancelled" }.to_string(),
        ));
        rows
    }

    pub fn display(&self) {
        println!();
        println!(
            "    {} {}",
            style("📋").cyan(),
            style("RUN SUMMARY").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Step").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);

        for (label, value) in self.rows() {
            let cell = match (label, self.build) {
                ("Packer Build", BuildStatus::Failed) => Cell::new(value).fg(Color::Red),
                ("Packer Build", BuildStatus::Succeeded) => Cell::new(value).fg(Color::Green),
                ("Outcome", _) if self.completed => Cell::new(value)
                    .fg(Color::Green)
                    .add_attribute(Attribute::Bold),
                ("Outcome", _) => Cell::new(value).fg(Color::Yellow),
                _ => Cell::new(value),
            };
            table.add_row(vec![Cell::new(label), cell]);
        }

        // Indent the table
        for line in table.to_string().lines() {
            println!("    {}", line);
        }
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_skip_unset_facts() {
        let summary = RunSummary::new();
        assert_eq!(
            summary.rows(),
            vec![
                ("Packer Build", "not run".to_string()),
                ("Outcome", "cancelled".to_string()),
            ]
        );
    }

    #[test]
    fn test_rows_report_config_and_build() {
        let summary = RunSummary {
            action: Some("Create new configuration".to_string()),
            config_path: Some(PathBuf::from("config/custom.yaml")),
            config_saved: true,
            template_kind: Some("nfs-server".to_string()),
            template_name: Some("nfs-01".to_string()),
            build: BuildStatus::Simulated,
            completed: true,
            ..Default::default()
        };

        let rows = summary.rows();
        assert_eq!(rows[0], ("Action", "Create new configuration".to_string()));
        assert!(rows.contains(&("Saved", "yes".to_string())));
        assert!(rows.contains(&("Packer Build", "simulated".to_string())));
        assert_eq!(rows.last().unwrap(), &("Outcome", "completed".to_string()));
    }
}
