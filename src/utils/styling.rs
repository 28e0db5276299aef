//! Terminal styling utilities for headers, sections and status lines

use console::{style, Emoji};

use crate::config::DeployPaths;

// Emoji icons with fallbacks for terminals that don't support them
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "[*] ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", ">> ");
pub static FOLDER: Emoji<'_, '_> = Emoji("📂 ", "");
pub static GEAR: Emoji<'_, '_> = Emoji("⚙️  ", "");
pub static PACKAGE: Emoji<'_, '_> = Emoji("📦 ", "");

const HEADER_WIDTH: usize = 70;

/// Print a full-width banner header
pub fn print_header(text: &str) {
    let rule = "═".repeat(HEADER_WIDTH);
    println!();
    println!("{}", style(&rule).magenta().bold());
    println!(
        "{}",
        style(format!("{:^width$}", text, width = HEADER_WIDTH))
            .magenta()
            .bold()
    );
    println!("{}", style(&rule).magenta().bold());
    println!();
}

/// Print a section marker
pub fn print_section(text: &str) {
    println!();
    println!("{} {}", style(">>>").cyan().bold(), style(text).cyan().bold());
    println!();
}

/// Print the directory card shown when a run starts
pub fn print_directories(paths: &DeployPaths) {
    println!(
        "{}{} {}",
        FOLDER,
        style("Base Directory:").bold(),
        paths.base_dir.display()
    );
    println!(
        "{}{} {}",
        GEAR,
        style("Config Directory:").bold(),
        paths.config_dir.display()
    );
    println!(
        "{}{} {}",
        PACKAGE,
        style("Packer Directory:").bold(),
        paths.packer.root.display()
    );
    println!();
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("    {} {}", style("✓").green().bold(), style(message).green());
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("    {} {}", INFO, message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("    {} {}", style("!").yellow().bold(), style(message).yellow());
}

/// Print an error message
pub fn print_error(message: &str) {
    println!("    {} {}", style("✗").red().bold(), style(message).red());
}

/// Print the final completion message
pub fn print_completion() {
    println!();
    println!(
        "    {} {}",
        ROCKET,
        style("Ready to proceed to next section").green().bold()
    );
    println!();
}
