//! k3s-deploy: K3s Infrastructure Deployment CLI
//!
//! Walks an operator through creating Packer VM templates before the
//! Terraform, Ansible and Helm stages.

use std::io::{self, IsTerminal};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use console::{style, Term};
use tracing::{error, info, warn};

use k3s_deploy::cli::{Cli, LinePrompter, Prompter, TermPrompter};
use k3s_deploy::error::PromptError;
use k3s_deploy::orchestrator::{Orchestrator, RunOptions};
use k3s_deploy::packer::{build_in_progress, PackerManager};
use k3s_deploy::utils::init_logging;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match init_logging(&cli.log_dir) {
        Ok(path) => info!("Logging to {}", path.display()),
        Err(e) => eprintln!(
            "{} could not set up log file in {}: {}",
            style("warning:").yellow().bold(),
            cli.log_dir.display(),
            e
        ),
    }

    if let Err(e) = install_interrupt_handler() {
        warn!("{:#}", e);
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if is_interrupt(&e) => {
            report_interrupt();
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Fatal error: {:?}", e);
            eprintln!("\n{}", style(format!("Fatal error: {:#}", e)).red());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let paths = cli.paths();
    let packer = PackerManager::new(paths.packer.clone()).with_executable(&cli.packer_bin);
    let options = RunOptions {
        config_path: cli.config.clone(),
        execute_build: cli.execute_build,
        // Packer runs from its own directory
        var_file: cli
            .var_file
            .as_deref()
            .map(|p| std::path::absolute(p).unwrap_or_else(|_| p.to_path_buf())),
    };

    // Dialoguer widgets need a real terminal; piped input gets plain menus
    let prompter: Box<dyn Prompter> = if io::stdin().is_terminal() && Term::stdout().is_term() {
        Box::new(TermPrompter::new())
    } else {
        Box::new(LinePrompter::new(io::stdin().lock(), io::stdout()))
    };

    let mut orchestrator = Orchestrator::new(paths, prompter)
        .with_packer(packer)
        .with_options(options);
    orchestrator.run().context("Wizard aborted")?;
    Ok(())
}

fn is_interrupt(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<PromptError>(),
        Some(PromptError::Interrupted)
    )
}

fn report_interrupt() {
    info!("Deployment interrupted by user");
    println!(
        "\n\n{}",
        style("Deployment interrupted by user").yellow()
    );
}

/// Ctrl-C outside a dialoguer widget arrives as a signal.
///
/// While Packer runs, the signal reaches it as well; the wizard waits for it
/// to stop and the failed build cancels the section.
fn install_interrupt_handler() -> Result<()> {
    ctrlc::set_handler(|| {
        if build_in_progress() {
            warn!("Interrupt received, waiting for Packer to stop");
            return;
        }
        let _ = Term::stdout().show_cursor();
        report_interrupt();
        std::process::exit(0);
    })
    .context("Failed to set Ctrl-C handler")
}
