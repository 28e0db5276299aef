//! End-to-end wizard flows driven by scripted answers

use std::fs;

use k3s_deploy::config::{load_config, ConfigDocument};
use k3s_deploy::error::PromptError;
use k3s_deploy::orchestrator::{Orchestrator, RunOptions, SectionOutcome};
use k3s_deploy::packer::PackerManager;
use k3s_deploy::report::BuildStatus;
use serde_yaml_ng::{Mapping, Value};

mod common;

use common::{deploy_dir, sample_config, scripted, transcript, write_config};

#[test]
fn test_edit_for_this_run_leaves_file_untouched() {
    let (_temp, paths) = deploy_dir();
    let path = write_config(&paths.config_dir, "default.yaml", &sample_config());
    let path_text = path.display().to_string();

    let prompter = scripted(&[
        "1", path_text.as_str(), "y", "memory_mb", "8192", "done", "2", "y", "y",
    ]);
    let mut orchestrator = Orchestrator::new(paths, prompter);

    assert_eq!(orchestrator.run().unwrap(), SectionOutcome::Completed);
    assert_eq!(
        orchestrator.current_config().get("memory_mb"),
        Some(&Value::from(8192))
    );
    assert_eq!(load_config(&path).get("memory_mb"), Some(&Value::from(4096)));

    let summary = orchestrator.summary();
    assert_eq!(summary.build, BuildStatus::Simulated);
    assert_eq!(summary.template_name.as_deref(), Some("k3s-base"));
    assert!(!summary.config_saved);
    assert!(summary.completed);
}

#[test]
fn test_edit_written_permanently() {
    let (_temp, paths) = deploy_dir();
    let path = write_config(&paths.config_dir, "default.yaml", &sample_config());
    let path_text = path.display().to_string();

    let prompter = scripted(&[
        "1", path_text.as_str(), "y", "cpu_cores", "8", "done", "1", "y", "y",
    ]);
    let mut orchestrator = Orchestrator::new(paths, prompter);

    assert_eq!(orchestrator.run().unwrap(), SectionOutcome::Completed);
    let saved = load_config(&path);
    assert_eq!(saved.get("cpu_cores"), Some(&Value::from(8)));
    assert_eq!(saved.len(), 15);
    assert!(orchestrator.summary().config_saved);
}

#[test]
fn test_discard_reloads_original() {
    let (_temp, paths) = deploy_dir();
    let path = write_config(&paths.config_dir, "default.yaml", &sample_config());
    let path_text = path.display().to_string();

    let prompter = scripted(&[
        "1", path_text.as_str(), "y", "template_name", "scratch", "done", "4", "y", "y",
    ]);
    let mut orchestrator = Orchestrator::new(paths, prompter);

    assert_eq!(orchestrator.run().unwrap(), SectionOutcome::Completed);
    assert_eq!(orchestrator.current_config(), &sample_config());
    assert_eq!(
        orchestrator.summary().template_name.as_deref(),
        Some("k3s-base")
    );
}

#[test]
fn test_return_to_editing_keeps_earlier_edits() {
    let (_temp, paths) = deploy_dir();
    let path = write_config(&paths.config_dir, "default.yaml", &sample_config());
    let path_text = path.display().to_string();

    let prompter = scripted(&[
        "1",
        path_text.as_str(),
        "y",
        "memory_mb",
        "2048",
        "done",
        "3",
        "disk_size_gb",
        "80",
        "done",
        "2",
        "y",
        "y",
    ]);
    let mut orchestrator = Orchestrator::new(paths, prompter);

    assert_eq!(orchestrator.run().unwrap(), SectionOutcome::Completed);
    let config = orchestrator.current_config();
    assert_eq!(config.get("memory_mb"), Some(&Value::from(2048)));
    assert_eq!(config.get("disk_size_gb"), Some(&Value::from(80)));
}

#[test]
fn test_unknown_parameter_is_not_added() {
    let (_temp, paths) = deploy_dir();
    let path = write_config(&paths.config_dir, "default.yaml", &sample_config());
    let path_text = path.display().to_string();

    let prompter = scripted(&[
        "1", path_text.as_str(), "y", "gpu_count", "DONE", "2", "y", "y",
    ]);
    let mut orchestrator = Orchestrator::new(paths, prompter);

    assert_eq!(orchestrator.run().unwrap(), SectionOutcome::Completed);
    assert!(!orchestrator.current_config().contains_key("gpu_count"));
    assert_eq!(orchestrator.current_config().len(), 15);

    let out = transcript(orchestrator.into_prompter());
    assert!(!out.contains("Enter new value for gpu_count"));
}

#[test]
fn test_edit_prompt_offers_current_value() {
    let (_temp, paths) = deploy_dir();
    let path = write_config(&paths.config_dir, "default.yaml", &sample_config());
    let path_text = path.display().to_string();

    // Empty answer keeps the current value
    let prompter = scripted(&[
        "1", path_text.as_str(), "y", "memory_mb", "", "done", "2", "y", "y",
    ]);
    let mut orchestrator = Orchestrator::new(paths, prompter);

    assert_eq!(orchestrator.run().unwrap(), SectionOutcome::Completed);
    assert_eq!(
        orchestrator.current_config().get("memory_mb"),
        Some(&Value::from(4096))
    );

    let out = transcript(orchestrator.into_prompter());
    assert!(out.contains("Enter new value for memory_mb [4096]:"));
}

#[test]
fn test_no_modification_goes_straight_to_build() {
    let (_temp, paths) = deploy_dir();
    write_config(&paths.config_dir, "default.yaml", &sample_config());

    // Empty path answer takes the default config/default.yaml
    let prompter = scripted(&["1", "", "n", "y", "y"]);
    let mut orchestrator = Orchestrator::new(paths, prompter);

    assert_eq!(orchestrator.run().unwrap(), SectionOutcome::Completed);
    assert_eq!(orchestrator.current_config(), &sample_config());
    assert!(orchestrator.summary().edit_disposition.is_none());
}

#[test]
fn test_configured_path_is_the_default() {
    let (temp, paths) = deploy_dir();
    let path = write_config(temp.path(), "elsewhere.yaml", &sample_config());

    let prompter = scripted(&["1", "", "n", "y", "y"]);
    let mut orchestrator = Orchestrator::new(paths, prompter).with_options(RunOptions {
        config_path: Some(path.clone()),
        ..RunOptions::default()
    });

    assert_eq!(orchestrator.run().unwrap(), SectionOutcome::Completed);
    assert_eq!(orchestrator.summary().config_path.as_ref(), Some(&path));
}

#[test]
fn test_create_new_nfs_config() {
    let (temp, paths) = deploy_dir();
    let save_path = temp.path().join("config").join("nfs.yaml");
    let save_text = save_path.display().to_string();

    let prompter = scripted(&[
        "2",
        save_text.as_str(),
        "2",
        "nfs-01",
        "vcenter.lab.local",
        "administrator@vsphere.local",
        "s3cret",
        "dc1",
        "cluster1",
        "ssd-01",
        "VM Network",
        "",
        "iso-store",
        "iso/debian-12.iso",
        "",
        "8192",
        "",
        "500",
        "y",
        "y",
        "y",
    ]);
    let mut orchestrator = Orchestrator::new(paths, prompter);

    assert_eq!(orchestrator.run().unwrap(), SectionOutcome::Completed);

    let saved = load_config(&save_path);
    assert_eq!(saved.get_text("template_type").as_deref(), Some("nfs-server"));
    assert_eq!(saved.get("cpu_cores"), Some(&Value::from(2)));
    assert_eq!(saved.get("memory_mb"), Some(&Value::from(8192)));
    assert_eq!(saved.get("disk_size_gb"), Some(&Value::from(40)));
    assert_eq!(saved.get("additional_disk_size_gb"), Some(&Value::from(500)));
    // Skipped optional answer is left out
    assert!(!saved.contains_key("vcenter_folder"));
    assert_eq!(saved.len(), 15);

    let summary = orchestrator.summary();
    assert!(summary.config_saved);
    assert_eq!(summary.template_kind.as_deref(), Some("nfs-server"));
}

#[test]
fn test_create_new_config_not_saved_is_cancelled() {
    let (temp, paths) = deploy_dir();
    let save_path = temp.path().join("unsaved.yaml");
    let save_text = save_path.display().to_string();

    let mut answers = vec!["2", save_text.as_str(), "1", "k3s-01"];
    answers.extend(std::iter::repeat("").take(13));
    answers.push("n");
    let mut orchestrator = Orchestrator::new(paths, scripted(&answers));

    assert_eq!(orchestrator.run().unwrap(), SectionOutcome::Cancelled);
    assert!(!save_path.exists());
    assert!(!orchestrator.summary().completed);
}

#[test]
fn test_gather_prompts_every_k3s_parameter() {
    let (_temp, paths) = deploy_dir();

    let mut answers = vec!["1"];
    answers.extend(std::iter::repeat("x").take(11));
    answers.extend(["", "", ""]);
    let mut orchestrator = Orchestrator::new(paths, scripted(&answers));

    let config = orchestrator.gather_template_parameters().unwrap();
    assert_eq!(config.get_text("template_type").as_deref(), Some("k3s-node"));
    assert_eq!(config.len(), 15);
    assert!(!config.contains_key("additional_disk_size_gb"));

    let out = transcript(orchestrator.into_prompter());
    assert!(out.contains("Name for the VM template (template_name):"));
    assert!(out.contains("Number of CPU cores (cpu_cores) [2]:"));
    assert!(!out.contains("additional_disk_size_gb"));
}

#[test]
fn test_missing_config_is_cancelled() {
    let (temp, paths) = deploy_dir();
    let missing = temp.path().join("missing.yaml").display().to_string();

    let mut orchestrator = Orchestrator::new(paths, scripted(&["1", missing.as_str()]));

    assert_eq!(orchestrator.run().unwrap(), SectionOutcome::Cancelled);
    assert!(orchestrator.current_config().is_empty());
    assert_eq!(orchestrator.summary().build, BuildStatus::NotRun);
}

#[test]
fn test_use_existing_template_without_templates_is_cancelled() {
    let (_temp, paths) = deploy_dir();

    let mut orchestrator = Orchestrator::new(paths, scripted(&["3"]));
    assert_eq!(orchestrator.run().unwrap(), SectionOutcome::Cancelled);
}

#[test]
fn test_use_existing_template_selects_one() {
    let (_temp, paths) = deploy_dir();
    fs::write(paths.packer.templates_dir.join("nfs-01.json"), "{}").unwrap();
    fs::write(paths.packer.templates_dir.join("k3s-base.json"), "{}").unwrap();

    let mut orchestrator = Orchestrator::new(paths, scripted(&["3", "2", "y"]));

    assert_eq!(orchestrator.run().unwrap(), SectionOutcome::Completed);
    assert_eq!(
        orchestrator.current_config().get_text("selected_template").as_deref(),
        Some("nfs-01")
    );
    let summary = orchestrator.summary();
    assert_eq!(summary.selected_template.as_deref(), Some("nfs-01"));
    assert_eq!(summary.build, BuildStatus::NotRun);
}

#[test]
fn test_declining_build_is_cancelled() {
    let (_temp, paths) = deploy_dir();
    let mut orchestrator = Orchestrator::new(paths, scripted(&["n"]));

    let outcome = orchestrator.proceed_with_build(sample_config()).unwrap();
    assert_eq!(outcome, SectionOutcome::Cancelled);
    assert_eq!(orchestrator.summary().build, BuildStatus::NotRun);
    // Configuration is still recorded for the caller
    assert_eq!(orchestrator.current_config(), &sample_config());
}

#[test]
fn test_declining_next_stage_is_cancelled() {
    let (_temp, paths) = deploy_dir();
    let mut orchestrator = Orchestrator::new(paths, scripted(&["y", "n"]));

    let outcome = orchestrator.proceed_with_build(sample_config()).unwrap();
    assert_eq!(outcome, SectionOutcome::Cancelled);
    assert_eq!(orchestrator.summary().build, BuildStatus::Simulated);
}

#[test]
fn test_proceed_with_empty_config() {
    let (_temp, paths) = deploy_dir();
    let mut orchestrator = Orchestrator::new(paths, scripted(&["y", "y"]));

    let outcome = orchestrator
        .proceed_with_build(ConfigDocument::new())
        .unwrap();
    assert_eq!(outcome, SectionOutcome::Completed);
    assert!(orchestrator.summary().template_name.is_none());
}

#[test]
fn test_end_of_input_interrupts_run() {
    let (_temp, paths) = deploy_dir();
    let mut orchestrator = Orchestrator::new(paths, scripted(&["1"]));

    let err = orchestrator.run().unwrap_err();
    assert!(matches!(err, PromptError::Interrupted));
}

#[cfg(unix)]
#[test]
fn test_execute_build_runs_packer() {
    let (_temp, paths) = deploy_dir();
    let packer = PackerManager::new(paths.packer.clone()).with_executable("true");
    let template_file = paths.packer.template_file("k3s-base");

    let mut orchestrator = Orchestrator::new(paths, scripted(&["y", "y"]))
        .with_packer(packer)
        .with_options(RunOptions {
            execute_build: true,
            ..RunOptions::default()
        });

    let outcome = orchestrator.proceed_with_build(sample_config()).unwrap();
    assert_eq!(outcome, SectionOutcome::Completed);
    assert_eq!(orchestrator.summary().build, BuildStatus::Succeeded);
    assert!(template_file.exists());
}

#[cfg(unix)]
#[test]
fn test_failed_build_is_cancelled() {
    let (_temp, paths) = deploy_dir();
    let packer = PackerManager::new(paths.packer.clone()).with_executable("false");

    let mut orchestrator = Orchestrator::new(paths, scripted(&["y"]))
        .with_packer(packer)
        .with_options(RunOptions {
            execute_build: true,
            ..RunOptions::default()
        });

    let outcome = orchestrator.proceed_with_build(sample_config()).unwrap();
    assert_eq!(outcome, SectionOutcome::Cancelled);
    assert_eq!(orchestrator.summary().build, BuildStatus::Failed);
}

#[test]
fn test_keeping_shown_value_preserves_its_type() {
    let (_temp, paths) = deploy_dir();

    let mut network = Mapping::new();
    network.insert("vlan".into(), 42.into());
    let mut config = sample_config();
    config.insert("network", network.clone());
    config.insert("ssh_pty", true);
    let path = write_config(&paths.config_dir, "default.yaml", &config);
    let path_text = path.display().to_string();

    // Enter on both prompts, then write the document back
    let prompter = scripted(&[
        "1",
        path_text.as_str(),
        "y",
        "network",
        "",
        "ssh_pty",
        "",
        "done",
        "1",
        "y",
        "y",
    ]);
    let mut orchestrator = Orchestrator::new(paths, prompter);

    assert_eq!(orchestrator.run().unwrap(), SectionOutcome::Completed);
    let current = orchestrator.current_config();
    assert_eq!(current.get("network"), Some(&Value::Mapping(network.clone())));
    assert_eq!(current.get("ssh_pty"), Some(&Value::Bool(true)));

    let saved = load_config(&path);
    assert_eq!(saved, config);
}
