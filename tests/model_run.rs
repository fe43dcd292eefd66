//! End-to-end runs against a stand-in GAMS executable.
//!
//! The stand-in is a shell script that prints the release banner, copies the
//! solver option file into the requested output file, and exits with a
//! configurable status. That is enough to exercise the full run pipeline:
//! input export, option-file handling, engine invocation, and solution
//! import.
#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use message_gams::config::{Config, EngineConfig, ModelConfig};
use message_gams::engine::{GamsEngine, GamsVersion};
use message_gams::model::SOLVER_OPTION_FILE;
use message_gams::{GamsModel, MemoryScenario, ModelError, ModelVariant};

fn fake_gams(dir: &Path, release: &str, exit_code: i32) -> PathBuf {
    let path = dir.join("gams");
    let script = format!(
        r#"#!/bin/sh
# Minimal stand-in for the GAMS executable.
echo "GAMS {release}  Copyright (C) 1987-2024 GAMS Development. All rights reserved"
out=""
for arg in "$@"; do
  case "$arg" in
    --out=*) out="${{arg#--out=}}" ;;
  esac
done
if [ -n "$out" ]; then
  if [ -f cplex.opt ]; then
    cat cplex.opt > "$out"
  else
    : > "$out"
  fi
fi
exit {exit_code}
"#
    );
    fs::write(&path, script).unwrap();
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
    path
}

fn driver_config(model_dir: &Path, gams: &Path) -> Config {
    Config {
        model: ModelConfig {
            dir: model_dir.to_path_buf(),
        },
        engine: EngineConfig {
            executable: gams.to_path_buf(),
        },
    }
}

#[tokio::test]
async fn release_probe_scrapes_the_banner() {
    let dir = tempfile::tempdir().unwrap();
    let gams = fake_gams(dir.path(), "36.1.0", 0);

    let release = GamsEngine::new(gams).release().await.unwrap();
    assert_eq!(release, GamsVersion::new(36, 1, 0));
}

#[tokio::test]
async fn message_run_solves_and_cleans_up() {
    let dir = tempfile::tempdir().unwrap();
    let model_dir = dir.path().join("model");
    fs::create_dir(&model_dir).unwrap();
    let gams = fake_gams(dir.path(), "36.1.0", 0);

    let mut scenario = MemoryScenario::new("canning problem", "standard");
    ModelVariant::Message.initialize(&mut scenario).unwrap();

    let model = GamsModel::new(ModelVariant::Message, &driver_config(&model_dir, &gams));
    let summary = model.run(&mut scenario).await.unwrap();

    assert_eq!(summary.case, "canning_problem_standard");
    assert_eq!(
        summary.in_file,
        model_dir.join("data/MsgData_canning_problem_standard.gdx")
    );
    assert_eq!(
        summary.out_file,
        model_dir.join("output/MsgOutput_canning_problem_standard.gdx")
    );

    // The scenario exported its data before the engine ran.
    let listing = fs::read_to_string(&summary.in_file).unwrap();
    assert!(listing.starts_with("* canning problem / standard"));
    assert!(listing.contains("par storage_loss"));

    // The option file was present while the engine ran...
    let solution = fs::read_to_string(&summary.out_file).unwrap();
    assert!(solution.contains("lpmethod = 2"));
    assert!(solution.contains("epopt = 1e-06"));
    // ...and is gone afterwards.
    assert!(!model_dir.join(SOLVER_OPTION_FILE).exists());

    assert!(scenario.has_solution());
}

#[tokio::test]
async fn solver_option_overrides_reach_the_option_file() {
    let dir = tempfile::tempdir().unwrap();
    let model_dir = dir.path().join("model");
    fs::create_dir(&model_dir).unwrap();
    let gams = fake_gams(dir.path(), "36.1.0", 0);

    let mut scenario = MemoryScenario::new("model", "baseline");
    let model = GamsModel::new(ModelVariant::Message, &driver_config(&model_dir, &gams))
        .with_solver_options([("threads", "8")]);
    let summary = model.run(&mut scenario).await.unwrap();

    let solution = fs::read_to_string(&summary.out_file).unwrap();
    assert!(solution.contains("threads = 8"));
    assert!(!solution.contains("threads = 4"));
}

#[tokio::test]
async fn engine_failure_reports_the_log_and_cleans_up() {
    let dir = tempfile::tempdir().unwrap();
    let model_dir = dir.path().join("model");
    fs::create_dir(&model_dir).unwrap();
    let gams = fake_gams(dir.path(), "36.1.0", 3);

    let mut scenario = MemoryScenario::new("model", "baseline");
    let model = GamsModel::new(ModelVariant::Message, &driver_config(&model_dir, &gams));
    let err = model.run(&mut scenario).await.unwrap_err();

    match err {
        ModelError::Engine { status, log_tail } => {
            assert_eq!(status.code(), Some(3));
            assert!(log_tail.contains("GAMS 36.1.0"));
        }
        other => panic!("unexpected error: {other}"),
    }

    // Cleanup happens on the failure path too.
    assert!(!model_dir.join(SOLVER_OPTION_FILE).exists());
    assert!(!scenario.has_solution());
}

#[tokio::test]
async fn macro_refuses_an_old_engine() {
    let dir = tempfile::tempdir().unwrap();
    let model_dir = dir.path().join("model");
    fs::create_dir(&model_dir).unwrap();
    let gams = fake_gams(dir.path(), "24.4.1", 0);

    let mut scenario = MemoryScenario::new("model", "baseline");
    let model = GamsModel::new(ModelVariant::Macro, &driver_config(&model_dir, &gams));
    let err = model.run(&mut scenario).await.unwrap_err();

    match err {
        ModelError::EngineTooOld {
            model,
            required,
            found,
        } => {
            assert_eq!(model, "MACRO");
            assert_eq!(required, GamsVersion::new(24, 8, 1));
            assert_eq!(found, GamsVersion::new(24, 4, 1));
        }
        other => panic!("unexpected error: {other}"),
    }

    // Refused before any file was touched.
    assert!(!model_dir.join("data").exists());
}

#[tokio::test]
async fn macro_runs_on_a_recent_engine() {
    let dir = tempfile::tempdir().unwrap();
    let model_dir = dir.path().join("model");
    fs::create_dir(&model_dir).unwrap();
    let gams = fake_gams(dir.path(), "24.8.1", 0);

    let mut scenario = MemoryScenario::new("model", "baseline");
    ModelVariant::Macro.initialize(&mut scenario).unwrap();

    let model = GamsModel::new(ModelVariant::Macro, &driver_config(&model_dir, &gams));
    let summary = model.run(&mut scenario).await.unwrap();

    assert_eq!(summary.case, "model_baseline");
    assert_eq!(
        summary.out_file,
        model_dir.join("output/MsgOutput_model_baseline.gdx")
    );
    assert!(scenario.has_solution());
}

#[tokio::test]
async fn temp_dir_runs_keep_the_model_dir_clean() {
    let dir = tempfile::tempdir().unwrap();
    let model_dir = dir.path().join("model");
    fs::create_dir(&model_dir).unwrap();
    let gams = fake_gams(dir.path(), "36.1.0", 0);

    let mut scenario = MemoryScenario::new("model", "baseline");
    let cfg = driver_config(&model_dir, &gams);
    let mut options = message_gams::ModelOptions::new(&model_dir);
    options.use_temp_dir = true;

    let model = GamsModel::new(ModelVariant::Message, &cfg).with_options(options);
    let summary = model.run(&mut scenario).await.unwrap();

    // The option file lived in the scratch directory, never in model_dir.
    assert!(!model_dir.join(SOLVER_OPTION_FILE).exists());
    // The engine still read it from its working directory.
    let solution = fs::read_to_string(&summary.out_file).unwrap();
    assert!(solution.contains("advind = 0"));
    assert!(scenario.has_solution());
}
