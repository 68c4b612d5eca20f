//! Integration tests for plan files.
//!
//! Tests cover:
//! - Plan save/load (JSON and TOML)
//! - Queue construction from a plan
//! - Running a plan through the CLI command

use chrono::{TimeZone, Utc};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use undoable::cli::commands::run::{run, RunOptions};
use undoable::core::planner::{build_queue, load_plan, save_plan};
use undoable::models::config::Config;
use undoable::models::plan::{ActionSpec, Plan};
use undoable::services::{MemoryStorage, Storage};
use undoable::{Context, Error};

fn provisioning_plan() -> Plan {
    Plan {
        version: "1.0".to_string(),
        created_at: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
        gracefully: false,
        actions: vec![
            ActionSpec::FolderCreate {
                path: "/orchestra/2024".to_string(),
                gracefully: false,
            },
            ActionSpec::FolderCreate {
                path: "/orchestra/2024/scores".to_string(),
                gracefully: false,
            },
        ],
    }
}

// ========== PLAN I/O TESTS ==========

#[test]
fn test_save_and_load_plan() {
    let plan = provisioning_plan();
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested").join("plan.json");

    save_plan(&plan, &path).unwrap();
    assert!(path.exists());

    let loaded = load_plan(&path).unwrap();
    assert_eq!(loaded.version, plan.version);
    assert_eq!(loaded.created_at, plan.created_at);
    assert_eq!(loaded.actions, plan.actions);
}

#[test]
fn test_load_toml_plan() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("plan.toml");
    fs::write(
        &path,
        r#"
version = "1.0"
gracefully = true

[[actions]]
op = "folder_create"
path = "/a"

[[actions]]
op = "file_rename"
from = "/x.txt"
to = "/a/x.txt"
mkdir = true
"#,
    )
    .unwrap();

    let plan = load_plan(&path).unwrap();
    assert!(plan.gracefully);
    assert_eq!(plan.actions.len(), 2);
    assert_eq!(
        plan.actions[1],
        ActionSpec::FileRename {
            from: "/x.txt".to_string(),
            to: "/a/x.txt".to_string(),
            gracefully: false,
            mkdir: true,
        }
    );
}

#[test]
fn test_load_nonexistent_plan() {
    let result = load_plan(&PathBuf::from("/nonexistent/plan.json"));
    assert!(result.is_err());
}

#[test]
fn test_plan_without_version_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("plan.json");
    fs::write(&path, r#"{"version": "", "actions": []}"#).unwrap();
    assert!(matches!(load_plan(&path), Err(Error::InvalidPlanFile(_))));
}

// ========== QUEUE CONSTRUCTION TESTS ==========

#[test]
fn test_build_queue_registers_in_order() {
    let storage = Arc::new(MemoryStorage::new());
    let mut queue = build_queue(&provisioning_plan(), Context::new(storage.clone())).unwrap();

    assert_eq!(queue.size(), 2);
    assert_eq!(
        queue.pending_actions(),
        vec![
            "create folder /orchestra/2024",
            "create folder /orchestra/2024/scores"
        ]
    );

    assert!(queue.execute_actions(false).unwrap());
    assert!(storage.exists("/orchestra/2024/scores").unwrap());
}

#[test]
fn test_build_queue_reports_bad_action() {
    let mut plan = provisioning_plan();
    plan.actions.push(ActionSpec::FileRemove {
        path: String::new(),
        gracefully: false,
    });

    let result = build_queue(&plan, Context::new(Arc::new(MemoryStorage::new())));
    match result {
        Err(Error::InvalidPlanFile(msg)) => assert!(msg.starts_with("action 3")),
        _ => panic!("expected an invalid plan error"),
    }
}

// ========== RUN COMMAND TESTS ==========

#[test]
fn test_run_command_rolls_back_on_failure() {
    let root = TempDir::new().unwrap();
    let plans = TempDir::new().unwrap();

    let mut plan = provisioning_plan();
    plan.actions.push(ActionSpec::FileRemove {
        path: "/missing.txt".to_string(),
        gracefully: false,
    });
    let plan_path = plans.path().join("plan.json");
    save_plan(&plan, &plan_path).unwrap();

    let mut config = Config::default();
    config.actions.time_granule_ms = 0;

    let succeeded = run(&plan_path, root.path(), &config, RunOptions::default()).unwrap();
    assert!(!succeeded);
    assert!(!root.path().join("orchestra/2024").exists());
    assert!(root.path().join("orchestra").exists());
}

#[test]
fn test_run_command_keep_on_failure() {
    let root = TempDir::new().unwrap();
    let plans = TempDir::new().unwrap();

    let mut plan = provisioning_plan();
    plan.actions.push(ActionSpec::FileRemove {
        path: "/missing.txt".to_string(),
        gracefully: false,
    });
    let plan_path = plans.path().join("plan.json");
    save_plan(&plan, &plan_path).unwrap();

    let options = RunOptions {
        gracefully: false,
        keep_on_failure: true,
    };
    let succeeded = run(&plan_path, root.path(), &Config::default(), options).unwrap();
    assert!(!succeeded);
    assert!(root.path().join("orchestra/2024/scores").exists());
}

#[test]
fn test_run_command_success() {
    let root = TempDir::new().unwrap();
    let plans = TempDir::new().unwrap();
    let plan_path = plans.path().join("plan.json");
    save_plan(&provisioning_plan(), &plan_path).unwrap();

    let succeeded = run(&plan_path, root.path(), &Config::default(), RunOptions::default()).unwrap();
    assert!(succeeded);
    assert!(root.path().join("orchestra/2024/scores").is_dir());
}
