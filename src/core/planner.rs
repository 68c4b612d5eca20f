//! Plan loading and queue construction.

use super::action::Action;
use super::actions::{FolderCreate, NodeRemove, Rename};
use super::context::Context;
use super::run_queue::UndoableRunQueue;
use crate::models::plan::{ActionSpec, Plan};
use crate::{Error, Result};
use std::fs;
use std::io::Write;
use std::path::Path;

/// Plan format version written by `save_plan`.
pub const PLAN_VERSION: &str = "1.0";

fn require_path(op: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(Error::InvalidArgument(format!("{} needs a path", op)));
    }
    Ok(())
}

/// Turn a declared action into a queueable one.
pub fn build_action(spec: ActionSpec) -> Result<Action> {
    let op = spec.op_name();
    let action: Action = match spec {
        ActionSpec::FolderCreate { path, gracefully } => {
            require_path(op, &path)?;
            FolderCreate::new(path).gracefully(gracefully).into()
        }
        ActionSpec::FolderRemove {
            path,
            gracefully,
            recursive,
        } => {
            require_path(op, &path)?;
            NodeRemove::folder(path)
                .gracefully(gracefully)
                .recursive(recursive)
                .into()
        }
        ActionSpec::FileRemove { path, gracefully } => {
            require_path(op, &path)?;
            NodeRemove::file(path).gracefully(gracefully).into()
        }
        ActionSpec::NodeRemove {
            path,
            gracefully,
            recursive,
        } => {
            require_path(op, &path)?;
            NodeRemove::node(path)
                .gracefully(gracefully)
                .recursive(recursive)
                .into()
        }
        ActionSpec::FileRename {
            from,
            to,
            gracefully,
            mkdir,
        } => {
            require_path(op, &format!("{}{}", from, to))?;
            Rename::file(from, to).gracefully(gracefully).mkdir(mkdir).into()
        }
        ActionSpec::FolderRename {
            from,
            to,
            gracefully,
            mkdir,
        } => {
            require_path(op, &format!("{}{}", from, to))?;
            Rename::folder(from, to)
                .gracefully(gracefully)
                .mkdir(mkdir)
                .into()
        }
    };
    Ok(action)
}

/// Build a run-queue holding every action of a plan.
pub fn build_queue(plan: &Plan, ctx: Context) -> Result<UndoableRunQueue> {
    let mut queue = UndoableRunQueue::new(ctx);
    for (idx, spec) in plan.actions.iter().enumerate() {
        let action = build_action(spec.clone())
            .map_err(|e| Error::InvalidPlanFile(format!("action {}: {}", idx + 1, e)))?;
        queue.register(action);
    }
    Ok(queue)
}

fn is_toml(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("toml"))
        .unwrap_or(false)
}

/// Load a plan from a `.json` or `.toml` file.
pub fn load_plan(path: &Path) -> Result<Plan> {
    let content = fs::read_to_string(path)?;
    let plan: Plan = if is_toml(path) {
        toml::from_str(&content)?
    } else {
        serde_json::from_str(&content)?
    };

    if plan.version.is_empty() {
        return Err(Error::InvalidPlanFile(format!(
            "{}: missing version",
            path.display()
        )));
    }
    if plan.version != PLAN_VERSION {
        tracing::warn!(
            "Plan version {} differs from supported version {}",
            plan.version,
            PLAN_VERSION
        );
    }
    Ok(plan)
}

/// Save a plan as JSON.
pub fn save_plan(plan: &Plan, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(plan)?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut file = fs::File::create(path)?;
    file.write_all(json.as_bytes())?;

    tracing::info!("Plan saved to {:?}", path);
    Ok(())
}
