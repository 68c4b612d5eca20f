//! Check command implementation.

use crate::core::planner;
use crate::core::undoable::Undoable;
use crate::Result;
use colored::Colorize;
use std::path::Path;

/// Validate a plan file and print the actions it declares.
pub fn check(plan_file: &Path) -> Result<()> {
    println!("[INFO] Loading plan: {}", plan_file.display());
    let plan = planner::load_plan(plan_file)?;

    println!("  {} {}", "Version:".bold(), plan.version);
    if let Some(created_at) = plan.created_at {
        println!("  {} {}", "Created at:".bold(), created_at.to_rfc3339());
    }
    println!();

    for (idx, spec) in plan.actions.iter().enumerate() {
        let action = planner::build_action(spec.clone())
            .map_err(|e| crate::Error::InvalidPlanFile(format!("action {}: {}", idx + 1, e)))?;
        println!("  {:>3}. {}", idx + 1, action.describe());
    }

    println!();
    println!(
        "{}",
        format!("[OK] {} action(s) valid", plan.actions.len()).green()
    );
    Ok(())
}
