//! State and helpers shared by the file system actions.

use crate::core::context::Context;
use crate::models::rollback::TimeInterval;
use crate::utils::path::filter_ignored;
use crate::{Error, Result};
use regex::Regex;

/// Context slot plus an optional per-action ignored-files override.
#[derive(Clone, Default)]
pub(crate) struct FsBase {
    ctx: Option<Context>,
    ignored_files: Option<Regex>,
}

impl FsBase {
    pub(crate) fn initialize(&mut self, ctx: &Context) {
        self.ctx = Some(ctx.clone());
    }

    pub(crate) fn ctx(&self, action: &str) -> Result<&Context> {
        self.ctx
            .as_ref()
            .ok_or_else(|| Error::Uninitialized(action.to_string()))
    }

    pub(crate) fn set_ignored_files(&mut self, pattern: Regex) {
        self.ignored_files = Some(pattern);
    }

    /// Folder listing without ignored files.
    pub(crate) fn significant_entries(&self, ctx: &Context, path: &str) -> Result<Vec<String>> {
        let pattern = self.ignored_files.as_ref().unwrap_or(ctx.ignored_files());
        Ok(filter_ignored(ctx.storage().list(path)?, pattern))
    }
}

/// Delete a node and return an interval spanning at least one time granule
/// around the deletion, so a second-resolution restore can find it.
pub(crate) fn timed_delete(ctx: &Context, path: &str) -> Result<TimeInterval> {
    let clock = ctx.clock();
    let start = clock.now();
    ctx.storage().delete(path)?;
    let mut end = clock.now();

    let granule = ctx.time_granule();
    let elapsed = (end - start).to_std().unwrap_or_default();
    if elapsed < granule {
        clock.sleep(granule - elapsed);
        end = clock.now();
    }

    Ok(TimeInterval::new(start, end))
}
