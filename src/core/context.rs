//! Execution context handed to every action on registration.

use crate::models::config::Config;
use crate::services::clock::{Clock, SystemClock};
use crate::services::l10n::{Catalog, Localizer, Passthrough};
use crate::services::storage::Storage;
use crate::utils::path::default_ignored_files;
use crate::Result;
use regex::Regex;
use std::sync::Arc;
use std::time::Duration;

/// Collaborator services and settings shared by the actions of a queue.
#[derive(Clone)]
pub struct Context {
    storage: Arc<dyn Storage>,
    clock: Arc<dyn Clock>,
    l10n: Arc<dyn Localizer>,
    ignored_files: Regex,
    time_granule: Duration,
}

impl Context {
    /// Context with the system clock, untranslated messages, and default settings.
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            clock: Arc::new(SystemClock),
            l10n: Arc::new(Passthrough),
            ignored_files: default_ignored_files().clone(),
            time_granule: Duration::from_secs(1),
        }
    }

    /// Context configured from a `Config`.
    pub fn from_config(storage: Arc<dyn Storage>, config: &Config) -> Result<Self> {
        let mut ctx = Self::new(storage)
            .with_ignored_files(Regex::new(&config.actions.ignored_files)?)
            .with_time_granule(Duration::from_millis(config.actions.time_granule_ms));

        if let Some(ref catalog) = config.l10n.catalog {
            ctx = ctx.with_localizer(Arc::new(Catalog::load(catalog)?));
        }
        Ok(ctx)
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_localizer(mut self, l10n: Arc<dyn Localizer>) -> Self {
        self.l10n = l10n;
        self
    }

    pub fn with_ignored_files(mut self, pattern: Regex) -> Self {
        self.ignored_files = pattern;
        self
    }

    pub fn with_time_granule(mut self, granule: Duration) -> Self {
        self.time_granule = granule;
        self
    }

    pub fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn ignored_files(&self) -> &Regex {
        &self.ignored_files
    }

    /// Minimum time a deletion interval has to span.
    pub fn time_granule(&self) -> Duration {
        self.time_granule
    }

    /// Localize a message template.
    pub fn t(&self, template: &str, args: &[&str]) -> String {
        self.l10n.t(template, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::memory::MemoryStorage;

    #[test]
    fn test_from_config() {
        let mut config = Config::default();
        config.actions.ignored_files = r"^\.keep$".to_string();
        config.actions.time_granule_ms = 10;

        let ctx = Context::from_config(Arc::new(MemoryStorage::new()), &config).unwrap();
        assert!(ctx.ignored_files().is_match(".keep"));
        assert!(!ctx.ignored_files().is_match("README"));
        assert_eq!(ctx.time_granule(), Duration::from_millis(10));
    }

    #[test]
    fn test_invalid_pattern() {
        let mut config = Config::default();
        config.actions.ignored_files = "(".to_string();
        assert!(Context::from_config(Arc::new(MemoryStorage::new()), &config).is_err());
    }
}
