//! Localization service for human-readable error messages.

use crate::Result;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Translates message templates. Placeholders are positional: `{0}`, `{1}`, ...
pub trait Localizer: Send + Sync {
    fn t(&self, template: &str, args: &[&str]) -> String;
}

/// Replace positional placeholders in a template.
pub fn substitute(template: &str, args: &[&str]) -> String {
    args.iter()
        .enumerate()
        .fold(template.to_string(), |acc, (idx, arg)| {
            acc.replace(&format!("{{{}}}", idx), arg)
        })
}

/// Returns templates untranslated.
#[derive(Debug, Default, Clone, Copy)]
pub struct Passthrough;

impl Localizer for Passthrough {
    fn t(&self, template: &str, args: &[&str]) -> String {
        substitute(template, args)
    }
}

/// Message catalog file format.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    messages: HashMap<String, String>,
}

/// Template-to-translation table, loaded from TOML:
///
/// ```toml
/// [messages]
/// "Folder \"{0}\" already exists." = "Der Ordner \"{0}\" existiert bereits."
/// ```
#[derive(Debug, Default, Clone)]
pub struct Catalog {
    messages: HashMap<String, String>,
}

impl Catalog {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(content)?;
        Ok(Self {
            messages: file.messages,
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl Localizer for Catalog {
    fn t(&self, template: &str, args: &[&str]) -> String {
        let translated = self
            .messages
            .get(template)
            .map(String::as_str)
            .unwrap_or(template);
        substitute(translated, args)
    }
}
