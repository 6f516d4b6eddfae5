use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::storage::config::ConfigError;

pub trait Translator {
    fn translate(&self, key: &str) -> String;

    /// Translates `key`, then fills each `%s` with the next argument.
    fn translate_with(&self, key: &str, args: &[&str]) -> String {
        substitute(&self.translate(key), args)
    }
}

/// Translation table loaded from a flat TOML file of `"key" = "text"` pairs.
/// Keys without an entry translate to themselves.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    entries: HashMap<String, String>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, key: &str, text: &str) -> Self {
        self.entries.insert(key.to_string(), text.to_string());
        self
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let catalog = Self::from_toml(&content)?;
        tracing::debug!("Loaded {} translations from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Translator for Catalog {
    fn translate(&self, key: &str) -> String {
        self.entries
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}

fn substitute(template: &str, args: &[&str]) -> String {
    let mut output = String::with_capacity(template.len());
    let mut args = args.iter();
    let mut rest = template;

    while let Some(pos) = rest.find("%s") {
        output.push_str(&rest[..pos]);
        match args.next() {
            Some(arg) => output.push_str(arg),
            None => output.push_str("%s"),
        }
        rest = &rest[pos + 2..];
    }
    output.push_str(rest);

    output
}
