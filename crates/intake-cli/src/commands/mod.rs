pub mod check;
pub mod replay;
pub mod submit;

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use intake_forms::{FormConfig, FormManager, FormState};
use serde::Deserialize;

/// Submission entries: `[[name, value], ...]` or `{ "name": "value" }`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Entries {
    Pairs(Vec<(String, String)>),
    Object(BTreeMap<String, String>),
}

impl Entries {
    pub fn into_pairs(self) -> Vec<(String, String)> {
        match self {
            Entries::Pairs(pairs) => pairs,
            Entries::Object(map) => map.into_iter().collect(),
        }
    }
}

/// Loads the config and builds the manager, failing on a malformed schema
pub fn load_manager(config: &Path) -> Result<FormManager> {
    let config = FormConfig::from_file(config)?;
    FormManager::new(config).context("Form schema does not compile")
}

pub fn print_state(state: &FormState) -> Result<()> {
    let status = if state.errors.is_empty() {
        "valid".green().bold()
    } else {
        format!("{} invalid field(s)", state.errors.len()).red().bold()
    };

    eprintln!("{} {}", "Form state:".cyan(), status);
    println!("{}", serde_json::to_string_pretty(state)?);

    Ok(())
}
