// File: src/config.rs
// Purpose: Form configuration parsing from TOML

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::schema::{CompiledSchema, Schema, SchemaCompiler};

/// Construction options for a [`FormManager`](crate::FormManager)
///
/// ```toml
/// [schema]
/// unknown = "allow"
///
/// [schema.fields.firstName]
/// alphanum = true
/// min_length = 3
/// max_length = 30
/// required = true
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormConfig {
    /// Rule set; `None` disables validation and captures values as submitted
    #[serde(default)]
    pub schema: Option<Schema>,
}

impl FormConfig {
    pub fn with_schema(schema: Schema) -> Self {
        Self {
            schema: Some(schema),
        }
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse form config")
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read form config: {:?}", path))?;

        toml::from_str(&content).with_context(|| format!("Failed to parse form config: {:?}", path))
    }

    /// Load configuration, falling back to no schema if the file is missing or empty
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read form config: {:?}", path))?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        Self::from_toml_str(&content).with_context(|| format!("Invalid form config: {:?}", path))
    }

    /// Compile the schema, if any, without building a manager
    pub fn compile(&self) -> Result<Option<CompiledSchema>> {
        self.schema
            .as_ref()
            .map(SchemaCompiler::compile)
            .transpose()
            .context("Form schema does not compile")
    }
}
