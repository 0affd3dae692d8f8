use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use intake_forms::FormConfig;

pub fn execute(config_path: &Path) -> Result<()> {
    let config = FormConfig::from_file(config_path)?;

    let Some(compiled) = config.compile().with_context(|| format!("{:?}", config_path))? else {
        println!("{} {}", "✓".green(), "No schema: values are captured without validation".yellow());
        return Ok(());
    };

    println!("{} {}", "✓".green().bold(), "Schema compiles".green().bold());
    println!("Unknown keys: {:?}", compiled.unknown_keys());
    println!("Fields:");
    for field in compiled.field_names() {
        println!("  • {}", field.cyan());
    }

    Ok(())
}
