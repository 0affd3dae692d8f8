use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use intake_forms::FormData;
use tracing::debug;

use super::{load_manager, print_state, Entries};

pub fn execute(config_path: &Path, data: Option<&Path>, inline: &[String]) -> Result<()> {
    let mut form = load_manager(config_path)?;
    let mut event = FormData::new();

    if let Some(path) = data {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read submission data: {:?}", path))?;
        let entries: Entries = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse submission data: {:?}", path))?;

        for (name, value) in entries.into_pairs() {
            event.append(name, value);
        }
    }

    for assignment in inline {
        let (name, value) = parse_assignment(assignment)?;
        event.append(name, value);
    }

    debug!(?event, "Submitting");
    form.handle_submit(&mut event);
    print_state(form.state())
}

/// Splits `name=value` on the first `=`; the value may be empty
pub fn parse_assignment(assignment: &str) -> Result<(&str, &str)> {
    match assignment.split_once('=') {
        Some((name, _)) if name.is_empty() => bail!("Missing field name in {:?}", assignment),
        Some(pair) => Ok(pair),
        None => bail!("Expected NAME=VALUE, got {:?}", assignment),
    }
}
