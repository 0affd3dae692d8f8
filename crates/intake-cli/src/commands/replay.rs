use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use intake_forms::{FormData, FormManager, InputTarget, PendingBlurs};
use serde::Deserialize;
use tracing::{debug, info};

use super::{load_manager, print_state, Entries};

/// One recorded view event
#[derive(Debug, Deserialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum Event {
    Focus { name: String },
    Blur { name: String, #[serde(default)] value: String },
    Submit { entries: Entries },
}

pub fn execute(config_path: &Path, events_path: &Path) -> Result<()> {
    let mut form = load_manager(config_path)?;

    let content = fs::read_to_string(events_path)
        .with_context(|| format!("Failed to read event log: {:?}", events_path))?;
    let events = parse_events(&content)?;

    let registered = replay(&mut form, events);
    info!(registered, "Replay finished");

    print_state(form.state())
}

/// Parses JSON Lines, skipping blank lines and `#` comments
pub fn parse_events(content: &str) -> Result<Vec<Event>> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty() && !line.trim_start().starts_with('#'))
        .map(|(index, line)| {
            serde_json::from_str(line).with_context(|| format!("Invalid event on line {}", index + 1))
        })
        .collect()
}

/// Feeds events to the form. Returns how many blur listeners were registered.
///
/// A blur only reaches the form if a focus registered a listener for that
/// field and it has not fired yet, as a one-time DOM listener would behave.
pub fn replay(form: &mut FormManager, events: Vec<Event>) -> usize {
    let mut pending = PendingBlurs::new();
    let mut registered = 0;

    for event in events {
        match event {
            Event::Focus { name } => {
                if form.handle_focus(&InputTarget::new(name.as_str(), ""), &mut pending) {
                    registered += 1;
                }
            }
            Event::Blur { name, value } => {
                if pending.fire(&name) {
                    form.handle_blur(&InputTarget::new(name, value));
                } else {
                    debug!(field = %name, "No listener attached, blur ignored");
                }
            }
            Event::Submit { entries } => {
                let mut data = FormData::from_pairs(entries.into_pairs());
                form.handle_submit(&mut data);
            }
        }
    }

    registered
}
