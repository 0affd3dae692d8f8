// File: src/state.rs
// Purpose: Form state record and the reducer that replaces it on every event

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::schema::Issue;

/// Field names to current values
pub type FieldValues = BTreeMap<String, String>;

/// Field names to error messages. Presence means the field is invalid.
pub type FieldErrors = BTreeMap<String, String>;

/// Field names to "one-shot blur validation is armed"
pub type ListenerFlags = BTreeMap<String, bool>;

/// Everything the form knows, replaced whole on each transition
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormState {
    pub values: FieldValues,
    pub errors: FieldErrors,
    pub listeners: ListenerFlags,
}

/// State transitions, one per event outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormAction {
    /// Submit without a schema: values replaced, errors untouched
    Captured { values: FieldValues },
    /// Submit with a schema: values and errors both replaced
    Validated { values: FieldValues, errors: FieldErrors },
    /// Focus armed a one-shot blur validation for the field
    Armed { field: String },
    /// Blur validation found an issue
    BlurFailed { field: String, message: String },
    /// Blur validation passed
    BlurPassed { field: String },
}

impl FormState {
    /// Returns the state that follows `action`, leaving `self` untouched
    pub fn reduce(&self, action: FormAction) -> FormState {
        match action {
            FormAction::Captured { values } => FormState {
                values,
                ..self.clone()
            },
            FormAction::Validated { values, errors } => FormState {
                values,
                errors,
                listeners: self.listeners.clone(),
            },
            FormAction::Armed { field } => {
                let mut listeners = self.listeners.clone();
                listeners.insert(field, true);
                FormState {
                    listeners,
                    ..self.clone()
                }
            }
            FormAction::BlurFailed { field, message } => {
                let mut errors = self.errors.clone();
                let mut listeners = self.listeners.clone();
                errors.insert(field.clone(), message);
                listeners.insert(field, false);
                FormState {
                    values: self.values.clone(),
                    errors,
                    listeners,
                }
            }
            FormAction::BlurPassed { field } => {
                let mut errors = self.errors.clone();
                let mut listeners = self.listeners.clone();
                errors.remove(&field);
                listeners.insert(field, false);
                FormState {
                    values: self.values.clone(),
                    errors,
                    listeners,
                }
            }
        }
    }

    pub fn is_armed(&self, field: &str) -> bool {
        self.listeners.get(field).copied().unwrap_or(false)
    }

    /// Where a field sits in the focus/blur cycle
    pub fn phase(&self, field: &str) -> FieldPhase<'_> {
        if self.is_armed(field) {
            FieldPhase::AwaitingBlur
        } else if let Some(message) = self.errors.get(field) {
            FieldPhase::Invalid(message)
        } else {
            FieldPhase::Untouched
        }
    }
}

/// Per-field view of the state machine
///
/// `Untouched -> AwaitingBlur -> Untouched | Invalid -> AwaitingBlur -> ...`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldPhase<'a> {
    Untouched,
    AwaitingBlur,
    Invalid(&'a str),
}

/// Folds issues into an error map keyed by each issue's first path segment.
/// A later issue for the same field replaces an earlier one.
pub fn errors_from_issues(issues: &[Issue]) -> FieldErrors {
    issues.iter().fold(FieldErrors::new(), |mut errors, issue| {
        if let Some(field) = issue.field() {
            errors.insert(field.to_string(), issue.message.clone());
        }
        errors
    })
}
