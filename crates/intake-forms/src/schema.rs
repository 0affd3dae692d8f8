// File: src/schema.rs
// Purpose: Declarative field rules and the validator they compile into

use std::collections::BTreeMap;

use intake_rules::{self as rules, EmailPolicy};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::error::InvalidSchemaError;
use crate::state::FieldValues;

/// Whole-form validation: collects every issue on every field.
///
/// Implemented by [`CompiledSchema`]; the form manager depends only on this
/// trait so any rule engine can stand behind it.
pub trait Validator {
    /// Validates the whole value map without stopping at the first issue.
    ///
    /// The returned [`Validation`] always carries the sanitized values, even
    /// when issues were found.
    fn validate(&self, data: &FieldValues) -> Validation;

    /// Validates one value against that field's rule alone.
    ///
    /// Returns `None` when the field has no rule. Stops at the first issue.
    fn validate_field(&self, field: &str, value: &str) -> Option<Result<String, Issue>>;
}

/// Something that compiles into a [`Validator`], failing if malformed
pub trait SchemaCompiler {
    type Output: Validator;

    fn compile(&self) -> Result<Self::Output, InvalidSchemaError>;
}

/// What to do with submitted keys that have no rule
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownKeys {
    /// Report `"<key>" is not allowed` and keep the value
    #[default]
    Reject,
    /// Keep the value verbatim
    Allow,
    /// Drop the value from the sanitized output
    Strip,
}

/// Email constraints beyond the address shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmailRule {
    #[serde(default = "default_min_domain_segments", alias = "minDomainSegments")]
    pub min_domain_segments: usize,

    /// Accepted top level domains. `None` accepts any.
    #[serde(default)]
    pub tlds: Option<Vec<String>>,
}

fn default_min_domain_segments() -> usize {
    rules::DEFAULT_MIN_DOMAIN_SEGMENTS
}

impl Default for EmailRule {
    fn default() -> Self {
        Self {
            min_domain_segments: default_min_domain_segments(),
            tlds: None,
        }
    }
}

impl EmailRule {
    pub fn min_domain_segments(mut self, segments: usize) -> Self {
        self.min_domain_segments = segments;
        self
    }

    pub fn tlds<I, S>(mut self, tlds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tlds = Some(tlds.into_iter().map(Into::into).collect());
        self
    }
}

/// `email = true` in a config file, or a full `email = { ... }` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EmailSetting {
    Enabled(bool),
    Rule(EmailRule),
}

impl EmailSetting {
    fn resolve(&self) -> Option<EmailRule> {
        match self {
            Self::Enabled(true) => Some(EmailRule::default()),
            Self::Enabled(false) => None,
            Self::Rule(rule) => Some(rule.clone()),
        }
    }
}

/// Rule for a single string field
///
/// Every option is off by default. Builder methods mirror the config keys:
///
/// ```ignore
/// FieldRule::string().alphanum().min_length(3).max_length(30).required()
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FieldRule {
    /// Name used in messages (defaults to the field name)
    pub label: Option<String>,
    pub required: bool,
    #[serde(alias = "allowEmpty")]
    pub allow_empty: bool,
    pub trim: bool,
    pub lowercase: bool,
    pub uppercase: bool,
    pub alphanum: bool,
    #[serde(alias = "minLength")]
    pub min_length: Option<usize>,
    #[serde(alias = "maxLength")]
    pub max_length: Option<usize>,
    pub email: Option<EmailSetting>,
    pub pattern: Option<String>,
    #[serde(alias = "oneOf")]
    pub one_of: Option<Vec<String>>,
    /// Replaces the message of every issue on this field
    pub message: Option<String>,
}

impl FieldRule {
    pub fn string() -> Self {
        Self::default()
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn allow_empty(mut self) -> Self {
        self.allow_empty = true;
        self
    }

    pub fn trim(mut self) -> Self {
        self.trim = true;
        self
    }

    pub fn lowercase(mut self) -> Self {
        self.lowercase = true;
        self
    }

    pub fn uppercase(mut self) -> Self {
        self.uppercase = true;
        self
    }

    pub fn alphanum(mut self) -> Self {
        self.alphanum = true;
        self
    }

    pub fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    pub fn email(mut self, rule: EmailRule) -> Self {
        self.email = Some(EmailSetting::Rule(rule));
        self
    }

    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn one_of<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.one_of = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Field name to rule mapping plus the unknown-key policy
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Schema {
    #[serde(default)]
    pub unknown: UnknownKeys,

    #[serde(default)]
    pub fields: BTreeMap<String, FieldRule>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: impl Into<String>, rule: FieldRule) -> Self {
        self.fields.insert(name.into(), rule);
        self
    }

    pub fn unknown(mut self, policy: UnknownKeys) -> Self {
        self.unknown = policy;
        self
    }
}

impl SchemaCompiler for Schema {
    type Output = CompiledSchema;

    fn compile(&self) -> Result<CompiledSchema, InvalidSchemaError> {
        let mut fields = BTreeMap::new();

        for (name, rule) in &self.fields {
            let compiled = compile_rule(name, rule).map_err(|err| {
                warn!(error = %err, "Rejected form schema");
                err
            })?;
            fields.insert(name.clone(), compiled);
        }

        Ok(CompiledSchema {
            fields,
            unknown: self.unknown,
        })
    }
}

/// One validation failure, addressed by path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub path: Vec<String>,
    pub message: String,
}

impl Issue {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: vec![field.into()],
            message: message.into(),
        }
    }

    /// First path segment, the key the error map uses
    pub fn field(&self) -> Option<&str> {
        self.path.first().map(String::as_str)
    }
}

/// Result of a whole-form validation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Validation {
    /// Sanitized values: normalized for ruled fields, unknown keys per policy
    pub value: FieldValues,
    pub issues: Vec<Issue>,
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn into_result(self) -> Result<FieldValues, Vec<Issue>> {
        if self.issues.is_empty() {
            Ok(self.value)
        } else {
            Err(self.issues)
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Case {
    Lower,
    Upper,
}

#[derive(Debug, Clone)]
struct CompiledRule {
    label: String,
    required: bool,
    allow_empty: bool,
    trim: bool,
    case: Option<Case>,
    alphanum: bool,
    min_length: Option<usize>,
    max_length: Option<usize>,
    email: Option<EmailRule>,
    pattern: Option<Regex>,
    one_of: Option<Vec<String>>,
    message: Option<String>,
}

/// Outcome of checking one field
struct Checked {
    value: Option<String>,
    messages: Vec<String>,
}

impl CompiledRule {
    fn check(&self, raw: Option<&str>, abort_early: bool) -> Checked {
        let Some(raw) = raw else {
            let messages = if self.required {
                vec![self.describe(format!("\"{}\" is required", self.label))]
            } else {
                Vec::new()
            };
            return Checked { value: None, messages };
        };

        let value = self.normalize(raw);

        if value.is_empty() {
            let messages = if self.allow_empty {
                Vec::new()
            } else {
                vec![self.describe(format!("\"{}\" is not allowed to be empty", self.label))]
            };
            return Checked {
                value: Some(value),
                messages,
            };
        }

        let mut messages = self.violations(&value);
        if abort_early {
            messages.truncate(1);
        }

        Checked {
            value: Some(value),
            messages: messages.into_iter().map(|m| self.describe(m)).collect(),
        }
    }

    fn normalize(&self, raw: &str) -> String {
        let value = if self.trim { raw.trim() } else { raw };

        match self.case {
            Some(Case::Lower) => value.to_lowercase(),
            Some(Case::Upper) => value.to_uppercase(),
            None => value.to_string(),
        }
    }

    /// Every rule the value breaks, in evaluation order
    fn violations(&self, value: &str) -> Vec<String> {
        let label = &self.label;
        let mut found = Vec::new();

        if self.alphanum && !rules::is_alphanumeric(value) {
            found.push(format!("\"{label}\" must only contain alpha-numeric characters"));
        }

        if let Some(min) = self.min_length {
            if !rules::validate_min_length(value, min) {
                found.push(format!("\"{label}\" length must be at least {min} characters long"));
            }
        }

        if let Some(max) = self.max_length {
            if !rules::validate_max_length(value, max) {
                found.push(format!(
                    "\"{label}\" length must be less than or equal to {max} characters long"
                ));
            }
        }

        if let Some(email) = &self.email {
            let policy = EmailPolicy::new(email.min_domain_segments, email.tlds.as_deref());
            if !rules::satisfies_email_policy(value, &policy) {
                found.push(format!("\"{label}\" must be a valid email"));
            }
        }

        if let Some(pattern) = &self.pattern {
            if !pattern.is_match(value) {
                found.push(format!(
                    "\"{label}\" with value \"{value}\" fails to match the required pattern: /{}/",
                    pattern.as_str()
                ));
            }
        }

        if let Some(allowed) = &self.one_of {
            if !rules::is_one_of(value, allowed) {
                found.push(format!("\"{label}\" must be one of [{}]", allowed.join(", ")));
            }
        }

        found
    }

    fn describe(&self, default: String) -> String {
        self.message.clone().unwrap_or(default)
    }
}

fn compile_rule(name: &str, rule: &FieldRule) -> Result<CompiledRule, InvalidSchemaError> {
    if name.trim().is_empty() {
        return Err(InvalidSchemaError::EmptyFieldName);
    }

    if let (Some(min), Some(max)) = (rule.min_length, rule.max_length) {
        if min > max {
            return Err(InvalidSchemaError::LengthBounds {
                field: name.to_string(),
                min,
                max,
            });
        }
    }

    let case = match (rule.lowercase, rule.uppercase) {
        (true, true) => {
            return Err(InvalidSchemaError::ConflictingCase {
                field: name.to_string(),
            })
        }
        (true, false) => Some(Case::Lower),
        (false, true) => Some(Case::Upper),
        (false, false) => None,
    };

    let email = rule.email.as_ref().and_then(EmailSetting::resolve);
    if let Some(email) = &email {
        if email.min_domain_segments == 0 {
            return Err(InvalidSchemaError::ZeroDomainSegments {
                field: name.to_string(),
            });
        }
        if matches!(&email.tlds, Some(tlds) if tlds.is_empty()) {
            return Err(InvalidSchemaError::EmptyTldList {
                field: name.to_string(),
            });
        }
    }

    if matches!(&rule.one_of, Some(values) if values.is_empty()) {
        return Err(InvalidSchemaError::EmptyAllowList {
            field: name.to_string(),
        });
    }

    let pattern = rule
        .pattern
        .as_deref()
        .map(|source| {
            Regex::new(source).map_err(|err| InvalidSchemaError::BadPattern {
                field: name.to_string(),
                pattern: source.to_string(),
                reason: err.to_string(),
            })
        })
        .transpose()?;

    Ok(CompiledRule {
        label: rule.label.clone().unwrap_or_else(|| name.to_string()),
        required: rule.required,
        allow_empty: rule.allow_empty,
        trim: rule.trim,
        case,
        alphanum: rule.alphanum,
        min_length: rule.min_length,
        max_length: rule.max_length,
        email,
        pattern,
        one_of: rule.one_of.clone(),
        message: rule.message.clone(),
    })
}

/// A [`Schema`] whose rules have been checked and whose patterns are compiled
#[derive(Debug, Clone)]
pub struct CompiledSchema {
    fields: BTreeMap<String, CompiledRule>,
    unknown: UnknownKeys,
}

impl CompiledSchema {
    pub fn has_rule(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn unknown_keys(&self) -> UnknownKeys {
        self.unknown
    }
}

impl Validator for CompiledSchema {
    fn validate(&self, data: &FieldValues) -> Validation {
        let mut value = FieldValues::new();
        let mut issues = Vec::new();

        for (name, rule) in &self.fields {
            let checked = rule.check(data.get(name).map(String::as_str), false);
            trace!(field = %name, issues = checked.messages.len(), "Checked field");

            if let Some(v) = checked.value {
                value.insert(name.clone(), v);
            }
            issues.extend(checked.messages.into_iter().map(|m| Issue::new(name.as_str(), m)));
        }

        for (name, raw) in data.iter().filter(|(name, _)| !self.fields.contains_key(*name)) {
            match self.unknown {
                UnknownKeys::Reject => {
                    issues.push(Issue::new(name.as_str(), format!("\"{name}\" is not allowed")));
                    value.insert(name.clone(), raw.clone());
                }
                UnknownKeys::Allow => {
                    value.insert(name.clone(), raw.clone());
                }
                UnknownKeys::Strip => {}
            }
        }

        Validation { value, issues }
    }

    fn validate_field(&self, field: &str, value: &str) -> Option<Result<String, Issue>> {
        let rule = self.fields.get(field)?;
        let checked = rule.check(Some(value), true);

        Some(match checked.messages.into_iter().next() {
            Some(message) => Err(Issue::new(field, message)),
            None => Ok(checked.value.unwrap_or_default()),
        })
    }
}
