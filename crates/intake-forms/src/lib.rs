// File: src/lib.rs
// Purpose: Validated form state manager for intake forms

//! Intake Forms
//!
//! Tracks field values, runs schema validation on submit and on field blur,
//! and exposes validation errors for display. The view layer owns the DOM and
//! reports events through the traits in [`events`].
//!
//! ```ignore
//! use intake_forms::{FieldRule, FormConfig, FormData, FormManager, Schema};
//!
//! let schema = Schema::new()
//!     .field("firstName", FieldRule::string().alphanum().min_length(3).required());
//! let mut form = FormManager::new(FormConfig::with_schema(schema))?;
//!
//! let mut event = FormData::from_pairs([("firstName", "Al")]);
//! form.handle_submit(&mut event);
//! assert!(form.errors().contains_key("firstName"));
//! ```

pub mod config;
pub mod error;
pub mod events;
pub mod manager;
pub mod schema;
pub mod state;

pub use config::FormConfig;
pub use error::InvalidSchemaError;
pub use events::{BlurRegistrar, FieldTarget, FormData, InputTarget, NoopRegistrar, PendingBlurs, SubmitEvent};
pub use manager::FormManager;
pub use schema::{
    CompiledSchema, EmailRule, EmailSetting, FieldRule, Issue, Schema, SchemaCompiler, UnknownKeys, Validation,
    Validator,
};
pub use state::{FieldErrors, FieldPhase, FieldValues, FormAction, FormState, ListenerFlags};
