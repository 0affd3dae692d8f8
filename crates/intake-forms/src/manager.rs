// File: src/manager.rs
// Purpose: Validated form state manager driven by submit, focus and blur events

use tracing::{debug, info};

use crate::config::FormConfig;
use crate::error::InvalidSchemaError;
use crate::events::{BlurRegistrar, FieldTarget, SubmitEvent};
use crate::schema::{CompiledSchema, SchemaCompiler, Validator};
use crate::state::{errors_from_issues, FieldErrors, FieldPhase, FieldValues, FormAction, FormState, ListenerFlags};

/// Owns the form state and turns view events into state transitions.
///
/// Without a validator every submit simply captures the submitted values and
/// focus/blur do nothing. With one, submit revalidates the whole form and each
/// focus arms a single blur validation of that field.
#[derive(Debug, Clone)]
pub struct FormManager<V = CompiledSchema> {
    validator: Option<V>,
    state: FormState,
}

impl FormManager<CompiledSchema> {
    /// Creates a manager from config, compiling its schema eagerly
    pub fn new(config: FormConfig) -> Result<Self, InvalidSchemaError> {
        Self::compile(config.schema.as_ref())
    }
}

impl<V: Validator> FormManager<V> {
    /// Compiles any rule set into its validator
    pub fn compile<C>(schema: Option<&C>) -> Result<Self, InvalidSchemaError>
    where
        C: SchemaCompiler<Output = V>,
    {
        let validator = schema.map(SchemaCompiler::compile).transpose()?;
        info!(validated = validator.is_some(), "Form manager ready");
        Ok(Self::from_validator(validator))
    }

    /// Wraps an already compiled validator
    pub fn from_validator(validator: Option<V>) -> Self {
        Self {
            validator,
            state: FormState::default(),
        }
    }

    pub fn validator(&self) -> Option<&V> {
        self.validator.as_ref()
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn values(&self) -> &FieldValues {
        &self.state.values
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.state.errors
    }

    pub fn listeners(&self) -> &ListenerFlags {
        &self.state.listeners
    }

    pub fn phase(&self, field: &str) -> FieldPhase<'_> {
        self.state.phase(field)
    }

    /// Current values and errors, the read side of the form
    pub fn snapshot(&self) -> (FieldValues, FieldErrors) {
        (self.state.values.clone(), self.state.errors.clone())
    }

    /// Handles a form submission.
    ///
    /// Always prevents the native submit. Collects every named entry, then
    /// either captures it as-is (no validator) or revalidates the whole form
    /// and replaces both values and errors.
    pub fn handle_submit<E>(&mut self, event: &mut E)
    where
        E: SubmitEvent + ?Sized,
    {
        event.prevent_default();

        let data: FieldValues = event.entries().into_iter().collect();

        let action = match &self.validator {
            None => FormAction::Captured { values: data },
            Some(validator) => {
                let validation = validator.validate(&data);
                let errors = errors_from_issues(&validation.issues);
                debug!(
                    fields = data.len(),
                    invalid = errors.len(),
                    "Validated form submission"
                );
                FormAction::Validated {
                    values: validation.value,
                    errors,
                }
            }
        };

        self.dispatch(action);
    }

    /// Handles focus on a field.
    ///
    /// Arms a one-shot blur validation unless there is no validator or the
    /// field is already armed. Returns whether a blur listener was registered.
    pub fn handle_focus<T, R>(&mut self, target: &T, registrar: &mut R) -> bool
    where
        T: FieldTarget + ?Sized,
        R: BlurRegistrar + ?Sized,
    {
        let field = target.name();

        if self.validator.is_none() || self.state.is_armed(field) {
            return false;
        }

        registrar.once_on_blur(field);
        self.dispatch(FormAction::Armed {
            field: field.to_string(),
        });
        true
    }

    /// Handles the blur a focus armed.
    ///
    /// Blurs of fields that are not armed are ignored. Fields without a rule
    /// are left as they are. Otherwise only this field is validated, and only
    /// its own error entry changes.
    pub fn handle_blur<T>(&mut self, target: &T)
    where
        T: FieldTarget + ?Sized,
    {
        let field = target.name();

        if !self.state.is_armed(field) {
            return;
        }

        let Some(validator) = &self.validator else {
            return;
        };

        let action = match validator.validate_field(field, target.value()) {
            None => return,
            Some(Ok(_)) => FormAction::BlurPassed {
                field: field.to_string(),
            },
            Some(Err(issue)) => FormAction::BlurFailed {
                field: field.to_string(),
                message: issue.message,
            },
        };

        self.dispatch(action);
    }

    fn dispatch(&mut self, action: FormAction) {
        debug!(?action, "Form transition");
        self.state = self.state.reduce(action);
    }
}
