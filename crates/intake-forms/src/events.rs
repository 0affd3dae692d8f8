// File: src/events.rs
// Purpose: View-layer collaborators that deliver submit, focus and blur events

/// A form submission as seen by the manager
pub trait SubmitEvent {
    /// Suppress the host's native submit navigation
    fn prevent_default(&mut self);

    /// Every named entry in document order. Repeated names are allowed; the
    /// last one wins when collected into a value map.
    fn entries(&self) -> Vec<(String, String)>;
}

/// The input element an event fired on
pub trait FieldTarget {
    fn name(&self) -> &str;
    fn value(&self) -> &str;
}

/// Registers a callback that runs on the next blur of a field, once.
///
/// The host calls [`FormManager::handle_blur`](crate::FormManager::handle_blur)
/// when that blur happens.
pub trait BlurRegistrar {
    fn once_on_blur(&mut self, field: &str);
}

/// Plain submission data for hosts without a DOM
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    entries: Vec<(String, String)>,
    default_prevented: bool,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
            default_prevented: false,
        }
    }

    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

impl SubmitEvent for FormData {
    fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    fn entries(&self) -> Vec<(String, String)> {
        self.entries.clone()
    }
}

/// Plain input target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputTarget {
    pub name: String,
    pub value: String,
}

impl InputTarget {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl FieldTarget for InputTarget {
    fn name(&self) -> &str {
        &self.name
    }

    fn value(&self) -> &str {
        &self.value
    }
}

/// Records registrations so the host can attach listeners later
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingBlurs {
    fields: Vec<String>,
}

impl PendingBlurs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f == field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Consumes the registration for `field`, as a one-time listener firing
    /// would. Returns whether one was pending.
    pub fn fire(&mut self, field: &str) -> bool {
        match self.fields.iter().position(|f| f == field) {
            Some(index) => {
                self.fields.remove(index);
                true
            }
            None => false,
        }
    }

    /// Drains the recorded fields
    pub fn take(&mut self) -> Vec<String> {
        std::mem::take(&mut self.fields)
    }
}

impl BlurRegistrar for PendingBlurs {
    fn once_on_blur(&mut self, field: &str) {
        self.fields.push(field.to_string());
    }
}

/// For hosts that forward every blur to the manager regardless
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRegistrar;

impl BlurRegistrar for NoopRegistrar {
    fn once_on_blur(&mut self, _field: &str) {}
}
