//! String validation functions

/// Length in Unicode scalar values, the unit all length rules count in
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

pub fn validate_min_length(s: &str, min: usize) -> bool {
    char_len(s) >= min
}

pub fn validate_max_length(s: &str, max: usize) -> bool {
    char_len(s) <= max
}

/// ASCII letters and digits only, at least one character
pub fn is_alphanumeric(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Enum/value restriction
pub fn is_one_of<S: AsRef<str>>(value: &str, allowed: &[S]) -> bool {
    allowed.iter().any(|a| a.as_ref() == value)
}
