//! Custom garde validators built on the intake rule primitives
//!
//! Callers that deserialize a validated submission into a typed struct can
//! re-check it with the same rules the form schema uses.
//!
//! # Example
//!
//! ```ignore
//! use garde::Validate;
//!
//! #[derive(Validate)]
//! #[garde(context(Vec<String>))]
//! struct Complainant {
//!     #[garde(custom(alphanum))]
//!     first_name: String,
//!     #[garde(custom(email_with_tlds))]
//!     email: String,
//! }
//! ```

use alloc::format;
use alloc::string::String;

use crate::email::{satisfies_email_policy, EmailPolicy, DEFAULT_MIN_DOMAIN_SEGMENTS};
use crate::string::is_alphanumeric;

/// Validator: ASCII letters and digits only
pub fn alphanum<C>(value: &str, _ctx: &C) -> Result<(), garde::Error> {
    if !is_alphanumeric(value) {
        return Err(garde::Error::new("must only contain alpha-numeric characters"));
    }

    Ok(())
}

/// Validator: email address whose TLD is in the given allow list
///
/// An empty allow list accepts any TLD.
pub fn email_with_tlds(value: &str, allowed: &[String]) -> Result<(), garde::Error> {
    let tlds = if allowed.is_empty() { None } else { Some(allowed) };
    let policy = EmailPolicy::new(DEFAULT_MIN_DOMAIN_SEGMENTS, tlds);

    if !satisfies_email_policy(value, &policy) {
        return Err(garde::Error::new(format!(
            "must be a valid email ending in one of: {}",
            allowed.join(", ")
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec;

    #[test]
    fn test_alphanum() {
        assert!(alphanum("Alice", &()).is_ok());
        assert!(alphanum("Alice!", &()).is_err());
        assert!(alphanum("", &()).is_err());
    }

    #[test]
    fn test_email_with_tlds() {
        let allowed = vec!["com".to_string(), "net".to_string()];

        assert!(email_with_tlds("user@example.com", &allowed).is_ok());
        assert!(email_with_tlds("user@EXAMPLE.NET", &allowed).is_ok());
        assert!(email_with_tlds("user@example.org", &allowed).is_err());
        assert!(email_with_tlds("not-an-email", &allowed).is_err());

        // Empty allow list accepts any TLD
        assert!(email_with_tlds("user@example.org", &[]).is_ok());
    }
}
