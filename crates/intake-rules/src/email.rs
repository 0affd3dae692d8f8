//! Email validation functions

/// Default number of dot-separated segments an email domain must have
pub const DEFAULT_MIN_DOMAIN_SEGMENTS: usize = 2;

/// Constraints applied on top of the basic address shape
#[derive(Debug, Clone, Copy)]
pub struct EmailPolicy<'a, S: AsRef<str>> {
    /// Minimum number of domain segments (`example.com` has two)
    pub min_domain_segments: usize,
    /// Top level domains accepted, compared case-insensitively. `None` accepts any.
    pub tlds: Option<&'a [S]>,
}

impl<'a, S: AsRef<str>> EmailPolicy<'a, S> {
    pub fn new(min_domain_segments: usize, tlds: Option<&'a [S]>) -> Self {
        Self {
            min_domain_segments,
            tlds,
        }
    }
}

/// Validates basic email format
///
/// Checks for:
/// - Exactly one '@' symbol with content on both sides
/// - Local part made of atext characters, dots not leading, trailing or doubled
/// - Domain labels of letters, digits and inner hyphens
/// - A non-numeric top level domain of at least 2 characters
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = split_address(email) else {
        return false;
    };

    if local.is_empty() || local.len() > 64 {
        return false;
    }

    if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return false;
    }

    let valid_local_chars = |c: char| c.is_ascii_alphanumeric() || "!#$%&'*+-/=?^_`{|}~.".contains(c);

    if !local.chars().all(valid_local_chars) {
        return false;
    }

    if domain.is_empty() || domain.len() > 255 {
        return false;
    }

    if !domain.split('.').all(is_valid_label) {
        return false;
    }

    match domain.rsplit('.').next() {
        Some(tld) => tld.len() >= 2 && !tld.chars().all(|c| c.is_ascii_digit()),
        None => false,
    }
}

/// Number of dot-separated segments in the domain part, 0 if there is no domain
pub fn domain_segments(email: &str) -> usize {
    match split_address(email) {
        Some((_, domain)) if !domain.is_empty() => domain.split('.').count(),
        _ => 0,
    }
}

/// Checks the address top level domain against an allow list
pub fn is_allowed_tld<S: AsRef<str>>(email: &str, allowed: &[S]) -> bool {
    let tld = match split_address(email).and_then(|(_, domain)| domain.rsplit('.').next()) {
        Some(tld) => tld,
        None => return false,
    };

    allowed.iter().any(|a| a.as_ref().eq_ignore_ascii_case(tld))
}

/// Full email check: address shape, domain segment count and TLD allow list
pub fn satisfies_email_policy<S: AsRef<str>>(email: &str, policy: &EmailPolicy<'_, S>) -> bool {
    if !is_valid_email(email) {
        return false;
    }

    if domain_segments(email) < policy.min_domain_segments {
        return false;
    }

    match policy.tlds {
        Some(allowed) => is_allowed_tld(email, allowed),
        None => true,
    }
}

fn split_address(email: &str) -> Option<(&str, &str)> {
    let (local, domain) = email.split_once('@')?;
    if domain.contains('@') {
        return None;
    }
    Some((local, domain))
}

fn is_valid_label(label: &str) -> bool {
    !label.is_empty()
        && label.len() <= 63
        && !label.starts_with('-')
        && !label.ends_with('-')
        && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("test.user@example.co.uk"));
        assert!(is_valid_email("user+tag@example.com"));
        assert!(is_valid_email("user_name@example-domain.com"));
        assert!(is_valid_email("a@b.com"));
    }

    #[test]
    fn test_invalid_emails() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("@"));
        assert!(!is_valid_email("user@"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@@example.com"));
        assert!(!is_valid_email("user@.com"));
        assert!(!is_valid_email("user@example..com"));
        assert!(!is_valid_email(".user@example.com"));
        assert!(!is_valid_email("user@-example.com"));
        assert!(!is_valid_email("user@example.123"));
    }

    #[test]
    fn test_domain_segments() {
        assert_eq!(domain_segments("user@example.com"), 2);
        assert_eq!(domain_segments("user@mail.example.co.uk"), 4);
        assert_eq!(domain_segments("user@localhost"), 1);
        assert_eq!(domain_segments("no-at-sign"), 0);
    }

    #[test]
    fn test_allowed_tld() {
        let allowed = ["com", "net"];
        assert!(is_allowed_tld("user@example.com", &allowed));
        assert!(is_allowed_tld("user@EXAMPLE.NET", &allowed));
        assert!(!is_allowed_tld("user@example.org", &allowed));
        assert!(!is_allowed_tld("invalid", &allowed));
    }

    #[test]
    fn test_email_policy() {
        let allowed = ["com", "net"];
        let policy = EmailPolicy::new(DEFAULT_MIN_DOMAIN_SEGMENTS, Some(&allowed[..]));

        assert!(satisfies_email_policy("a@b.com", &policy));
        assert!(!satisfies_email_policy("a@b.org", &policy));
        assert!(!satisfies_email_policy("a@localhost", &policy));

        let any_tld: EmailPolicy<'_, &str> = EmailPolicy::new(3, None);
        assert!(satisfies_email_policy("a@mail.b.org", &any_tld));
        assert!(!satisfies_email_policy("a@b.org", &any_tld));
    }
}
