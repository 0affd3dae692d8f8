//! Integration tests for the form state manager
//!
//! Covers construction, whole-form submit, and the focus/blur cycle using the
//! complaint form's rule set.

use intake_forms::*;
use pretty_assertions::assert_eq;
use rstest::{fixture, rstest};

fn map(pairs: &[(&str, &str)]) -> FieldValues {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn name_rule() -> FieldRule {
    FieldRule::string().alphanum().min_length(3).max_length(30).required()
}

#[fixture]
fn complaint() -> FormManager {
    let schema = Schema::new()
        .field("firstName", name_rule())
        .field("lastName", name_rule())
        .field("email", FieldRule::string().email(EmailRule::default().tlds(["com", "net"])));

    FormManager::new(FormConfig::with_schema(schema)).expect("complaint schema compiles")
}

fn submit(form: &mut FormManager, pairs: &[(&str, &str)]) {
    let mut event = FormData::from_pairs(pairs.iter().copied());
    form.handle_submit(&mut event);
}

fn focus(form: &mut FormManager, field: &str, pending: &mut PendingBlurs) -> bool {
    form.handle_focus(&InputTarget::new(field, ""), pending)
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_new_without_schema_never_fails() {
    assert!(FormManager::new(FormConfig::default()).is_ok());
    assert!(FormManager::new(FormConfig::with_schema(Schema::new())).is_ok());
}

#[rstest]
#[case(FieldRule::string().min_length(10).max_length(3))]
#[case(FieldRule::string().pattern("(unclosed"))]
#[case(FieldRule::string().one_of(Vec::<String>::new()))]
fn test_new_with_malformed_schema_fails(#[case] rule: FieldRule) {
    let config = FormConfig::with_schema(Schema::new().field("firstName", rule));
    let err = FormManager::new(config).unwrap_err();

    assert_eq!(err.field(), Some("firstName"));
}

// ============================================================================
// Submit
// ============================================================================

#[test]
fn test_submit_without_schema_captures_data_and_keeps_errors() {
    let mut form = FormManager::new(FormConfig::default()).unwrap();
    let data = [("firstName", "Al"), ("date", "2024-05-01"), ("details", "")];

    submit(&mut form, &data);

    assert_eq!(form.values(), &map(&data));
    assert!(form.errors().is_empty());
}

#[test]
fn test_duplicate_entries_resolve_last_wins() {
    let mut form = FormManager::new(FormConfig::default()).unwrap();
    submit(&mut form, &[("details", "first"), ("details", "second")]);

    assert_eq!(form.values(), &map(&[("details", "second")]));
}

#[rstest]
fn test_submit_reports_only_invalid_fields(mut complaint: FormManager) {
    submit(
        &mut complaint,
        &[("firstName", "Al"), ("lastName", "Smith"), ("email", "a@b.com")],
    );

    assert_eq!(
        complaint.errors(),
        &map(&[("firstName", "\"firstName\" length must be at least 3 characters long")])
    );
}

#[rstest]
fn test_submit_with_optional_field_omitted_is_valid(mut complaint: FormManager) {
    submit(&mut complaint, &[("firstName", "Alice"), ("lastName", "Smith")]);

    assert!(complaint.errors().is_empty());
    assert_eq!(complaint.values(), &map(&[("firstName", "Alice"), ("lastName", "Smith")]));
}

#[rstest]
fn test_submit_collects_errors_for_every_field(mut complaint: FormManager) {
    submit(&mut complaint, &[("firstName", "Al"), ("email", "a@b.org")]);

    assert_eq!(
        complaint.errors(),
        &map(&[
            ("firstName", "\"firstName\" length must be at least 3 characters long"),
            ("lastName", "\"lastName\" is required"),
            ("email", "\"email\" must be a valid email"),
        ])
    );
}

#[rstest]
fn test_submit_keeps_last_issue_per_field(mut complaint: FormManager) {
    // Breaks alphanum then min_length; the later message is kept
    submit(&mut complaint, &[("firstName", "A!"), ("lastName", "Smith")]);

    assert_eq!(
        complaint.errors().get("firstName").map(String::as_str),
        Some("\"firstName\" length must be at least 3 characters long")
    );
}

#[rstest]
fn test_successful_submit_clears_previous_errors(mut complaint: FormManager) {
    submit(&mut complaint, &[("firstName", "Al")]);
    assert!(!complaint.errors().is_empty());

    submit(&mut complaint, &[("firstName", "Alice"), ("lastName", "Smith")]);
    assert!(complaint.errors().is_empty());
}

#[test]
fn test_submit_returns_normalized_values() {
    let schema = Schema::new()
        .field("firstName", FieldRule::string().trim().min_length(3))
        .field("email", FieldRule::string().trim().lowercase().email(EmailRule::default()));
    let mut form = FormManager::new(FormConfig::with_schema(schema)).unwrap();

    submit(&mut form, &[("firstName", "  Alice "), ("email", " Alice@Example.COM")]);

    assert!(form.errors().is_empty());
    assert_eq!(
        form.values(),
        &map(&[("firstName", "Alice"), ("email", "alice@example.com")])
    );
}

#[test]
fn test_failed_submit_still_stores_sanitized_values() {
    let schema = Schema::new()
        .field("firstName", FieldRule::string().trim().min_length(3))
        .unknown(UnknownKeys::Strip);
    let mut form = FormManager::new(FormConfig::with_schema(schema)).unwrap();

    submit(&mut form, &[("firstName", " Al "), ("date", "2024-05-01")]);

    assert_eq!(form.values(), &map(&[("firstName", "Al")]));
    assert_eq!(form.errors().len(), 1);
}

// ============================================================================
// Focus / blur
// ============================================================================

#[rstest]
fn test_focus_twice_registers_once(mut complaint: FormManager) {
    let mut pending = PendingBlurs::new();

    assert!(focus(&mut complaint, "email", &mut pending));
    assert!(!focus(&mut complaint, "email", &mut pending));

    assert_eq!(pending.take(), vec!["email".to_string()]);
    assert_eq!(complaint.listeners().get("email"), Some(&true));
}

#[rstest]
fn test_blur_invalid_leaves_other_errors_untouched(mut complaint: FormManager) {
    let mut pending = PendingBlurs::new();
    submit(&mut complaint, &[("firstName", "Al"), ("lastName", "Smith"), ("email", "a@b.com")]);
    let first_name_error = complaint.errors()["firstName"].clone();

    focus(&mut complaint, "email", &mut pending);
    complaint.handle_blur(&InputTarget::new("email", "not-an-email"));

    assert_eq!(
        complaint.errors(),
        &map(&[
            ("firstName", first_name_error.as_str()),
            ("email", "\"email\" must be a valid email"),
        ])
    );
    assert_eq!(complaint.listeners().get("email"), Some(&false));
}

#[rstest]
fn test_blur_valid_removes_only_that_field(mut complaint: FormManager) {
    let mut pending = PendingBlurs::new();
    submit(&mut complaint, &[("firstName", "Al"), ("lastName", "S"), ("email", "a@b.com")]);
    assert_eq!(complaint.errors().len(), 2);

    focus(&mut complaint, "firstName", &mut pending);
    complaint.handle_blur(&InputTarget::new("firstName", "Alice"));

    assert_eq!(
        complaint.errors(),
        &map(&[("lastName", "\"lastName\" length must be at least 3 characters long")])
    );
    assert_eq!(complaint.phase("firstName"), FieldPhase::Untouched);
}

#[rstest]
fn test_blur_reports_first_issue(mut complaint: FormManager) {
    let mut pending = PendingBlurs::new();

    focus(&mut complaint, "firstName", &mut pending);
    complaint.handle_blur(&InputTarget::new("firstName", "A!"));

    assert_eq!(
        complaint.phase("firstName"),
        FieldPhase::Invalid("\"firstName\" must only contain alpha-numeric characters")
    );
}

#[rstest]
fn test_blur_fires_once_per_focus(mut complaint: FormManager) {
    let mut pending = PendingBlurs::new();

    focus(&mut complaint, "firstName", &mut pending);
    complaint.handle_blur(&InputTarget::new("firstName", "Alice"));

    // Second blur without a new focus is ignored
    complaint.handle_blur(&InputTarget::new("firstName", "Al"));
    assert!(complaint.errors().is_empty());

    // Re-armed on the next focus
    assert!(focus(&mut complaint, "firstName", &mut pending));
    complaint.handle_blur(&InputTarget::new("firstName", "Al"));
    assert!(complaint.errors().contains_key("firstName"));
    assert_eq!(pending.len(), 2);
}

#[test]
fn test_blur_of_empty_value_reports_empty() {
    let schema = Schema::new().field("email", FieldRule::string().email(EmailRule::default()));
    let mut form = FormManager::new(FormConfig::with_schema(schema)).unwrap();

    form.handle_focus(&InputTarget::new("email", ""), &mut NoopRegistrar);
    form.handle_blur(&InputTarget::new("email", ""));

    assert_eq!(
        form.errors().get("email").map(String::as_str),
        Some("\"email\" is not allowed to be empty")
    );
}

#[test]
fn test_snapshot_matches_state() {
    let mut form = FormManager::new(FormConfig::default()).unwrap();
    submit(&mut form, &[("city", "Yerevan")]);

    let (values, errors) = form.snapshot();
    assert_eq!(values, map(&[("city", "Yerevan")]));
    assert!(errors.is_empty());
}
