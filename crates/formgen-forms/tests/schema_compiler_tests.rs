//! Schema compiler integration tests
//!
//! Exercises the text -> schema -> rule set pipeline end to end.

use formgen_forms::{
	FieldKind, FormField, FormSchema, FormValues, SchemaError, compile, is_valid_json, parse_schema,
};
use proptest::prelude::*;
use rstest::rstest;

const CONTACT_SCHEMA: &str = r#"{
	"formTitle": "Contact Us",
	"formDescription": "We will get back to you",
	"fields": [
		{ "id": "name", "type": "text", "label": "Full Name", "required": true, "placeholder": "Jane Doe" },
		{ "id": "email", "type": "email", "label": "Email", "required": true },
		{ "id": "phone", "type": "text", "label": "Phone", "required": false,
		  "validation": { "pattern": "^[0-9]{10}$", "message": "Enter 10 digits" } },
		{ "id": "topic", "type": "select", "label": "Topic", "required": true,
		  "options": [ { "value": "sales", "label": "Sales" }, { "value": "support", "label": "Support" } ] },
		{ "id": "urgency", "type": "radio", "label": "Urgency", "required": false,
		  "options": [ { "value": "low", "label": "Low" }, { "value": "high", "label": "High" } ] },
		{ "id": "message", "type": "textarea", "label": "Message", "required": false }
	]
}"#;

fn values(pairs: &[(&str, &str)]) -> FormValues {
	pairs
		.iter()
		.map(|(k, v)| (k.to_string(), v.to_string()))
		.collect()
}

#[rstest]
fn test_required_email_messages() {
	// Arrange
	let schema = FormSchema::new("Signup", "")
		.with_field(FormField::new("email", FieldKind::Email, "Email").required());
	let rules = compile(&schema).unwrap();

	// Act & Assert
	assert_eq!(
		rules.validate("email", "not-an-email").as_deref(),
		Some("Invalid email address")
	);
	assert_eq!(rules.validate("email", "a@b.com"), None);
}

#[rstest]
fn test_email_override_message() {
	let schema = FormSchema::new("Signup", "").with_field(
		FormField::new("email", FieldKind::Email, "Email")
			.required()
			.with_message("Company email only"),
	);
	let rules = compile(&schema).unwrap();

	assert_eq!(
		rules.validate("email", "nope").as_deref(),
		Some("Company email only")
	);
}

#[rstest]
fn test_required_and_optional_text() {
	let schema = FormSchema::new("Profile", "")
		.with_field(FormField::new("name", FieldKind::Text, "Full Name").required())
		.with_field(FormField::new("nick", FieldKind::Text, "Nickname"));
	let rules = compile(&schema).unwrap();

	assert_eq!(
		rules.validate("name", "").as_deref(),
		Some("Full Name is required")
	);
	assert_eq!(rules.validate("nick", ""), None);
}

#[rstest]
fn test_select_closed_enumeration() {
	let schema = FormSchema::new("Pick", "").with_field(
		FormField::new("pick", FieldKind::Select, "Pick")
			.with_option("x", "X")
			.with_option("y", "Y"),
	);
	let rules = compile(&schema).unwrap();

	assert!(rules.validate("pick", "z").is_some());
	assert_eq!(rules.validate("pick", "x"), None);
}

#[rstest]
fn test_contact_schema_pipeline() {
	// Arrange
	let schema = parse_schema(CONTACT_SCHEMA).unwrap();
	let rules = compile(&schema).unwrap();

	// Act
	let errors = rules.validate_all(&values(&[
		("email", "broken"),
		("phone", "12345"),
		("topic", "billing"),
		("message", ""),
	]));

	// Assert: every invalid field reported at once, optional empties pass
	assert_eq!(rules.len(), 6);
	assert_eq!(errors.len(), 4);
	assert_eq!(errors["name"], "Full Name is required");
	assert_eq!(errors["email"], "Invalid email address");
	assert_eq!(errors["phone"], "Enter 10 digits");
	assert_eq!(errors["topic"], "Invalid selection");
	assert!(!errors.contains_key("urgency"));
	assert!(!errors.contains_key("message"));
}

#[rstest]
fn test_contact_schema_valid_submission() {
	let rules = compile(&parse_schema(CONTACT_SCHEMA).unwrap()).unwrap();

	let errors = rules.validate_all(&values(&[
		("name", "Jane"),
		("email", "jane@example.com"),
		("phone", "0123456789"),
		("topic", "support"),
		("urgency", "high"),
	]));

	assert!(errors.is_empty());
}

#[rstest]
fn test_syntax_error_never_reaches_compiler() {
	assert!(matches!(
		parse_schema(r#"{"formTitle": "x", "fields": [}"#),
		Err(SchemaError::Syntax)
	));
}

#[rstest]
fn test_config_error_from_text() {
	let schema = parse_schema(
		r#"{"formTitle": "x", "fields": [{"id": "r", "type": "radio", "label": "R", "options": []}]}"#,
	)
	.unwrap();

	let err = compile(&schema).unwrap_err();

	assert!(err.is_config_error());
}

proptest! {
	#[test]
	fn prop_serialized_values_are_valid(numbers in proptest::collection::vec(any::<i64>(), 0..16), text in ".*") {
		let document = serde_json::json!({ "numbers": numbers, "text": text, "nested": [[], {}] });
		let serialized = serde_json::to_string(&document).unwrap();

		prop_assert!(is_valid_json(&serialized));
	}

	#[test]
	fn prop_truncated_arrays_are_invalid(numbers in proptest::collection::vec(any::<i64>(), 0..16)) {
		let serialized = serde_json::to_string(&numbers).unwrap();
		let truncated = &serialized[..serialized.len() - 1];

		prop_assert!(!is_valid_json(truncated));
	}
}
