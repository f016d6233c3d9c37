//! JSON syntax gate for editor input

use crate::error::{SchemaError, SchemaResult};
use crate::schema::FormSchema;
use serde_json::Value;
use std::fmt;

/// Returns true iff `text` is one complete, syntactically valid JSON document.
///
/// Any JSON value is accepted, not only objects. Malformed, truncated and
/// empty input yields `false`.
///
/// # Examples
///
/// ```
/// use formgen_forms::json::is_valid_json;
///
/// assert!(is_valid_json(r#"{"a":1}"#));
/// assert!(is_valid_json("[1, 2, 3]"));
/// assert!(is_valid_json("42"));
/// assert!(!is_valid_json("{a:1}"));
/// assert!(!is_valid_json("[1,2,"));
/// assert!(!is_valid_json(""));
/// ```
pub fn is_valid_json(text: &str) -> bool {
	serde_json::from_str::<serde::de::IgnoredAny>(text).is_ok()
}

/// Parse editor text into a [`FormSchema`].
///
/// Text that fails [`is_valid_json`] is reported as [`SchemaError::Syntax`];
/// valid JSON of the wrong shape as [`SchemaError::Shape`]. The schema, each
/// field, its `validation` and its options must be JSON objects; arrays are
/// never read positionally.
///
/// # Examples
///
/// ```
/// use formgen_forms::{json::parse_schema, SchemaError};
///
/// let schema = parse_schema(r#"{"formTitle": "T", "fields": []}"#).unwrap();
/// assert_eq!(schema.title, "T");
///
/// assert!(matches!(parse_schema("{"), Err(SchemaError::Syntax)));
/// assert!(matches!(parse_schema("[]"), Err(SchemaError::Shape(_))));
/// ```
pub fn parse_schema(text: &str) -> SchemaResult<FormSchema> {
	let value: Value = serde_json::from_str(text).map_err(|_| SchemaError::Syntax)?;
	check_object_shape(&value).map_err(SchemaError::Shape)?;
	serde_json::from_value(value).map_err(SchemaError::Shape)
}

fn shape_error(message: impl fmt::Display) -> serde_json::Error {
	<serde_json::Error as serde::de::Error>::custom(message)
}

fn check_object_shape(schema: &Value) -> Result<(), serde_json::Error> {
	let Some(root) = schema.as_object() else {
		return Err(shape_error("form schema must be a JSON object"));
	};
	// A non-array `fields` is left to the typed deserializer to report
	let Some(fields) = root.get("fields").and_then(Value::as_array) else {
		return Ok(());
	};

	for (index, field) in fields.iter().enumerate() {
		let Some(field) = field.as_object() else {
			return Err(shape_error(format_args!(
				"field {} must be a JSON object",
				index
			)));
		};
		if field
			.get("validation")
			.is_some_and(|v| !v.is_object() && !v.is_null())
		{
			return Err(shape_error(format_args!(
				"validation of field {} must be a JSON object",
				index
			)));
		}
		if field
			.get("options")
			.and_then(Value::as_array)
			.is_some_and(|options| options.iter().any(|o| !o.is_object()))
		{
			return Err(shape_error(format_args!(
				"options of field {} must be JSON objects",
				index
			)));
		}
	}
	Ok(())
}
