//! Form schema data model
//!
//! A [`FormSchema`] is the declarative description the editor hands over:
//! a title, a description and an ordered list of [`FormField`]s. The wire
//! format uses the `formTitle` / `formDescription` / `type` keys produced by
//! the schema editor; `title` and `description` are accepted as aliases.
//!
//! ```
//! use formgen_forms::{FieldKind, FormSchema};
//!
//! let schema: FormSchema = serde_json::from_str(r#"{
//!     "formTitle": "Contact",
//!     "formDescription": "Get in touch",
//!     "fields": [
//!         { "id": "email", "type": "email", "label": "Email", "required": true }
//!     ]
//! }"#).unwrap();
//!
//! assert_eq!(schema.title, "Contact");
//! assert_eq!(schema.fields[0].kind, FieldKind::Email);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Title shown while no schema has been entered.
pub const PLACEHOLDER_TITLE: &str = "Enter your JSON schema";

/// Description shown while no schema has been entered.
pub const PLACEHOLDER_DESCRIPTION: &str = "Use the editor on the left to input your form schema";

/// A complete form description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSchema {
	#[serde(rename = "formTitle", alias = "title", default)]
	pub title: String,
	#[serde(rename = "formDescription", alias = "description", default)]
	pub description: String,
	#[serde(default)]
	pub fields: Vec<FormField>,
}

impl FormSchema {
	/// Create a schema with no fields
	///
	/// # Examples
	///
	/// ```
	/// use formgen_forms::FormSchema;
	///
	/// let schema = FormSchema::new("Signup", "Create an account");
	/// assert!(schema.fields.is_empty());
	/// ```
	pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
		Self {
			title: title.into(),
			description: description.into(),
			fields: vec![],
		}
	}

	/// The zero-field schema rendered while the editor is empty or invalid.
	///
	/// # Examples
	///
	/// ```
	/// use formgen_forms::FormSchema;
	///
	/// let schema = FormSchema::placeholder();
	/// assert_eq!(schema.title, "Enter your JSON schema");
	/// assert!(schema.fields.is_empty());
	/// ```
	pub fn placeholder() -> Self {
		Self::new(PLACEHOLDER_TITLE, PLACEHOLDER_DESCRIPTION)
	}

	/// Append a field
	pub fn with_field(mut self, field: FormField) -> Self {
		self.fields.push(field);
		self
	}

	pub fn field(&self, id: &str) -> Option<&FormField> {
		self.fields.iter().find(|f| f.id == id)
	}

	/// Pretty-printed JSON, used by the "copy form JSON" action.
	pub fn to_pretty_json(&self) -> serde_json::Result<String> {
		serde_json::to_string_pretty(self)
	}
}

/// Closed set of supported input kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
	Text,
	Email,
	Select,
	Radio,
	Textarea,
}

impl FieldKind {
	/// Whether the kind only accepts one of its declared option values
	pub fn is_enumerated(self) -> bool {
		matches!(self, FieldKind::Select | FieldKind::Radio)
	}

	pub fn as_str(self) -> &'static str {
		match self {
			FieldKind::Text => "text",
			FieldKind::Email => "email",
			FieldKind::Select => "select",
			FieldKind::Radio => "radio",
			FieldKind::Textarea => "textarea",
		}
	}
}

impl fmt::Display for FieldKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Optional pattern constraint and message override
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldValidation {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub pattern: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub message: Option<String>,
}

/// One choice of a select or radio field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
	pub value: String,
	pub label: String,
}

impl FieldOption {
	pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
		Self {
			value: value.into(),
			label: label.into(),
		}
	}
}

/// A single field of a [`FormSchema`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormField {
	pub id: String,
	#[serde(rename = "type")]
	pub kind: FieldKind,
	#[serde(default)]
	pub label: String,
	#[serde(default)]
	pub required: bool,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub placeholder: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub validation: Option<FieldValidation>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub options: Vec<FieldOption>,
}

impl FormField {
	/// Create a new optional field of the given kind
	///
	/// # Examples
	///
	/// ```
	/// use formgen_forms::{FieldKind, FormField};
	///
	/// let field = FormField::new("name", FieldKind::Text, "Name").required();
	/// assert!(field.required);
	/// assert_eq!(field.label, "Name");
	/// ```
	pub fn new(id: impl Into<String>, kind: FieldKind, label: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			kind,
			label: label.into(),
			required: false,
			placeholder: None,
			validation: None,
			options: vec![],
		}
	}

	/// Mark the field as required
	pub fn required(mut self) -> Self {
		self.required = true;
		self
	}

	pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
		self.placeholder = Some(placeholder.into());
		self
	}

	/// Attach a regex pattern the value must match
	pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
		self.validation.get_or_insert_with(Default::default).pattern = Some(pattern.into());
		self
	}

	/// Override the failure message for pattern and kind checks
	pub fn with_message(mut self, message: impl Into<String>) -> Self {
		self.validation.get_or_insert_with(Default::default).message = Some(message.into());
		self
	}

	pub fn with_option(mut self, value: impl Into<String>, label: impl Into<String>) -> Self {
		self.options.push(FieldOption::new(value, label));
		self
	}

	pub fn pattern(&self) -> Option<&str> {
		self.validation.as_ref().and_then(|v| v.pattern.as_deref())
	}

	pub fn message(&self) -> Option<&str> {
		self.validation.as_ref().and_then(|v| v.message.as_deref())
	}
}
