//! Schema-to-validator compilation
//!
//! [`compile`] turns a [`FormSchema`] into a [`RuleSet`]: one
//! [`ValidationRule`] per field. Rules are never patched; whenever the schema
//! changes the whole set is rebuilt.
//!
//! ## Evaluation order
//!
//! ```mermaid
//! flowchart LR
//!     Value --> Empty{"empty and optional?"}
//!     Empty -->|yes| Valid
//!     Empty -->|no| Required --> Pattern --> Kind["kind check"] --> Valid
//! ```
//!
//! The first failing check's message is reported.

use crate::error::{SchemaError, SchemaResult};
use crate::schema::{FieldKind, FormField, FormSchema};
use crate::validators::{
	ChoiceValidator, EmailValidator, FieldError, FieldResult, PatternValidator, RequiredValidator,
};
use indexmap::IndexMap;
use std::collections::{BTreeMap, HashSet};

/// Field id -> current error message. Absent means valid.
pub type FieldErrorMap = BTreeMap<String, String>;

/// Raw submitted values keyed by field id, kept in insertion order
pub type FormValues = IndexMap<String, String>;

/// One check of a compiled rule
#[derive(Debug, Clone)]
pub enum Check {
	Required(RequiredValidator),
	Pattern(PatternValidator),
	Email(EmailValidator),
	Choice(ChoiceValidator),
}

impl Check {
	pub fn validate(&self, value: &str) -> FieldResult<()> {
		match self {
			Check::Required(v) => v.validate(value),
			Check::Pattern(v) => v.validate(value),
			Check::Email(v) => v.validate(value),
			Check::Choice(v) => v.validate(value),
		}
	}
}

/// Compiled validation for a single field
#[derive(Debug, Clone)]
pub struct ValidationRule {
	field_id: String,
	optional: bool,
	checks: Vec<Check>,
}

impl ValidationRule {
	/// Build the rule for one field.
	///
	/// # Examples
	///
	/// ```
	/// use formgen_forms::{FieldKind, FormField, ValidationRule};
	///
	/// let field = FormField::new("email", FieldKind::Email, "Email").required();
	/// let rule = ValidationRule::for_field(&field).unwrap();
	///
	/// assert_eq!(rule.check("").unwrap_err().message(), "Email is required");
	/// assert_eq!(rule.check("nope").unwrap_err().message(), "Invalid email address");
	/// assert!(rule.check("a@b.com").is_ok());
	/// ```
	pub fn for_field(field: &FormField) -> SchemaResult<Self> {
		let mut checks = Vec::new();

		if field.required {
			checks.push(Check::Required(RequiredValidator::new(&field.label)));
		}

		if let Some(pattern) = field.pattern() {
			let mut validator = PatternValidator::new(&field.label, pattern).map_err(|source| {
				SchemaError::InvalidPattern {
					field: field.id.clone(),
					source,
				}
			})?;
			if let Some(message) = field.message() {
				validator = validator.with_message(message);
			}
			checks.push(Check::Pattern(validator));
		}

		if let Some(check) = kind_check(field)? {
			checks.push(check);
		}

		Ok(Self {
			field_id: field.id.clone(),
			optional: !field.required,
			checks,
		})
	}

	pub fn field_id(&self) -> &str {
		&self.field_id
	}

	pub fn is_optional(&self) -> bool {
		self.optional
	}

	pub fn checks(&self) -> &[Check] {
		&self.checks
	}

	/// Run the checks in order and return the first failure.
	pub fn check(&self, value: &str) -> FieldResult<()> {
		if self.optional && value.is_empty() {
			return Ok(());
		}
		self.checks.iter().try_for_each(|c| c.validate(value))
	}

	/// Like [`check`](Self::check) but yields only the message.
	pub fn validate(&self, value: &str) -> Option<String> {
		self.check(value).err().map(FieldError::into_message)
	}
}

/// Kind-specific base check, dispatched on the closed [`FieldKind`] set.
fn kind_check(field: &FormField) -> SchemaResult<Option<Check>> {
	if field.kind.is_enumerated() && field.options.is_empty() {
		return Err(SchemaError::MissingOptions {
			field: field.id.clone(),
			kind: field.kind,
		});
	}

	let check = match field.kind {
		FieldKind::Email => {
			let mut validator = EmailValidator::new();
			if let Some(message) = field.message() {
				validator = validator.with_message(message);
			}
			Some(Check::Email(validator))
		}
		FieldKind::Select | FieldKind::Radio => {
			let choices = field.options.iter().map(|o| o.value.clone()).collect();
			let mut validator = ChoiceValidator::new(choices);
			if let Some(message) = field.message() {
				validator = validator.with_message(message);
			}
			Some(Check::Choice(validator))
		}
		FieldKind::Text | FieldKind::Textarea => None,
	};
	Ok(check)
}

/// All compiled rules of a schema, in field order
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
	rules: Vec<ValidationRule>,
}

impl RuleSet {
	pub fn get(&self, field_id: &str) -> Option<&ValidationRule> {
		self.rules.iter().find(|r| r.field_id == field_id)
	}

	pub fn iter(&self) -> impl Iterator<Item = &ValidationRule> {
		self.rules.iter()
	}

	pub fn len(&self) -> usize {
		self.rules.len()
	}

	pub fn is_empty(&self) -> bool {
		self.rules.is_empty()
	}

	/// Validate one field. Unknown field ids are treated as valid.
	pub fn validate(&self, field_id: &str, value: &str) -> Option<String> {
		self.get(field_id).and_then(|rule| rule.validate(value))
	}

	/// Validate every field; a missing value counts as the empty string.
	///
	/// # Examples
	///
	/// ```
	/// use formgen_forms::{compile, FieldKind, FormField, FormSchema, FormValues};
	///
	/// let schema = FormSchema::new("Signup", "")
	///     .with_field(FormField::new("name", FieldKind::Text, "Name").required())
	///     .with_field(FormField::new("bio", FieldKind::Textarea, "Bio"));
	/// let rules = compile(&schema).unwrap();
	///
	/// let errors = rules.validate_all(&FormValues::new());
	/// assert_eq!(errors.get("name").map(String::as_str), Some("Name is required"));
	/// assert!(!errors.contains_key("bio"));
	/// ```
	pub fn validate_all(&self, values: &FormValues) -> FieldErrorMap {
		self.rules
			.iter()
			.filter_map(|rule| {
				let value = values.get(&rule.field_id).map(String::as_str).unwrap_or("");
				rule.validate(value).map(|msg| (rule.field_id.clone(), msg))
			})
			.collect()
	}
}

impl<'a> IntoIterator for &'a RuleSet {
	type Item = &'a ValidationRule;
	type IntoIter = std::slice::Iter<'a, ValidationRule>;

	fn into_iter(self) -> Self::IntoIter {
		self.rules.iter()
	}
}

/// Compile a schema into its rule set.
///
/// Fails fast on configuration errors: duplicate field ids, enumerated
/// fields without options and patterns that are not valid regular
/// expressions.
///
/// # Examples
///
/// ```
/// use formgen_forms::{compile, FieldKind, FormField, FormSchema, SchemaError};
///
/// let schema = FormSchema::new("Pick", "")
///     .with_field(FormField::new("choice", FieldKind::Select, "Choice"));
///
/// assert!(matches!(compile(&schema), Err(SchemaError::MissingOptions { .. })));
/// ```
pub fn compile(schema: &FormSchema) -> SchemaResult<RuleSet> {
	let mut seen = HashSet::new();
	let mut rules = Vec::with_capacity(schema.fields.len());

	for field in &schema.fields {
		if !seen.insert(field.id.as_str()) {
			return Err(SchemaError::DuplicateFieldId {
				field: field.id.clone(),
			});
		}
		rules.push(ValidationRule::for_field(field)?);
	}

	tracing::debug!(
		title = %schema.title,
		fields = rules.len(),
		"compiled form schema"
	);

	Ok(RuleSet { rules })
}
