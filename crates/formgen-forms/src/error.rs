use crate::schema::FieldKind;

/// Errors raised while accepting or compiling a form schema
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
	/// The editor text is not a syntactically valid JSON document
	#[error("Invalid JSON")]
	Syntax,
	/// Valid JSON that does not describe a form schema
	#[error("Invalid form schema: {0}")]
	Shape(#[source] serde_json::Error),
	#[error("Field '{field}' of type {kind} must declare at least one option")]
	MissingOptions { field: String, kind: FieldKind },
	#[error("Duplicate field id '{field}'")]
	DuplicateFieldId { field: String },
	#[error("Invalid pattern for field '{field}': {source}")]
	InvalidPattern {
		field: String,
		#[source]
		source: fancy_regex::Error,
	},
}

impl SchemaError {
	/// Configuration errors can only be fixed by editing the schema itself,
	/// as opposed to syntax errors that usually disappear while typing.
	pub fn is_config_error(&self) -> bool {
		matches!(
			self,
			SchemaError::MissingOptions { .. }
				| SchemaError::DuplicateFieldId { .. }
				| SchemaError::InvalidPattern { .. }
		)
	}
}

pub type SchemaResult<T> = Result<T, SchemaError>;
