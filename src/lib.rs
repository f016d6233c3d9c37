//! # formgen
//!
//! Schema-driven dynamic forms.
//!
//! A form is described by a JSON schema (title, description and an ordered
//! list of fields). formgen checks the editor text, compiles the schema into
//! validation rules, renders the form with live per-field validation, and
//! records accepted submissions for export.
//!
//! ## Feature Flags
//!
//! - `minimal` - Schema model, JSON checking and the rule compiler
//! - `pages` - Renderer, editor boundary, submission coordinator and log
//! - `full` (default) - Everything
//!
//! ## Quick Example
//!
//! ```
//! use formgen::prelude::*;
//!
//! let schema = parse_schema(r#"{
//!     "formTitle": "Newsletter",
//!     "fields": [{"id": "email", "type": "email", "label": "Email", "required": true}]
//! }"#).unwrap();
//! let rules = compile(&schema).unwrap();
//!
//! assert_eq!(rules.validate("email", ""), Some("Email is required".to_string()));
//! assert_eq!(rules.validate("email", "a@b.io"), None);
//! ```

pub mod forms;
#[cfg(feature = "pages")]
pub mod pages;

/// Commonly used types
pub mod prelude {
	pub use crate::forms::{
		FieldErrorMap, FieldKind, FormField, FormSchema, FormSettings, FormValues, RuleSet,
		SchemaError, Theme, compile, is_valid_json, parse_schema,
	};

	#[cfg(feature = "pages")]
	pub use crate::pages::{
		EditorEvent, EditorEvents, FormRenderer, HandlerError, RenderConfig, SchemaInput,
		SchemaStatus, SubmissionCoordinator, SubmissionLog, SubmitOutcome,
	};
}
