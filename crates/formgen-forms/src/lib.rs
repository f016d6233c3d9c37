//! Form schema handling for formgen
//!
//! This crate provides the validation core of the form generator:
//! - Form schema data model with the editor's JSON wire format
//! - JSON syntax gate for editor input
//! - Schema-to-validator compilation (required, pattern, email, choice checks)
//! - Settings loaded from TOML

pub mod compiler;
pub mod error;
pub mod json;
pub mod schema;
pub mod settings;
pub mod validators;

pub use compiler::{Check, FieldErrorMap, FormValues, RuleSet, ValidationRule, compile};
pub use error::{SchemaError, SchemaResult};
pub use json::{is_valid_json, parse_schema};
pub use schema::{FieldKind, FieldOption, FieldValidation, FormField, FormSchema};
pub use settings::{FormSettings, SettingsError, Theme};
pub use validators::{FieldError, FieldResult};
