//! Value validators used by compiled field rules
//!
//! Each validator checks a single string value and reports one message on
//! failure. The schema compiler chains them into a [`ValidationRule`].
//!
//! [`ValidationRule`]: crate::compiler::ValidationRule

use regex::Regex;
use std::sync::LazyLock;

/// Default message for a failed email check
pub const INVALID_EMAIL_MESSAGE: &str = "Invalid email address";

/// Default message for a value outside the declared options
pub const INVALID_SELECTION_MESSAGE: &str = "Invalid selection";

// Email address pattern.
//
// - Local part: dot-separated atoms of letters, digits and `_'+-`
// - Domain: one or more labels that start with a letter or digit
// - Top-level domain of at least two letters
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(
		r"^[A-Za-z0-9_'+\-]+(\.[A-Za-z0-9_'+\-]+)*@([A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$",
	)
	.expect("EMAIL_REGEX: invalid regex pattern")
});

/// A failed field check
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
	#[error("{0}")]
	Required(String),
	#[error("{0}")]
	Invalid(String),
}

impl FieldError {
	pub fn message(&self) -> &str {
		match self {
			FieldError::Required(msg) | FieldError::Invalid(msg) => msg,
		}
	}

	pub fn into_message(self) -> String {
		match self {
			FieldError::Required(msg) | FieldError::Invalid(msg) => msg,
		}
	}
}

pub type FieldResult<T> = Result<T, FieldError>;

/// Rejects the empty string.
///
/// # Examples
///
/// ```
/// use formgen_forms::validators::RequiredValidator;
///
/// let validator = RequiredValidator::new("Name");
/// assert!(validator.validate("Ada").is_ok());
/// assert_eq!(validator.validate("").unwrap_err().message(), "Name is required");
/// ```
#[derive(Debug, Clone)]
pub struct RequiredValidator {
	message: String,
}

impl RequiredValidator {
	pub fn new(label: &str) -> Self {
		Self {
			message: format!("{} is required", label),
		}
	}

	pub fn validate(&self, value: &str) -> FieldResult<()> {
		if value.is_empty() {
			Err(FieldError::Required(self.message.clone()))
		} else {
			Ok(())
		}
	}
}

/// Requires a regex match somewhere in the value.
///
/// Patterns follow the browser `RegExp` dialect schema authors write
/// against: look-around and back-references are supported, and `\d`/`\w`
/// only match ASCII. Matching is unanchored; schema authors anchor with
/// `^...$` when they need a full match.
///
/// # Examples
///
/// ```
/// use formgen_forms::validators::PatternValidator;
///
/// let validator = PatternValidator::new("Zip", r"^\d{5}$").unwrap();
/// assert!(validator.validate("12345").is_ok());
/// assert_eq!(
///     validator.validate("12a45").unwrap_err().message(),
///     "Invalid format for Zip"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct PatternValidator {
	regex: fancy_regex::Regex,
	message: String,
}

impl PatternValidator {
	pub fn new(label: &str, pattern: &str) -> Result<Self, fancy_regex::Error> {
		Ok(Self {
			regex: fancy_regex::Regex::new(&ascii_shorthands(pattern))?,
			message: format!("Invalid format for {}", label),
		})
	}

	pub fn with_message(mut self, message: impl Into<String>) -> Self {
		self.message = message.into();
		self
	}

	pub fn validate(&self, value: &str) -> FieldResult<()> {
		match self.regex.is_match(value) {
			Ok(true) => Ok(()),
			Ok(false) => Err(FieldError::Invalid(self.message.clone())),
			Err(e) => {
				tracing::warn!(pattern = self.regex.as_str(), "pattern match aborted: {}", e);
				Err(FieldError::Invalid(self.message.clone()))
			}
		}
	}
}

/// Rewrite `\d`, `\D`, `\w` and `\W` to their ASCII classes.
///
/// Inside a bracket class only `\d` and `\w` are expanded.
fn ascii_shorthands(pattern: &str) -> String {
	let mut out = String::with_capacity(pattern.len());
	let mut chars = pattern.chars();
	let mut in_class = false;

	while let Some(c) = chars.next() {
		match c {
			'\\' => match chars.next() {
				Some('d') if in_class => out.push_str("0-9"),
				Some('d') => out.push_str("[0-9]"),
				Some('D') if !in_class => out.push_str("[^0-9]"),
				Some('w') if in_class => out.push_str("0-9A-Za-z_"),
				Some('w') => out.push_str("[0-9A-Za-z_]"),
				Some('W') if !in_class => out.push_str("[^0-9A-Za-z_]"),
				Some(escaped) => {
					out.push('\\');
					out.push(escaped);
				}
				None => out.push('\\'),
			},
			'[' if !in_class => {
				in_class = true;
				out.push(c);
			}
			']' if in_class => {
				in_class = false;
				out.push(c);
			}
			_ => out.push(c),
		}
	}
	out
}

/// Validates that a value is a well-formed email address.
///
/// # Examples
///
/// ```
/// use formgen_forms::validators::EmailValidator;
///
/// let validator = EmailValidator::new();
/// assert!(validator.validate("a@b.com").is_ok());
/// assert!(validator.validate("not-an-email").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct EmailValidator {
	message: Option<String>,
}

impl EmailValidator {
	pub fn new() -> Self {
		Self { message: None }
	}

	pub fn with_message(mut self, message: impl Into<String>) -> Self {
		self.message = Some(message.into());
		self
	}

	pub fn validate(&self, value: &str) -> FieldResult<()> {
		if EMAIL_REGEX.is_match(value) {
			Ok(())
		} else {
			let msg = self.message.as_deref().unwrap_or(INVALID_EMAIL_MESSAGE);
			Err(FieldError::Invalid(msg.to_string()))
		}
	}
}

impl Default for EmailValidator {
	fn default() -> Self {
		Self::new()
	}
}

/// Closed enumeration check for select and radio fields.
///
/// # Examples
///
/// ```
/// use formgen_forms::validators::ChoiceValidator;
///
/// let validator = ChoiceValidator::new(vec!["x".to_string(), "y".to_string()]);
/// assert!(validator.validate("x").is_ok());
/// assert!(validator.validate("z").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct ChoiceValidator {
	choices: Vec<String>,
	message: Option<String>,
}

impl ChoiceValidator {
	pub fn new(choices: Vec<String>) -> Self {
		Self {
			choices,
			message: None,
		}
	}

	pub fn with_message(mut self, message: impl Into<String>) -> Self {
		self.message = Some(message.into());
		self
	}

	pub fn validate(&self, value: &str) -> FieldResult<()> {
		if self.choices.iter().any(|c| c == value) {
			Ok(())
		} else {
			let msg = self.message.as_deref().unwrap_or(INVALID_SELECTION_MESSAGE);
			Err(FieldError::Invalid(msg.to_string()))
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("a@b.com")]
	#[case("first.last@example.co.uk")]
	#[case("user+tag@sub-domain.example.org")]
	#[case("o'neil@example.ie")]
	fn test_email_accepts(#[case] value: &str) {
		assert!(EmailValidator::new().validate(value).is_ok());
	}

	#[rstest]
	#[case("not-an-email")]
	#[case("@example.com")]
	#[case("user@")]
	#[case("user@example")]
	#[case("user@@example.com")]
	#[case("user name@example.com")]
	#[case(".user@example.com")]
	#[case("user..name@example.com")]
	#[case("user@-example.com")]
	fn test_email_rejects(#[case] value: &str) {
		let err = EmailValidator::new().validate(value).unwrap_err();
		assert_eq!(err.message(), INVALID_EMAIL_MESSAGE);
	}

	#[rstest]
	fn test_email_message_override() {
		let validator = EmailValidator::new().with_message("Use your work address");

		let err = validator.validate("nope").unwrap_err();

		assert_eq!(err, FieldError::Invalid("Use your work address".to_string()));
	}

	#[rstest]
	fn test_pattern_is_unanchored() {
		let validator = PatternValidator::new("Code", r"\d+").unwrap();

		assert!(validator.validate("abc123").is_ok());
		assert!(validator.validate("abc").is_err());
	}

	#[rstest]
	fn test_pattern_supports_lookahead() {
		// Arrange
		let validator = PatternValidator::new("Password", r"^(?=.*\d)(?=.*[A-Z]).{8,}$").unwrap();

		// Act & Assert
		assert!(validator.validate("Secret123").is_ok());
		assert!(validator.validate("secret123").is_err());
		assert!(validator.validate("SecretPass").is_err());
	}

	#[rstest]
	fn test_pattern_supports_backreference() {
		let validator = PatternValidator::new("Code", r"^(\w)\1$").unwrap();

		assert!(validator.validate("aa").is_ok());
		assert!(validator.validate("ab").is_err());
	}

	#[rstest]
	#[case(r"^\d{3}-\d{4}$", "555-1234", true)]
	#[case(r"^\d{3}-\d{4}$", "\u{663}\u{663}\u{663}-\u{663}\u{663}\u{663}\u{663}", false)]
	#[case(r"^\w+$", "abc_123", true)]
	#[case(r"^\w+$", "caf\u{e9}", false)]
	#[case(r"^[\d-]+$", "12-34", true)]
	#[case(r"^[\d-]+$", "\u{663}-\u{663}", false)]
	#[case(r"^\D+$", "abc", true)]
	#[case(r"^\D+$", "a\u{663}", true)]
	#[case(r"^\$\d+\.\d{2}$", "$10.50", true)]
	fn test_pattern_shorthands_are_ascii(
		#[case] pattern: &str,
		#[case] value: &str,
		#[case] accepted: bool,
	) {
		let validator = PatternValidator::new("Field", pattern).unwrap();

		assert_eq!(validator.validate(value).is_ok(), accepted);
	}

	#[rstest]
	#[case(r"\d", "[0-9]")]
	#[case(r"[\w.]", "[0-9A-Za-z_.]")]
	#[case(r"\\d", r"\\d")]
	#[case(r"\bx\b", r"\bx\b")]
	fn test_ascii_shorthands_rewrite(#[case] pattern: &str, #[case] expected: &str) {
		assert_eq!(ascii_shorthands(pattern), expected);
	}

	#[rstest]
	fn test_pattern_rejects_broken_regex() {
		assert!(PatternValidator::new("Code", "(unclosed").is_err());
	}

	#[rstest]
	fn test_choice_default_message() {
		let validator = ChoiceValidator::new(vec!["x".to_string()]);

		assert_eq!(
			validator.validate("z").unwrap_err().message(),
			INVALID_SELECTION_MESSAGE
		);
	}

	#[rstest]
	fn test_required_accepts_whitespace() {
		// Only the empty string counts as missing
		assert!(RequiredValidator::new("Name").validate(" ").is_ok());
	}
}
