//! Form Widgets and HTML Rendering
//!
//! This module provides the HTML controls for each field kind. Widgets
//! render plain markup strings; the theme only decides which CSS classes
//! are attached.

use formgen_forms::{FieldKind, Theme};
use std::collections::BTreeMap;

/// Widget type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetType {
	/// Single-line text input
	TextInput,
	/// Single-line email input
	EmailInput,
	/// Textarea (multiline text)
	Textarea,
	/// Closed dropdown
	Select,
	/// Mutually exclusive radio button group
	RadioSelect,
}

impl WidgetType {
	/// The control used for a schema field kind
	pub fn for_kind(kind: FieldKind) -> Self {
		match kind {
			FieldKind::Text => WidgetType::TextInput,
			FieldKind::Email => WidgetType::EmailInput,
			FieldKind::Textarea => WidgetType::Textarea,
			FieldKind::Select => WidgetType::Select,
			FieldKind::Radio => WidgetType::RadioSelect,
		}
	}
}

/// Base widget trait
pub trait Widget: Send + Sync {
	/// Get the widget type
	fn widget_type(&self) -> WidgetType;

	/// Render the widget as HTML
	fn render(&self, name: &str, value: Option<&str>, attrs: &BTreeMap<String, String>) -> String;

	/// Render the widget with choices (for select widgets)
	fn render_with_choices(
		&self,
		name: &str,
		value: Option<&str>,
		attrs: &BTreeMap<String, String>,
		_choices: &[(String, String)],
	) -> String {
		self.render(name, value, attrs)
	}
}

/// Look up the widget for a field kind
pub fn widget_for(kind: FieldKind) -> Box<dyn Widget> {
	match WidgetType::for_kind(kind) {
		WidgetType::TextInput => Box::new(TextInput::new()),
		WidgetType::EmailInput => Box::new(TextInput::email()),
		WidgetType::Textarea => Box::new(Textarea::new()),
		WidgetType::Select => Box::new(Select::new()),
		WidgetType::RadioSelect => Box::new(RadioSelect::new()),
	}
}

fn push_attrs(html: &mut String, attrs: &BTreeMap<String, String>) {
	for (key, val) in attrs {
		html.push_str(&format!(r#" {}="{}""#, key, html_escape(val)));
	}
}

/// Text input widget
#[derive(Debug, Clone)]
pub struct TextInput {
	input_type: &'static str,
}

impl TextInput {
	/// Create a new text input widget
	pub fn new() -> Self {
		Self { input_type: "text" }
	}

	/// Create an email input widget
	pub fn email() -> Self {
		Self {
			input_type: "email",
		}
	}
}

impl Default for TextInput {
	fn default() -> Self {
		Self::new()
	}
}

impl Widget for TextInput {
	fn widget_type(&self) -> WidgetType {
		if self.input_type == "email" {
			WidgetType::EmailInput
		} else {
			WidgetType::TextInput
		}
	}

	fn render(&self, name: &str, value: Option<&str>, attrs: &BTreeMap<String, String>) -> String {
		let mut html = format!(
			r#"<input type="{}" name="{}""#,
			self.input_type,
			html_escape(name)
		);

		if let Some(v) = value {
			html.push_str(&format!(r#" value="{}""#, html_escape(v)));
		}

		push_attrs(&mut html, attrs);

		html.push_str(" />");
		html
	}
}

/// Multi-line text widget
#[derive(Debug, Clone, Default)]
pub struct Textarea;

impl Textarea {
	pub fn new() -> Self {
		Self
	}
}

impl Widget for Textarea {
	fn widget_type(&self) -> WidgetType {
		WidgetType::Textarea
	}

	fn render(&self, name: &str, value: Option<&str>, attrs: &BTreeMap<String, String>) -> String {
		let mut html = format!(r#"<textarea name="{}""#, html_escape(name));
		push_attrs(&mut html, attrs);
		html.push('>');
		html.push_str(&html_escape(value.unwrap_or("")));
		html.push_str("</textarea>");
		html
	}
}

/// Select dropdown widget
#[derive(Debug, Clone)]
pub struct Select {
	placeholder: String,
}

impl Select {
	/// Create a new select widget
	pub fn new() -> Self {
		Self {
			placeholder: "Select an option".to_string(),
		}
	}
}

impl Default for Select {
	fn default() -> Self {
		Self::new()
	}
}

impl Widget for Select {
	fn widget_type(&self) -> WidgetType {
		WidgetType::Select
	}

	fn render(&self, name: &str, value: Option<&str>, attrs: &BTreeMap<String, String>) -> String {
		self.render_with_choices(name, value, attrs, &[])
	}

	fn render_with_choices(
		&self,
		name: &str,
		value: Option<&str>,
		attrs: &BTreeMap<String, String>,
		choices: &[(String, String)],
	) -> String {
		let mut html = format!(r#"<select name="{}""#, html_escape(name));
		push_attrs(&mut html, attrs);
		html.push('>');

		// Disabled prompt, selected while nothing has been picked
		html.push_str(r#"<option value="" disabled"#);
		if value.is_none_or(str::is_empty) {
			html.push_str(" selected");
		}
		html.push('>');
		html.push_str(&html_escape(&self.placeholder));
		html.push_str("</option>");

		for (choice_value, choice_label) in choices {
			html.push_str("<option");
			html.push_str(&format!(r#" value="{}""#, html_escape(choice_value)));

			if Some(choice_value.as_str()) == value {
				html.push_str(" selected");
			}

			html.push('>');
			html.push_str(&html_escape(choice_label));
			html.push_str("</option>");
		}

		html.push_str("</select>");
		html
	}
}

/// Radio button group widget
#[derive(Debug, Clone, Default)]
pub struct RadioSelect;

impl RadioSelect {
	pub fn new() -> Self {
		Self
	}
}

impl Widget for RadioSelect {
	fn widget_type(&self) -> WidgetType {
		WidgetType::RadioSelect
	}

	fn render(&self, name: &str, value: Option<&str>, attrs: &BTreeMap<String, String>) -> String {
		self.render_with_choices(name, value, attrs, &[])
	}

	fn render_with_choices(
		&self,
		name: &str,
		value: Option<&str>,
		attrs: &BTreeMap<String, String>,
		choices: &[(String, String)],
	) -> String {
		let mut html = String::from(r#"<div role="radiogroup">"#);
		let escaped_name = html_escape(name);

		for (choice_value, choice_label) in choices {
			let input_id = format!("{}-{}", escaped_name, html_escape(choice_value));

			html.push_str(&format!(
				r#"<label for="{}"><input type="radio" name="{}" id="{}" value="{}""#,
				input_id,
				escaped_name,
				input_id,
				html_escape(choice_value)
			));

			if Some(choice_value.as_str()) == value {
				html.push_str(" checked");
			}

			// Per-group ids would collide on every radio
			for (key, val) in attrs.iter().filter(|(k, _)| k.as_str() != "id") {
				html.push_str(&format!(r#" {}="{}""#, key, html_escape(val)));
			}

			html.push_str(" /> ");
			html.push_str(&html_escape(choice_label));
			html.push_str("</label>");
		}

		html.push_str("</div>");
		html
	}
}

/// Escape text for use in HTML content and attribute values
pub fn html_escape(s: &str) -> String {
	s.replace('&', "&amp;")
		.replace('<', "&lt;")
		.replace('>', "&gt;")
		.replace('"', "&quot;")
		.replace('\'', "&#x27;")
}

/// Builder for widget attributes
#[derive(Debug, Clone, Default)]
pub struct WidgetAttrs {
	attrs: BTreeMap<String, String>,
}

impl WidgetAttrs {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn aria(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.attrs.insert(format!("aria-{}", key.into()), value.into());
		self
	}

	/// Append a CSS class, keeping existing ones
	pub fn class(mut self, value: impl Into<String>) -> Self {
		let value = value.into();
		self.attrs
			.entry("class".to_string())
			.and_modify(|existing| {
				existing.push(' ');
				existing.push_str(&value);
			})
			.or_insert(value);
		self
	}

	pub fn id(mut self, value: impl Into<String>) -> Self {
		self.attrs.insert("id".to_string(), value.into());
		self
	}

	pub fn placeholder(mut self, value: impl Into<String>) -> Self {
		self.attrs.insert("placeholder".to_string(), value.into());
		self
	}

	pub fn required(mut self) -> Self {
		self.attrs.insert("required".to_string(), "required".to_string());
		self
	}

	pub fn build(self) -> BTreeMap<String, String> {
		self.attrs
	}
}

/// CSS classes for one theme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeClasses {
	pub form: &'static str,
	pub control: &'static str,
	pub description: &'static str,
	pub error: &'static str,
	pub button: &'static str,
	pub notice_success: &'static str,
	pub notice_failure: &'static str,
}

impl ThemeClasses {
	pub fn for_theme(theme: Theme) -> Self {
		match theme {
			Theme::Light => Self {
				form: "form",
				control: "form-control",
				description: "form-description",
				error: "field-error",
				button: "btn btn-primary",
				notice_success: "notice notice-success",
				notice_failure: "notice notice-failure",
			},
			Theme::Dark => Self {
				form: "form dark",
				control: "form-control dark",
				description: "form-description dark",
				error: "field-error dark",
				button: "btn btn-primary dark",
				notice_success: "notice notice-success dark",
				notice_failure: "notice notice-failure dark",
			},
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn choices() -> Vec<(String, String)> {
		vec![
			("1".to_string(), "Option 1".to_string()),
			("2".to_string(), "Option 2".to_string()),
		]
	}

	#[rstest]
	fn test_text_input_render() {
		let widget = TextInput::new();
		let html = widget.render("username", Some("john"), &BTreeMap::new());
		assert!(html.contains(r#"type="text""#));
		assert!(html.contains(r#"name="username""#));
		assert!(html.contains(r#"value="john""#));
	}

	#[rstest]
	fn test_email_input_render() {
		let widget = TextInput::email();
		assert_eq!(widget.widget_type(), WidgetType::EmailInput);
		assert!(widget.render("mail", None, &BTreeMap::new()).contains(r#"type="email""#));
	}

	#[rstest]
	fn test_textarea_render_escapes_content() {
		let html = Textarea::new().render("bio", Some("<b>hi</b>"), &BTreeMap::new());
		assert_eq!(html, r#"<textarea name="bio">&lt;b&gt;hi&lt;/b&gt;</textarea>"#);
	}

	#[rstest]
	fn test_select_render() {
		let widget = Select::new();
		let html = widget.render_with_choices("choice", Some("2"), &BTreeMap::new(), &choices());
		assert!(html.contains(r#"<select name="choice""#));
		assert!(html.contains(r#"<option value="" disabled>Select an option</option>"#));
		assert!(html.contains(r#"value="1">"#));
		assert!(html.contains(r#"value="2" selected"#));
	}

	#[rstest]
	fn test_select_prompt_selected_without_value() {
		let html = Select::new().render_with_choices("choice", None, &BTreeMap::new(), &choices());
		assert!(html.contains(r#"<option value="" disabled selected>"#));
	}

	#[rstest]
	fn test_radio_select_render() {
		let widget = RadioSelect::new();
		let attrs = WidgetAttrs::new().id("gender").class("radio").build();
		let html = widget.render_with_choices("gender", Some("2"), &attrs, &choices());
		assert!(html.contains(r#"type="radio""#));
		assert!(html.contains(r#"id="gender-1""#));
		assert!(html.contains(r#"value="2" checked"#));
		assert!(!html.contains(r#"id="gender""#));
	}

	#[rstest]
	#[case(FieldKind::Text, WidgetType::TextInput)]
	#[case(FieldKind::Email, WidgetType::EmailInput)]
	#[case(FieldKind::Textarea, WidgetType::Textarea)]
	#[case(FieldKind::Select, WidgetType::Select)]
	#[case(FieldKind::Radio, WidgetType::RadioSelect)]
	fn test_widget_for_kind(#[case] kind: FieldKind, #[case] expected: WidgetType) {
		assert_eq!(widget_for(kind).widget_type(), expected);
	}

	#[rstest]
	fn test_html_escape() {
		assert_eq!(html_escape("<script>"), "&lt;script&gt;");
		assert_eq!(html_escape("A & B"), "A &amp; B");
		assert_eq!(html_escape(r#"He said "hi""#), "He said &quot;hi&quot;");
	}

	#[rstest]
	fn test_widget_attrs_multiple_classes() {
		let attrs = WidgetAttrs::new()
			.class("form-control")
			.class("is-invalid")
			.aria("invalid", "true")
			.build();

		assert_eq!(
			attrs.get("class"),
			Some(&"form-control is-invalid".to_string())
		);
		assert_eq!(attrs.get("aria-invalid"), Some(&"true".to_string()));
	}

	#[rstest]
	fn test_theme_classes_differ() {
		let light = ThemeClasses::for_theme(Theme::Light);
		let dark = ThemeClasses::for_theme(Theme::Dark);
		assert_ne!(light, dark);
		assert!(dark.control.contains("dark"));
	}
}
