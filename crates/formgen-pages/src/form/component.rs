//! Form renderer and per-field validation state
//!
//! `FormRenderer` owns everything derived from one schema: the compiled
//! [`RuleSet`], current field values and the per-field [`FieldState`].
//! When the schema changes the derived state is thrown away and rebuilt.
//!
//! ## Field state machine
//!
//! ```text
//! Untouched ──change (live) / blur / submit──▶ Valid ⇄ Invalid(message)
//! ```
//!
//! ## Example
//!
//! ```
//! use formgen_forms::{FieldKind, FormField, FormSchema};
//! use formgen_pages::form::{FieldState, FormRenderer, RenderConfig};
//!
//! let schema = FormSchema::new("Signup", "Join us")
//!     .with_field(FormField::new("email", FieldKind::Email, "Email").required());
//! let mut form = FormRenderer::new(&schema, RenderConfig::default()).unwrap();
//!
//! form.on_change("email", "nope");
//! assert_eq!(
//!     form.field_state("email"),
//!     Some(&FieldState::Invalid("Invalid email address".to_string()))
//! );
//!
//! let html = form.render();
//! assert!(html.contains("Invalid email address"));
//! ```

use super::rendering::{ThemeClasses, WidgetAttrs, html_escape, widget_for};
use crate::submission::{
	FAILURE_MESSAGE, NoticeKind, SubmissionCoordinator, SubmissionError, SubmitHandler,
};
use formgen_forms::{
	FieldErrorMap, FormField, FormSchema, FormSettings, FormValues, RuleSet, SchemaResult, Theme,
	compile,
};
use std::collections::BTreeMap;

/// Rendering options threaded through the renderer instead of global state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderConfig {
	pub theme: Theme,
	/// Re-validate on every change, not only on blur and submit
	pub live_validate: bool,
}

impl Default for RenderConfig {
	fn default() -> Self {
		Self::from_settings(&FormSettings::default())
	}
}

impl RenderConfig {
	pub fn from_settings(settings: &FormSettings) -> Self {
		Self {
			theme: settings.theme,
			live_validate: settings.live_validate,
		}
	}

	pub fn with_theme(mut self, theme: Theme) -> Self {
		self.theme = theme;
		self
	}

	pub fn with_live_validate(mut self, live_validate: bool) -> Self {
		self.live_validate = live_validate;
		self
	}
}

/// Validation state of one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldState {
	Untouched,
	Valid,
	Invalid(String),
}

impl FieldState {
	fn from_result(error: Option<String>) -> Self {
		match error {
			Some(msg) => FieldState::Invalid(msg),
			None => FieldState::Valid,
		}
	}

	pub fn error(&self) -> Option<&str> {
		match self {
			FieldState::Invalid(msg) => Some(msg),
			_ => None,
		}
	}
}

/// Form-level lifecycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPhase {
	Editing,
	Submitting,
	SubmittedSuccess,
	/// The handler rejected or timed out; carries the generic notice text
	SubmittedFailed(String),
}

/// Result of a submit attempt
#[derive(Debug)]
pub enum SubmitOutcome {
	/// Handler resolved successfully
	Submitted,
	/// Validation failed; the handler was not called
	Invalid(FieldErrorMap),
	/// Validation passed but the submission did not go through
	Failed(SubmissionError),
}

impl SubmitOutcome {
	pub fn is_submitted(&self) -> bool {
		matches!(self, SubmitOutcome::Submitted)
	}
}

pub struct FormRenderer {
	schema: FormSchema,
	rules: RuleSet,
	config: RenderConfig,
	values: FormValues,
	states: BTreeMap<String, FieldState>,
	phase: FormPhase,
	coordinator: SubmissionCoordinator,
}

impl FormRenderer {
	/// Compile `schema` and create a renderer with a fresh coordinator.
	pub fn new(schema: &FormSchema, config: RenderConfig) -> SchemaResult<Self> {
		Self::with_coordinator(schema, config, SubmissionCoordinator::default())
	}

	/// Compile `schema` and submit through an existing coordinator.
	pub fn with_coordinator(
		schema: &FormSchema,
		config: RenderConfig,
		coordinator: SubmissionCoordinator,
	) -> SchemaResult<Self> {
		let rules = compile(schema)?;
		Ok(Self {
			states: untouched_states(schema),
			schema: schema.clone(),
			rules,
			config,
			values: FormValues::new(),
			phase: FormPhase::Editing,
			coordinator,
		})
	}

	/// Replace the schema; rules, values and states are rebuilt from scratch.
	///
	/// On a configuration error the previous schema is kept.
	pub fn set_schema(&mut self, schema: &FormSchema) -> SchemaResult<()> {
		let rules = compile(schema)?;
		self.schema = schema.clone();
		self.rules = rules;
		self.values.clear();
		self.states = untouched_states(schema);
		self.phase = FormPhase::Editing;
		Ok(())
	}

	pub fn schema(&self) -> &FormSchema {
		&self.schema
	}

	pub fn rules(&self) -> &RuleSet {
		&self.rules
	}

	pub fn config(&self) -> RenderConfig {
		self.config
	}

	pub fn phase(&self) -> &FormPhase {
		&self.phase
	}

	pub fn coordinator(&self) -> &SubmissionCoordinator {
		&self.coordinator
	}

	pub fn value(&self, field_id: &str) -> &str {
		self.values.get(field_id).map(String::as_str).unwrap_or("")
	}

	pub fn field_state(&self, field_id: &str) -> Option<&FieldState> {
		self.states.get(field_id)
	}

	/// Current error message per invalid field
	pub fn errors(&self) -> FieldErrorMap {
		self.states
			.iter()
			.filter_map(|(id, state)| state.error().map(|msg| (id.clone(), msg.to_string())))
			.collect()
	}

	pub fn is_submitting(&self) -> bool {
		self.phase == FormPhase::Submitting || self.coordinator.is_submitting()
	}

	/// Store a new value; re-validates when live validation is on.
	///
	/// Returns `None` for an id that is not part of the schema.
	pub fn on_change(&mut self, field_id: &str, value: impl Into<String>) -> Option<&FieldState> {
		if !self.states.contains_key(field_id) {
			tracing::warn!(field = field_id, "change event for unknown field");
			return None;
		}
		self.values.insert(field_id.to_string(), value.into());
		if self.config.live_validate {
			self.validate_field(field_id);
		}
		self.states.get(field_id)
	}

	/// Validate the field unconditionally
	pub fn on_blur(&mut self, field_id: &str) -> Option<&FieldState> {
		if !self.states.contains_key(field_id) {
			tracing::warn!(field = field_id, "blur event for unknown field");
			return None;
		}
		self.validate_field(field_id);
		self.states.get(field_id)
	}

	fn validate_field(&mut self, field_id: &str) {
		let error = self.rules.validate(field_id, self.value(field_id));
		self.states
			.insert(field_id.to_string(), FieldState::from_result(error));
	}

	/// Run every rule and surface all failures at once.
	pub fn validate_all(&mut self) -> FieldErrorMap {
		let errors = self.rules.validate_all(&self.values);
		for field in &self.schema.fields {
			let state = FieldState::from_result(errors.get(&field.id).cloned());
			self.states.insert(field.id.clone(), state);
		}
		errors
	}

	/// Values for every schema field, keyed by field id
	pub fn submission_values(&self) -> FormValues {
		self.schema
			.fields
			.iter()
			.map(|f| (f.id.clone(), self.value(&f.id).to_string()))
			.collect()
	}

	/// Replace the current values with `raw` and submit.
	pub async fn submit_values<H>(&mut self, raw: FormValues, handler: &H) -> SubmitOutcome
	where
		H: SubmitHandler + ?Sized,
	{
		self.values = raw
			.into_iter()
			.filter(|(id, _)| self.states.contains_key(id))
			.collect();
		self.submit(handler).await
	}

	/// Validate all fields and, if every one passes, hand the values to the
	/// coordinator. The handler is never called with invalid values.
	pub async fn submit<H>(&mut self, handler: &H) -> SubmitOutcome
	where
		H: SubmitHandler + ?Sized,
	{
		let errors = self.validate_all();
		if !errors.is_empty() {
			tracing::debug!(invalid = errors.len(), "submit blocked by validation");
			return SubmitOutcome::Invalid(errors);
		}

		let previous = std::mem::replace(&mut self.phase, FormPhase::Submitting);
		match self
			.coordinator
			.submit(self.submission_values(), handler)
			.await
		{
			Ok(()) => {
				self.phase = FormPhase::SubmittedSuccess;
				SubmitOutcome::Submitted
			}
			Err(SubmissionError::InFlight) => {
				self.phase = previous;
				SubmitOutcome::Failed(SubmissionError::InFlight)
			}
			Err(e) => {
				self.phase = FormPhase::SubmittedFailed(FAILURE_MESSAGE.to_string());
				SubmitOutcome::Failed(e)
			}
		}
	}

	/// Render the whole form as HTML.
	///
	/// Each invalid field gets its message in an element directly beneath
	/// the control. The submit button is disabled while a submission is in
	/// flight.
	pub fn render(&self) -> String {
		let classes = ThemeClasses::for_theme(self.config.theme);
		let mut html = format!(r#"<form class="{}" novalidate>"#, classes.form);

		html.push_str(&format!("<h2>{}</h2>", html_escape(&self.schema.title)));
		html.push_str(&format!(
			r#"<p class="{}">{}</p>"#,
			classes.description,
			html_escape(&self.schema.description)
		));

		for field in &self.schema.fields {
			html.push_str(&self.render_field(field, &classes));
		}

		let submitting = self.is_submitting();
		html.push_str(&format!(r#"<button type="submit" class="{}""#, classes.button));
		if submitting {
			html.push_str(" disabled");
		}
		html.push('>');
		html.push_str(if submitting { "Submitting..." } else { "Submit" });
		html.push_str("</button>");
		html.push_str("</form>");

		if let Some(notice) = self.coordinator.current_notice() {
			let class = match notice.kind {
				NoticeKind::Success => classes.notice_success,
				NoticeKind::Failure => classes.notice_failure,
			};
			html.push_str(&format!(
				r#"<div class="{}" role="status">{}</div>"#,
				class,
				html_escape(&notice.message)
			));
		}

		html
	}

	fn render_field(&self, field: &FormField, classes: &ThemeClasses) -> String {
		let id = html_escape(&field.id);
		let mut html = format!(r#"<div class="form-field" data-field="{}">"#, id);

		html.push_str(&format!(
			r#"<label for="{}">{}"#,
			id,
			html_escape(&field.label)
		));
		if field.required {
			html.push_str(r#"<span class="required"> *</span>"#);
		}
		html.push_str("</label>");

		let error = self.states.get(&field.id).and_then(FieldState::error);

		let mut attrs = WidgetAttrs::new().id(&field.id).class(classes.control);
		if let Some(placeholder) = &field.placeholder {
			attrs = attrs.placeholder(placeholder);
		}
		if field.required {
			attrs = attrs.required();
		}
		if error.is_some() {
			attrs = attrs
				.aria("invalid", "true")
				.aria("describedby", format!("{}-error", field.id));
		}
		let attrs = attrs.build();

		let value = self.values.get(&field.id).map(String::as_str);
		let choices: Vec<(String, String)> = field
			.options
			.iter()
			.map(|o| (o.value.clone(), o.label.clone()))
			.collect();
		let widget = widget_for(field.kind);
		html.push_str(&widget.render_with_choices(&field.id, value, &attrs, &choices));

		if let Some(msg) = error {
			html.push_str(&format!(
				r#"<p class="{}" id="{}-error" role="alert">{}</p>"#,
				classes.error,
				id,
				html_escape(msg)
			));
		}

		html.push_str("</div>");
		html
	}
}

fn untouched_states(schema: &FormSchema) -> BTreeMap<String, FieldState> {
	schema
		.fields
		.iter()
		.map(|f| (f.id.clone(), FieldState::Untouched))
		.collect()
}
