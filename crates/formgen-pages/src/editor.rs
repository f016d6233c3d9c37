//! Schema editor boundary
//!
//! [`SchemaInput`] turns raw editor text into a [`SchemaStatus`]. The text
//! editor widget itself lives in the host; it reports edits through
//! [`EditorEvents`], and each registered callback is owned by a
//! [`Subscription`] that unregisters it when dropped.

use crate::submission_log::SubmissionLog;
use formgen_forms::{FormSchema, SchemaError, compile, is_valid_json, parse_schema};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, Weak};

/// Indicator text shown while the editor holds malformed JSON
pub const INVALID_JSON_INDICATOR: &str = "Invalid JSON";

/// Outcome of the last editor update
#[derive(Debug)]
pub enum SchemaStatus {
	/// Whitespace only; the placeholder schema is shown
	Empty,
	/// Text is not well-formed JSON
	InvalidJson,
	/// Well-formed JSON that is not a usable schema
	Rejected(SchemaError),
	Ready(FormSchema),
}

impl SchemaStatus {
	pub fn is_ready(&self) -> bool {
		matches!(self, SchemaStatus::Ready(_))
	}

	/// Text for the editor's status indicator, if any
	pub fn indicator(&self) -> Option<String> {
		match self {
			SchemaStatus::Empty | SchemaStatus::Ready(_) => None,
			SchemaStatus::InvalidJson => Some(INVALID_JSON_INDICATOR.to_string()),
			SchemaStatus::Rejected(e) => Some(e.to_string()),
		}
	}
}

/// Holds the editor text and the schema derived from it
#[derive(Debug)]
pub struct SchemaInput {
	text: String,
	status: SchemaStatus,
	log: Option<SubmissionLog>,
}

impl Default for SchemaInput {
	fn default() -> Self {
		Self::new()
	}
}

impl SchemaInput {
	pub fn new() -> Self {
		Self {
			text: String::new(),
			status: SchemaStatus::Empty,
			log: None,
		}
	}

	/// Reset `log` whenever the schema is cleared or stops parsing.
	pub fn with_log(mut self, log: SubmissionLog) -> Self {
		self.log = Some(log);
		self
	}

	pub fn text(&self) -> &str {
		&self.text
	}

	pub fn status(&self) -> &SchemaStatus {
		&self.status
	}

	/// Replace the editor text and re-derive the schema.
	///
	/// # Examples
	///
	/// ```
	/// use formgen_pages::editor::{SchemaInput, SchemaStatus};
	///
	/// let mut input = SchemaInput::new();
	/// assert!(matches!(input.update("{"), SchemaStatus::InvalidJson));
	///
	/// let status = input.update(r#"{"formTitle": "Hi", "fields": []}"#);
	/// assert!(status.is_ready());
	/// assert_eq!(input.active_schema().title, "Hi");
	/// ```
	pub fn update(&mut self, text: impl Into<String>) -> &SchemaStatus {
		self.text = text.into();
		self.status = derive_status(&self.text);

		if matches!(self.status, SchemaStatus::Empty | SchemaStatus::InvalidJson)
			&& let Some(log) = &self.log
			&& !log.is_empty()
		{
			tracing::debug!(records = log.len(), "clearing submissions for unusable schema");
			log.clear();
		}

		&self.status
	}

	/// The ready schema, or the placeholder when there is none
	pub fn active_schema(&self) -> Cow<'_, FormSchema> {
		match &self.status {
			SchemaStatus::Ready(schema) => Cow::Borrowed(schema),
			_ => Cow::Owned(FormSchema::placeholder()),
		}
	}

	/// Re-run [`update`](Self::update) on every change, paste and key-up.
	///
	/// The returned subscriptions keep the wiring alive.
	pub fn watch(input: Arc<Mutex<SchemaInput>>, events: &EditorEvents) -> Vec<Subscription> {
		[EditorEvent::Change, EditorEvent::Paste, EditorEvent::KeyUp]
			.into_iter()
			.map(|kind| {
				let input = Arc::clone(&input);
				events.subscribe(kind, move |text: &str| {
					input
						.lock()
						.unwrap_or_else(|e| e.into_inner())
						.update(text);
				})
			})
			.collect()
	}
}

fn derive_status(text: &str) -> SchemaStatus {
	if text.trim().is_empty() {
		return SchemaStatus::Empty;
	}
	if !is_valid_json(text) {
		return SchemaStatus::InvalidJson;
	}
	let schema = match parse_schema(text) {
		Ok(schema) => schema,
		Err(e) => return SchemaStatus::Rejected(e),
	};
	match compile(&schema) {
		Ok(_) => SchemaStatus::Ready(schema),
		Err(e) => {
			tracing::warn!("schema rejected: {}", e);
			SchemaStatus::Rejected(e)
		}
	}
}

/// Editor notifications the host forwards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditorEvent {
	Change,
	Paste,
	KeyUp,
}

type Callback = Arc<Mutex<Box<dyn FnMut(&str) + Send>>>;

#[derive(Default)]
struct Registry {
	next_id: u64,
	listeners: BTreeMap<u64, (EditorEvent, Callback)>,
}

/// Registry of editor callbacks
#[derive(Clone, Default)]
pub struct EditorEvents {
	registry: Arc<Mutex<Registry>>,
}

impl fmt::Debug for EditorEvents {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("EditorEvents")
			.field("listeners", &self.listener_count())
			.finish()
	}
}

impl EditorEvents {
	pub fn new() -> Self {
		Self::default()
	}

	fn lock(&self) -> std::sync::MutexGuard<'_, Registry> {
		self.registry.lock().unwrap_or_else(|e| e.into_inner())
	}

	/// Register `callback` for `kind`; it stays registered while the
	/// returned [`Subscription`] is alive.
	#[must_use = "dropping the subscription unregisters the callback"]
	pub fn subscribe<F>(&self, kind: EditorEvent, callback: F) -> Subscription
	where
		F: FnMut(&str) + Send + 'static,
	{
		let callback: Box<dyn FnMut(&str) + Send> = Box::new(callback);
		let mut registry = self.lock();
		let id = registry.next_id;
		registry.next_id += 1;
		registry
			.listeners
			.insert(id, (kind, Arc::new(Mutex::new(callback))));
		tracing::debug!(?kind, id, "editor listener registered");

		Subscription {
			id,
			registry: Arc::downgrade(&self.registry),
		}
	}

	/// Deliver `text` to every listener of `kind`, in registration order.
	///
	/// Returns how many callbacks ran.
	pub fn emit(&self, kind: EditorEvent, text: &str) -> usize {
		// Snapshot so callbacks may subscribe or cancel without deadlocking
		let targets: Vec<Callback> = self
			.lock()
			.listeners
			.values()
			.filter(|(k, _)| *k == kind)
			.map(|(_, cb)| Arc::clone(cb))
			.collect();

		for callback in &targets {
			let mut callback = callback.lock().unwrap_or_else(|e| e.into_inner());
			(*callback)(text);
		}
		targets.len()
	}

	pub fn listener_count(&self) -> usize {
		self.lock().listeners.len()
	}
}

/// Owned handle for one registered editor callback
#[derive(Debug)]
pub struct Subscription {
	id: u64,
	registry: Weak<Mutex<Registry>>,
}

impl Subscription {
	pub fn is_active(&self) -> bool {
		self.registry.upgrade().is_some_and(|registry| {
			registry
				.lock()
				.unwrap_or_else(|e| e.into_inner())
				.listeners
				.contains_key(&self.id)
		})
	}

	/// Unregister now instead of on drop
	pub fn cancel(self) {}
}

impl Drop for Subscription {
	fn drop(&mut self) {
		if let Some(registry) = self.registry.upgrade() {
			registry
				.lock()
				.unwrap_or_else(|e| e.into_inner())
				.listeners
				.remove(&self.id);
			tracing::debug!(id = self.id, "editor listener removed");
		}
	}
}
