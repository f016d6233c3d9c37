//! In-memory submission log and JSON export
//!
//! The log is append-only from the point of view of the
//! [`SubmissionCoordinator`](crate::submission::SubmissionCoordinator): it
//! only ever pushes a record after the submit handler succeeded. The host
//! may clear it (e.g. when the schema is removed) and export it as a JSON
//! array that preserves insertion order.

use formgen_forms::FormValues;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

/// Default file name for exported submissions
pub const EXPORT_FILE_NAME: &str = "form_submissions.json";

/// One accepted submission, fields in schema order. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionRecord(FormValues);

impl SubmissionRecord {
	pub fn new(values: FormValues) -> Self {
		Self(values)
	}

	pub fn values(&self) -> &FormValues {
		&self.0
	}

	pub fn get(&self, field_id: &str) -> Option<&str> {
		self.0.get(field_id).map(String::as_str)
	}
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
	#[error("Failed to serialize submissions: {0}")]
	Json(#[from] serde_json::Error),
	#[error("Failed to write submissions: {0}")]
	Io(#[from] std::io::Error),
}

/// Shared handle to the ordered submission log
#[derive(Debug, Clone, Default)]
pub struct SubmissionLog {
	records: Arc<Mutex<Vec<SubmissionRecord>>>,
}

impl SubmissionLog {
	pub fn new() -> Self {
		Self::default()
	}

	/// Rebuild a log from a previous export
	///
	/// # Examples
	///
	/// ```
	/// use formgen_pages::submission_log::SubmissionLog;
	///
	/// let log = SubmissionLog::from_json(r#"[{"name": "Ada"}, {"name": "Grace"}]"#).unwrap();
	/// assert_eq!(log.len(), 2);
	/// assert_eq!(log.records()[1].get("name"), Some("Grace"));
	/// ```
	pub fn from_json(text: &str) -> Result<Self, ExportError> {
		let records: Vec<SubmissionRecord> = serde_json::from_str(text)?;
		Ok(Self {
			records: Arc::new(Mutex::new(records)),
		})
	}

	fn lock(&self) -> MutexGuard<'_, Vec<SubmissionRecord>> {
		self.records.lock().unwrap_or_else(|e| e.into_inner())
	}

	pub(crate) fn push(&self, record: SubmissionRecord) {
		self.lock().push(record);
	}

	/// Snapshot of all records in insertion order
	pub fn records(&self) -> Vec<SubmissionRecord> {
		self.lock().clone()
	}

	pub fn len(&self) -> usize {
		self.lock().len()
	}

	pub fn is_empty(&self) -> bool {
		self.lock().is_empty()
	}

	pub fn clear(&self) {
		self.lock().clear();
	}

	/// Pretty-printed JSON array of every record
	pub fn export_json(&self) -> Result<String, ExportError> {
		Ok(serde_json::to_string_pretty(&*self.lock())?)
	}

	/// Write [`export_json`](Self::export_json) output to `path`.
	pub fn export_to(&self, path: impl AsRef<Path>) -> Result<(), ExportError> {
		let json = self.export_json()?;
		std::fs::write(path.as_ref(), json)?;
		tracing::info!(
			path = %path.as_ref().display(),
			records = self.len(),
			"exported submissions"
		);
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn record(name: &str) -> SubmissionRecord {
		SubmissionRecord::new(FormValues::from([("name".to_string(), name.to_string())]))
	}

	#[rstest]
	fn test_export_preserves_order() {
		// Arrange
		let log = SubmissionLog::new();
		log.push(record("b"));
		log.push(record("a"));
		log.push(record("c"));

		// Act
		let exported = log.export_json().unwrap();
		let restored = SubmissionLog::from_json(&exported).unwrap();

		// Assert
		assert_eq!(restored.records(), log.records());
		assert_eq!(restored.records()[0].get("name"), Some("b"));
	}

	#[rstest]
	fn test_export_keeps_field_order() {
		// Arrange
		let log = SubmissionLog::new();
		log.push(SubmissionRecord::new(FormValues::from([
			("zip".to_string(), "12345".to_string()),
			("name".to_string(), "Ada".to_string()),
			("age".to_string(), "36".to_string()),
		])));

		// Act
		let exported = log.export_json().unwrap();
		let restored = SubmissionLog::from_json(&exported).unwrap();

		// Assert
		let zip = exported.find("\"zip\"").unwrap();
		let name = exported.find("\"name\"").unwrap();
		let age = exported.find("\"age\"").unwrap();
		assert!(zip < name && name < age);
		let keys: Vec<_> = restored.records()[0].values().keys().cloned().collect();
		assert_eq!(keys, ["zip", "name", "age"]);
	}

	#[rstest]
	fn test_empty_log_exports_empty_array() {
		assert_eq!(SubmissionLog::new().export_json().unwrap(), "[]");
	}

	#[rstest]
	fn test_clones_share_records() {
		let log = SubmissionLog::new();
		let handle = log.clone();

		handle.push(record("x"));
		assert_eq!(log.len(), 1);

		log.clear();
		assert!(handle.is_empty());
	}

	#[rstest]
	fn test_export_to_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join(EXPORT_FILE_NAME);
		let log = SubmissionLog::new();
		log.push(record("Ada"));

		log.export_to(&path).unwrap();

		let text = std::fs::read_to_string(&path).unwrap();
		assert_eq!(SubmissionLog::from_json(&text).unwrap().records(), log.records());
	}

	#[rstest]
	fn test_from_json_rejects_non_array() {
		assert!(matches!(
			SubmissionLog::from_json(r#"{"name": "Ada"}"#),
			Err(ExportError::Json(_))
		));
	}
}
