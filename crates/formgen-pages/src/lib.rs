//! formgen Pages - form rendering and submission
//!
//! Turns a [`FormSchema`](formgen_forms::FormSchema) into an interactive
//! form: HTML markup, per-field validation state, and a submission path that
//! records accepted values.
//!
//! ## Architecture
//!
//! - [`form`](mod@form): `FormRenderer`, field state machine and widgets
//! - [`submission`]: single-flight submission coordinator and notices
//! - [`submission_log`]: ordered record of accepted submissions, JSON export
//! - [`editor`]: schema text input and editor event subscriptions
//!
//! ## Example
//!
//! ```
//! use formgen_pages::editor::SchemaInput;
//! use formgen_pages::form::{FormRenderer, RenderConfig, SubmitOutcome};
//! use formgen_pages::submission::HandlerError;
//! use formgen_forms::FormValues;
//!
//! # tokio_test_block(async {
//! let mut input = SchemaInput::new();
//! input.update(r#"{
//!     "formTitle": "Feedback",
//!     "fields": [{"id": "name", "type": "text", "label": "Name", "required": true}]
//! }"#);
//!
//! let mut form = FormRenderer::new(&input.active_schema(), RenderConfig::default()).unwrap();
//! form.on_change("name", "Ada");
//!
//! let handler = |_values: FormValues| async { Ok::<(), HandlerError>(()) };
//! assert!(matches!(form.submit(&handler).await, SubmitOutcome::Submitted));
//! assert_eq!(form.coordinator().log().len(), 1);
//! # });
//! # fn tokio_test_block(f: impl std::future::Future<Output = ()>) {
//! #     tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(f)
//! # }
//! ```

pub mod editor;
pub mod form;
pub mod submission;
pub mod submission_log;

pub use editor::{EditorEvent, EditorEvents, SchemaInput, SchemaStatus, Subscription};
pub use form::{FieldState, FormPhase, FormRenderer, RenderConfig, SubmitOutcome};
pub use submission::{
	HandlerError, Notice, NoticeKind, SubmissionCoordinator, SubmissionError, SubmitHandler,
};
pub use submission_log::{ExportError, SubmissionLog, SubmissionRecord};
