//! Form rendering and per-field validation state
//!
//! ## Architecture
//!
//! ```text
//! formgen-forms:                formgen-pages:
//! ┌──────────────┐            ┌──────────────────────┐
//! │ FormSchema   │──compile──▶│ FormRenderer         │
//! │ RuleSet      │            │ │on_change / on_blur │──▶ FieldState
//! │              │            │ │validate_all        │
//! │              │            │ │render              │──▶ HTML
//! │              │            │ │submit              │──▶ SubmissionCoordinator
//! └──────────────┘            └──────────────────────┘
//! ```
//!
//! ## Components
//!
//! - **FormRenderer**: Owns the compiled rules, values and field states for one schema
//! - **Widget**: HTML control per field kind

pub mod component;
pub mod rendering;

pub use component::{FieldState, FormPhase, FormRenderer, RenderConfig, SubmitOutcome};
pub use rendering::{
	RadioSelect, Select, Textarea, TextInput, ThemeClasses, Widget, WidgetAttrs, WidgetType,
	html_escape, widget_for,
};
