//! Runtime settings for form rendering and submission
//!
//! Settings are plain serde data loaded from TOML. Every key is optional;
//! missing keys fall back to [`FormSettings::default`].
//!
//! ```toml
//! live_validate = true
//! notice_duration_secs = 3
//! submit_timeout_secs = 30
//! theme = "dark"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Colour theme threaded through rendering configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
	#[default]
	Light,
	Dark,
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
	#[error("Failed to read settings file {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
	#[error("Failed to parse settings: {message}")]
	Parse { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormSettings {
	/// Re-validate a field on every change instead of only on blur/submit
	pub live_validate: bool,
	/// How long a submission notice stays visible
	pub notice_duration_secs: u64,
	/// Upper bound for one submission handler call; `None` waits forever
	pub submit_timeout_secs: Option<u64>,
	pub theme: Theme,
}

impl Default for FormSettings {
	fn default() -> Self {
		Self {
			live_validate: true,
			notice_duration_secs: 3,
			submit_timeout_secs: Some(30),
			theme: Theme::Light,
		}
	}
}

impl FormSettings {
	/// Load settings from a TOML file.
	///
	/// # Errors
	///
	/// Returns error if file cannot be read or parsed.
	pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
		let path = path.as_ref();
		let content = std::fs::read_to_string(path).map_err(|e| SettingsError::Io {
			path: path.to_path_buf(),
			source: e,
		})?;

		Self::from_toml_str(&content)
	}

	/// Parse settings from a TOML string.
	///
	/// # Examples
	///
	/// ```
	/// use formgen_forms::settings::{FormSettings, Theme};
	///
	/// let settings = FormSettings::from_toml_str("theme = \"dark\"").unwrap();
	/// assert_eq!(settings.theme, Theme::Dark);
	/// assert!(settings.live_validate);
	/// ```
	pub fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
		toml::from_str(content).map_err(|e| SettingsError::Parse {
			message: e.to_string(),
		})
	}

	pub fn notice_duration(&self) -> Duration {
		Duration::from_secs(self.notice_duration_secs)
	}

	pub fn submit_timeout(&self) -> Option<Duration> {
		self.submit_timeout_secs.map(Duration::from_secs)
	}
}
