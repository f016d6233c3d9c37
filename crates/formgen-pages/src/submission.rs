//! Submission coordination
//!
//! [`SubmissionCoordinator`] runs exactly one submit handler call at a time.
//! The in-flight state is a flag, not a queue: a second submit while one is
//! pending is rejected with [`SubmissionError::InFlight`] and the handler is
//! not invoked again.
//!
//! ## Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant R as FormRenderer
//!     participant C as SubmissionCoordinator
//!     participant H as SubmitHandler
//!     R->>C: submit(values)
//!     C->>C: acquire in-flight flag
//!     C->>H: submit(values)
//!     H-->>C: Ok / Err / timeout
//!     C->>C: append record (Ok only), post notice
//!     C->>C: release flag
//! ```

use crate::submission_log::{SubmissionLog, SubmissionRecord};
use async_trait::async_trait;
use formgen_forms::{FormSettings, FormValues};
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

/// Notice text after a successful submission
pub const SUCCESS_MESSAGE: &str = "Form submitted successfully!";

/// Notice text after the handler failed or timed out
pub const FAILURE_MESSAGE: &str = "Submission failed, please retry";

/// Error reported by a host submit handler
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct HandlerError {
	message: String,
}

impl HandlerError {
	pub fn new(message: impl Into<String>) -> Self {
		Self {
			message: message.into(),
		}
	}

	pub fn message(&self) -> &str {
		&self.message
	}
}

#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
	#[error("A submission is already in progress")]
	InFlight,
	#[error("Submit handler failed: {0}")]
	Handler(#[source] HandlerError),
	#[error("Submit handler did not finish within {0:?}")]
	TimedOut(Duration),
}

/// Host-supplied submission callback.
///
/// Implemented for any `Fn(FormValues) -> impl Future<Output = Result<(), HandlerError>>`.
#[async_trait]
pub trait SubmitHandler: Send + Sync {
	async fn submit(&self, values: FormValues) -> Result<(), HandlerError>;
}

#[async_trait]
impl<F, Fut> SubmitHandler for F
where
	F: Fn(FormValues) -> Fut + Send + Sync + 'static,
	Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
{
	async fn submit(&self, values: FormValues) -> Result<(), HandlerError> {
		(self)(values).await
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
	Success,
	Failure,
}

/// Transient message shown after a submission settles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
	pub kind: NoticeKind,
	pub message: String,
	expires_at: Instant,
}

impl Notice {
	fn new(kind: NoticeKind, message: &str, duration: Duration) -> Self {
		Self {
			kind,
			message: message.to_string(),
			expires_at: Instant::now() + duration,
		}
	}

	pub fn is_expired(&self) -> bool {
		Instant::now() >= self.expires_at
	}
}

/// Holds the in-flight flag for the duration of one submission.
struct InFlightGuard<'a> {
	flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
	fn acquire(flag: &'a AtomicBool) -> Option<Self> {
		flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
			.ok()
			.map(|_| Self { flag })
	}
}

impl Drop for InFlightGuard<'_> {
	fn drop(&mut self) {
		self.flag.store(false, Ordering::Release);
	}
}

#[derive(Debug)]
struct Inner {
	in_flight: AtomicBool,
	log: SubmissionLog,
	notice: Mutex<Option<Notice>>,
	notice_duration: Duration,
	timeout: Option<Duration>,
}

/// Cheaply cloneable handle; clones share the flag, log and notice.
#[derive(Debug, Clone)]
pub struct SubmissionCoordinator {
	inner: Arc<Inner>,
}

impl Default for SubmissionCoordinator {
	fn default() -> Self {
		Self::new(&FormSettings::default())
	}
}

impl SubmissionCoordinator {
	pub fn new(settings: &FormSettings) -> Self {
		Self::with_log(settings, SubmissionLog::new())
	}

	/// Use an existing log, e.g. one shared with the schema input.
	pub fn with_log(settings: &FormSettings, log: SubmissionLog) -> Self {
		Self {
			inner: Arc::new(Inner {
				in_flight: AtomicBool::new(false),
				log,
				notice: Mutex::new(None),
				notice_duration: settings.notice_duration(),
				timeout: settings.submit_timeout(),
			}),
		}
	}

	pub fn is_submitting(&self) -> bool {
		self.inner.in_flight.load(Ordering::Acquire)
	}

	pub fn log(&self) -> &SubmissionLog {
		&self.inner.log
	}

	/// The current notice, if one was posted and has not expired yet.
	pub fn current_notice(&self) -> Option<Notice> {
		let mut slot = self.inner.notice.lock().unwrap_or_else(|e| e.into_inner());
		if slot.as_ref().is_some_and(Notice::is_expired) {
			*slot = None;
		}
		slot.clone()
	}

	pub fn dismiss_notice(&self) {
		*self.inner.notice.lock().unwrap_or_else(|e| e.into_inner()) = None;
	}

	fn post_notice(&self, kind: NoticeKind, message: &str) {
		let notice = Notice::new(kind, message, self.inner.notice_duration);
		*self.inner.notice.lock().unwrap_or_else(|e| e.into_inner()) = Some(notice);
	}

	/// Invoke `handler` once with `values`.
	///
	/// The record is appended to the log only when the handler succeeds. A
	/// failed or timed-out handler is reported as an error and a failure
	/// notice; nothing is retried.
	pub async fn submit<H>(&self, values: FormValues, handler: &H) -> Result<(), SubmissionError>
	where
		H: SubmitHandler + ?Sized,
	{
		let Some(_guard) = InFlightGuard::acquire(&self.inner.in_flight) else {
			tracing::debug!("rejected submission while another is in flight");
			return Err(SubmissionError::InFlight);
		};

		tracing::debug!(fields = values.len(), "dispatching submission");
		let call = handler.submit(values.clone());
		let outcome = match self.inner.timeout {
			Some(limit) => match tokio::time::timeout(limit, call).await {
				Ok(result) => result.map_err(SubmissionError::Handler),
				Err(_) => Err(SubmissionError::TimedOut(limit)),
			},
			None => call.await.map_err(SubmissionError::Handler),
		};

		match &outcome {
			Ok(()) => {
				self.inner.log.push(SubmissionRecord::new(values));
				self.post_notice(NoticeKind::Success, SUCCESS_MESSAGE);
				tracing::info!(total = self.inner.log.len(), "submission accepted");
			}
			Err(e) => {
				self.post_notice(NoticeKind::Failure, FAILURE_MESSAGE);
				tracing::warn!("submission failed: {}", e);
			}
		}

		outcome
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::sync::atomic::AtomicUsize;

	fn values() -> FormValues {
		FormValues::from([("name".to_string(), "Ada".to_string())])
	}

	#[rstest]
	#[tokio::test]
	async fn test_success_appends_and_notifies() {
		// Arrange
		let coordinator = SubmissionCoordinator::default();
		let handler = |_values: FormValues| async { Ok::<(), HandlerError>(()) };

		// Act
		coordinator.submit(values(), &handler).await.unwrap();

		// Assert
		assert!(!coordinator.is_submitting());
		assert_eq!(coordinator.log().len(), 1);
		let notice = coordinator.current_notice().unwrap();
		assert_eq!(notice.kind, NoticeKind::Success);
		assert_eq!(notice.message, SUCCESS_MESSAGE);
	}

	#[rstest]
	#[tokio::test]
	async fn test_handler_failure_is_surfaced() {
		let coordinator = SubmissionCoordinator::default();
		let handler =
			|_values: FormValues| async { Err::<(), _>(HandlerError::new("server down")) };

		let err = coordinator.submit(values(), &handler).await.unwrap_err();

		assert!(matches!(err, SubmissionError::Handler(ref e) if e.message() == "server down"));
		assert!(coordinator.log().is_empty());
		assert!(!coordinator.is_submitting());
		assert_eq!(
			coordinator.current_notice().map(|n| n.kind),
			Some(NoticeKind::Failure)
		);
	}

	#[rstest]
	#[tokio::test]
	async fn test_handler_called_exactly_once() {
		let calls = Arc::new(AtomicUsize::new(0));
		let counter = Arc::clone(&calls);
		let handler = move |_values: FormValues| {
			let counter = Arc::clone(&counter);
			async move {
				counter.fetch_add(1, Ordering::SeqCst);
				Err::<(), _>(HandlerError::new("nope"))
			}
		};
		let coordinator = SubmissionCoordinator::default();

		let _ = coordinator.submit(values(), &handler).await;

		assert_eq!(calls.load(Ordering::SeqCst), 1);
	}

	#[rstest]
	#[tokio::test(start_paused = true)]
	async fn test_timeout_releases_flag() {
		let settings = FormSettings {
			submit_timeout_secs: Some(1),
			..FormSettings::default()
		};
		let coordinator = SubmissionCoordinator::new(&settings);
		let handler = |_values: FormValues| async {
			tokio::time::sleep(Duration::from_secs(10)).await;
			Ok::<(), HandlerError>(())
		};

		let err = coordinator.submit(values(), &handler).await.unwrap_err();

		assert!(matches!(err, SubmissionError::TimedOut(d) if d == Duration::from_secs(1)));
		assert!(!coordinator.is_submitting());
		assert!(coordinator.log().is_empty());
	}

	#[rstest]
	#[tokio::test(start_paused = true)]
	async fn test_notice_expires() {
		let coordinator = SubmissionCoordinator::default();
		let handler = |_values: FormValues| async { Ok::<(), HandlerError>(()) };
		coordinator.submit(values(), &handler).await.unwrap();

		tokio::time::advance(Duration::from_millis(2_900)).await;
		assert!(coordinator.current_notice().is_some());

		tokio::time::advance(Duration::from_millis(200)).await;
		assert!(coordinator.current_notice().is_none());
	}

	#[rstest]
	fn test_guard_is_exclusive() {
		let flag = AtomicBool::new(false);

		let guard = InFlightGuard::acquire(&flag).unwrap();
		assert!(InFlightGuard::acquire(&flag).is_none());

		drop(guard);
		assert!(InFlightGuard::acquire(&flag).is_some());
	}
}
