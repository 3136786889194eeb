use std::time::{Duration, Instant};

/// Single-slot debounce timer.
///
/// Only one deadline exists at a time: scheduling again replaces the previous
/// deadline instead of adding a second timer. Time is passed in explicitly so
/// callers decide where "now" comes from.
#[derive(Debug, Clone)]
pub struct Debouncer {
	window: Duration,
	deadline: Option<Instant>,
}

impl Debouncer {
	pub fn new(window: Duration) -> Self {
		Self {
			window,
			deadline: None,
		}
	}

	/// Arm (or re-arm) the timer so it fires one window after `now`.
	pub fn schedule(&mut self, now: Instant) {
		self.deadline = Some(now + self.window);
	}

	/// Drop the pending deadline. Returns whether one was pending.
	pub fn cancel(&mut self) -> bool {
		self.deadline.take().is_some()
	}

	#[must_use]
	pub fn is_pending(&self) -> bool {
		self.deadline.is_some()
	}

	#[must_use]
	pub fn deadline(&self) -> Option<Instant> {
		self.deadline
	}

	/// Consume the deadline if it has elapsed at `now`.
	pub fn fire(&mut self, now: Instant) -> bool {
		match self.deadline {
			Some(deadline) if now >= deadline => {
				self.deadline = None;
				true
			}
			_ => false,
		}
	}
}

impl Default for Debouncer {
	fn default() -> Self {
		Self::new(crate::request::DEFAULT_DEBOUNCE)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const WINDOW: Duration = Duration::from_millis(300);

	#[test]
	fn fires_once_after_quiet_period() {
		let start = Instant::now();
		let mut debouncer = Debouncer::new(WINDOW);
		debouncer.schedule(start);

		assert!(!debouncer.fire(start + Duration::from_millis(299)));
		assert!(debouncer.fire(start + WINDOW));
		assert!(!debouncer.fire(start + Duration::from_secs(5)));
	}

	#[test]
	fn rescheduling_restarts_the_window() {
		let start = Instant::now();
		let mut debouncer = Debouncer::new(WINDOW);
		debouncer.schedule(start);
		debouncer.schedule(start + Duration::from_millis(200));

		assert!(!debouncer.fire(start + Duration::from_millis(400)));
		assert_eq!(
			debouncer.deadline(),
			Some(start + Duration::from_millis(500))
		);
		assert!(debouncer.fire(start + Duration::from_millis(500)));
	}

	#[test]
	fn cancel_reports_pending_state() {
		let mut debouncer = Debouncer::default();
		assert!(!debouncer.cancel());
		debouncer.schedule(Instant::now());
		assert!(debouncer.is_pending());
		assert!(debouncer.cancel());
		assert!(!debouncer.is_pending());
	}
}
