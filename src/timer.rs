//! Monotonic time and blocking delays
//!
//! All timing in the controller (debounce settle, tone generation, irrigation holds) goes
//! through a [`Clock`] so the firmware can back it with the timer interrupt and busy-wait
//! delays, and tests can back it with a virtual clock.

use embedded_hal::blocking::delay::{DelayMs, DelayUs};

/// Millisecond clock plus blocking delays
pub trait Clock: DelayMs<u16> + DelayUs<u16> {
	/// Milliseconds since boot. Wraps after ~49 days.
	fn now_ms(&self) -> u32;

	/// Deadline `duration_ms` from now
	fn deadline(&self, duration_ms: u16) -> Deadline {
		Deadline {
			start: self.now_ms(),
			duration: u32::from(duration_ms),
		}
	}
}

/// A point in time tracked relative to when it was created, so counter wrap-around is
/// handled.
#[derive(Clone, Copy)]
pub struct Deadline {
	start: u32,
	duration: u32,
}

impl Deadline {
	/// Whether the deadline has been reached
	pub fn expired<C: Clock + ?Sized>(&self, clock: &C) -> bool {
		clock.now_ms().wrapping_sub(self.start) >= self.duration
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::fakes::Rig;

	#[test]
	fn deadline_expires_after_duration() {
		let rig = Rig::new();
		let mut clock = rig.clock();
		let deadline = clock.deadline(500);

		clock.delay_ms(499u16);
		assert!(!deadline.expired(&clock));

		clock.delay_ms(1u16);
		assert!(deadline.expired(&clock));
	}

	#[test]
	fn deadline_survives_counter_wrap() {
		let rig = Rig::new();
		rig.set_time_ms(u32::MAX - 10);
		let mut clock = rig.clock();
		let deadline = clock.deadline(100);

		clock.delay_ms(50u16);
		assert!(!deadline.expired(&clock));

		clock.delay_ms(50u16);
		assert!(deadline.expired(&clock));
	}
}
