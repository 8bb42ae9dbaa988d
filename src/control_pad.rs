use embedded_hal::digital::v2::InputPin;

use crate::timer::Clock;

/// How often the line is re-sampled while waiting for release
const RELEASE_POLL_MS: u16 = 1;

/// A push button wired against a pull-up: idle high, pressed low
pub struct Button<P> {
	pin: P,
}

impl<P: InputPin> Button<P> {
	pub fn new(pin: P) -> Self {
		Self { pin }
	}

	fn is_pressed(&self) -> bool {
		// A failed read counts as released.
		self.pin.is_low().unwrap_or(false)
	}

	/// Returns `true` once per validated press.
	///
	/// An idle line returns immediately. A pressed line is re-sampled after `settle_ms`, and
	/// if still pressed this blocks until the button is released. A button held down
	/// therefore stalls the caller until it is let go.
	pub fn poll<C: Clock>(&mut self, settle_ms: u16, clock: &mut C) -> bool {
		if !self.is_pressed() {
			return false;
		}

		clock.delay_ms(settle_ms);
		if !self.is_pressed() {
			// Bounce, not a press.
			return false;
		}

		while self.is_pressed() {
			clock.delay_ms(RELEASE_POLL_MS);
		}

		true
	}
}

/// Variants representing a button
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ButtonType {
	/// Toggles between automatic and manual mode
	Mode,
	/// Starts an irrigation while in manual mode
	Irrigate,
}

/// The two buttons of the controller
pub struct ControlPad<M, I> {
	mode: Button<M>,
	irrigate: Button<I>,
}

impl<M: InputPin, I: InputPin> ControlPad<M, I> {
	/// Create a new `ControlPad`
	pub fn new(mode: M, irrigate: I) -> Self {
		Self {
			mode: Button::new(mode),
			irrigate: Button::new(irrigate),
		}
	}

	/// Poll one button through the debounce gate with a `settle_ms` confirmation delay
	pub fn poll<C: Clock>(&mut self, button: ButtonType, settle_ms: u16, clock: &mut C) -> bool {
		match button {
			ButtonType::Mode => self.mode.poll(settle_ms, clock),
			ButtonType::Irrigate => self.irrigate.poll(settle_ms, clock),
		}
	}
}
