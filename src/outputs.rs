//! Relay, indicator LEDs and buzzer

use embedded_hal::digital::v2::OutputPin;
use ufmt::{uDisplay, uWrite};

/// Indicator LED channel
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Led {
	Red,
	Green,
	Blue,
}

impl uDisplay for Led {
	fn fmt<W>(&self, f: &mut ufmt::Formatter<'_, W>) -> Result<(), W::Error>
	where
		W: uWrite + ?Sized,
	{
		f.write_str(match self {
			Self::Red => "red",
			Self::Green => "green",
			Self::Blue => "blue",
		})
	}
}

/// Fire-and-forget output sink owned by the controller
pub trait Actuators {
	/// Switch the irrigation relay
	fn set_relay(&mut self, on: bool);
	/// Switch an indicator LED
	fn set_led(&mut self, led: Led, on: bool);
	/// Drive the buzzer line high or low
	fn set_buzzer(&mut self, high: bool);

	/// Switch everything off
	fn all_off(&mut self) {
		self.set_relay(false);
		self.set_led(Led::Red, false);
		self.set_led(Led::Green, false);
		self.set_led(Led::Blue, false);
		self.set_buzzer(false);
	}
}

/// [`Actuators`] backed by digital output pins, all active high
pub struct Outputs<RELAY, RED, GREEN, BLUE, BUZZER> {
	/// Pump relay
	relay: RELAY,
	red: RED,
	green: GREEN,
	blue: BLUE,
	/// Passive buzzer, toggled to produce tones
	buzzer: BUZZER,
}

impl<RELAY, RED, GREEN, BLUE, BUZZER> Outputs<RELAY, RED, GREEN, BLUE, BUZZER>
where
	RELAY: OutputPin,
	RED: OutputPin,
	GREEN: OutputPin,
	BLUE: OutputPin,
	BUZZER: OutputPin,
{
	pub fn new(relay: RELAY, red: RED, green: GREEN, blue: BLUE, buzzer: BUZZER) -> Self {
		Self {
			relay,
			red,
			green,
			blue,
			buzzer,
		}
	}
}

fn drive<P: OutputPin>(pin: &mut P, high: bool) {
	// Pin errors are not recoverable here; the next write tries again.
	let _ = if high { pin.set_high() } else { pin.set_low() };
}

impl<RELAY, RED, GREEN, BLUE, BUZZER> Actuators for Outputs<RELAY, RED, GREEN, BLUE, BUZZER>
where
	RELAY: OutputPin,
	RED: OutputPin,
	GREEN: OutputPin,
	BLUE: OutputPin,
	BUZZER: OutputPin,
{
	fn set_relay(&mut self, on: bool) {
		drive(&mut self.relay, on);
	}

	fn set_led(&mut self, led: Led, on: bool) {
		match led {
			Led::Red => drive(&mut self.red, on),
			Led::Green => drive(&mut self.green, on),
			Led::Blue => drive(&mut self.blue, on),
		}
	}

	fn set_buzzer(&mut self, high: bool) {
		drive(&mut self.buzzer, high);
	}
}
