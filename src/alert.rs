//! Audible and visual alerts
//!
//! Every alert is a fixed, blocking sequence of LED changes, tones and pauses.

use ufmt::{uDisplay, uWrite};

use crate::{
	outputs::{Actuators, Led},
	timer::Clock,
};

/// Semantic alert events
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlertKind {
	/// Soil is dry and is about to be irrigated
	LowHumidity,
	/// Soil is wet
	HighHumidity,
	/// Controller switched between automatic and manual mode
	ModeChange,
}

impl uDisplay for AlertKind {
	fn fmt<W>(&self, f: &mut ufmt::Formatter<'_, W>) -> Result<(), W::Error>
	where
		W: uWrite + ?Sized,
	{
		f.write_str(match self {
			Self::LowHumidity => "low humidity",
			Self::HighHumidity => "high humidity",
			Self::ModeChange => "mode change",
		})
	}
}

/// A square wave tone
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tone {
	pub frequency_hz: u16,
	pub duration_ms: u16,
}

impl Tone {
	pub const fn new(frequency_hz: u16, duration_ms: u16) -> Self {
		Self {
			frequency_hz,
			duration_ms,
		}
	}

	/// Length of half a period in microseconds
	///
	/// Below 8 Hz this no longer fits a single `DelayUs<u16>` call, see [`delay_long_us`].
	fn half_period_us(&self) -> u32 {
		let period_us = 1_000_000 / u32::from(self.frequency_hz.max(1));
		period_us / 2
	}
}

/// Busy-wait `us` microseconds, split into chunks the `u16` delay can express
fn delay_long_us<C: Clock>(clock: &mut C, us: u32) {
	let mut remaining = us;
	while remaining > 0 {
		let chunk = remaining.min(u32::from(u16::MAX));
		clock.delay_us(chunk as u16);
		remaining -= chunk;
	}
}

/// Tone played for [`AlertKind::LowHumidity`], and when a manual irrigation starts
pub const IRRIGATION_TONE: Tone = Tone::new(1000, 500);
const HIGH_HUMIDITY_TONE: Tone = Tone::new(1500, 300);
const MODE_CHANGE_TONE: Tone = Tone::new(2000, 200);
/// Silence between repeated tones
const TONE_GAP_MS: u16 = 100;

/// Drive the buzzer with a 50% duty square wave for the tone's duration.
///
/// Busy-waits on the clock; nothing else runs until the tone is over.
pub fn play<A, C>(tone: Tone, actuators: &mut A, clock: &mut C)
where
	A: Actuators + ?Sized,
	C: Clock,
{
	let half_period_us = tone.half_period_us();
	let deadline = clock.deadline(tone.duration_ms);

	while !deadline.expired(&*clock) {
		actuators.set_buzzer(true);
		delay_long_us(clock, half_period_us);
		actuators.set_buzzer(false);
		delay_long_us(clock, half_period_us);
	}
}

/// Play the sequence associated with `kind`
pub fn signal<A, C>(kind: AlertKind, actuators: &mut A, clock: &mut C)
where
	A: Actuators + ?Sized,
	C: Clock,
{
	match kind {
		AlertKind::LowHumidity => {
			actuators.set_led(Led::Red, true);
			play(IRRIGATION_TONE, actuators, clock);
			actuators.set_led(Led::Red, false);
		}
		AlertKind::HighHumidity => {
			actuators.set_led(Led::Red, true);
			actuators.set_led(Led::Blue, true);
			play(HIGH_HUMIDITY_TONE, actuators, clock);
			clock.delay_ms(TONE_GAP_MS);
			play(HIGH_HUMIDITY_TONE, actuators, clock);
			actuators.set_led(Led::Red, false);
			actuators.set_led(Led::Blue, false);
		}
		AlertKind::ModeChange => {
			play(MODE_CHANGE_TONE, actuators, clock);
			clock.delay_ms(TONE_GAP_MS);
			play(MODE_CHANGE_TONE, actuators, clock);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::fakes::{Event, Rig};

	#[test]
	fn tone_pulses_match_frequency_and_duration() {
		let rig = Rig::new();
		play(Tone::new(1000, 500), &mut rig.actuators(), &mut rig.clock());

		assert_eq!(rig.pulses().len(), 500);
		assert_eq!(rig.now_ms(), 500);
		// The line is left low.
		assert!(!rig.buzzer_high());
	}

	#[test]
	fn very_low_tones_keep_their_period() {
		let tone = Tone::new(4, 1000);
		assert_eq!(tone.half_period_us(), 125_000);

		let rig = Rig::new();
		play(tone, &mut rig.actuators(), &mut rig.clock());

		assert_eq!(rig.pulses(), [0, 250, 500, 750]);
		assert_eq!(rig.now_ms(), 1000);
	}

	#[test]
	fn tone_runs_at_least_its_duration() {
		let rig = Rig::new();
		play(Tone::new(1500, 300), &mut rig.actuators(), &mut rig.clock());

		// 666us periods: the last period straddles the deadline.
		let pulses = rig.pulses().len();
		assert!((450..=451).contains(&pulses), "{} pulses", pulses);
		assert_eq!(rig.now_ms(), 300);
	}

	#[test]
	fn low_humidity_lights_red_around_one_tone() {
		let rig = Rig::new();
		signal(AlertKind::LowHumidity, &mut rig.actuators(), &mut rig.clock());

		assert_eq!(
			rig.events(),
			[(0, Event::Led(Led::Red, true)), (500, Event::Led(Led::Red, false))]
		);
		assert_eq!(rig.pulses().len(), 500);
	}

	#[test]
	fn high_humidity_plays_two_tones_with_red_and_blue() {
		let rig = Rig::new();
		signal(AlertKind::HighHumidity, &mut rig.actuators(), &mut rig.clock());

		let events = rig.events();
		assert_eq!(events[0], (0, Event::Led(Led::Red, true)));
		assert_eq!(events[1], (0, Event::Led(Led::Blue, true)));
		assert_eq!(events[2].1, Event::Led(Led::Red, false));
		assert_eq!(events[3].1, Event::Led(Led::Blue, false));
		assert_eq!(events.len(), 4);

		// Two 300ms tones around a 100ms gap.
		assert_eq!(rig.now_ms(), 700);
		let pulses = rig.pulses();
		assert!(pulses.iter().all(|&t| t < 300 || (400..700).contains(&t)));
	}

	#[test]
	fn mode_change_only_uses_the_buzzer() {
		let rig = Rig::new();
		signal(AlertKind::ModeChange, &mut rig.actuators(), &mut rig.clock());

		assert!(rig.events().is_empty());
		assert_eq!(rig.pulses().len(), 800);
		assert_eq!(rig.now_ms(), 500);
	}
}
