//! Moisture readings and their classification into bands

use ufmt::{uDisplay, uWrite};

use crate::config::{HIGH_THRESHOLD, LOW_THRESHOLD};

/// Largest value a reading can take (12-bit sensor range)
pub const SENSOR_MAX: u16 = 4095;

/// Number of segments in the moisture bar
pub const BAR_SEGMENTS: u8 = 25;

/// A moisture sample, sampled once per cycle
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct MoistureReading(u16);

impl MoistureReading {
	/// Create a reading, clamping to [`SENSOR_MAX`]
	pub fn new(value: u16) -> Self {
		Self(value.min(SENSOR_MAX))
	}

	/// Simulated moisture from a joystick axis sampled with a `bits` wide ADC.
	///
	/// The sample is scaled up to the 12-bit sensor range and inverted, so pushing the stick
	/// forward lowers the reading.
	pub fn from_joystick(raw: u16, bits: u8) -> Self {
		let bits = bits.min(16);
		let scaled = if bits >= 12 {
			(raw >> (bits - 12)).min(SENSOR_MAX)
		} else {
			// Map 0..=max_in onto 0..=SENSOR_MAX.
			let max_in = (1u32 << bits) - 1;
			(u32::from(raw).min(max_in) * u32::from(SENSOR_MAX) / max_in.max(1)) as u16
		};

		Self(SENSOR_MAX - scaled)
	}

	/// Raw value
	pub fn value(&self) -> u16 {
		self.0
	}

	/// How many segments of the moisture bar should be lit, 0..=[`BAR_SEGMENTS`]
	pub fn bar_level(&self) -> u8 {
		(u32::from(self.0) * u32::from(BAR_SEGMENTS) / u32::from(SENSOR_MAX)) as u8
	}
}

impl uDisplay for MoistureReading {
	fn fmt<W>(&self, f: &mut ufmt::Formatter<'_, W>) -> Result<(), W::Error>
	where
		W: uWrite + ?Sized,
	{
		ufmt::uwrite!(f, "{}", self.0)
	}
}

/// Band a reading falls into
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoistureBand {
	/// Reading below the low threshold
	Low,
	/// Reading above the high threshold
	High,
	/// Anything in between, thresholds included
	Moderate,
}

impl MoistureBand {
	/// Classify `reading` against an arbitrary pair of thresholds
	pub fn from_thresholds(reading: MoistureReading, low: u16, high: u16) -> Self {
		match reading.value() {
			value if value < low => Self::Low,
			value if value > high => Self::High,
			_ => Self::Moderate,
		}
	}

	/// Humidity label shown on the display for this band.
	///
	/// The labels are inverted relative to the band names: a reading under the low threshold
	/// reports high humidity, and one over the high threshold reports low humidity (and is
	/// the band that gets irrigated).
	pub fn humidity_label(&self) -> &'static str {
		match self {
			Self::Low => "High",
			Self::High => "Low",
			Self::Moderate => "Moderate",
		}
	}
}

impl uDisplay for MoistureBand {
	fn fmt<W>(&self, f: &mut ufmt::Formatter<'_, W>) -> Result<(), W::Error>
	where
		W: uWrite + ?Sized,
	{
		f.write_str(match self {
			Self::Low => "low",
			Self::High => "high",
			Self::Moderate => "moderate",
		})
	}
}

/// Classify a reading against the default thresholds
pub fn classify(reading: MoistureReading) -> MoistureBand {
	MoistureBand::from_thresholds(reading, LOW_THRESHOLD, HIGH_THRESHOLD)
}

/// Source of moisture readings
pub trait MoistureSensor {
	/// Take one reading. Called once per cycle.
	fn read_moisture(&mut self) -> MoistureReading;
}
