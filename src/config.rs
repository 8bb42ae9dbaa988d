use ufmt::derive::uDebug;

use crate::moisture::{MoistureBand, MoistureReading, SENSOR_MAX};

/// Default reading below which the band is [`MoistureBand::Low`]
pub const LOW_THRESHOLD: u16 = 2000;
/// Default reading above which the band is [`MoistureBand::High`]
pub const HIGH_THRESHOLD: u16 = 3500;

/// Time between detecting a button press and confirming it
const DEFAULT_DEBOUNCE_MS: u16 = 100;
/// How long the relay is held on during an irrigation
const DEFAULT_IRRIGATION_MS: u16 = 4000;
/// How long the "Irrigating..." message stays up after the relay is switched off
const DEFAULT_MESSAGE_HOLD_MS: u16 = 1000;
/// Pause at the end of every cycle
const DEFAULT_CYCLE_INTERVAL_MS: u16 = 100;

/// Reasons a [`ControllerConfig`] can be rejected
#[derive(uDebug, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
	/// The low threshold is not below the high threshold
	InvertedThresholds,
	/// A threshold is outside of the sensor range
	ThresholdOutOfRange,
	/// A cycle interval of zero would spin the loop
	ZeroCycleInterval,
}

/// Configuration used to drive the controller
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ControllerConfig {
	/// Readings strictly below this are [`MoistureBand::Low`]
	pub low_threshold: u16,
	/// Readings strictly above this are [`MoistureBand::High`]
	pub high_threshold: u16,
	/// Debounce settle interval, passed to every button poll
	pub debounce_ms: u16,
	/// Relay hold during an irrigation
	pub irrigation_ms: u16,
	/// Extra time the irrigation message is shown after the relay is off
	pub message_hold_ms: u16,
	/// Sleep at the end of each cycle
	pub cycle_interval_ms: u16,
}

impl ControllerConfig {
	/// Create a new [`ControllerConfig`] with default values
	pub const fn new() -> Self {
		Self {
			low_threshold: LOW_THRESHOLD,
			high_threshold: HIGH_THRESHOLD,
			debounce_ms: DEFAULT_DEBOUNCE_MS,
			irrigation_ms: DEFAULT_IRRIGATION_MS,
			message_hold_ms: DEFAULT_MESSAGE_HOLD_MS,
			cycle_interval_ms: DEFAULT_CYCLE_INTERVAL_MS,
		}
	}

	/// Replace the band thresholds
	pub fn with_thresholds(self, low: u16, high: u16) -> Result<Self, ConfigError> {
		if low > SENSOR_MAX || high > SENSOR_MAX {
			return Err(ConfigError::ThresholdOutOfRange);
		}
		if low >= high {
			return Err(ConfigError::InvertedThresholds);
		}

		Ok(Self {
			low_threshold: low,
			high_threshold: high,
			..self
		})
	}

	/// Replace the timing windows
	pub fn with_timing(
		self,
		debounce_ms: u16,
		irrigation_ms: u16,
		message_hold_ms: u16,
		cycle_interval_ms: u16,
	) -> Result<Self, ConfigError> {
		if cycle_interval_ms == 0 {
			return Err(ConfigError::ZeroCycleInterval);
		}

		Ok(Self {
			debounce_ms,
			irrigation_ms,
			message_hold_ms,
			cycle_interval_ms,
			..self
		})
	}

	/// Classify a reading against the configured thresholds
	pub fn classify(&self, reading: MoistureReading) -> MoistureBand {
		MoistureBand::from_thresholds(reading, self.low_threshold, self.high_threshold)
	}
}

impl Default for ControllerConfig {
	fn default() -> Self {
		Self::new()
	}
}
