//! Logic for coordinating peripheral inputs and outputs

use embedded_hal::digital::v2::InputPin;
use ufmt::{uDisplay, uWrite};

use crate::{
	alert::{self, AlertKind, IRRIGATION_TONE},
	config::ControllerConfig,
	control_pad::{ButtonType, ControlPad},
	display::{Status, StatusScreen, StatusSink},
	moisture::{MoistureBand, MoistureReading, MoistureSensor},
	outputs::{Actuators, Led},
	timer::Clock,
};

/// Who decides when to irrigate
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControllerMode {
	/// Irrigation follows the moisture band
	Automatic,
	/// Irrigation only happens on a button press
	Manual,
}

impl ControllerMode {
	/// The other mode
	pub fn toggled(self) -> Self {
		match self {
			Self::Automatic => Self::Manual,
			Self::Manual => Self::Automatic,
		}
	}
}

impl uDisplay for ControllerMode {
	fn fmt<W>(&self, f: &mut ufmt::Formatter<'_, W>) -> Result<(), W::Error>
	where
		W: uWrite + ?Sized,
	{
		f.write_str(match self {
			Self::Automatic => "automatic",
			Self::Manual => "manual",
		})
	}
}

/// Holds the services the controller reads from and writes to
pub struct Peripherals<S, A, D, C, M, I> {
	/// Moisture source
	pub sensor: S,
	/// Relay, LEDs and buzzer
	pub actuators: A,
	/// Status display
	pub display: D,
	/// Time source for every delay
	pub clock: C,
	/// Mode and irrigate buttons
	pub control_pad: ControlPad<M, I>,
}

/// What happened during one cycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CycleReport {
	pub reading: MoistureReading,
	pub band: MoistureBand,
	/// Mode at the end of the cycle
	pub mode: ControllerMode,
	/// Whether the mode button fired
	pub mode_changed: bool,
	/// Whether an irrigation window ran
	pub irrigated: bool,
	/// The band alert played, if any
	pub alert: Option<AlertKind>,
}

/// Controller context: the only mutable state carried between cycles
pub struct Controller {
	config: ControllerConfig,
	mode: ControllerMode,
}

impl Controller {
	/// Create a new controller in automatic mode
	pub fn new(config: ControllerConfig) -> Self {
		Self {
			config,
			mode: ControllerMode::Automatic,
		}
	}

	pub fn mode(&self) -> ControllerMode {
		self.mode
	}

	pub fn config(&self) -> &ControllerConfig {
		&self.config
	}

	/// Put every output in a known state and draw the first frame
	pub fn init<S, A, D, C, M, I>(&mut self, p: &mut Peripherals<S, A, D, C, M, I>)
	where
		S: MoistureSensor,
		A: Actuators,
		D: StatusSink,
		C: Clock,
		M: InputPin,
		I: InputPin,
	{
		p.actuators.all_off();

		let reading = p.sensor.read_moisture();
		p.display.render(&StatusScreen {
			band: self.config.classify(reading),
			status: Some(self.idle_status()),
			bar_level: reading.bar_level(),
		});

		log!("irrigation controller ready, mode: {}", self.mode);
	}

	/// Run one sample, decide, act, report cycle
	pub fn run_cycle<S, A, D, C, M, I>(
		&mut self,
		p: &mut Peripherals<S, A, D, C, M, I>,
	) -> CycleReport
	where
		S: MoistureSensor,
		A: Actuators,
		D: StatusSink,
		C: Clock,
		M: InputPin,
		I: InputPin,
	{
		let reading = p.sensor.read_moisture();
		let band = self.config.classify(reading);

		let mut report = CycleReport {
			reading,
			band,
			mode: self.mode,
			mode_changed: false,
			irrigated: false,
			alert: None,
		};

		// A mode change takes priority, and never irrigates by itself.
		if p.control_pad.poll(ButtonType::Mode, self.config.debounce_ms, &mut p.clock) {
			self.mode = self.mode.toggled();
			report.mode_changed = true;
			log!("mode: {}", self.mode);
			alert::signal(AlertKind::ModeChange, &mut p.actuators, &mut p.clock);
		}

		let status = match self.mode {
			ControllerMode::Manual => self.manual_cycle(p, band, reading, &mut report),
			ControllerMode::Automatic => self.automatic_cycle(p, band, reading, &mut report),
		};
		report.mode = self.mode;

		p.display.render(&StatusScreen {
			band,
			status,
			bar_level: reading.bar_level(),
		});
		p.clock.delay_ms(self.config.cycle_interval_ms);

		report
	}

	fn manual_cycle<S, A, D, C, M, I>(
		&self,
		p: &mut Peripherals<S, A, D, C, M, I>,
		band: MoistureBand,
		reading: MoistureReading,
		report: &mut CycleReport,
	) -> Option<Status>
	where
		S: MoistureSensor,
		A: Actuators,
		D: StatusSink,
		C: Clock,
		M: InputPin,
		I: InputPin,
	{
		if !p.control_pad.poll(ButtonType::Irrigate, self.config.debounce_ms, &mut p.clock) {
			return Some(Status::Manual);
		}

		log!("manual irrigation, moisture: {}", reading);
		Self::show_irrigating(p, band, reading);

		p.actuators.set_relay(true);
		p.actuators.set_led(Led::Blue, true);
		alert::play(IRRIGATION_TONE, &mut p.actuators, &mut p.clock);
		p.clock.delay_ms(self.config.irrigation_ms);
		p.actuators.set_relay(false);
		p.actuators.set_led(Led::Blue, false);
		p.clock.delay_ms(self.config.message_hold_ms);

		report.irrigated = true;
		Some(Status::Irrigating)
	}

	fn automatic_cycle<S, A, D, C, M, I>(
		&self,
		p: &mut Peripherals<S, A, D, C, M, I>,
		band: MoistureBand,
		reading: MoistureReading,
		report: &mut CycleReport,
	) -> Option<Status>
	where
		S: MoistureSensor,
		A: Actuators,
		D: StatusSink,
		C: Clock,
		M: InputPin,
		I: InputPin,
	{
		match band {
			// Above the high threshold: dry soil, irrigate.
			MoistureBand::High => {
				log!("automatic irrigation, moisture: {}", reading);
				p.actuators.set_relay(true);
				alert::signal(AlertKind::LowHumidity, &mut p.actuators, &mut p.clock);
				Self::show_irrigating(p, band, reading);
				p.clock.delay_ms(self.config.irrigation_ms);
				p.actuators.set_relay(false);
				p.clock.delay_ms(self.config.message_hold_ms);

				report.irrigated = true;
				report.alert = Some(AlertKind::LowHumidity);
				Some(Status::Irrigating)
			}
			// Below the low threshold: wet soil, alert only.
			MoistureBand::Low => {
				alert::signal(AlertKind::HighHumidity, &mut p.actuators, &mut p.clock);

				report.alert = Some(AlertKind::HighHumidity);
				None
			}
			MoistureBand::Moderate => {
				p.actuators.set_relay(false);
				p.actuators.set_led(Led::Red, false);
				Some(Status::Automatic)
			}
		}
	}

	/// Interim frame shown before an irrigation hold
	fn show_irrigating<S, A, D, C, M, I>(
		p: &mut Peripherals<S, A, D, C, M, I>,
		band: MoistureBand,
		reading: MoistureReading,
	) where
		D: StatusSink,
	{
		p.display.render(&StatusScreen {
			band,
			status: Some(Status::Irrigating),
			bar_level: reading.bar_level(),
		});
	}

	fn idle_status(&self) -> Status {
		match self.mode {
			ControllerMode::Automatic => Status::Automatic,
			ControllerMode::Manual => Status::Manual,
		}
	}
}
