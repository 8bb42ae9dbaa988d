#![cfg_attr(target_arch = "avr", feature(llvm_asm))]
#![cfg_attr(target_arch = "avr", feature(abi_avr_interrupt))]
#![cfg_attr(target_arch = "avr", no_std)]
#![cfg_attr(target_arch = "avr", no_main)]

#[cfg(target_arch = "avr")]
mod board;

#[cfg(target_arch = "avr")]
use arduino_hal::{Peripherals, Pins};
#[cfg(target_arch = "avr")]
use core::panic::PanicInfo;
#[cfg(target_arch = "avr")]
use irrigation_controller::{
	log, Controller, ControllerConfig, ControlPad, Display, Outputs, Peripherals as Services,
};
#[cfg(target_arch = "avr")]
use ssd1306::I2CDisplayInterface;

#[cfg(target_arch = "avr")]
#[arduino_hal::entry]
fn main() -> ! {
	let dp: Peripherals = arduino_hal::Peripherals::take().unwrap();
	let pins: Pins = arduino_hal::pins!(dp);

	// Initialize the serial interface for writing output when needed.
	board::set_serial(arduino_hal::default_serial!(dp, pins, 57600));

	// Initialize the millisecond counter.
	board::millis_init(dp.TC0);

	// Turn on interrupts for this device.
	unsafe { avr_device::interrupt::enable() };

	let config = ControllerConfig::new();

	// Joystick Y axis simulates the moisture probe.
	let mut adc = arduino_hal::Adc::new(dp.ADC, Default::default());
	let joystick_y = pins.a0.into_analog_input(&mut adc);

	// The OLED display is using the I2C interface, not SPI.
	let i2c = arduino_hal::I2c::new(
		dp.TWI,
		pins.a4.into_pull_up_input(),
		pins.a5.into_pull_up_input(),
		400_000,
	);

	let outputs = Outputs::new(
		pins.d4.into_output(),
		pins.d9.into_output(),
		pins.d10.into_output(),
		pins.d11.into_output(),
		pins.d8.into_output(),
	);

	// Buttons pull the line low when pressed.
	let control_pad = ControlPad::new(
		pins.d2.into_pull_up_input(),
		pins.d3.into_pull_up_input(),
	);

	let mut services = Services {
		sensor: board::JoystickSensor::new(adc, joystick_y),
		actuators: outputs,
		display: Display::new(I2CDisplayInterface::new(i2c)),
		clock: board::BoardClock::new(),
		control_pad,
	};

	let mut controller = Controller::new(config);
	controller.init(&mut services);

	loop {
		let report = controller.run_cycle(&mut services);
		if report.mode_changed || report.irrigated {
			log!("moisture: {} ({}), mode: {}", report.reading, report.band, report.mode);
		}
	}
}

#[cfg(target_arch = "avr")]
#[panic_handler]
fn panic(_: &PanicInfo) -> ! {
	loop {}
}

/// The firmware only runs on the ATmega328P; host builds exist for the library tests.
#[cfg(not(target_arch = "avr"))]
fn main() {}
