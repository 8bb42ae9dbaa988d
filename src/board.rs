//! Arduino Nano adapters for the controller's hardware seams
//!
//! Timer ref: https://blog.rahix.de/005-avr-hal-millis/

use arduino_hal::{
	clock::MHz16,
	hal::{port::PC0, usart::Usart0, Adc},
	port::{mode::Analog, Pin},
	Delay,
};
use avr_device::interrupt::Mutex;
use core::cell::Cell;
use embedded_hal::blocking::delay::{DelayMs, DelayUs};
use ufmt::uWrite;

use irrigation_controller::{Clock, MoistureReading, MoistureSensor};

const PRESCALER: u32 = 64;
const TIMER_COUNTS: u32 = 250;

/// Milliseconds per timer compare match (16MHz / 64 / 250 = 1kHz)
const MILLIS_INCREMENT: u32 = PRESCALER * TIMER_COUNTS / 16000;

/// Resolution of the ATmega328P ADC
const ADC_BITS: u8 = 10;

static MILLIS: Mutex<Cell<u32>> = Mutex::new(Cell::new(0));

/// Start the millisecond counter on TC0
pub fn millis_init(tc0: arduino_hal::pac::TC0) {
	// Configure the timer for the above interval (in CTC mode)
	// and enable its interrupt.
	tc0.tccr0a.write(|w| w.wgm0().ctc());
	tc0.ocr0a.write(|w| unsafe { w.bits(TIMER_COUNTS as u8) });
	tc0.tccr0b.write(|w| match PRESCALER {
		8 => w.cs0().prescale_8(),
		64 => w.cs0().prescale_64(),
		256 => w.cs0().prescale_256(),
		1024 => w.cs0().prescale_1024(),
		_ => panic!(),
	});
	tc0.timsk0.write(|w| w.ocie0a().set_bit());

	avr_device::interrupt::free(|cs| MILLIS.borrow(cs).set(0));
}

fn millis() -> u32 {
	avr_device::interrupt::free(|cs| MILLIS.borrow(cs).get())
}

#[avr_device::interrupt(atmega328p)]
#[allow(non_snake_case)]
fn TIMER0_COMPA() {
	avr_device::interrupt::free(|cs| {
		let millis_cell = MILLIS.borrow(cs);
		millis_cell.set(millis_cell.get().wrapping_add(MILLIS_INCREMENT));
	})
}

/// Busy-wait delays plus the interrupt driven millisecond counter
pub struct BoardClock {
	delay: Delay,
}

impl BoardClock {
	/// [`millis_init`] must have been called and interrupts enabled
	pub fn new() -> Self {
		Self {
			delay: Delay::new(),
		}
	}
}

impl DelayMs<u16> for BoardClock {
	fn delay_ms(&mut self, ms: u16) {
		self.delay.delay_ms(ms);
	}
}

impl DelayUs<u16> for BoardClock {
	fn delay_us(&mut self, us: u16) {
		self.delay.delay_us(us);
	}
}

impl Clock for BoardClock {
	fn now_ms(&self) -> u32 {
		millis()
	}
}

/// Joystick Y axis standing in for a soil moisture probe
pub struct JoystickSensor {
	/// Analog to digital converter used for reading analog input values
	adc: Adc<MHz16>,
	axis: Pin<Analog, PC0>,
}

impl JoystickSensor {
	pub fn new(adc: Adc<MHz16>, axis: Pin<Analog, PC0>) -> Self {
		Self { adc, axis }
	}
}

impl MoistureSensor for JoystickSensor {
	fn read_moisture(&mut self) -> MoistureReading {
		let raw = self.axis.analog_read(&mut self.adc);
		MoistureReading::from_joystick(raw, ADC_BITS)
	}
}

static mut SERIAL: Option<Usart0<MHz16>> = None;

/// Hand the USART over to the log sink
pub fn set_serial(serial: Usart0<MHz16>) {
	unsafe {
		if SERIAL.is_none() {
			SERIAL = Some(serial);
			irrigation_controller::serial::set_serial(write_serial);
		}
	}
}

fn write_serial(s: &str) {
	// Only the main loop logs; the timer interrupt never touches the USART.
	unsafe {
		if let Some(serial) = &mut SERIAL {
			let _ = serial.write_str(s);
		}
	}
}
