//! Test doubles sharing one virtual clock
//!
//! Every fake holds a handle to the same [`Rig`] state. Delays advance virtual time, outputs
//! are recorded with the millisecond they happened at, and buttons are pressed for a given
//! hold time starting from the first moment they are sampled.

use core::convert::Infallible;
use embedded_hal::{
	blocking::delay::{DelayMs, DelayUs},
	digital::v2::InputPin,
};
use std::{cell::RefCell, collections::VecDeque, rc::Rc, vec::Vec};

use crate::{
	control_pad::{ButtonType, ControlPad},
	display::{StatusScreen, StatusSink},
	moisture::{MoistureReading, MoistureSensor},
	outputs::{Actuators, Led},
	system::Peripherals,
	timer::Clock,
};

/// Recorded relay or LED change
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
	Relay(bool),
	Led(Led, bool),
}

#[derive(Clone, Copy)]
struct Press {
	hold_ms: u32,
	started_at: Option<u32>,
}

#[derive(Default)]
struct State {
	now_us: u64,
	events: Vec<(u32, Event)>,
	/// Rising edges of the buzzer line
	pulses: Vec<u32>,
	buzzer_high: bool,
	renders: Vec<(u32, StatusScreen)>,
	readings: VecDeque<u16>,
	presses: [Option<Press>; 2],
}

impl State {
	fn now_ms(&self) -> u32 {
		(self.now_us / 1000) as u32
	}
}

fn slot(button: ButtonType) -> usize {
	match button {
		ButtonType::Mode => 0,
		ButtonType::Irrigate => 1,
	}
}

#[derive(Clone, Default)]
pub struct Rig(Rc<RefCell<State>>);

impl Rig {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn set_time_ms(&self, ms: u32) {
		self.0.borrow_mut().now_us = u64::from(ms) * 1000;
	}

	pub fn now_ms(&self) -> u32 {
		self.0.borrow().now_ms()
	}

	/// Readings handed out in order; the last one repeats forever
	pub fn set_readings(&self, readings: &[u16]) {
		self.0.borrow_mut().readings = readings.iter().copied().collect();
	}

	/// Press `button` for `hold_ms`, starting the next time it is sampled
	pub fn press(&self, button: ButtonType, hold_ms: u32) {
		self.0.borrow_mut().presses[slot(button)] = Some(Press {
			hold_ms,
			started_at: None,
		});
	}

	pub fn events(&self) -> Vec<(u32, Event)> {
		self.0.borrow().events.clone()
	}

	pub fn pulses(&self) -> Vec<u32> {
		self.0.borrow().pulses.clone()
	}

	pub fn buzzer_high(&self) -> bool {
		self.0.borrow().buzzer_high
	}

	pub fn renders(&self) -> Vec<(u32, StatusScreen)> {
		self.0.borrow().renders.clone()
	}

	pub fn clock(&self) -> FakeClock {
		FakeClock(self.clone())
	}

	pub fn actuators(&self) -> FakeActuators {
		FakeActuators(self.clone())
	}

	pub fn button(&self, button: ButtonType) -> FakeButton {
		FakeButton {
			rig: self.clone(),
			button,
		}
	}

	pub fn peripherals(
		&self,
	) -> Peripherals<FakeSensor, FakeActuators, FakeDisplay, FakeClock, FakeButton, FakeButton> {
		Peripherals {
			sensor: FakeSensor(self.clone()),
			actuators: self.actuators(),
			display: FakeDisplay(self.clone()),
			clock: self.clock(),
			control_pad: ControlPad::new(
				self.button(ButtonType::Mode),
				self.button(ButtonType::Irrigate),
			),
		}
	}
}

pub struct FakeClock(Rig);

impl DelayMs<u16> for FakeClock {
	fn delay_ms(&mut self, ms: u16) {
		(self.0).0.borrow_mut().now_us += u64::from(ms) * 1000;
	}
}

impl DelayUs<u16> for FakeClock {
	fn delay_us(&mut self, us: u16) {
		(self.0).0.borrow_mut().now_us += u64::from(us);
	}
}

impl Clock for FakeClock {
	fn now_ms(&self) -> u32 {
		self.0.now_ms()
	}
}

pub struct FakeActuators(Rig);

impl FakeActuators {
	fn record(&mut self, event: Event) {
		let mut state = (self.0).0.borrow_mut();
		let now = state.now_ms();
		state.events.push((now, event));
	}
}

impl Actuators for FakeActuators {
	fn set_relay(&mut self, on: bool) {
		self.record(Event::Relay(on));
	}

	fn set_led(&mut self, led: Led, on: bool) {
		self.record(Event::Led(led, on));
	}

	fn set_buzzer(&mut self, high: bool) {
		let mut state = (self.0).0.borrow_mut();
		if high && !state.buzzer_high {
			let now = state.now_ms();
			state.pulses.push(now);
		}
		state.buzzer_high = high;
	}
}

pub struct FakeDisplay(Rig);

impl StatusSink for FakeDisplay {
	fn render(&mut self, screen: &StatusScreen) {
		let mut state = (self.0).0.borrow_mut();
		let now = state.now_ms();
		state.renders.push((now, *screen));
	}
}

pub struct FakeSensor(Rig);

impl MoistureSensor for FakeSensor {
	fn read_moisture(&mut self) -> MoistureReading {
		let mut state = (self.0).0.borrow_mut();
		let value = if state.readings.len() > 1 {
			state.readings.pop_front()
		} else {
			state.readings.front().copied()
		};

		MoistureReading::new(value.unwrap_or(3000))
	}
}

pub struct FakeButton {
	rig: Rig,
	button: ButtonType,
}

impl InputPin for FakeButton {
	type Error = Infallible;

	fn is_high(&self) -> Result<bool, Self::Error> {
		self.is_low().map(|low| !low)
	}

	fn is_low(&self) -> Result<bool, Self::Error> {
		let mut state = self.rig.0.borrow_mut();
		let now = state.now_ms();
		let entry = &mut state.presses[slot(self.button)];

		let pressed = match entry {
			Some(press) => {
				let started_at = *press.started_at.get_or_insert(now);
				now.wrapping_sub(started_at) < press.hold_ms
			}
			None => false,
		};
		if !pressed {
			// Released; the press is over.
			*entry = None;
		}

		Ok(pressed)
	}
}
