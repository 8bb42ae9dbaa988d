use embedded_graphics::{
	mono_font::{ascii::FONT_6X10, MonoTextStyle},
	pixelcolor::BinaryColor,
	prelude::*,
	primitives::{PrimitiveStyle, Rectangle},
	text::{Baseline, Text},
};
use ssd1306::{mode::BufferedGraphicsMode, prelude::*, Ssd1306};
use ufmt::{uDisplay, uWrite};

use crate::moisture::{MoistureBand, BAR_SEGMENTS};

/// First line of the header
pub const TITLE: &str = "Irrigation";
/// Second line of the header
pub const SUBTITLE: &str = "System";
/// Label in front of the humidity band
pub const HUMIDITY_LABEL: &str = "Humidity:";

/// Left edge of the body text
const TEXT_X: i32 = 8;
/// Moisture bar, drawn along the right edge of the panel
const BAR_X: i32 = 112;
const BAR_Y: i32 = 6;
const BAR_WIDTH: u32 = 12;
const BAR_HEIGHT: u32 = 52;

/// What the controller is doing, shown on the last line
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
	Automatic,
	Manual,
	Irrigating,
}

impl Status {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Automatic => "Automatic mode",
			Self::Manual => "Manual mode",
			Self::Irrigating => "Irrigating...",
		}
	}
}

impl uDisplay for Status {
	fn fmt<W>(&self, f: &mut ufmt::Formatter<'_, W>) -> Result<(), W::Error>
	where
		W: uWrite + ?Sized,
	{
		f.write_str(self.as_str())
	}
}

/// Everything shown on the display for one refresh
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusScreen {
	/// Band of the current reading
	pub band: MoistureBand,
	/// Status line, if any
	pub status: Option<Status>,
	/// Lit segments of the moisture bar, 0..=[`BAR_SEGMENTS`]
	pub bar_level: u8,
}

impl StatusScreen {
	pub fn title(&self) -> &'static str {
		TITLE
	}

	pub fn subtitle(&self) -> &'static str {
		SUBTITLE
	}

	/// Body lines, top to bottom
	pub fn lines(&self) -> [Option<&'static str>; 3] {
		[
			Some(HUMIDITY_LABEL),
			Some(self.band.humidity_label()),
			self.status.as_ref().map(Status::as_str),
		]
	}

	/// Height in pixels of the filled part of the moisture bar
	fn bar_fill(&self) -> u32 {
		u32::from(self.bar_level.min(BAR_SEGMENTS)) * BAR_HEIGHT / u32::from(BAR_SEGMENTS)
	}
}

/// Anything able to show a [`StatusScreen`]
pub trait StatusSink {
	fn render(&mut self, screen: &StatusScreen);
}

/// 128x64 SSD1306 OLED
pub struct Display<DI> {
	inner: Ssd1306<DI, DisplaySize128x64, BufferedGraphicsMode<DisplaySize128x64>>,
}

impl<DI: WriteOnlyDataCommand> Display<DI> {
	pub fn new(interface: DI) -> Self {
		let mut display = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
			.into_buffered_graphics_mode();
		let _ = display.init();

		Self { inner: display }
	}

	fn draw_text(&mut self, text: &str, x: i32, y: i32) {
		let style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
		let _ = Text::with_baseline(text, Point::new(x, y), style, Baseline::Top)
			.draw(&mut self.inner);
	}

	fn draw_bar(&mut self, fill: u32) {
		let _ = Rectangle::new(Point::new(BAR_X, BAR_Y), Size::new(BAR_WIDTH, BAR_HEIGHT))
			.into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
			.draw(&mut self.inner);

		if fill > 0 {
			// Fills from the bottom up.
			let top = BAR_Y + (BAR_HEIGHT - fill) as i32;
			let _ = Rectangle::new(Point::new(BAR_X, top), Size::new(BAR_WIDTH, fill))
				.into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
				.draw(&mut self.inner);
		}
	}
}

impl<DI: WriteOnlyDataCommand> StatusSink for Display<DI> {
	/// Redraw the whole frame and send it to the panel
	fn render(&mut self, screen: &StatusScreen) {
		let _ = DrawTarget::clear(&mut self.inner, BinaryColor::Off);

		self.draw_text(screen.title(), 15, 2);
		self.draw_text(screen.subtitle(), 15, 12);

		let rows = [25, 35, 48];
		for (line, y) in screen.lines().iter().zip(rows.iter()) {
			if let Some(line) = line {
				self.draw_text(line, TEXT_X, *y);
			}
		}

		self.draw_bar(screen.bar_fill());

		let _ = self.inner.flush();
	}
}
