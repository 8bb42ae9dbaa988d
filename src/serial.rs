//! Write formatted log lines to whatever serial output the firmware provides.
//!
//! The library has no access to a USART, so the firmware installs a sink function with
//! [`set_serial`] during boot. Until that happens (and always in host tests) log lines are
//! dropped.

use core::convert::Infallible;
use ufmt::uWrite;

/// Function receiving each formatted fragment of a log line
pub type SerialSink = fn(&str);

static mut SINK: Option<SerialSink> = None;

/// Install the serial sink. Only the first call has an effect.
pub fn set_serial(sink: SerialSink) {
	unsafe {
		if SINK.is_none() {
			SINK = Some(sink);
		}
	}
}

/// Writer forwarding to the installed sink
pub struct SerialWriter;

impl uWrite for SerialWriter {
	type Error = Infallible;

	fn write_str(&mut self, s: &str) -> Result<(), Self::Error> {
		// Copy the function pointer out; the static is written once during boot.
		if let Some(sink) = unsafe { SINK } {
			sink(s);
		}

		Ok(())
	}
}

/// Convenience wrapper for writing a line to the serial sink.
///
/// ```ignore
/// log!("moisture: {}", reading);
/// ```
#[macro_export]
macro_rules! log {
    ($fmt:expr) => {{
		let mut writer = $crate::serial::SerialWriter;
		let _ = ufmt::uwriteln!(writer, $fmt);
	}};
    ($fmt:expr, $($values:expr),*) => {{
		let mut writer = $crate::serial::SerialWriter;
		let _ = ufmt::uwriteln!(writer, $fmt, $($values),*);
	}}
}
