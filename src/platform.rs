//! The narrow interface the driver needs from the host platform.
//!
//! Bus ownership, pin configuration and the blocking transmit primitive belong to the
//! platform's HAL. [`crate::spi_bus::RefCellSpiBus`] implements [`SpiHandle`] for any
//! `embedded-hal` SPI bus, and the `rp` module implements [`SignalPin`] for
//! `embassy_rp::gpio::Flex`.

use embassy_time::Duration;
use embedded_hal::digital::OutputPin;

use crate::Result;

/// Electrical mode of the signal pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinMode {
    /// Actively driven output.
    OutputPushPull,
    /// Inert, high-impedance. The pin no longer drives the line.
    Analog,
}

/// Pull resistor on the signal pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pull {
    None,
    Up,
    Down,
}

/// Output edge speed of the signal pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Speed {
    Low,
    Medium,
    High,
    VeryHigh,
}

/// The pin that gates the strip's data line. Logic level is set through [`OutputPin`].
pub trait SignalPin: OutputPin {
    /// Reconfigures the pin's mode, pull and speed.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform rejects the configuration.
    fn configure(&mut self, mode: PinMode, pull: Pull, speed: Speed) -> Result<()>;
}

/// Exclusive access to the SPI bus plus a blocking, time-bounded transmit.
pub trait SpiHandle {
    /// Takes exclusive ownership of the bus.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::BusUnavailable`] if another owner holds the bus.
    fn acquire(&mut self) -> Result<()>;

    /// Gives up ownership of the bus.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::BusNotAcquired`] if the bus is not held.
    fn release(&mut self) -> Result<()>;

    /// Writes `bytes` and blocks until they are out or `timeout` has passed.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::TransferTimeout`] or [`crate::Error::TransferFailed`]. No retry
    /// is attempted.
    fn transmit(&mut self, bytes: &[u8], timeout: Duration) -> Result<()>;
}
