//! A device abstraction for a WS2812 strip clocked out over SPI.
//! See [`Ws2812Spi`] for the main usage example.

use derive_more::derive::Display;
use embassy_time::Duration;

use crate::config::TRANSFER_TIMEOUT;
use crate::frame_buffer::{FrameBuffer, Rgb};
use crate::platform::{PinMode, Pull, SignalPin, SpiHandle, Speed};
use crate::{Error, Result};

/// Lifecycle state of a [`Ws2812Spi`].
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusState {
    #[display("uninitialized")]
    Uninitialized,
    #[display("ready")]
    Ready,
}

/// A WS2812 strip on an SPI bus: the frame buffer, the bus handle and the signal pin.
///
/// Pixels can be set in any state; they reach the LEDs on the next [`send`](Self::send), which
/// needs the driver to be [`BusState::Ready`]:
///
/// ```text
/// Uninitialized --init--> Ready --deinit--> Uninitialized
/// ```
///
/// The driver holds no lock. Callers sharing it between contexts must wrap it in their own
/// mutex. Dropping a ready driver deinitializes it.
///
/// # Example
///
/// ```rust,no_run
/// # #![no_std]
/// # #![no_main]
/// # #[cfg(target_os = "none")]
/// # #[panic_handler]
/// # fn panic(_: &core::panic::PanicInfo) -> ! { loop {} }
/// use ws2812_kit::config::{FRAME_LEN, LED_COUNT, RESET_LEN};
/// use ws2812_kit::platform::{SignalPin, SpiHandle};
/// use ws2812_kit::{Result, Ws2812Spi};
///
/// fn show_red<SPI: SpiHandle, PIN: SignalPin>(spi: SPI, pin: PIN) -> Result<()> {
///     let mut strip = Ws2812Spi::<_, _, LED_COUNT, RESET_LEN, FRAME_LEN>::new(spi, pin);
///     strip.init()?;
///     strip.set_all(0, 0, 0);
///     strip.set_pixel(0, 255, 0, 0)?;
///     strip.send()?;
///     strip.deinit()
/// }
/// ```
pub struct Ws2812Spi<SPI, PIN, const N: usize, const RESET: usize, const LEN: usize>
where
    SPI: SpiHandle,
    PIN: SignalPin,
{
    spi: SPI,
    pin: PIN,
    state: BusState,
    frame: FrameBuffer<N, RESET, LEN>,
    timeout: Duration,
}

impl<SPI, PIN, const N: usize, const RESET: usize, const LEN: usize> Ws2812Spi<SPI, PIN, N, RESET, LEN>
where
    SPI: SpiHandle,
    PIN: SignalPin,
{
    /// Creates an uninitialized driver with a zeroed frame and the build-time timeout.
    #[must_use]
    pub const fn new(spi: SPI, pin: PIN) -> Self {
        Self::with_timeout(spi, pin, TRANSFER_TIMEOUT)
    }

    /// Creates an uninitialized driver with an explicit transfer timeout.
    #[must_use]
    pub const fn with_timeout(spi: SPI, pin: PIN, timeout: Duration) -> Self {
        Self {
            spi,
            pin,
            state: BusState::Uninitialized,
            frame: FrameBuffer::new(),
            timeout,
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> BusState {
        self.state
    }

    /// Whether [`send`](Self::send) may be called.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self.state, BusState::Ready)
    }

    /// The timeout passed to every transmit.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// The encoded frame as it will be sent.
    #[must_use]
    pub const fn frame(&self) -> &FrameBuffer<N, RESET, LEN> {
        &self.frame
    }

    /// Direct access to the frame, e.g. to fill it from a prerendered pattern.
    pub const fn frame_mut(&mut self) -> &mut FrameBuffer<N, RESET, LEN> {
        &mut self.frame
    }

    /// Acquires the bus, configures the signal pin as a fast push-pull output and drives it low.
    ///
    /// If pin setup fails the bus is released again and the driver stays uninitialized.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PreconditionViolated`] if already ready, or the first platform error.
    pub fn init(&mut self) -> Result<()> {
        self.expect_state(BusState::Uninitialized)?;
        self.spi.acquire()?;
        if let Err(err) = self.drive_pin_low_as_output() {
            #[cfg(feature = "defmt")]
            defmt::warn!("WS2812 signal pin setup failed: {}; releasing bus", err);
            let _ = self.spi.release();
            return Err(err);
        }
        self.state = BusState::Ready;
        #[cfg(feature = "defmt")]
        defmt::info!("WS2812 ready: {} LEDs, {} byte frame", N, LEN);
        Ok(())
    }

    /// Releases the bus, drives the signal pin low and leaves it inert.
    ///
    /// The pin is quiesced and the driver becomes uninitialized even if releasing the bus
    /// fails; the first error is returned.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PreconditionViolated`] if not ready, or the first platform error.
    pub fn deinit(&mut self) -> Result<()> {
        self.expect_state(BusState::Ready)?;
        let released = self.spi.release();
        let quiesced = self.quiesce_pin();
        self.state = BusState::Uninitialized;
        #[cfg(feature = "defmt")]
        defmt::info!("WS2812 released");
        released.and(quiesced)
    }

    /// Encodes one LED's color. Takes effect on the next [`send`](Self::send).
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `index >= N`.
    pub fn set_pixel(&mut self, index: usize, r: u8, g: u8, b: u8) -> Result<()> {
        self.frame.set_pixel(index, r, g, b)
    }

    /// Encodes the same color into every LED.
    pub fn set_all(&mut self, r: u8, g: u8, b: u8) {
        self.frame.set_all(r, g, b);
    }

    /// Sets every LED to black.
    pub fn clear(&mut self) {
        self.frame.clear();
    }

    /// Encodes colors into LEDs `0, 1, 2, ...`; see [`FrameBuffer::write_colors`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if more than `N` colors are given.
    pub fn write_colors<I>(&mut self, colors: I) -> Result<()>
    where
        I: IntoIterator<Item = Rgb>,
    {
        self.frame.write_colors(colors)
    }

    /// Transmits the whole frame, reset region included, in one blocking transfer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PreconditionViolated`] if not ready, otherwise whatever the transmit
    /// primitive reports. Failed transfers are not retried.
    pub fn send(&mut self) -> Result<()> {
        self.expect_state(BusState::Ready)?;
        #[cfg(feature = "defmt")]
        defmt::trace!("WS2812 sending {} bytes", LEN);
        let result = self.spi.transmit(self.frame.as_bytes(), self.timeout);
        #[cfg(feature = "defmt")]
        if let Err(err) = &result {
            defmt::warn!("WS2812 transfer failed: {}", err);
        }
        result
    }

    fn expect_state(&self, expected: BusState) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(Error::PreconditionViolated {
                expected,
                actual: self.state,
            })
        }
    }

    fn drive_pin_low_as_output(&mut self) -> Result<()> {
        self.pin
            .configure(PinMode::OutputPushPull, Pull::Up, Speed::VeryHigh)?;
        self.pin.set_low().map_err(|_| Error::CannotSetOutputState)
    }

    fn quiesce_pin(&mut self) -> Result<()> {
        let low = self.pin.set_low().map_err(|_| Error::CannotSetOutputState);
        let inert = self.pin.configure(PinMode::Analog, Pull::None, Speed::Low);
        low.and(inert)
    }
}

impl<SPI, PIN, const N: usize, const RESET: usize, const LEN: usize> Drop
    for Ws2812Spi<SPI, PIN, N, RESET, LEN>
where
    SPI: SpiHandle,
    PIN: SignalPin,
{
    fn drop(&mut self) {
        if self.is_ready() {
            let _ = self.deinit();
        }
    }
}
