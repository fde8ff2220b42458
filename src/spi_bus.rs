//! [`SpiHandle`] over any `embedded-hal` 1.0 SPI bus.

use core::cell::{RefCell, RefMut};

use embassy_time::{Duration, Instant};
use embedded_hal::spi::SpiBus;

use crate::platform::SpiHandle;
use crate::{Error, Result};

/// Bytes written between deadline checks.
pub const CHUNK_LEN: usize = 64;

/// A bus shared through a `RefCell`; holding it means holding the `RefMut`.
///
/// Acquiring borrows the cell mutably until [`SpiHandle::release`], so any other owner of the
/// same cell sees [`Error::BusUnavailable`] in the meantime. The bus should be configured for
/// the clock in [`crate::config::SPI_FREQUENCY_HZ`] with MOSI idling low.
///
/// ```rust,no_run
/// # #![no_std]
/// # #![no_main]
/// # #[cfg(target_os = "none")]
/// # #[panic_handler]
/// # fn panic(_: &core::panic::PanicInfo) -> ! { loop {} }
/// use core::cell::RefCell;
/// use embassy_time::Duration;
/// use embedded_hal::spi::SpiBus;
/// use ws2812_kit::platform::SpiHandle;
/// use ws2812_kit::spi_bus::RefCellSpiBus;
/// use ws2812_kit::{Error, Result};
///
/// fn send_raw<BUS: SpiBus>(cell: &RefCell<BUS>, frame: &[u8]) -> Result<()> {
///     let mut strip_bus = RefCellSpiBus::new(cell);
///     strip_bus.acquire()?;
///     // A second handle on the same cell is locked out until release.
///     assert_eq!(RefCellSpiBus::new(cell).acquire(), Err(Error::BusUnavailable));
///     strip_bus.transmit(frame, Duration::from_millis(500))?;
///     strip_bus.release()
/// }
/// ```
pub struct RefCellSpiBus<'a, BUS> {
    cell: &'a RefCell<BUS>,
    held: Option<RefMut<'a, BUS>>,
}

impl<'a, BUS> RefCellSpiBus<'a, BUS> {
    /// Wraps a shared bus. Nothing is borrowed until [`SpiHandle::acquire`].
    #[must_use]
    pub const fn new(cell: &'a RefCell<BUS>) -> Self {
        Self { cell, held: None }
    }

    /// Whether this handle currently owns the bus.
    #[must_use]
    pub const fn is_acquired(&self) -> bool {
        self.held.is_some()
    }
}

impl<BUS: SpiBus> SpiHandle for RefCellSpiBus<'_, BUS> {
    fn acquire(&mut self) -> Result<()> {
        if self.held.is_some() {
            return Err(Error::BusUnavailable);
        }
        let bus = self
            .cell
            .try_borrow_mut()
            .map_err(|_| Error::BusUnavailable)?;
        self.held = Some(bus);
        Ok(())
    }

    fn release(&mut self) -> Result<()> {
        let mut bus = self.held.take().ok_or(Error::BusNotAcquired)?;
        bus.flush().map_err(|_| Error::TransferFailed)
    }

    /// Writes `bytes` in [`CHUNK_LEN`] pieces, checking the deadline before each one.
    ///
    /// A chunk that starts before the deadline is always finished, so a frame whose last chunk
    /// was started in time is flushed and reported as sent. A timeout too large to represent
    /// as an [`Instant`] means no deadline.
    fn transmit(&mut self, bytes: &[u8], timeout: Duration) -> Result<()> {
        let bus = self.held.as_mut().ok_or(Error::BusNotAcquired)?;
        let deadline = Instant::now().checked_add(timeout);
        for chunk in bytes.chunks(CHUNK_LEN) {
            if deadline.is_some_and(|limit| Instant::now() > limit) {
                return Err(Error::TransferTimeout);
            }
            bus.write(chunk).map_err(|_| Error::TransferFailed)?;
        }
        bus.flush().map_err(|_| Error::TransferFailed)
    }
}
