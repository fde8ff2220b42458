use derive_more::derive::{Display, Error};

use crate::driver::BusState;

/// A specialized `Result` where the error is this crate's `Error` type.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Define a unified error type for this crate.
#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// An LED index at or beyond the strip length.
    #[display("LED index {index} out of range for a strip of {len} LEDs")]
    IndexOutOfRange { index: usize, len: usize },

    /// A lifecycle operation was called in the wrong state.
    #[display("driver must be {expected} but is {actual}")]
    PreconditionViolated {
        expected: BusState,
        actual: BusState,
    },

    /// The blocking transfer did not finish before its timeout.
    #[display("SPI transfer timed out")]
    TransferTimeout,

    /// The SPI peripheral reported an error during the transfer.
    #[display("SPI transfer failed")]
    TransferFailed,

    /// The SPI bus is already owned by someone else.
    #[display("SPI bus is in use by another owner")]
    BusUnavailable,

    /// The SPI bus must be acquired before it can be used or released.
    #[display("SPI bus has not been acquired")]
    BusNotAcquired,

    /// The signal pin rejected a level or configuration change.
    #[display("Error setting output state")]
    CannotSetOutputState,

    /// One wire byte per WS2812 bit cannot meet the protocol timing at this SPI clock.
    #[display("SPI clock of {hz} Hz cannot produce WS2812 bit timing")]
    SpiFrequencyOutOfRange { hz: u32 },

    /// The trailing idle region is too short to latch a frame.
    #[display("reset region of {len} bytes is shorter than the required {min}")]
    ResetTooShort { len: usize, min: usize },
}

