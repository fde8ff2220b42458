//! Build-time configuration and WS2812 timing validation.
//!
//! `build.rs` exports `WS2812_LED_COUNT`, `WS2812_RESET_LEN`, `WS2812_TIMEOUT_MS` and
//! `WS2812_SPI_HZ` (from the environment, a `.env` file, or defaults of 20, 60, 500 and
//! 8 MHz). They are parsed here at compile time; a malformed value fails the build.
//!
//! The reset length and timeout are tied to the SPI clock: one wire byte is one WS2812 bit, so
//! the clock fixes both the bit period and how long the zeroed reset region holds the line low.
//! [`check_timing`] verifies a clock and reset length against the WS2812 datasheet, and the
//! build-time values are checked with it below. The zero-bit high time is not checked; see
//! [`check_timing`].

use embassy_time::Duration;

use crate::frame_buffer::{FrameBuffer, frame_len};
use crate::{Error, Result};

/// LEDs in the strip.
pub const LED_COUNT: usize = parse_usize(env!("WS2812_LED_COUNT"));

/// Zero bytes appended after the last LED.
pub const RESET_LEN: usize = parse_usize(env!("WS2812_RESET_LEN"));

/// Total frame length in bytes.
pub const FRAME_LEN: usize = frame_len(LED_COUNT, RESET_LEN);

/// Upper bound on one blocking transmit of the whole frame.
pub const TRANSFER_TIMEOUT: Duration = Duration::from_millis(parse_u64(env!("WS2812_TIMEOUT_MS")));

/// SPI clock the wire encoding is clocked out at.
pub const SPI_FREQUENCY_HZ: u32 = parse_u32(env!("WS2812_SPI_HZ"));

/// Frame buffer sized by the build-time configuration.
pub type DefaultFrameBuffer = FrameBuffer<LED_COUNT, RESET_LEN, FRAME_LEN>;

const _: () = assert!(LED_COUNT > 0, "WS2812_LED_COUNT must be at least 1");

const _: () = assert!(
    check_timing(SPI_FREQUENCY_HZ, RESET_LEN).is_ok(),
    "WS2812_SPI_HZ and WS2812_RESET_LEN do not meet WS2812 timing"
);

/// Shortest WS2812 bit period (1.25 µs - 600 ns).
pub const MIN_BIT_NS: u64 = 650;
/// Longest WS2812 bit period (1.25 µs + 600 ns).
pub const MAX_BIT_NS: u64 = 1_850;
/// Shortest high time the chip reliably reads as a one.
pub const MIN_ONE_HIGH_NS: u64 = 550;
/// Minimum low time that latches a frame.
pub const MIN_RESET_NS: u64 = 50_000;

const NS_PER_SECOND: u64 = 1_000_000_000;
// SPI bits per wire byte.
const BITS_PER_BYTE: u64 = 8;
// High bits in `WIRE_ONE`.
const ONE_HIGH_BITS: u64 = 6;

/// Nanoseconds to clock out `bits` SPI bits at `spi_hz`.
#[expect(clippy::arithmetic_side_effects, reason = "Callers rule out a zero clock")]
#[expect(clippy::integer_division_remainder_used, reason = "Truncating to whole nanoseconds")]
const fn bits_ns(bits: u64, spi_hz: u32) -> u64 {
    bits * NS_PER_SECOND / spi_hz as u64
}

/// Smallest reset region, in bytes, that holds the line low for at least [`MIN_RESET_NS`].
///
/// Returns 0 for a zero clock.
#[must_use]
#[expect(clippy::cast_possible_truncation, reason = "At most MIN_RESET_NS bytes")]
pub const fn min_reset_len(spi_hz: u32) -> usize {
    if spi_hz == 0 {
        return 0;
    }
    let byte_ns = bits_ns(BITS_PER_BYTE, spi_hz);
    MIN_RESET_NS.div_ceil(byte_ns) as usize
}

/// Checks that `spi_hz` produces valid WS2812 bits and that `reset_len` bytes latch a frame.
///
/// Only the bit period, the one-bit high time and the reset length are checked. The zero-bit
/// high time (one SPI bit, 125 ns at 8 MHz) is intentionally not: it sits below the datasheet
/// T0H window at every clock this encoding accepts, and WS2812 parts still read it as a zero.
///
/// ```rust,no_run
/// # #![no_std]
/// # #![no_main]
/// # #[cfg(target_os = "none")]
/// # #[panic_handler]
/// # fn panic(_: &core::panic::PanicInfo) -> ! { loop {} }
/// use ws2812_kit::config::check_timing;
///
/// const _: () = assert!(check_timing(8_000_000, 60).is_ok());
/// const _: () = assert!(check_timing(8_000_000, 40).is_err());
/// const _: () = assert!(check_timing(3_000_000, 60).is_err());
/// ```
///
/// # Errors
///
/// Returns [`Error::SpiFrequencyOutOfRange`] if a byte period falls outside the WS2812 bit
/// window or the one-bit high time is too short, and [`Error::ResetTooShort`] if the reset
/// region is shorter than [`min_reset_len`].
pub const fn check_timing(spi_hz: u32, reset_len: usize) -> Result<()> {
    if spi_hz == 0 {
        return Err(Error::SpiFrequencyOutOfRange { hz: spi_hz });
    }
    let bit_ns = bits_ns(BITS_PER_BYTE, spi_hz);
    if bit_ns < MIN_BIT_NS || bit_ns > MAX_BIT_NS || bits_ns(ONE_HIGH_BITS, spi_hz) < MIN_ONE_HIGH_NS
    {
        return Err(Error::SpiFrequencyOutOfRange { hz: spi_hz });
    }
    let min = min_reset_len(spi_hz);
    if reset_len < min {
        return Err(Error::ResetTooShort {
            len: reset_len,
            min,
        });
    }
    Ok(())
}

#[expect(clippy::indexing_slicing, reason = "index < bytes.len()")]
#[expect(clippy::arithmetic_side_effects, reason = "Overflow is a compile error in const use")]
const fn parse_u64(text: &str) -> u64 {
    let bytes = text.as_bytes();
    assert!(!bytes.is_empty(), "configuration value must not be empty");

    let mut value: u64 = 0;
    let mut index = 0;
    while index < bytes.len() {
        let byte = bytes[index];
        index += 1;
        if byte == b'_' {
            continue;
        }
        assert!(byte.is_ascii_digit(), "configuration value must be a decimal number");
        value = value * 10 + (byte - b'0') as u64;
    }
    value
}

#[expect(clippy::cast_possible_truncation, reason = "Range checked first")]
const fn parse_usize(text: &str) -> usize {
    let value = parse_u64(text);
    assert!(value <= usize::MAX as u64, "configuration value does not fit in usize");
    value as usize
}

#[expect(clippy::cast_possible_truncation, reason = "Range checked first")]
const fn parse_u32(text: &str) -> u32 {
    let value = parse_u64(text);
    assert!(value <= u32::MAX as u64, "configuration value does not fit in u32");
    value as u32
}
