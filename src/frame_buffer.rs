//! The fixed-size byte buffer holding one full strip refresh.
//!
//! See [`FrameBuffer`] for the layout.

use smart_leds::RGB8;

use crate::encoding::{BYTES_PER_LED, encode_grb};
use crate::{Error, Result};

/// RGB color representation re-exported from `smart_leds`.
pub type Rgb = RGB8;

/// Number of bytes needed for `led_count` LEDs followed by `reset_len` idle bytes.
#[must_use]
#[expect(clippy::arithmetic_side_effects, reason = "Overflow is a compile error in const use")]
pub const fn frame_len(led_count: usize, reset_len: usize) -> usize {
    led_count * BYTES_PER_LED + reset_len
}

/// Wire-encoded bytes for `N` LEDs followed by `RESET` zero bytes.
///
/// `LEN` must equal [`frame_len(N, RESET)`](frame_len); any other value is rejected when the
/// type is instantiated.
///
/// ```text
/// | LED 0 (24) | LED 1 (24) | ... | LED N-1 (24) | reset (RESET, always 0) |
///   G8 R8 B8
/// ```
///
/// Writes go only to the LED region and fully overwrite the slots they touch. The reset region
/// is zeroed once at construction and never written again, so it always produces the idle-low
/// gap that latches a frame.
///
/// ```rust,no_run
/// # #![no_std]
/// # #![no_main]
/// # #[cfg(target_os = "none")]
/// # #[panic_handler]
/// # fn panic(_: &core::panic::PanicInfo) -> ! { loop {} }
/// use ws2812_kit::frame_buffer::{FrameBuffer, frame_len};
///
/// const LEN: usize = frame_len(20, 60);
/// const _: () = assert!(LEN == 540);
///
/// fn example() -> ws2812_kit::Result<()> {
///     let mut frame = FrameBuffer::<20, 60, LEN>::new();
///     frame.set_all(0, 0, 16);
///     frame.set_pixel(0, 255, 0, 0)?;
///     Ok(())
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer<const N: usize, const RESET: usize, const LEN: usize> {
    bytes: [u8; LEN],
}

impl<const N: usize, const RESET: usize, const LEN: usize> FrameBuffer<N, RESET, LEN> {
    /// Number of LEDs in the strip.
    pub const LED_COUNT: usize = N;

    /// Length of the trailing idle region in bytes.
    pub const RESET_LEN: usize = RESET;

    const LED_BYTES: usize = frame_len(N, 0);

    /// Creates an all-zero buffer.
    #[must_use]
    pub const fn new() -> Self {
        const {
            assert!(LEN == frame_len(N, RESET), "LEN must equal N * 24 + RESET");
        }
        Self { bytes: [0; LEN] }
    }

    /// Total buffer length, LED bytes plus the reset region.
    #[must_use]
    pub const fn len(&self) -> usize {
        LEN
    }

    /// Whether the buffer holds no bytes at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        LEN == 0
    }

    /// The whole buffer as it goes on the wire.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; LEN] {
        &self.bytes
    }

    /// The LED region, `N * 24` bytes.
    #[must_use]
    pub fn led_bytes(&self) -> &[u8] {
        let (leds, _) = self.bytes.split_at(Self::LED_BYTES);
        leds
    }

    /// The trailing idle region, `RESET` bytes.
    #[must_use]
    pub fn reset_region(&self) -> &[u8] {
        let (_, reset) = self.bytes.split_at(Self::LED_BYTES);
        reset
    }

    /// Encodes one LED's color into its 24-byte slot.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `index >= N`; the buffer is left unchanged.
    pub fn set_pixel(&mut self, index: usize, r: u8, g: u8, b: u8) -> Result<()> {
        let slot = self
            .led_slots_mut()
            .nth(index)
            .ok_or(Error::IndexOutOfRange { index, len: N })?;
        slot.copy_from_slice(&encode_grb(r, g, b));
        Ok(())
    }

    /// Encodes the same color into every LED slot. The reset region is not touched.
    pub fn set_all(&mut self, r: u8, g: u8, b: u8) {
        let wire = encode_grb(r, g, b);
        for slot in self.led_slots_mut() {
            slot.copy_from_slice(&wire);
        }
    }

    /// Sets every LED to black.
    pub fn clear(&mut self) {
        self.set_all(0, 0, 0);
    }

    /// Encodes colors into slots `0, 1, 2, ...` in order.
    ///
    /// Slots past the end of `colors` keep their previous contents.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `colors` yields more than `N` items. Slots for the
    /// first `N` colors have already been written when this happens.
    pub fn write_colors<I>(&mut self, colors: I) -> Result<()>
    where
        I: IntoIterator<Item = Rgb>,
    {
        let mut colors = colors.into_iter();
        for slot in self.led_slots_mut() {
            let Some(color) = colors.next() else {
                return Ok(());
            };
            slot.copy_from_slice(&encode_grb(color.r, color.g, color.b));
        }
        if colors.next().is_some() {
            return Err(Error::IndexOutOfRange { index: N, len: N });
        }
        Ok(())
    }

    fn led_slots_mut(&mut self) -> core::slice::ChunksExactMut<'_, u8> {
        let (leds, _) = self.bytes.split_at_mut(Self::LED_BYTES);
        leds.chunks_exact_mut(BYTES_PER_LED)
    }
}

impl<const N: usize, const RESET: usize, const LEN: usize> Default for FrameBuffer<N, RESET, LEN> {
    fn default() -> Self {
        Self::new()
    }
}
