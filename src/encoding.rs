//! WS2812 bit encoding expressed as SPI bytes.
//!
//! The SPI peripheral clocks out one byte per WS2812 bit. A set bit becomes a long-high,
//! short-low byte; a clear bit becomes a short-high, long-low byte. These two bytes are the
//! whole alphabet of the wire format.
//!
//! ```text
//! bit 1:  1 1 1 1 1 1 0 0   (0xFC)
//! bit 0:  1 0 0 0 0 0 0 0   (0x80)
//! ```

/// Wire byte for a set color bit.
pub const WIRE_ONE: u8 = 0b_1111_1100;

/// Wire byte for a clear color bit.
pub const WIRE_ZERO: u8 = 0b_1000_0000;

/// Wire bytes per color channel.
pub const BYTES_PER_CHANNEL: usize = u8::BITS as usize;

/// Wire bytes per LED: green, red, blue.
pub const BYTES_PER_LED: usize = 3 * BYTES_PER_CHANNEL;

/// Expands one channel value into its 8 wire bytes, most significant bit first.
///
/// ```rust,no_run
/// # #![no_std]
/// # #![no_main]
/// # #[cfg(target_os = "none")]
/// # #[panic_handler]
/// # fn panic(_: &core::panic::PanicInfo) -> ! { loop {} }
/// use ws2812_kit::encoding::{WIRE_ONE, WIRE_ZERO, encode_byte};
///
/// const WIRE: [u8; 8] = encode_byte(0b_1000_0001);
/// const _: () = assert!(WIRE[0] == WIRE_ONE && WIRE[1] == WIRE_ZERO && WIRE[7] == WIRE_ONE);
/// ```
#[must_use]
#[expect(clippy::indexing_slicing, reason = "bit_index < BYTES_PER_CHANNEL")]
#[expect(clippy::arithmetic_side_effects, reason = "Loop counter and mask stay in range")]
pub const fn encode_byte(value: u8) -> [u8; BYTES_PER_CHANNEL] {
    let mut wire = [WIRE_ZERO; BYTES_PER_CHANNEL];
    let mut mask: u8 = 0x80;
    let mut bit_index = 0;
    while bit_index < BYTES_PER_CHANNEL {
        if value & mask != 0 {
            wire[bit_index] = WIRE_ONE;
        }
        mask >>= 1;
        bit_index += 1;
    }
    wire
}

/// Encodes one LED's color into its 24 wire bytes in WS2812 order (green, red, blue).
#[must_use]
#[expect(clippy::indexing_slicing, reason = "Indices bounded by the loop conditions")]
#[expect(clippy::arithmetic_side_effects, reason = "Offsets stay below BYTES_PER_LED")]
pub const fn encode_grb(r: u8, g: u8, b: u8) -> [u8; BYTES_PER_LED] {
    let channels = [encode_byte(g), encode_byte(r), encode_byte(b)];
    let mut wire = [0; BYTES_PER_LED];
    let mut channel_index = 0;
    while channel_index < channels.len() {
        let mut bit_index = 0;
        while bit_index < BYTES_PER_CHANNEL {
            wire[channel_index * BYTES_PER_CHANNEL + bit_index] = channels[channel_index][bit_index];
            bit_index += 1;
        }
        channel_index += 1;
    }
    wire
}
