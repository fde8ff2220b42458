//! Drives a WS2812 RGB LED strip over SPI.
//!
//! Each WS2812 bit goes out as one SPI byte (see [`encoding`]). A [`FrameBuffer`] holds one
//! full refresh, every LED plus a zeroed reset gap, and [`Ws2812Spi`] owns that buffer together
//! with the bus handle and signal pin, pushing the frame out in one blocking transfer.
#![no_std]

pub mod config;
pub mod driver;
pub mod encoding;
mod error;
pub mod frame_buffer;
pub mod platform;
#[cfg(any(feature = "pico1", feature = "pico2"))]
pub mod rp;
pub mod spi_bus;

// Re-export commonly used items
pub use driver::{BusState, Ws2812Spi};
pub use error::{Error, Result};
pub use frame_buffer::{FrameBuffer, Rgb};
/// RGB color constants.
pub use smart_leds::colors;
