//! Compile-only verification of the SPI strip driver on a Pico 1 (RP2040) or Pico 2 (RP2350).
//!
//! Wiring: SPI0 clock on GPIO2, strip data (MOSI) on GPIO3, level-shifter enable on GPIO4.
//!
//! Run via: `cargo check-all` (xtask compiles this for thumbv6m-none-eabi)

#![cfg(not(feature = "host"))]
#![no_std]
#![no_main]

use core::cell::RefCell;

use defmt::info;
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_rp::gpio::Flex;
use embassy_rp::peripherals::SPI0;
use embassy_rp::spi::{Blocking, Spi};
use embassy_time::Timer;
use panic_probe as _;
use static_cell::StaticCell;
use ws2812_kit::config::{FRAME_LEN, LED_COUNT, RESET_LEN};
use ws2812_kit::spi_bus::RefCellSpiBus;
use ws2812_kit::{Result, Rgb, Ws2812Spi, colors, rp};

type Strip = Ws2812Spi<
    RefCellSpiBus<'static, Spi<'static, SPI0, Blocking>>,
    Flex<'static>,
    LED_COUNT,
    RESET_LEN,
    FRAME_LEN,
>;

static SPI_BUS: StaticCell<RefCell<Spi<'static, SPI0, Blocking>>> = StaticCell::new();

#[embassy_executor::main]
async fn main(_spawner: Spawner) -> ! {
    match inner_main().await {
        Ok(()) => unreachable!(),
        Err(e) => panic!("Fatal error: {:?}", e),
    }
}

async fn inner_main() -> Result<()> {
    let p = embassy_rp::init(Default::default());

    let spi = Spi::new_blocking_txonly(p.SPI0, p.PIN_2, p.PIN_3, rp::spi_config());
    let bus = SPI_BUS.init(RefCell::new(spi));
    let mut strip: Strip = Ws2812Spi::new(RefCellSpiBus::new(bus), Flex::new(p.PIN_4));

    strip.init()?;
    info!("WS2812 SPI demo starting ({} LEDs)", LED_COUNT);

    // Solid dim blue, then a red dot walking along it.
    strip.set_all(0, 0, 16);
    strip.send()?;
    Timer::after_millis(500).await;

    let mut position: usize = 0;
    loop {
        strip.write_colors((0..LED_COUNT).map(|index| dot_color(index, position)))?;
        strip.send()?;
        position = position
            .checked_add(1)
            .filter(|next| *next < LED_COUNT)
            .unwrap_or(0);
        Timer::after_millis(80).await;
    }
}

fn dot_color(index: usize, position: usize) -> Rgb {
    if index == position {
        colors::RED
    } else {
        Rgb::new(0, 0, 16)
    }
}

#[cfg(not(target_arch = "arm"))]
#[panic_handler]
fn panic(_info: &core::panic::PanicInfo<'_>) -> ! {
    loop {}
}
