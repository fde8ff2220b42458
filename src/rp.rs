//! RP2040 / RP235x glue: the signal pin as an `embassy_rp` [`Flex`] and the SPI settings.

use embassy_rp::gpio::{self, Drive, Flex, SlewRate};
use embassy_rp::spi::{self, Phase, Polarity};

use crate::Result;
use crate::config::SPI_FREQUENCY_HZ;
use crate::platform::{PinMode, Pull, SignalPin, Speed};

/// SPI settings for the strip: [`SPI_FREQUENCY_HZ`], MOSI idle low.
///
/// Use with `Spi::new_blocking_txonly`; the strip needs only clock and MOSI.
#[must_use]
pub fn spi_config() -> spi::Config {
    let mut config = spi::Config::default();
    config.frequency = SPI_FREQUENCY_HZ;
    config.polarity = Polarity::IdleLow;
    config.phase = Phase::CaptureOnFirstTransition;
    config
}

impl SignalPin for Flex<'_> {
    fn configure(&mut self, mode: PinMode, pull: Pull, speed: Speed) -> Result<()> {
        match mode {
            PinMode::OutputPushPull => {
                let (drive, slew_rate) = drive_for(speed);
                self.set_pull(pull_for(pull));
                self.set_drive_strength(drive);
                self.set_slew_rate(slew_rate);
                self.set_as_output();
            }
            // The RP GPIO block has no separate analog mode; an input without pulls is inert.
            PinMode::Analog => {
                self.set_as_input();
                self.set_pull(gpio::Pull::None);
                self.set_slew_rate(SlewRate::Slow);
            }
        }
        Ok(())
    }
}

const fn pull_for(pull: Pull) -> gpio::Pull {
    match pull {
        Pull::None => gpio::Pull::None,
        Pull::Up => gpio::Pull::Up,
        Pull::Down => gpio::Pull::Down,
    }
}

const fn drive_for(speed: Speed) -> (Drive, SlewRate) {
    match speed {
        Speed::Low => (Drive::_2mA, SlewRate::Slow),
        Speed::Medium => (Drive::_4mA, SlewRate::Slow),
        Speed::High => (Drive::_8mA, SlewRate::Fast),
        Speed::VeryHigh => (Drive::_12mA, SlewRate::Fast),
    }
}
