#![cfg(feature = "host")]
//! Host-level tests for the driver lifecycle, using recording mocks for the platform.

use std::cell::RefCell;
use std::convert::Infallible;
use std::rc::Rc;

use embassy_time::Duration;
use embedded_hal::digital::{ErrorType, OutputPin};
use ws2812_kit::config::TRANSFER_TIMEOUT;
use ws2812_kit::encoding::{WIRE_ONE, WIRE_ZERO};
use ws2812_kit::frame_buffer::frame_len;
use ws2812_kit::platform::{PinMode, Pull, SignalPin, SpiHandle, Speed};
use ws2812_kit::{BusState, Error, Result, Rgb, Ws2812Spi};

const LEDS: usize = 20;
const RESET: usize = 60;
const LEN: usize = frame_len(LEDS, RESET);

#[derive(Debug, Clone, PartialEq)]
enum Event {
    Acquire,
    Release,
    Transmit { bytes: Vec<u8>, timeout: Duration },
    Configure(PinMode, Pull, Speed),
    Level(bool),
}

type Log = Rc<RefCell<Vec<Event>>>;

struct MockSpi {
    log: Log,
    acquire_result: Result<()>,
    release_result: Result<()>,
    transmit_result: Result<()>,
}

impl MockSpi {
    fn new(log: &Log) -> Self {
        Self {
            log: Rc::clone(log),
            acquire_result: Ok(()),
            release_result: Ok(()),
            transmit_result: Ok(()),
        }
    }
}

impl SpiHandle for MockSpi {
    fn acquire(&mut self) -> Result<()> {
        self.log.borrow_mut().push(Event::Acquire);
        self.acquire_result
    }

    fn release(&mut self) -> Result<()> {
        self.log.borrow_mut().push(Event::Release);
        self.release_result
    }

    fn transmit(&mut self, bytes: &[u8], timeout: Duration) -> Result<()> {
        self.log.borrow_mut().push(Event::Transmit {
            bytes: bytes.to_vec(),
            timeout,
        });
        self.transmit_result
    }
}

struct MockPin {
    log: Log,
    configure_result: Result<()>,
}

impl MockPin {
    fn new(log: &Log) -> Self {
        Self {
            log: Rc::clone(log),
            configure_result: Ok(()),
        }
    }
}

impl ErrorType for MockPin {
    type Error = Infallible;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> core::result::Result<(), Self::Error> {
        self.log.borrow_mut().push(Event::Level(false));
        Ok(())
    }

    fn set_high(&mut self) -> core::result::Result<(), Self::Error> {
        self.log.borrow_mut().push(Event::Level(true));
        Ok(())
    }
}

impl SignalPin for MockPin {
    fn configure(&mut self, mode: PinMode, pull: Pull, speed: Speed) -> Result<()> {
        self.log
            .borrow_mut()
            .push(Event::Configure(mode, pull, speed));
        self.configure_result
    }
}

type Strip = Ws2812Spi<MockSpi, MockPin, LEDS, RESET, LEN>;

fn new_strip() -> (Strip, Log) {
    let log = Log::default();
    let strip = Strip::new(MockSpi::new(&log), MockPin::new(&log));
    (strip, log)
}

fn take(log: &Log) -> Vec<Event> {
    log.borrow_mut().drain(..).collect()
}

const NOT_READY: Error = Error::PreconditionViolated {
    expected: BusState::Ready,
    actual: BusState::Uninitialized,
};

#[test]
fn new_driver_is_uninitialized_with_zero_frame() {
    let (strip, log) = new_strip();
    assert_eq!(strip.state(), BusState::Uninitialized);
    assert!(!strip.is_ready());
    assert_eq!(strip.timeout(), TRANSFER_TIMEOUT);
    assert_eq!(strip.frame().len(), 540);
    assert!(strip.frame().as_bytes().iter().all(|&byte| byte == 0));
    assert!(log.borrow().is_empty());
}

#[test]
fn init_acquires_bus_configures_pin_and_drives_low() {
    let (mut strip, log) = new_strip();
    strip.init().expect("init succeeds");

    assert_eq!(strip.state(), BusState::Ready);
    assert_eq!(
        take(&log),
        [
            Event::Acquire,
            Event::Configure(PinMode::OutputPushPull, Pull::Up, Speed::VeryHigh),
            Event::Level(false),
        ]
    );
}

#[test]
fn deinit_releases_bus_drives_low_and_leaves_pin_inert() {
    let (mut strip, log) = new_strip();
    strip.init().expect("init succeeds");
    take(&log);

    strip.deinit().expect("deinit succeeds");

    assert_eq!(strip.state(), BusState::Uninitialized);
    assert_eq!(
        take(&log),
        [
            Event::Release,
            Event::Level(false),
            Event::Configure(PinMode::Analog, Pull::None, Speed::Low),
        ]
    );
}

#[test]
fn send_transmits_full_frame_once_with_timeout() {
    let (mut strip, log) = new_strip();
    strip.init().expect("init succeeds");
    strip.set_pixel(0, 0xFF, 0x00, 0x00).expect("in range");
    take(&log);

    strip.send().expect("send succeeds");

    let events = take(&log);
    assert_eq!(events.len(), 1);
    let Event::Transmit { bytes, timeout } = &events[0] else {
        panic!("expected a transmit, got {events:?}");
    };
    assert_eq!(*timeout, TRANSFER_TIMEOUT);
    assert_eq!(bytes.len(), 540);
    assert_eq!(bytes[0..8], [WIRE_ZERO; 8]);
    assert_eq!(bytes[8..16], [WIRE_ONE; 8]);
    assert_eq!(bytes[16..24], [WIRE_ZERO; 8]);
    assert!(bytes[480..].iter().all(|&byte| byte == 0));
    assert_eq!(bytes.as_slice(), strip.frame().as_bytes());
}

#[test]
fn send_uses_explicit_timeout() {
    let log = Log::default();
    let mut strip = Strip::with_timeout(
        MockSpi::new(&log),
        MockPin::new(&log),
        Duration::from_millis(25),
    );
    strip.init().expect("init succeeds");
    take(&log);

    strip.send().expect("send succeeds");
    assert!(matches!(
        take(&log).as_slice(),
        [Event::Transmit { timeout, .. }] if *timeout == Duration::from_millis(25)
    ));
}

#[test]
fn send_reports_transfer_failure_verbatim_without_retry() {
    for failure in [Error::TransferTimeout, Error::TransferFailed] {
        let log = Log::default();
        let mut spi = MockSpi::new(&log);
        spi.transmit_result = Err(failure);
        let mut strip = Strip::new(spi, MockPin::new(&log));
        strip.init().expect("init succeeds");
        take(&log);

        assert_eq!(strip.send(), Err(failure));
        let transmits = take(&log)
            .into_iter()
            .filter(|event| matches!(event, Event::Transmit { .. }))
            .count();
        assert_eq!(transmits, 1);
        assert!(strip.is_ready());
    }
}

#[test]
fn send_before_init_is_rejected() {
    let (mut strip, log) = new_strip();
    assert_eq!(strip.send(), Err(NOT_READY));
    assert!(log.borrow().is_empty());
}

#[test]
fn send_after_deinit_is_rejected() {
    let (mut strip, log) = new_strip();
    strip.init().expect("init succeeds");
    strip.deinit().expect("deinit succeeds");
    take(&log);

    assert_eq!(strip.send(), Err(NOT_READY));
    assert!(log.borrow().is_empty());
}

#[test]
fn double_init_is_rejected() {
    let (mut strip, log) = new_strip();
    strip.init().expect("init succeeds");
    take(&log);

    assert_eq!(
        strip.init(),
        Err(Error::PreconditionViolated {
            expected: BusState::Uninitialized,
            actual: BusState::Ready,
        })
    );
    assert!(log.borrow().is_empty());
    assert!(strip.is_ready());
}

#[test]
fn deinit_without_init_is_rejected() {
    let (mut strip, log) = new_strip();
    assert_eq!(strip.deinit(), Err(NOT_READY));
    assert!(log.borrow().is_empty());
}

#[test]
fn init_after_deinit_is_allowed() {
    let (mut strip, _log) = new_strip();
    strip.init().expect("init succeeds");
    strip.deinit().expect("deinit succeeds");
    strip.init().expect("init succeeds again");
    assert!(strip.is_ready());
}

#[test]
fn init_fails_when_bus_is_unavailable() {
    let log = Log::default();
    let mut spi = MockSpi::new(&log);
    spi.acquire_result = Err(Error::BusUnavailable);
    let mut strip = Strip::new(spi, MockPin::new(&log));

    assert_eq!(strip.init(), Err(Error::BusUnavailable));
    assert_eq!(strip.state(), BusState::Uninitialized);
    assert_eq!(take(&log), [Event::Acquire]);
}

#[test]
fn init_releases_bus_when_pin_setup_fails() {
    let log = Log::default();
    let mut pin = MockPin::new(&log);
    pin.configure_result = Err(Error::CannotSetOutputState);
    let mut strip = Strip::new(MockSpi::new(&log), pin);

    assert_eq!(strip.init(), Err(Error::CannotSetOutputState));
    assert_eq!(strip.state(), BusState::Uninitialized);
    assert_eq!(
        take(&log),
        [
            Event::Acquire,
            Event::Configure(PinMode::OutputPushPull, Pull::Up, Speed::VeryHigh),
            Event::Release,
        ]
    );
}

#[test]
fn deinit_quiesces_pin_even_when_release_fails() {
    let log = Log::default();
    let mut spi = MockSpi::new(&log);
    spi.release_result = Err(Error::TransferFailed);
    let mut strip = Strip::new(spi, MockPin::new(&log));
    strip.init().expect("init succeeds");
    take(&log);

    assert_eq!(strip.deinit(), Err(Error::TransferFailed));
    assert_eq!(strip.state(), BusState::Uninitialized);
    assert_eq!(
        take(&log),
        [
            Event::Release,
            Event::Level(false),
            Event::Configure(PinMode::Analog, Pull::None, Speed::Low),
        ]
    );
}

#[test]
fn pixels_can_be_set_before_init_and_are_sent_after() {
    let (mut strip, log) = new_strip();
    strip.set_all(0, 0, 0xFF);
    strip.set_pixel(1, 0xFF, 0xFF, 0xFF).expect("in range");
    let expected = strip.frame().as_bytes().to_vec();
    assert!(log.borrow().is_empty());

    strip.init().expect("init succeeds");
    take(&log);
    strip.send().expect("send succeeds");

    assert_eq!(
        take(&log),
        [Event::Transmit {
            bytes: expected,
            timeout: TRANSFER_TIMEOUT,
        }]
    );
}

#[test]
fn set_pixel_out_of_range_is_reported() {
    let (mut strip, _log) = new_strip();
    assert_eq!(
        strip.set_pixel(LEDS, 1, 1, 1),
        Err(Error::IndexOutOfRange { index: LEDS, len: LEDS })
    );
    assert!(strip.frame().as_bytes().iter().all(|&byte| byte == 0));
}

#[test]
fn write_colors_and_clear_go_through_the_frame() {
    let (mut strip, _log) = new_strip();
    strip
        .write_colors([Rgb::new(1, 2, 3), Rgb::new(4, 5, 6)])
        .expect("two colors fit");
    let mut expected = ws2812_kit::FrameBuffer::<LEDS, RESET, LEN>::new();
    expected.set_pixel(0, 1, 2, 3).expect("in range");
    expected.set_pixel(1, 4, 5, 6).expect("in range");
    assert_eq!(strip.frame(), &expected);

    strip.clear();
    assert!(strip.frame().led_bytes().iter().all(|&byte| byte == WIRE_ZERO));
}

#[test]
fn frame_mut_writes_are_sent() {
    let (mut strip, log) = new_strip();
    strip.frame_mut().set_all(0x10, 0x20, 0x30);
    strip.init().expect("init succeeds");
    take(&log);
    strip.send().expect("send succeeds");

    let mut expected = ws2812_kit::FrameBuffer::<LEDS, RESET, LEN>::new();
    expected.set_all(0x10, 0x20, 0x30);
    assert_eq!(
        take(&log),
        [Event::Transmit {
            bytes: expected.as_bytes().to_vec(),
            timeout: TRANSFER_TIMEOUT,
        }]
    );
}

#[test]
fn dropping_a_ready_driver_deinitializes_it() {
    let (mut strip, log) = new_strip();
    strip.init().expect("init succeeds");
    take(&log);

    drop(strip);

    assert_eq!(
        take(&log),
        [
            Event::Release,
            Event::Level(false),
            Event::Configure(PinMode::Analog, Pull::None, Speed::Low),
        ]
    );
}

#[test]
fn dropping_an_uninitialized_driver_touches_nothing() {
    let (strip, log) = new_strip();
    drop(strip);
    assert!(log.borrow().is_empty());
}
