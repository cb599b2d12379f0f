//! Servo door opened by an IR presence sensor
//!
//! Four indicator lines tell what the door is doing: `lock` while idle, `open` while
//! swinging open, `go` while held open, `close` while swinging back.

use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
    pwm::SetDutyCycle,
};

/// Servo duty, out of [`DUTY_FULL_SCALE`], with door closed
pub const CLOSED_DUTY: u16 = 5500;
/// Servo duty, out of [`DUTY_FULL_SCALE`], with door open
pub const OPEN_DUTY: u16 = 9000;
#[allow(missing_docs)]
pub const DUTY_FULL_SCALE: u16 = u16::MAX;
const DUTY_STEP: u16 = 50;
const STEP_DELAY_MS: u32 = 30;
/// How long the door stays open
pub const HOLD_OPEN_MS: u32 = 5_000;

/// What one [`DoorController::step`] did
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DoorEvent {
    /// Nobody there, door stays locked
    Locked,
    /// Door went through a full open-hold-close cycle
    Cycled,
}

/// Indicator lines of a [`DoorController`]
pub struct Indicators<Signal> {
    #[allow(missing_docs)]
    pub lock: Signal,
    #[allow(missing_docs)]
    pub open: Signal,
    #[allow(missing_docs)]
    pub go: Signal,
    #[allow(missing_docs)]
    pub close: Signal,
}

/// Drive a servo door from an IR sensor
pub struct DoorController<Sensor, Signal, Servo> {
    sensor: Sensor,
    indicators: Indicators<Signal>,
    servo: Servo,
}

impl<Sensor, Signal, Servo> DoorController<Sensor, Signal, Servo>
where
    Sensor: InputPin,
    Signal: OutputPin,
    Servo: SetDutyCycle,
{
    #[allow(missing_docs)]
    pub fn new(sensor: Sensor, indicators: Indicators<Signal>, servo: Servo) -> Self {
        Self {
            sensor,
            indicators,
            servo,
        }
    }

    /// Check the sensor once, and run a full door cycle if it reads high
    ///
    /// A sensor read error counts as nobody there.
    pub fn step<Delayer: DelayNs>(&mut self, delayer: &mut Delayer) -> DoorEvent {
        if !matches!(self.sensor.is_high(), Ok(true)) {
            self.indicators.lock.set_high().ok();
            return DoorEvent::Locked;
        }

        self.indicators.open.set_high().ok();
        self.indicators.lock.set_low().ok();
        for duty in (CLOSED_DUTY..OPEN_DUTY).step_by(DUTY_STEP.into()) {
            self.sweep_to(duty, delayer);
        }

        self.indicators.go.set_high().ok();
        self.indicators.open.set_low().ok();
        delayer.delay_ms(HOLD_OPEN_MS);

        self.indicators.close.set_high().ok();
        self.indicators.go.set_low().ok();
        for duty in (CLOSED_DUTY + DUTY_STEP..=OPEN_DUTY)
            .rev()
            .step_by(DUTY_STEP.into())
        {
            self.sweep_to(duty, delayer);
        }
        self.indicators.close.set_low().ok();

        DoorEvent::Cycled
    }

    fn sweep_to<Delayer: DelayNs>(&mut self, duty: u16, delayer: &mut Delayer) {
        self.servo
            .set_duty_cycle_fraction(duty, DUTY_FULL_SCALE)
            .ok();
        delayer.delay_ms(STEP_DELAY_MS);
    }
}
