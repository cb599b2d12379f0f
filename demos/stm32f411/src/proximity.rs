//! HC-SR04 ultrasonic ranger toggling a LED when something comes close

use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
};

const TRIGGER_PULSE_US: u32 = 5;
/// Give up waiting for an echo edge after this long, about 5 m away
pub const ECHO_TIMEOUT_US: u32 = 30_000;
/// Anything closer than this flips the toggle
pub const TOGGLE_DISTANCE_CM: f32 = 50.0;
// speed of sound, in cm per us
const SOUND_CM_PER_US: f32 = 0.0343;

/// Distance to the obstacle, the echo covers it twice
pub fn distance_cm(echo_us: u32) -> f32 {
    echo_us as f32 * SOUND_CM_PER_US / 2.0
}

/// A free running microsecond counter, wrapping at `u32::MAX`
pub trait MicrosClock {
    #[allow(missing_docs)]
    fn now_us(&mut self) -> u32;
}

impl<F: FnMut() -> u32> MicrosClock for F {
    fn now_us(&mut self) -> u32 {
        self()
    }
}

/// Flip a LED each time an obstacle is seen closer than [`TOGGLE_DISTANCE_CM`]
pub struct ProximityToggle<Trigger, Echo, Led, Clock> {
    trigger: Trigger,
    echo: Echo,
    led: Led,
    clock: Clock,
    lit: bool,
}

impl<Trigger, Echo, Led, Clock> ProximityToggle<Trigger, Echo, Led, Clock>
where
    Trigger: OutputPin,
    Echo: InputPin,
    Led: OutputPin,
    Clock: MicrosClock,
{
    #[allow(missing_docs)]
    pub fn new(mut trigger: Trigger, echo: Echo, mut led: Led, clock: Clock) -> Self {
        trigger.set_low().ok();
        led.set_low().ok();

        Self {
            trigger,
            echo,
            led,
            clock,
            lit: false,
        }
    }

    #[allow(missing_docs)]
    pub fn is_lit(&self) -> bool {
        self.lit
    }

    /// Take one measurement, and update the LED
    ///
    /// Returns the measured distance, or `None` if the echo timed out. A timed out
    /// measurement leaves the toggle as it is.
    pub fn step<Delayer: DelayNs>(&mut self, delayer: &mut Delayer) -> Option<f32> {
        let distance = self.measure_echo_us(delayer).map(distance_cm);

        if matches!(distance, Some(cm) if cm < TOGGLE_DISTANCE_CM) {
            self.lit = !self.lit;
        }

        if self.lit {
            self.led.set_high().ok();
        } else {
            self.led.set_low().ok();
        }

        distance
    }

    // echo width in microseconds, timestamps taken from the clock around each edge
    fn measure_echo_us<Delayer: DelayNs>(&mut self, delayer: &mut Delayer) -> Option<u32> {
        self.trigger.set_high().ok();
        delayer.delay_us(TRIGGER_PULSE_US);
        self.trigger.set_low().ok();

        let triggered_at = self.clock.now_us();
        while !self.echo_high() {
            if self.elapsed_since(triggered_at) > ECHO_TIMEOUT_US {
                return None;
            }
        }

        let rose_at = self.clock.now_us();
        while self.echo_high() {
            if self.elapsed_since(rose_at) > ECHO_TIMEOUT_US {
                return None;
            }
        }

        Some(self.elapsed_since(rose_at))
    }

    fn elapsed_since(&mut self, start_us: u32) -> u32 {
        self.clock.now_us().wrapping_sub(start_us)
    }

    fn echo_high(&mut self) -> bool {
        matches!(self.echo.is_high(), Ok(true))
    }
}
