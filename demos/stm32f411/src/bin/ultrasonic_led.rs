//! Toggle a LED each time something comes within 50 cm of a HC-SR04, with a STM32F411RET6

//! Wiring diagram
//!
//!  HC-SR04 <-> STM32F411RET6
//!      Vcc <-> 5V
//!     TRIG <-> PA0
//!     ECHO <-> PA1 (through a 5V to 3V3 divider)
//!      GND <-> GND
//!
//!      LED <-> PA5

#![no_std]
#![no_main]

use panic_rtt_target as _;
use rtt_target::{rprintln, rtt_init_print};
use stm32f4xx_hal::{pac, prelude::*};

use hd44780_demos::proximity::ProximityToggle;

const MEASURE_INTERVAL_MS: u32 = 2_000;

#[cortex_m_rt::entry]
fn main() -> ! {
    rtt_init_print!();

    let dp = pac::Peripherals::take().expect("Cannot take device peripherals");
    let cp = pac::CorePeripherals::take().expect("Cannot take core peripherals");

    let rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.use_hse(8.MHz()).freeze();

    let mut delayer = cp.SYST.delay(&clocks);

    // TIM2 is 32 bit, left free running as the echo stopwatch
    let mut stopwatch = dp.TIM2.counter_us(&clocks);
    stopwatch
        .start(u32::MAX.micros())
        .unwrap_or_else(|err| panic!("cannot start TIM2: {:?}", err));

    let gpioa = dp.GPIOA.split();

    let mut toggle = ProximityToggle::new(
        gpioa.pa0.into_push_pull_output(),
        gpioa.pa1.into_floating_input(),
        gpioa.pa5.into_push_pull_output(),
        move || stopwatch.now().ticks(),
    );

    loop {
        match toggle.step(&mut delayer) {
            Some(distance) => rprintln!("{:.2} cm, LED {}", distance, toggle.is_lit()),
            None => rprintln!("echo timeout"),
        }

        delayer.delay_ms(MEASURE_INTERVAL_MS);
    }
}
