//! Open a servo door while an IR sensor sees someone, with a STM32F411RET6

//! Wiring diagram
//!
//!  IR sensor OUT <-> PA1 (pulled up)
//!    servo PWM   <-> PB4 (TIM3 CH1, 50 Hz)
//!     lock LED   <-> PA8
//!     open LED   <-> PA9
//!       go LED   <-> PA10
//!    close LED   <-> PA11
//!   onboard LED  <-> PA5 (lit while running)

#![no_std]
#![no_main]

use panic_rtt_target as _;
use rtt_target::{rprintln, rtt_init_print};
use stm32f4xx_hal::{pac, prelude::*, timer::Channel1};

use hd44780_demos::door::{DoorController, DoorEvent, Indicators};

#[cortex_m_rt::entry]
fn main() -> ! {
    rtt_init_print!();

    let dp = pac::Peripherals::take().expect("Cannot take device peripherals");
    let cp = pac::CorePeripherals::take().expect("Cannot take core peripherals");

    let rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.use_hse(8.MHz()).freeze();

    let mut delayer = cp.SYST.delay(&clocks);

    let gpioa = dp.GPIOA.split();
    let gpiob = dp.GPIOB.split();

    let mut running_led = gpioa.pa5.into_push_pull_output();
    running_led.set_high();

    let sensor = gpioa.pa1.into_pull_up_input();

    let indicators = Indicators {
        lock: gpioa.pa8.into_push_pull_output().erase(),
        open: gpioa.pa9.into_push_pull_output().erase(),
        go: gpioa.pa10.into_push_pull_output().erase(),
        close: gpioa.pa11.into_push_pull_output().erase(),
    };

    let mut servo = dp
        .TIM3
        .pwm_hz(Channel1::new(gpiob.pb4), 50.Hz(), &clocks)
        .split();
    servo.enable();

    let mut door = DoorController::new(sensor, indicators, servo);

    rprintln!("program start");

    loop {
        if door.step(&mut delayer) == DoorEvent::Cycled {
            rprintln!("door cycled");
        }
    }
}
