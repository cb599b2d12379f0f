//! Drive a LCD1602 with a STM32F411RET6 in 4 Pin Mode
//!
//! Greets, then goes through cursor, display and backlight modes, and finally shows
//! a custom glyph.

//! Wiring diagram
//!
//! LCD1602 <-> STM32F411RET6
//!     Vss <-> GND
//!     Vdd <-> 5V (It is best to use an external source for the 5V pin, such as the 5V output from a DAPLink device or USB.)
//!      V0 <-> potentiometer <-> 5V & GND (to adjust the display contrast)
//!      RS <-> PA0
//!      RW <-> PA1
//!      EN <-> PA2 (and optionally connect to a 4.7 kOhm Pulldown resistor, to stable voltage level when STM32 reset)
//!      D4 <-> PA3
//!      D5 <-> PA4
//!      D6 <-> PA5
//!      D7 <-> PA6
//!       A <-> PA7 (through a transistor if backlight draws more than a few mA)
//!       K <-> GND

#![no_std]
#![no_main]

use panic_rtt_target as _;
use rtt_target::{rprintln, rtt_init_print};
use stm32f4xx_hal::{pac, prelude::*};

use hd44780_gpio::{
    lcd::{Config, Lcd},
    sender::ParallelSender,
};

const HAPPY_FACE: [u8; 8] = [0x00, 0x0A, 0x00, 0x04, 0x00, 0x11, 0x0E, 0x00];

// a heart shape
const HEART: [u8; 8] = [
    0b00000, 0b00000, 0b01010, 0b11111, 0b01110, 0b00100, 0b00000, 0b00000,
];

#[cortex_m_rt::entry]
fn main() -> ! {
    rtt_init_print!();

    let dp = pac::Peripherals::take().expect("Cannot take device peripherals");
    let cp = pac::CorePeripherals::take().expect("Cannot take core peripherals");

    let rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.use_hse(8.MHz()).freeze();

    let mut delayer = cp.SYST.delay(&clocks);

    // init needed digital pins

    let gpioa = dp.GPIOA.split();

    // Push-pull mode for a fast interaction
    let rs_pin = gpioa.pa0.into_push_pull_output().erase();
    let rw_pin = gpioa.pa1.into_push_pull_output().erase();
    let en_pin = gpioa.pa2.into_push_pull_output().erase();
    let backlight_pin = gpioa.pa7.into_push_pull_output().erase();

    let db4_pin = gpioa
        .pa3
        .into_open_drain_output()
        .internal_pull_up(true)
        .erase();
    let db5_pin = gpioa
        .pa4
        .into_open_drain_output()
        .internal_pull_up(true)
        .erase();
    let db6_pin = gpioa
        .pa5
        .into_open_drain_output()
        .internal_pull_up(true)
        .erase();
    let db7_pin = gpioa
        .pa6
        .into_open_drain_output()
        .internal_pull_up(true)
        .erase();

    let mut sender = ParallelSender::new_4pin(rs_pin, en_pin, db4_pin, db5_pin, db6_pin, db7_pin)
        .with_rw(rw_pin)
        .with_backlight(backlight_pin);

    let mut lcd = Lcd::new(&mut sender, &mut delayer, Config::default())
        .unwrap_or_else(|err| panic!("LCD init failed: {}", err));

    rprintln!("LCD {}x{} ready", lcd.num_columns(), lcd.num_lines());

    // 15 characters, cursor stops at last column of first row
    lcd.putstr("circuitschools.");
    // first character fills that column, the rest wraps into second row
    lcd.putstr("LCD16x2display");
    rprintln!("cursor at {:?}", lcd.cursor_pos());

    lcd.delay_ms(2_000);

    lcd.show_cursor();
    lcd.delay_ms(1_000);
    lcd.blink_cursor_on();
    lcd.delay_ms(2_000);
    lcd.blink_cursor_off();
    lcd.delay_ms(1_000);
    lcd.hide_cursor();

    // blanking only hides the characters
    lcd.display_off();
    lcd.delay_ms(1_000);
    lcd.display_on();

    lcd.backlight_off();
    lcd.delay_ms(1_000);
    lcd.backlight_on();

    lcd.clear();
    lcd.custom_char(0, &HAPPY_FACE);
    lcd.custom_char(1, &HEART);

    lcd.putstr("Hello\n");
    lcd.putchar('\u{0}');
    lcd.move_to(15, 1);
    lcd.putchar('\u{1}');

    rprintln!("done");

    loop {}
}
