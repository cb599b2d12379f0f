//! Show DHT11 temperature & humidity on a LCD1602, with a STM32F411RET6
//!
//! Build with `--release`, DHT11 timing does not hold in debug build.

//! Wiring diagram
//!
//! LCD1602 <-> STM32F411RET6
//!      RS <-> PA0
//!      EN <-> PA2
//!      D4 <-> PA3
//!      D5 <-> PA4
//!      D6 <-> PA5
//!      D7 <-> PA6
//!      RW <-> GND
//!
//!   DHT11 <-> STM32F411RET6
//!    DATA <-> PB0 (with a 10 kOhm pull up to 3V3)

#![no_std]
#![no_main]

use dht_sensor::{dht11, DhtReading};
use panic_rtt_target as _;
use rtt_target::{rprintln, rtt_init_print};
use stm32f4xx_hal::{pac, prelude::*};

use hd44780_demos::weather::{self, Reading, REFRESH_INTERVAL_MS};
use hd44780_gpio::{
    lcd::{Config, Lcd},
    sender::ParallelSender,
};

#[cortex_m_rt::entry]
fn main() -> ! {
    rtt_init_print!();

    let dp = pac::Peripherals::take().expect("Cannot take device peripherals");
    let cp = pac::CorePeripherals::take().expect("Cannot take core peripherals");

    let rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.use_hse(8.MHz()).freeze();

    // the LCD keeps its delayer borrowed, DHT11 gets a timer of its own
    let mut lcd_delayer = cp.SYST.delay(&clocks);
    let mut dht_delayer = dp.TIM5.delay_us(&clocks);

    let gpioa = dp.GPIOA.split();
    let gpiob = dp.GPIOB.split();

    let mut sender = ParallelSender::new_4pin(
        gpioa.pa0.into_push_pull_output().erase(),
        gpioa.pa2.into_push_pull_output().erase(),
        gpioa.pa3.into_push_pull_output().erase(),
        gpioa.pa4.into_push_pull_output().erase(),
        gpioa.pa5.into_push_pull_output().erase(),
        gpioa.pa6.into_push_pull_output().erase(),
    );

    // DHT11 data line is open drain, it is released high before the first read
    let mut dht_pin = gpiob.pb0.into_open_drain_output();
    dht_pin.set_high();

    let mut lcd = Lcd::new(&mut sender, &mut lcd_delayer, Config::default())
        .unwrap_or_else(|err| panic!("LCD init failed: {}", err));

    rprintln!("weather monitor start");

    loop {
        lcd.delay_ms(REFRESH_INTERVAL_MS);

        match dht11::Reading::read(&mut dht_delayer, &mut dht_pin) {
            Ok(dht11::Reading {
                temperature,
                relative_humidity,
            }) => {
                let reading = Reading {
                    temperature: f32::from(temperature),
                    humidity: f32::from(relative_humidity),
                };
                rprintln!(
                    "{}C {}F {}%",
                    reading.temperature,
                    reading.fahrenheit(),
                    reading.humidity
                );
                weather::render(&mut lcd, &reading).ok();
            }
            Err(err) => rprintln!("DHT11 read failed: {:?}", err),
        }
    }
}
