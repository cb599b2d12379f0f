//! One screen of the DHT11 weather monitor

use core::fmt::{self, Write};

use embedded_hal::delay::DelayNs;
use hd44780_gpio::{lcd::Lcd, sender::SendCommand};

/// How often the sensor is read, DHT11 needs at least 1 s between readings
pub const REFRESH_INTERVAL_MS: u32 = 2_000;

/// A temperature & humidity sample
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Reading {
    /// degree Celsius
    pub temperature: f32,
    /// relative humidity, in percent
    pub humidity: f32,
}

impl Reading {
    #[allow(missing_docs)]
    pub fn fahrenheit(&self) -> f32 {
        self.temperature * 9.0 / 5.0 + 32.0
    }
}

/// Draw a reading on a 16x2 display
///
/// ```text
/// Weather Monitor
/// 23C 73.4F H:41%
/// ```
pub fn render<Sender, Delayer>(
    lcd: &mut Lcd<'_, '_, Sender, Delayer>,
    reading: &Reading,
) -> fmt::Result
where
    Sender: SendCommand<Delayer>,
    Delayer: DelayNs,
{
    lcd.move_to(0, 0);
    lcd.putstr("Weather Monitor");

    lcd.move_to(0, 1);
    write!(lcd, "{:2.0}C", reading.temperature)?;

    lcd.move_to(4, 1);
    write!(lcd, "{:3.1}F", reading.fahrenheit())?;

    lcd.move_to(10, 1);
    write!(lcd, "H:{:2.0}%", reading.humidity)
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc, string::String, vec::Vec};

    use hd44780_gpio::{
        command::{Bits, Command, DataWidth, RegisterSelection},
        lcd::Config,
    };

    use super::*;

    /// A 16x2 character grid, fed by the bytes a sender would put on the bus
    struct Screen {
        cells: [[u8; 16]; 2],
        addr: u8,
    }

    impl Screen {
        fn row(&self, row: usize) -> String {
            self.cells[row].iter().map(|&byte| char::from(byte)).collect()
        }
    }

    struct ScreenSender(Rc<RefCell<Screen>>);

    struct NoDelay;

    impl DelayNs for NoDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    impl SendCommand<NoDelay> for ScreenSender {
        fn send(&mut self, command: Command, _delayer: &mut NoDelay) {
            let Bits::Bit8(byte) = command.get_data() else {
                return;
            };
            let mut screen = self.0.borrow_mut();

            match command.get_register_selection() {
                RegisterSelection::Command if byte & 0x80 != 0 => screen.addr = byte & 0x7F,
                RegisterSelection::Command => {}
                RegisterSelection::Data => {
                    let (row, column) = (usize::from(screen.addr >= 0x40), screen.addr & 0x3F);
                    if let Some(cell) = screen.cells[row].get_mut(usize::from(column)) {
                        *cell = byte;
                    }
                    screen.addr += 1;
                }
            }
        }

        fn data_width(&self) -> DataWidth {
            DataWidth::Bit4
        }
    }

    fn screen() -> Rc<RefCell<Screen>> {
        Rc::new(RefCell::new(Screen {
            cells: [[b' '; 16]; 2],
            addr: 0,
        }))
    }

    #[test]
    fn fahrenheit_conversion() {
        let reading = Reading {
            temperature: 23.0,
            humidity: 41.0,
        };
        assert!((reading.fahrenheit() - 73.4).abs() < 1e-3);
    }

    #[test]
    fn reading_is_laid_out_in_two_rows() {
        let screen = screen();
        let mut sender = ScreenSender(screen.clone());
        let mut delay = NoDelay;
        let mut lcd = Lcd::new(&mut sender, &mut delay, Config::default()).unwrap();

        render(
            &mut lcd,
            &Reading {
                temperature: 23.0,
                humidity: 41.0,
            },
        )
        .unwrap();

        assert_eq!(screen.borrow().row(0), "Weather Monitor ");
        assert_eq!(screen.borrow().row(1), "23C 73.4F H:41% ");
    }

    #[test]
    fn redraw_overwrites_in_place() {
        let screen = screen();
        let mut sender = ScreenSender(screen.clone());
        let mut delay = NoDelay;
        let mut lcd = Lcd::new(&mut sender, &mut delay, Config::default()).unwrap();

        let samples: Vec<Reading> = [(23.0, 41.0), (5.0, 9.0)]
            .into_iter()
            .map(|(temperature, humidity)| Reading {
                temperature,
                humidity,
            })
            .collect();
        samples
            .iter()
            .for_each(|reading| render(&mut lcd, reading).unwrap());

        // narrower numbers are padded, so nothing of the old reading is left
        assert_eq!(screen.borrow().row(1), " 5C 41.0F H: 9% ");
    }
}
