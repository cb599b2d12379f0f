/*!
# HD44780 GPIO Driver

Drive a HD44780 compatible character LCD (16x2, 20x4, 40x2 ...) through plain
GPIO lines, on top of `embedded-hal` 1.0.

Basic Usage:

1. Initialize a "sender" <br/>
    This crate include a 4-pin/8-pin parallel driver [`sender::ParallelSender`].

    You can use it, or you can use any driver implemented [`sender::SendCommand`].
<br/>
<br/>
2. Use [`lcd::Lcd::new()`] to create a [`lcd::Lcd`], and initialize the LCD hardware
<br/>
<br/>
3. use any methods provide by [`lcd::Lcd`] to control the LCD, [`lcd::Lcd`] also
   implements [`core::fmt::Write`], so `write!` works on it

```ignore
let mut sender = ParallelSender::new_4pin(rs, en, db4, db5, db6, db7);
let mut lcd = Lcd::new(&mut sender, &mut delay, Config::default())?;

lcd.putstr("Weather Monitor");
lcd.move_to(0, 1);
write!(lcd, "{:2.0}C", temperature).ok();
```
*/

#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]

pub mod command;
pub mod error;
pub mod lcd;
pub mod sender;
mod state;
pub mod utils;
