use embedded_hal::{
    delay::DelayNs,
    digital::{OutputPin, PinState},
};

use crate::{
    command::{Bits, Command, DataWidth, RegisterSelection, State},
    error::Error,
    utils::BitOps,
};

use super::SendCommand;

// enable pulse must be wider than 450 ns
const ENABLE_SETUP_US: u32 = 1;
const ENABLE_PULSE_US: u32 = 1;
// most instructions need 37 us to execute
const ENABLE_SETTLE_US: u32 = 100;
// clear display and return home need up to 4.1 ms
const LONG_COMMAND_MS: u32 = 5;

/// Wiring description of a parallel connected HD44780
///
/// Supply DB4 to DB7 for 4 pin mode, or all of DB0 to DB7 for 8 pin mode.
/// Read/write and backlight lines are optional: RW is held low, backlight is
/// only driven by [`SendCommand::set_backlight`].
pub struct ParallelPins<ControlPin, DBPin> {
    /// Register select
    pub rs: ControlPin,
    /// Enable (strobe)
    pub enable: ControlPin,
    /// Read/write, the bus never reads, so it stays low
    pub rw: Option<ControlPin>,
    /// Backlight switch
    pub backlight: Option<ControlPin>,
    #[allow(missing_docs)]
    pub d0: Option<DBPin>,
    #[allow(missing_docs)]
    pub d1: Option<DBPin>,
    #[allow(missing_docs)]
    pub d2: Option<DBPin>,
    #[allow(missing_docs)]
    pub d3: Option<DBPin>,
    #[allow(missing_docs)]
    pub d4: Option<DBPin>,
    #[allow(missing_docs)]
    pub d5: Option<DBPin>,
    #[allow(missing_docs)]
    pub d6: Option<DBPin>,
    #[allow(missing_docs)]
    pub d7: Option<DBPin>,
}

impl<ControlPin, DBPin> ParallelPins<ControlPin, DBPin> {
    /// Start a wiring description with only the mandatory control lines
    pub fn new(rs: ControlPin, enable: ControlPin) -> Self {
        Self {
            rs,
            enable,
            rw: None,
            backlight: None,
            d0: None,
            d1: None,
            d2: None,
            d3: None,
            d4: None,
            d5: None,
            d6: None,
            d7: None,
        }
    }
}

enum DataBus<DBPin> {
    // DB4 to DB7
    Bit4([DBPin; 4]),
    // DB0 to DB7
    Bit8([DBPin; 8]),
}

/// Drive HD44780 over GPIO in 4 pin or 8 pin mode
pub struct ParallelSender<ControlPin, DBPin>
where
    ControlPin: OutputPin,
    DBPin: OutputPin,
{
    rs_pin: ControlPin,
    en_pin: ControlPin,
    rw_pin: Option<ControlPin>,
    backlight_pin: Option<ControlPin>,
    db_pins: DataBus<DBPin>,
}

impl<ControlPin, DBPin> ParallelSender<ControlPin, DBPin>
where
    ControlPin: OutputPin,
    DBPin: OutputPin,
{
    /// 4 pin mode sender
    pub fn new_4pin(
        rs: ControlPin,
        en: ControlPin,
        db4: DBPin,
        db5: DBPin,
        db6: DBPin,
        db7: DBPin,
    ) -> Self {
        Self::with_bus(rs, en, DataBus::Bit4([db4, db5, db6, db7]))
    }

    /// 8 pin mode sender
    #[allow(clippy::too_many_arguments)]
    pub fn new_8pin(
        rs: ControlPin,
        en: ControlPin,
        db0: DBPin,
        db1: DBPin,
        db2: DBPin,
        db3: DBPin,
        db4: DBPin,
        db5: DBPin,
        db6: DBPin,
        db7: DBPin,
    ) -> Self {
        Self::with_bus(
            rs,
            en,
            DataBus::Bit8([db0, db1, db2, db3, db4, db5, db6, db7]),
        )
    }

    /// Build a sender from a [`ParallelPins`] wiring description
    ///
    /// DB4 to DB7 are mandatory. If any of DB0 to DB3 is given, all of them must be,
    /// and the sender works in 8 pin mode.
    pub fn from_pins(pins: ParallelPins<ControlPin, DBPin>) -> Result<Self, Error> {
        let ParallelPins {
            rs,
            enable,
            rw,
            backlight,
            d0,
            d1,
            d2,
            d3,
            d4,
            d5,
            d6,
            d7,
        } = pins;

        let [db4, db5, db6, db7] = require_nibble([d4, d5, d6, d7], 4)?;

        let low_pins = [d0, d1, d2, d3];
        let db_pins = if low_pins.iter().all(Option::is_none) {
            DataBus::Bit4([db4, db5, db6, db7])
        } else {
            let [db0, db1, db2, db3] = require_nibble(low_pins, 0)?;
            DataBus::Bit8([db0, db1, db2, db3, db4, db5, db6, db7])
        };

        let mut sender = Self::with_bus(rs, enable, db_pins);
        if let Some(rw) = rw {
            sender = sender.with_rw(rw);
        }
        if let Some(backlight) = backlight {
            sender = sender.with_backlight(backlight);
        }

        Ok(sender)
    }

    /// Attach a read/write line, it will be held low
    pub fn with_rw(mut self, mut rw: ControlPin) -> Self {
        drive(&mut rw, PinState::Low);
        self.rw_pin = Some(rw);
        self
    }

    /// Attach a backlight switch line, it starts low
    pub fn with_backlight(mut self, mut backlight: ControlPin) -> Self {
        drive(&mut backlight, PinState::Low);
        self.backlight_pin = Some(backlight);
        self
    }

    /// The width of the wired data bus
    pub fn data_width(&self) -> DataWidth {
        match self.db_pins {
            DataBus::Bit4(_) => DataWidth::Bit4,
            DataBus::Bit8(_) => DataWidth::Bit8,
        }
    }

    /// Strobe the enable line, HD44780 latches the bus on the falling edge
    pub fn pulse_enable<Delayer: DelayNs>(&mut self, delayer: &mut Delayer) {
        drive(&mut self.en_pin, PinState::Low);
        delayer.delay_us(ENABLE_SETUP_US);
        drive(&mut self.en_pin, PinState::High);
        delayer.delay_us(ENABLE_PULSE_US);
        drive(&mut self.en_pin, PinState::Low);
        delayer.delay_us(ENABLE_SETTLE_US);
    }

    /// Put lower 4 bits of `nibble` on DB7 to DB4, then latch them
    pub fn write_nibble<Delayer: DelayNs>(&mut self, nibble: u8, delayer: &mut Delayer) {
        push_bits(self.high_lines(), nibble & 0b1111);
        self.pulse_enable(delayer);
    }

    /// Latch a full byte, high nibble first in 4 pin mode
    pub fn write_byte<Delayer: DelayNs>(&mut self, byte: u8, delayer: &mut Delayer) {
        match self.data_width() {
            DataWidth::Bit4 => {
                self.write_nibble(byte >> 4, delayer);
                self.write_nibble(byte, delayer);
            }
            DataWidth::Bit8 => {
                if let DataBus::Bit8(pins) = &mut self.db_pins {
                    push_bits(pins, byte);
                }
                self.pulse_enable(delayer);
            }
        }
    }

    fn with_bus(mut rs: ControlPin, mut en: ControlPin, mut db_pins: DataBus<DBPin>) -> Self {
        drive(&mut rs, PinState::Low);
        drive(&mut en, PinState::Low);
        match &mut db_pins {
            DataBus::Bit4(pins) => push_bits(pins, 0),
            DataBus::Bit8(pins) => push_bits(pins, 0),
        }

        Self {
            rs_pin: rs,
            en_pin: en,
            rw_pin: None,
            backlight_pin: None,
            db_pins,
        }
    }

    // DB4 to DB7, whatever the bus width
    fn high_lines(&mut self) -> &mut [DBPin] {
        match &mut self.db_pins {
            DataBus::Bit4(pins) => &mut pins[..],
            DataBus::Bit8(pins) => &mut pins[4..],
        }
    }
}

impl<ControlPin, DBPin, Delayer> SendCommand<Delayer> for ParallelSender<ControlPin, DBPin>
where
    ControlPin: OutputPin,
    DBPin: OutputPin,
    Delayer: DelayNs,
{
    fn send(&mut self, command: Command, delayer: &mut Delayer) {
        let rs = command.get_register_selection();

        match rs {
            RegisterSelection::Command => drive(&mut self.rs_pin, PinState::Low),
            RegisterSelection::Data => drive(&mut self.rs_pin, PinState::High),
        }

        if let Some(rw_pin) = self.rw_pin.as_mut() {
            drive(rw_pin, PinState::Low);
        }

        match command.get_data() {
            Bits::Bit4(nibble) => self.write_nibble(nibble, delayer),
            Bits::Bit8(raw_bits) => {
                self.write_byte(raw_bits, delayer);

                // clear display and return home
                if rs == RegisterSelection::Command && raw_bits <= 3 {
                    delayer.delay_ms(LONG_COMMAND_MS);
                }
            }
        }
    }

    fn data_width(&self) -> DataWidth {
        ParallelSender::data_width(self)
    }

    fn set_backlight(&mut self, backlight: State) {
        if let Some(pin) = self.backlight_pin.as_mut() {
            match backlight {
                State::On => drive(pin, PinState::High),
                State::Off => drive(pin, PinState::Low),
            }
        }
    }
}

// the bus is write-only, pin errors are dropped
fn drive<P: OutputPin>(pin: &mut P, state: PinState) {
    let _ = pin.set_state(state);
}

fn push_bits<P: OutputPin>(pins: &mut [P], raw_bits: u8) {
    pins.iter_mut()
        .enumerate()
        .for_each(|(index, pin)| drive(pin, raw_bits.check_bit(index as u8).into()));
}

fn require_nibble<P>(pins: [Option<P>; 4], first_line: u8) -> Result<[P; 4], Error> {
    match pins {
        [Some(a), Some(b), Some(c), Some(d)] => Ok([a, b, c, d]),
        pins => {
            let missing = pins.iter().position(Option::is_none).unwrap_or_default() as u8;
            Err(Error::MissingDataLine {
                line: first_line + missing,
            })
        }
    }
}
