use embedded_hal::delay::DelayNs;

use crate::{
    command::{CommandSet, Font, LineMode, MoveDirection, ShiftType},
    error::Error,
    lcd::Lcd,
    sender::SendCommand,
    state::LcdState,
};

const POWER_ON_DELAY_US: u32 = 20_000;
// waits after each function reset nibble
const RESET_DELAYS_US: [u32; 3] = [5_000, 1_000, 1_000];
const FUNCTION_SELECT_DELAY_US: u32 = 1_000;

/// [`Config`] is the init config of a [`Lcd`]
///
/// Defaults to a 16x2 module with 5x8 dots font
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    lines: u8,
    columns: u8,
    font: Font,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lines: 2,
            columns: 16,
            font: Font::Font5x8,
        }
    }
}

#[allow(missing_docs)]
impl Config {
    pub fn get_lines(&self) -> u8 {
        self.lines
    }

    /// Number of rows, 1 to 4
    pub fn set_lines(mut self, lines: u8) -> Self {
        self.lines = lines;
        self
    }

    pub fn get_columns(&self) -> u8 {
        self.columns
    }

    /// Number of characters per row, 1 to 40
    pub fn set_columns(mut self, columns: u8) -> Self {
        self.columns = columns;
        self
    }

    pub fn get_font(&self) -> Font {
        self.font
    }

    pub fn set_font(mut self, font: Font) -> Self {
        self.font = font;
        self
    }
}

impl<'a, 'b, Sender, Delayer> Lcd<'a, 'b, Sender, Delayer>
where
    Sender: SendCommand<Delayer>,
    Delayer: DelayNs,
{
    /// Create a [`Lcd`] driver, and init LCD hardware
    ///
    /// Geometry out of 1..=4 rows or 1..=40 columns is clamped into range.
    /// Afterwards display is on, empty, with cursor hidden at top left corner.
    pub fn new(
        sender: &'a mut Sender,
        delayer: &'b mut Delayer,
        config: Config,
    ) -> Result<Self, Error> {
        let state = LcdState::new(config.get_lines(), config.get_columns());

        if config.get_font() == Font::Font5x10 && state.get_line_mode() == LineMode::TwoLine {
            return Err(Error::FontNeedsOneLine);
        }

        let data_width = sender.data_width();

        // "initializing by instruction", as datasheet figure 23/24, works whether or not
        // the internal reset circuit did its job on power up
        let mut reset_delay_us = POWER_ON_DELAY_US;
        for next_delay_us in RESET_DELAYS_US {
            sender.delay_and_send(CommandSet::FunctionReset.into(), delayer, reset_delay_us);
            reset_delay_us = next_delay_us;
        }

        sender.delay_and_send(
            CommandSet::FunctionSelect(data_width).into(),
            delayer,
            reset_delay_us,
        );

        sender.delay_and_send(
            CommandSet::FunctionSet(data_width, state.get_line_mode(), config.get_font()).into(),
            delayer,
            FUNCTION_SELECT_DELAY_US,
        );

        let mut lcd = Lcd {
            sender,
            delayer,
            state,
        };

        lcd.display_off();
        lcd.backlight_on();
        lcd.clear();
        lcd.send(CommandSet::EntryModeSet(
            MoveDirection::LeftToRight,
            ShiftType::CursorOnly,
        ));
        lcd.hide_cursor();
        lcd.display_on();

        Ok(lcd)
    }
}
