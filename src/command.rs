//! HD44780 instruction set, and the tagged byte a sender puts on the bus

use crate::utils::{BitOps, BitState};

/// High level HD44780 instructions
///
/// Each variant encodes to exactly one command byte, see [`CommandSet::raw_bits`]
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandSet {
    /// Clear DDRAM and set address counter to 0
    ClearDisplay,
    /// Set address counter to 0 and undo display shift
    ReturnHome,
    /// Cursor move direction and whether display shifts along
    EntryModeSet(MoveDirection, ShiftType),
    /// The composite display control command
    DisplayOnOff {
        #[allow(missing_docs)]
        display: State,
        #[allow(missing_docs)]
        cursor: State,
        #[allow(missing_docs)]
        cursor_blink: State,
    },
    // not a datasheet command: the upper half of "function set 8 bit",
    // sent three times as a bare nibble to put the controller in a known state
    /// The function reset nibble of "initializing by instruction"
    FunctionReset,
    /// Bus width select nibble, the last bare nibble before full commands
    FunctionSelect(DataWidth),
    /// Bus width, line mode and font
    FunctionSet(DataWidth, LineMode, Font),
    /// Point address counter at CGRAM, address should less than 0x40
    SetCGRAM(u8),
    /// Point address counter at DDRAM
    SetDDRAM(u8),
    /// Write a byte to the RAM currently addressed
    WriteDataToRAM(u8),
}

/// Cursor move direction after a RAM write
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MoveDirection {
    #[allow(missing_docs)]
    RightToLeft,
    #[allow(missing_docs)]
    #[default]
    LeftToRight,
}

/// Whether the display shifts along with the cursor on each RAM write
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ShiftType {
    #[allow(missing_docs)]
    #[default]
    CursorOnly,
    #[allow(missing_docs)]
    CursorAndDisplay,
}

/// On/Off state of a display mode flag
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    #[allow(missing_docs)]
    Off,
    #[allow(missing_docs)]
    #[default]
    On,
}

impl From<State> for BitState {
    fn from(state: State) -> Self {
        match state {
            State::Off => BitState::Clear,
            State::On => BitState::Set,
        }
    }
}

/// Width of the parallel data bus
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataWidth {
    /// Only DB4 to DB7 are wired
    #[default]
    Bit4,
    /// DB0 to DB7 are wired
    Bit8,
}

#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineMode {
    OneLine,
    #[default]
    TwoLine,
}

/// Character font
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Font {
    /// 5x8 dots
    #[default]
    Font5x8,
    /// 5x10 dots, only valid in one line mode
    Font5x10,
}

/// Which register of HD44780 a byte goes to
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegisterSelection {
    /// Instruction register, RS low
    Command,
    /// Data register, RS high
    Data,
}

/// Payload of a [`Command`]
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Bits {
    /// a bare nibble in the lower 4 bits, only used while initializing
    Bit4(u8),
    /// a full byte, sent as 2 nibbles or 1 byte depending on bus width
    Bit8(u8),
}

/// One transfer on the bus: a payload tagged with its register
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Command {
    rs: RegisterSelection,
    data: Bits,
}

impl Command {
    /// Create a new command from its raw parts
    pub fn new(rs: RegisterSelection, data: Bits) -> Self {
        if let Bits::Bit4(nibble) = data {
            debug_assert!(nibble < (1 << 4), "data is overflow 4 bit");
        }

        Self { rs, data }
    }

    /// A full instruction byte
    pub fn command(raw_bits: u8) -> Self {
        Self::new(RegisterSelection::Command, Bits::Bit8(raw_bits))
    }

    /// A full data byte
    pub fn data(raw_bits: u8) -> Self {
        Self::new(RegisterSelection::Data, Bits::Bit8(raw_bits))
    }

    #[allow(missing_docs)]
    pub fn get_register_selection(&self) -> RegisterSelection {
        self.rs
    }

    #[allow(missing_docs)]
    pub fn get_data(&self) -> Bits {
        self.data
    }
}

impl CommandSet {
    /// Encode into the byte (or for the init nibbles, the nibble) HD44780 expects
    pub fn raw_bits(self) -> u8 {
        match self {
            CommandSet::ClearDisplay => 0b0000_0001,

            CommandSet::ReturnHome => 0b0000_0010,

            CommandSet::EntryModeSet(dir, st) => {
                let mut raw_bits: u8 = 0b0000_0100;

                match dir {
                    MoveDirection::RightToLeft => raw_bits.clear_bit(1),
                    MoveDirection::LeftToRight => raw_bits.set_bit(1),
                };

                match st {
                    ShiftType::CursorOnly => raw_bits.clear_bit(0),
                    ShiftType::CursorAndDisplay => raw_bits.set_bit(0),
                };

                raw_bits
            }

            CommandSet::DisplayOnOff {
                display,
                cursor,
                cursor_blink,
            } => {
                let mut raw_bits: u8 = 0b0000_1000;

                raw_bits.put_bit(2, display.into());
                raw_bits.put_bit(1, cursor.into());
                raw_bits.put_bit(0, cursor_blink.into())
            }

            CommandSet::FunctionReset => 0b0011,

            CommandSet::FunctionSelect(width) => match width {
                DataWidth::Bit4 => 0b0010,
                DataWidth::Bit8 => 0b0011,
            },

            CommandSet::FunctionSet(width, line, font) => {
                let mut raw_bits: u8 = 0b0010_0000;

                if width == DataWidth::Bit8 {
                    raw_bits.set_bit(4);
                }
                if line == LineMode::TwoLine {
                    raw_bits.set_bit(3);
                }
                if font == Font::Font5x10 {
                    raw_bits.set_bit(2);
                }

                raw_bits
            }

            CommandSet::SetCGRAM(addr) => {
                debug_assert!(addr < 2u8.pow(6), "CGRAM address out of range");
                0b0100_0000 | (addr & 0b0011_1111)
            }

            // rows 2/3 of a 4x40 module overflow bit 7, they are merged into it as-is
            CommandSet::SetDDRAM(addr) => 0b1000_0000 | addr,

            CommandSet::WriteDataToRAM(data) => data,
        }
    }
}

impl From<CommandSet> for Command {
    fn from(command: CommandSet) -> Self {
        let raw_bits = command.raw_bits();

        match command {
            CommandSet::FunctionReset | CommandSet::FunctionSelect(_) => {
                Self::new(RegisterSelection::Command, Bits::Bit4(raw_bits))
            }
            CommandSet::WriteDataToRAM(_) => Self::data(raw_bits),
            _ => Self::command(raw_bits),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_control_packs_all_flags() {
        let all_off = CommandSet::DisplayOnOff {
            display: State::Off,
            cursor: State::Off,
            cursor_blink: State::Off,
        };
        let display_only = CommandSet::DisplayOnOff {
            display: State::On,
            cursor: State::Off,
            cursor_blink: State::Off,
        };
        let all_on = CommandSet::DisplayOnOff {
            display: State::On,
            cursor: State::On,
            cursor_blink: State::On,
        };

        assert_eq!(all_off.raw_bits(), 0x08);
        assert_eq!(display_only.raw_bits(), 0x0C);
        assert_eq!(all_on.raw_bits(), 0x0F);
    }

    #[test]
    fn display_control_flags_are_independent() {
        let cursor_only = CommandSet::DisplayOnOff {
            display: State::Off,
            cursor: State::On,
            cursor_blink: State::Off,
        };
        let blink_only = CommandSet::DisplayOnOff {
            display: State::Off,
            cursor: State::Off,
            cursor_blink: State::On,
        };

        assert_eq!(cursor_only.raw_bits(), 0x0A);
        assert_eq!(blink_only.raw_bits(), 0x09);
    }

    #[test]
    fn state_maps_to_bit_state() {
        assert_eq!(BitState::from(State::On), BitState::Set);
        assert_eq!(BitState::from(State::Off), BitState::Clear);
    }

    #[test]
    fn function_set_flags() {
        assert_eq!(
            CommandSet::FunctionSet(DataWidth::Bit4, LineMode::OneLine, Font::Font5x8).raw_bits(),
            0x20
        );
        assert_eq!(
            CommandSet::FunctionSet(DataWidth::Bit4, LineMode::TwoLine, Font::Font5x8).raw_bits(),
            0x28
        );
        assert_eq!(
            CommandSet::FunctionSet(DataWidth::Bit8, LineMode::TwoLine, Font::Font5x8).raw_bits(),
            0x38
        );
        assert_eq!(
            CommandSet::FunctionSet(DataWidth::Bit8, LineMode::OneLine, Font::Font5x10)
                .raw_bits(),
            0x34
        );
    }

    #[test]
    fn entry_mode() {
        assert_eq!(
            CommandSet::EntryModeSet(MoveDirection::LeftToRight, ShiftType::CursorOnly).raw_bits(),
            0x06
        );
        assert_eq!(
            CommandSet::EntryModeSet(MoveDirection::RightToLeft, ShiftType::CursorAndDisplay)
                .raw_bits(),
            0x05
        );
    }

    #[test]
    fn ram_address_commands() {
        assert_eq!(CommandSet::SetCGRAM(2 << 3).raw_bits(), 0x50);
        assert_eq!(CommandSet::SetDDRAM(0x43).raw_bits(), 0xC3);
    }

    #[test]
    fn init_nibbles_are_4_bit_commands() {
        assert_eq!(
            Command::from(CommandSet::FunctionReset),
            Command::new(RegisterSelection::Command, Bits::Bit4(0x3))
        );
        assert_eq!(
            Command::from(CommandSet::FunctionSelect(DataWidth::Bit4)),
            Command::new(RegisterSelection::Command, Bits::Bit4(0x2))
        );
    }

    #[test]
    fn ram_write_goes_to_data_register() {
        let command = Command::from(CommandSet::WriteDataToRAM(b'A'));
        assert_eq!(command.get_register_selection(), RegisterSelection::Data);
        assert_eq!(command.get_data(), Bits::Bit8(b'A'));
    }
}
