//! Common tools

use embedded_hal::digital::PinState;

/// The state of a bit,
/// It's either [`BitState::Clear`] to represent a 0
/// or [`BitState::Set`] to represent a 1
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BitState {
    /// Bit is 0
    Clear,
    /// Bit is 1
    Set,
}

impl From<BitState> for PinState {
    fn from(bit: BitState) -> Self {
        match bit {
            BitState::Clear => PinState::Low,
            BitState::Set => PinState::High,
        }
    }
}

/// Simple bit ops
pub trait BitOps {
    /// set bit at `pos` to 1, and return the new value
    fn set_bit(&mut self, pos: u8) -> Self;
    /// set bit at `pos` to 0, and return the new value
    fn clear_bit(&mut self, pos: u8) -> Self;
    /// set bit at `pos` to 1 or 0 by `bit`
    fn put_bit(&mut self, pos: u8, bit: BitState) -> Self;
    #[allow(missing_docs)]
    fn check_bit(&self, pos: u8) -> BitState;
}

impl BitOps for u8 {
    fn set_bit(&mut self, pos: u8) -> Self {
        debug_assert!(pos <= 7, "bit offset larger than 7");
        *self |= 1u8 << pos;
        *self
    }

    fn clear_bit(&mut self, pos: u8) -> Self {
        debug_assert!(pos <= 7, "bit offset larger than 7");
        *self &= !(1u8 << pos);
        *self
    }

    fn put_bit(&mut self, pos: u8, bit: BitState) -> Self {
        match bit {
            BitState::Set => self.set_bit(pos),
            BitState::Clear => self.clear_bit(pos),
        }
    }

    fn check_bit(&self, pos: u8) -> BitState {
        debug_assert!(pos <= 7, "bit offset larger than 7");

        match (*self >> pos) & 1 == 1 {
            true => BitState::Set,
            false => BitState::Clear,
        }
    }
}
