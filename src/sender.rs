//! Built-in sender
//! If you want to drive HD44780 through something else (a port expander, a simulator),
//! you will need to implement [`SendCommand`] trait

use embedded_hal::delay::DelayNs;

use crate::command::{Command, DataWidth, State};

mod parallel_sender;

pub use parallel_sender::{ParallelPins, ParallelSender};

/// [`SendCommand`] is the trait a sender should implement to communicate with the hardware
pub trait SendCommand<Delayer: DelayNs> {
    /// Put one [`Command`] on the bus, including any settle time the command itself needs
    fn send(&mut self, command: Command, delayer: &mut Delayer);

    /// The width of the data bus, this decides the function set command sent while initializing
    fn data_width(&self) -> DataWidth;

    /// Send a byte to the instruction register
    fn write_command(&mut self, command: u8, delayer: &mut Delayer) {
        self.send(Command::command(command), delayer)
    }

    /// Send a byte to the data register
    fn write_data(&mut self, data: u8, delayer: &mut Delayer) {
        self.send(Command::data(data), delayer)
    }

    /// Wait specific duration, and send command
    fn delay_and_send(&mut self, command: Command, delayer: &mut Delayer, delay_us: u32) {
        delayer.delay_us(delay_us);
        self.send(command, delayer)
    }

    /// Set the backlight
    ///
    /// Note:
    /// Backlight is not part of HD44780, if a driver cannot change it, just silently bypass it
    #[allow(unused_variables)]
    fn set_backlight(&mut self, backlight: State) {}
}
