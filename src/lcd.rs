//! The display controller: a text console on top of a [`SendCommand`] sender

use core::fmt;

use embedded_hal::delay::DelayNs;

use crate::{
    command::{CommandSet, State},
    sender::SendCommand,
    state::LcdState,
};

mod init;

pub use init::Config;

// extra wait after each CGRAM access
const CGRAM_SETTLE_US: u32 = 40;
// what HD44780 shows for a character its ROM does not have
const FULL_BLOCK: u8 = 0xFF;

/// A HD44780 character LCD
///
/// [`Lcd`] keeps the cursor position and display mode flags, and re-sends
/// the DDRAM address after every cursor move, so the controller's address
/// counter always matches [`Lcd::cursor_pos`].
pub struct Lcd<'a, 'b, Sender, Delayer>
where
    Sender: SendCommand<Delayer>,
    Delayer: DelayNs,
{
    sender: &'a mut Sender,
    delayer: &'b mut Delayer,
    state: LcdState,
}

impl<'a, 'b, Sender, Delayer> Lcd<'a, 'b, Sender, Delayer>
where
    Sender: SendCommand<Delayer>,
    Delayer: DelayNs,
{
    /// Clear the display and move cursor to top left corner
    pub fn clear(&mut self) {
        self.send(CommandSet::ClearDisplay);
        self.send(CommandSet::ReturnHome);
        self.state.set_cursor_pos((0, 0));
        self.state.clear_implied_newline();
    }

    /// Move cursor to top left corner, without touching the content
    pub fn home(&mut self) {
        self.send(CommandSet::ReturnHome);
        self.state.set_cursor_pos((0, 0));
        self.state.clear_implied_newline();
    }

    /// Move cursor to column `x` of row `y`, both zero based
    ///
    /// Positions outside the display are pulled back to its last column / row.
    pub fn move_to(&mut self, x: u8, y: u8) {
        self.state.set_cursor_pos((x, y));
        self.state.clear_implied_newline();
        self.sync_cursor();
    }

    /// Write a character at cursor position, and advance the cursor
    ///
    /// `'\n'` moves to the start of next row, unless the previous character just
    /// wrapped there. Characters above `'\u{FF}'` are shown as a full block,
    /// `'\u{0}'` to `'\u{7}'` are the glyphs defined with [`Lcd::custom_char`].
    pub fn putchar(&mut self, char: char) {
        let line_feed = char == '\n';

        if !line_feed {
            let rom_code = u8::try_from(char).unwrap_or(FULL_BLOCK);
            self.send(CommandSet::WriteDataToRAM(rom_code));
        }

        self.state.advance(line_feed);
        self.sync_cursor();
    }

    /// Write a string at cursor position
    pub fn putstr(&mut self, str: &str) {
        str.chars().for_each(|char| self.putchar(char));
    }

    /// Define one of the 8 custom glyphs
    ///
    /// Only the lower 3 bits of `slot` are used, and each row uses its lower 5 bits.
    /// Print the glyph with `putchar(char::from(slot))`.
    pub fn custom_char(&mut self, slot: u8, bitmap: &[u8; 8]) {
        let slot = slot & 0b111;

        self.send(CommandSet::SetCGRAM(slot << 3));
        self.delayer.delay_us(CGRAM_SETTLE_US);

        bitmap.iter().for_each(|&row| {
            self.send(CommandSet::WriteDataToRAM(row));
            self.delayer.delay_us(CGRAM_SETTLE_US);
        });

        // CGRAM and DDRAM share the address counter
        self.sync_cursor();
    }

    #[allow(missing_docs)]
    pub fn show_cursor(&mut self) {
        self.state.set_cursor_state(State::On);
        self.update_display_control();
    }

    /// Hide the cursor, this also stops blinking
    pub fn hide_cursor(&mut self) {
        self.state.set_cursor_state(State::Off);
        self.state.set_cursor_blink(State::Off);
        self.update_display_control();
    }

    /// Show the cursor, and make it blink
    pub fn blink_cursor_on(&mut self) {
        self.state.set_cursor_state(State::On);
        self.state.set_cursor_blink(State::On);
        self.update_display_control();
    }

    /// Keep the cursor shown, but solid
    pub fn blink_cursor_off(&mut self) {
        self.state.set_cursor_state(State::On);
        self.state.set_cursor_blink(State::Off);
        self.update_display_control();
    }

    /// Unblank the display, DDRAM content is kept while blanked
    pub fn display_on(&mut self) {
        self.state.set_display_state(State::On);
        self.update_display_control();
    }

    #[allow(missing_docs)]
    pub fn display_off(&mut self) {
        self.state.set_display_state(State::Off);
        self.update_display_control();
    }

    /// Note:
    /// Due to sender implementation, this function may have actual effect, or not
    pub fn backlight_on(&mut self) {
        self.set_backlight(State::On);
    }

    /// Note:
    /// Due to sender implementation, this function may have actual effect, or not
    pub fn backlight_off(&mut self) {
        self.set_backlight(State::Off);
    }

    /// Current cursor position, `(column, row)`
    pub fn cursor_pos(&self) -> (u8, u8) {
        self.state.get_cursor_pos()
    }

    /// Whether the cursor reached its row by wrapping, rather than by a `'\n'`
    pub fn implied_newline(&self) -> bool {
        self.state.get_implied_newline()
    }

    #[allow(missing_docs)]
    pub fn num_lines(&self) -> u8 {
        self.state.get_lines()
    }

    #[allow(missing_docs)]
    pub fn num_columns(&self) -> u8 {
        self.state.get_columns()
    }

    #[allow(missing_docs)]
    pub fn backlight(&self) -> State {
        self.state.get_backlight()
    }

    #[allow(missing_docs)]
    pub fn display_state(&self) -> State {
        self.state.get_display_state()
    }

    #[allow(missing_docs)]
    pub fn cursor_state(&self) -> State {
        self.state.get_cursor_state()
    }

    #[allow(missing_docs)]
    pub fn cursor_blink_state(&self) -> State {
        self.state.get_cursor_blink()
    }

    /// Wait for specified milliseconds
    pub fn delay_ms(&mut self, ms: u32) {
        self.delayer.delay_ms(ms);
    }

    /// Wait for specified microseconds
    pub fn delay_us(&mut self, us: u32) {
        self.delayer.delay_us(us);
    }

    fn set_backlight(&mut self, backlight: State) {
        self.state.set_backlight(backlight);
        self.sender.set_backlight(backlight);
    }

    fn update_display_control(&mut self) {
        self.send(CommandSet::DisplayOnOff {
            display: self.state.get_display_state(),
            cursor: self.state.get_cursor_state(),
            cursor_blink: self.state.get_cursor_blink(),
        });
    }

    fn sync_cursor(&mut self) {
        self.send(CommandSet::SetDDRAM(self.state.ddram_addr()));
    }

    fn send(&mut self, command: CommandSet) {
        self.sender.send(command.into(), self.delayer);
    }
}

impl<Sender, Delayer> fmt::Write for Lcd<'_, '_, Sender, Delayer>
where
    Sender: SendCommand<Delayer>,
    Delayer: DelayNs,
{
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.putstr(s);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use core::fmt::Write;
    use std::{cell::RefCell, rc::Rc, string::String, vec::Vec};

    use proptest::prelude::*;

    use super::*;
    use crate::command::{Bits, Command, DataWidth, Font, RegisterSelection};

    #[derive(Clone, Copy, Debug, PartialEq)]
    enum Event {
        Sent(Command),
        Backlight(State),
        DelayUs(u32),
        DelayMs(u32),
    }

    type Log = Rc<RefCell<Vec<Event>>>;

    /// Stands in for the bus, records what the controller asks for
    struct RecordingSender {
        width: DataWidth,
        log: Log,
    }

    struct RecordingDelay {
        log: Log,
    }

    impl SendCommand<RecordingDelay> for RecordingSender {
        fn send(&mut self, command: Command, _delayer: &mut RecordingDelay) {
            self.log.borrow_mut().push(Event::Sent(command));
        }

        fn data_width(&self) -> DataWidth {
            self.width
        }

        fn set_backlight(&mut self, backlight: State) {
            self.log.borrow_mut().push(Event::Backlight(backlight));
        }
    }

    impl DelayNs for RecordingDelay {
        fn delay_ns(&mut self, _ns: u32) {}

        fn delay_us(&mut self, us: u32) {
            self.log.borrow_mut().push(Event::DelayUs(us));
        }

        fn delay_ms(&mut self, ms: u32) {
            self.log.borrow_mut().push(Event::DelayMs(ms));
        }
    }

    fn parts(width: DataWidth) -> (Log, RecordingSender, RecordingDelay) {
        let log = Log::default();
        let sender = RecordingSender {
            width,
            log: log.clone(),
        };
        let delay = RecordingDelay { log: log.clone() };
        (log, sender, delay)
    }

    fn cmd(raw_bits: u8) -> Event {
        Event::Sent(Command::command(raw_bits))
    }

    fn data(raw_bits: u8) -> Event {
        Event::Sent(Command::data(raw_bits))
    }

    fn nibble(raw_bits: u8) -> Event {
        Event::Sent(Command::new(RegisterSelection::Command, Bits::Bit4(raw_bits)))
    }

    /// Only the bytes sent to data register
    fn text(log: &Log) -> Vec<u8> {
        log.borrow()
            .iter()
            .filter_map(|event| match event {
                Event::Sent(command)
                    if command.get_register_selection() == RegisterSelection::Data =>
                {
                    match command.get_data() {
                        Bits::Bit8(byte) => Some(byte),
                        Bits::Bit4(_) => None,
                    }
                }
                _ => None,
            })
            .collect()
    }

    fn last_command(log: &Log) -> Option<Event> {
        log.borrow().last().copied()
    }

    #[test]
    fn init_sequence_4_pin_two_lines() {
        let (log, mut sender, mut delay) = parts(DataWidth::Bit4);
        let lcd = Lcd::new(&mut sender, &mut delay, Config::default()).unwrap();

        assert_eq!(
            *log.borrow(),
            vec![
                Event::DelayUs(20_000),
                nibble(0x3),
                Event::DelayUs(5_000),
                nibble(0x3),
                Event::DelayUs(1_000),
                nibble(0x3),
                Event::DelayUs(1_000),
                nibble(0x2),
                Event::DelayUs(1_000),
                cmd(0x28),
                cmd(0x08),
                Event::Backlight(State::On),
                cmd(0x01),
                cmd(0x02),
                cmd(0x06),
                cmd(0x08),
                cmd(0x0C),
            ]
        );

        assert_eq!(lcd.cursor_pos(), (0, 0));
        assert_eq!(lcd.display_state(), State::On);
        assert_eq!(lcd.cursor_state(), State::Off);
        assert_eq!(lcd.backlight(), State::On);
    }

    #[test]
    fn init_sequence_8_pin_one_line() {
        let (log, mut sender, mut delay) = parts(DataWidth::Bit8);
        let config = Config::default().set_lines(1).set_font(Font::Font5x10);
        Lcd::new(&mut sender, &mut delay, config).unwrap();

        let log = log.borrow();
        assert_eq!(log[7], nibble(0x3));
        assert_eq!(log[9], cmd(0x34));
    }

    #[test]
    fn tall_font_needs_one_line() {
        let (log, mut sender, mut delay) = parts(DataWidth::Bit4);
        let config = Config::default().set_font(Font::Font5x10);

        assert_eq!(
            Lcd::new(&mut sender, &mut delay, config).err(),
            Some(crate::error::Error::FontNeedsOneLine)
        );
        // nothing reaches the bus
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn geometry_from_config_is_clamped() {
        let (_log, mut sender, mut delay) = parts(DataWidth::Bit4);
        let config = Config::default().set_lines(7).set_columns(80);
        let lcd = Lcd::new(&mut sender, &mut delay, config).unwrap();

        assert_eq!((lcd.num_lines(), lcd.num_columns()), (4, 40));
    }

    #[test]
    fn move_to_address_encoding() {
        let (log, mut sender, mut delay) = parts(DataWidth::Bit4);
        let config = Config::default().set_lines(4).set_columns(16);
        let mut lcd = Lcd::new(&mut sender, &mut delay, config).unwrap();

        for (y, addr_cmd) in [(0, 0x83), (1, 0xC3), (2, 0x93), (3, 0xD3)] {
            lcd.move_to(3, y);
            assert_eq!(last_command(&log), Some(cmd(addr_cmd)));
            assert_eq!(lcd.cursor_pos(), (3, y));
        }
    }

    #[test]
    fn putchar_resyncs_address_after_each_char() {
        let (log, mut sender, mut delay) = parts(DataWidth::Bit4);
        let mut lcd = Lcd::new(&mut sender, &mut delay, Config::default()).unwrap();
        log.borrow_mut().clear();

        lcd.putstr("ab");

        assert_eq!(
            *log.borrow(),
            vec![data(b'a'), cmd(0x81), data(b'b'), cmd(0x82)]
        );
    }

    #[test]
    fn full_row_wraps_and_absorbs_next_line_feed() {
        let (log, mut sender, mut delay) = parts(DataWidth::Bit4);
        let mut lcd = Lcd::new(&mut sender, &mut delay, Config::default()).unwrap();

        lcd.putstr("0123456789abcdef");
        assert_eq!(lcd.cursor_pos(), (0, 1));
        assert!(lcd.implied_newline());
        assert_eq!(last_command(&log), Some(cmd(0xC0)));

        log.borrow_mut().clear();
        lcd.putchar('\n');
        assert_eq!(lcd.cursor_pos(), (0, 1));
        assert_eq!(*log.borrow(), vec![cmd(0xC0)]);
    }

    #[test]
    fn line_feed_mid_row_breaks_line() {
        let (log, mut sender, mut delay) = parts(DataWidth::Bit4);
        let mut lcd = Lcd::new(&mut sender, &mut delay, Config::default()).unwrap();
        log.borrow_mut().clear();

        lcd.putstr("hi\nyo");

        assert_eq!(lcd.cursor_pos(), (2, 1));
        assert!(!lcd.implied_newline());
        assert_eq!(text(&log), b"hiyo".to_vec());
    }

    #[test]
    fn last_row_wraps_to_top() {
        let (_log, mut sender, mut delay) = parts(DataWidth::Bit4);
        let mut lcd = Lcd::new(&mut sender, &mut delay, Config::default()).unwrap();

        lcd.move_to(14, 1);
        lcd.putstr("xyz");

        assert_eq!(lcd.cursor_pos(), (1, 0));
    }

    #[test]
    fn move_to_out_of_range_is_pulled_back() {
        let (log, mut sender, mut delay) = parts(DataWidth::Bit4);
        let mut lcd = Lcd::new(&mut sender, &mut delay, Config::default()).unwrap();

        lcd.move_to(40, 3);

        assert_eq!(lcd.cursor_pos(), (15, 1));
        assert_eq!(last_command(&log), Some(cmd(0xCF)));
    }

    #[test]
    fn move_to_forgets_implied_newline() {
        let (_log, mut sender, mut delay) = parts(DataWidth::Bit4);
        let mut lcd = Lcd::new(&mut sender, &mut delay, Config::default()).unwrap();

        lcd.putstr("0123456789abcdef");
        lcd.move_to(0, 1);
        lcd.putchar('\n');

        assert_eq!(lcd.cursor_pos(), (0, 0));
    }

    #[test]
    fn unsupported_char_is_full_block() {
        let (log, mut sender, mut delay) = parts(DataWidth::Bit4);
        let mut lcd = Lcd::new(&mut sender, &mut delay, Config::default()).unwrap();
        log.borrow_mut().clear();

        lcd.putchar('\u{2}');
        lcd.putchar('°');
        lcd.putchar('℃');

        assert_eq!(text(&log), vec![0x02, 0xB0, 0xFF]);
    }

    #[test]
    fn custom_char_restores_ddram_address() {
        const SMILEY: [u8; 8] = [0x00, 0x0A, 0x00, 0x04, 0x00, 0x11, 0x0E, 0x00];

        let (log, mut sender, mut delay) = parts(DataWidth::Bit4);
        let mut lcd = Lcd::new(&mut sender, &mut delay, Config::default()).unwrap();
        lcd.move_to(5, 1);
        log.borrow_mut().clear();

        lcd.custom_char(2, &SMILEY);

        let mut expected = vec![cmd(0x50), Event::DelayUs(40)];
        SMILEY.iter().for_each(|&row| {
            expected.push(data(row));
            expected.push(Event::DelayUs(40));
        });
        expected.push(cmd(0xC5));

        assert_eq!(*log.borrow(), expected);
        assert_eq!(lcd.cursor_pos(), (5, 1));
    }

    #[test]
    fn custom_char_slot_is_masked() {
        let (log, mut sender, mut delay) = parts(DataWidth::Bit4);
        let mut lcd = Lcd::new(&mut sender, &mut delay, Config::default()).unwrap();
        log.borrow_mut().clear();

        lcd.custom_char(10, &[0; 8]);

        assert_eq!(log.borrow()[0], cmd(0x50));
    }

    #[test]
    fn clear_sends_clear_and_home() {
        let (log, mut sender, mut delay) = parts(DataWidth::Bit4);
        let mut lcd = Lcd::new(&mut sender, &mut delay, Config::default()).unwrap();
        lcd.putstr("abc");
        log.borrow_mut().clear();

        lcd.clear();

        assert_eq!(*log.borrow(), vec![cmd(0x01), cmd(0x02)]);
        assert_eq!(lcd.cursor_pos(), (0, 0));
    }

    #[test]
    fn home_keeps_content() {
        let (log, mut sender, mut delay) = parts(DataWidth::Bit4);
        let mut lcd = Lcd::new(&mut sender, &mut delay, Config::default()).unwrap();
        lcd.move_to(4, 1);
        log.borrow_mut().clear();

        lcd.home();

        assert_eq!(*log.borrow(), vec![cmd(0x02)]);
        assert_eq!(lcd.cursor_pos(), (0, 0));
    }

    #[test]
    fn display_control_reflects_all_flags() {
        let (log, mut sender, mut delay) = parts(DataWidth::Bit4);
        let mut lcd = Lcd::new(&mut sender, &mut delay, Config::default()).unwrap();

        lcd.show_cursor();
        assert_eq!(last_command(&log), Some(cmd(0x0E)));

        lcd.blink_cursor_on();
        assert_eq!(last_command(&log), Some(cmd(0x0F)));

        // blanking keeps cursor flags
        lcd.display_off();
        assert_eq!(last_command(&log), Some(cmd(0x0B)));

        lcd.display_on();
        assert_eq!(last_command(&log), Some(cmd(0x0F)));

        lcd.blink_cursor_off();
        assert_eq!(last_command(&log), Some(cmd(0x0E)));

        lcd.blink_cursor_on();
        lcd.hide_cursor();
        assert_eq!(last_command(&log), Some(cmd(0x0C)));
        assert_eq!(lcd.cursor_blink_state(), State::Off);
    }

    #[test]
    fn backlight_goes_to_sender_only() {
        let (log, mut sender, mut delay) = parts(DataWidth::Bit4);
        let mut lcd = Lcd::new(&mut sender, &mut delay, Config::default()).unwrap();
        log.borrow_mut().clear();

        lcd.backlight_off();
        assert_eq!(lcd.backlight(), State::Off);
        lcd.backlight_on();
        assert_eq!(lcd.backlight(), State::On);

        assert_eq!(
            *log.borrow(),
            vec![Event::Backlight(State::Off), Event::Backlight(State::On)]
        );
    }

    #[test]
    fn formatted_write() {
        let (log, mut sender, mut delay) = parts(DataWidth::Bit4);
        let mut lcd = Lcd::new(&mut sender, &mut delay, Config::default()).unwrap();
        log.borrow_mut().clear();

        write!(lcd, "{:2.0}C {:3.1}F", 23.0f32, 73.4f32).unwrap();

        assert_eq!(String::from_utf8(text(&log)).unwrap(), "23C 73.4F");
        assert_eq!(lcd.cursor_pos(), (9, 0));
    }

    #[test]
    fn delays_forward_to_delayer() {
        let (log, mut sender, mut delay) = parts(DataWidth::Bit4);
        let mut lcd = Lcd::new(&mut sender, &mut delay, Config::default()).unwrap();
        log.borrow_mut().clear();

        lcd.delay_ms(250);
        lcd.delay_us(10);

        assert_eq!(*log.borrow(), vec![Event::DelayMs(250), Event::DelayUs(10)]);
    }

    fn grid() -> impl Strategy<Value = (u8, u8, u8, u8)> {
        (1u8..=4, 1u8..=40).prop_flat_map(|(lines, columns)| {
            (Just(lines), Just(columns), 0..columns, 0..lines)
        })
    }

    proptest! {
        #[test]
        fn move_to_round_trips((lines, columns, x, y) in grid()) {
            let (_log, mut sender, mut delay) = parts(DataWidth::Bit4);
            let config = Config::default().set_lines(lines).set_columns(columns);
            let mut lcd = Lcd::new(&mut sender, &mut delay, config).unwrap();

            lcd.move_to(x, y);

            prop_assert_eq!(lcd.cursor_pos(), (x, y));
        }

        #[test]
        fn cursor_stays_on_display(
            (lines, columns, _, _) in grid(),
            text in "[ -~\n]{1,120}",
        ) {
            let (log, mut sender, mut delay) = parts(DataWidth::Bit4);
            let config = Config::default().set_lines(lines).set_columns(columns);
            let mut lcd = Lcd::new(&mut sender, &mut delay, config).unwrap();

            lcd.putstr(&text);

            let (x, y) = lcd.cursor_pos();
            prop_assert!(x < lcd.num_columns());
            prop_assert!(y < lcd.num_lines());

            // the address counter always ends up where the cursor is
            let mut expected = x & 0x3F;
            if y & 1 != 0 {
                expected += 0x40;
            }
            if y & 2 != 0 {
                expected += lcd.num_columns();
            }
            prop_assert_eq!(last_command(&log), Some(cmd(0x80 | expected)));
        }
    }
}
