use crate::command::{LineMode, State};

pub(crate) const MAX_LINES: u8 = 4;
pub(crate) const MAX_COLUMNS: u8 = 40;

// rows 1 and 3 live at this DDRAM offset
const ODD_ROW_OFFSET: u8 = 0x40;

pub(crate) struct LcdState {
    lines: u8,
    columns: u8,
    cursor_x: u8,
    cursor_y: u8,
    implied_newline: bool,
    backlight: State,
    display_on: State,
    cursor_on: State,
    cursor_blink: State,
}

impl LcdState {
    pub(crate) fn new(lines: u8, columns: u8) -> Self {
        Self {
            lines: lines.clamp(1, MAX_LINES),
            columns: columns.clamp(1, MAX_COLUMNS),
            cursor_x: 0,
            cursor_y: 0,
            implied_newline: false,
            backlight: State::On,
            display_on: State::Off,
            cursor_on: State::Off,
            cursor_blink: State::Off,
        }
    }

    pub(crate) fn get_lines(&self) -> u8 {
        self.lines
    }

    pub(crate) fn get_columns(&self) -> u8 {
        self.columns
    }

    pub(crate) fn get_line_mode(&self) -> LineMode {
        match self.lines {
            1 => LineMode::OneLine,
            _ => LineMode::TwoLine,
        }
    }

    pub(crate) fn get_backlight(&self) -> State {
        self.backlight
    }

    pub(crate) fn set_backlight(&mut self, backlight: State) {
        self.backlight = backlight;
    }

    pub(crate) fn get_display_state(&self) -> State {
        self.display_on
    }

    pub(crate) fn set_display_state(&mut self, display: State) {
        self.display_on = display;
    }

    pub(crate) fn get_cursor_state(&self) -> State {
        self.cursor_on
    }

    pub(crate) fn set_cursor_state(&mut self, cursor: State) {
        self.cursor_on = cursor;
    }

    pub(crate) fn get_cursor_blink(&self) -> State {
        self.cursor_blink
    }

    pub(crate) fn set_cursor_blink(&mut self, blink: State) {
        self.cursor_blink = blink;
    }

    pub(crate) fn get_cursor_pos(&self) -> (u8, u8) {
        (self.cursor_x, self.cursor_y)
    }

    /// Positions outside the display are pulled back to its last column / row
    pub(crate) fn set_cursor_pos(&mut self, pos: (u8, u8)) {
        self.cursor_x = pos.0.min(self.columns - 1);
        self.cursor_y = pos.1.min(self.lines - 1);
    }

    pub(crate) fn get_implied_newline(&self) -> bool {
        self.implied_newline
    }

    pub(crate) fn clear_implied_newline(&mut self) {
        self.implied_newline = false;
    }

    /// DDRAM address of the current cursor position
    pub(crate) fn ddram_addr(&self) -> u8 {
        let mut addr = self.cursor_x & 0x3F;

        if self.cursor_y & 0b01 != 0 {
            addr += ODD_ROW_OFFSET;
        }
        // rows 2/3 continue rows 0/1 one line further in
        if self.cursor_y & 0b10 != 0 {
            addr += self.columns;
        }

        addr
    }

    /// Move the cursor past one character, or past an explicit line-feed
    ///
    /// A line-feed right after an automatic wrap is swallowed. The cursor never
    /// scrolls: past the last row it comes back to row 0.
    pub(crate) fn advance(&mut self, line_feed: bool) {
        let mut wrapped = false;

        if line_feed {
            if !self.implied_newline {
                self.cursor_x = self.columns;
            }
        } else {
            self.cursor_x += 1;
        }

        if self.cursor_x >= self.columns {
            self.cursor_x = 0;
            self.cursor_y += 1;
            wrapped = !line_feed;
        }

        if self.cursor_y >= self.lines {
            self.cursor_y = 0;
        }

        self.implied_newline = wrapped;
    }
}
