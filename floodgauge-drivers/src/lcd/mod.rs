//! HD44780 character LCD behind a PCF8574 I2C expander
//!
//! The common "I2C backpack" wiring drives the controller in 4-bit mode:
//!
//! | PCF8574 bit | LCD signal |
//! |-------------|------------|
//! | P0          | RS         |
//! | P1          | RW (kept low) |
//! | P2          | EN         |
//! | P3          | backlight  |
//! | P4..P7      | D4..D7     |
//!
//! Every nibble takes three expander writes: set up, EN high, EN low.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use floodgauge_display::{DisplayBackend, DisplayError, SCREEN_COLS, SCREEN_ROWS};

/// Default backpack address (A0..A2 pulled high)
pub const PCF8574_ADDR: u8 = 0x27;

/// Expander pin masks
mod pin {
    pub const RS: u8 = 1 << 0;
    pub const EN: u8 = 1 << 2;
    pub const BACKLIGHT: u8 = 1 << 3;
}

/// HD44780 commands
mod cmd {
    pub const CLEAR: u8 = 0x01;
    pub const HOME: u8 = 0x02;
    /// Increment cursor, no display shift
    pub const ENTRY_MODE: u8 = 0x06;
    pub const DISPLAY_OFF: u8 = 0x08;
    /// Display on, cursor off, blink off
    pub const DISPLAY_ON: u8 = 0x0C;
    /// 4-bit bus, two lines, 5x8 font
    pub const FUNCTION_SET: u8 = 0x28;
    pub const SET_DDRAM_ADDR: u8 = 0x80;
}

/// DDRAM address of the first column of each row
const ROW_OFFSETS: [u8; 2] = [0x00, 0x40];

/// LCD driver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LcdError<E> {
    /// I2C transfer failed
    Bus(E),
}

/// HD44780 LCD driver
pub struct Hd44780<I2C, D> {
    i2c: I2C,
    delay: D,
}

impl<I2C: I2c, D: DelayNs> Hd44780<I2C, D> {
    /// Create a driver for the default backpack address
    ///
    /// The panel is not touched until [`Hd44780::init`].
    pub fn new(i2c: I2C, delay: D) -> Self {
        Self { i2c, delay }
    }

    /// Run the 4-bit initialisation sequence and clear the panel
    pub fn init(&mut self) -> Result<(), LcdError<I2C::Error>> {
        // Power-on settle
        self.delay.delay_ms(50);

        // Force 8-bit mode three times, whatever state the controller is in
        self.write_nibble(0x03, false)?;
        self.delay.delay_ms(5);
        self.write_nibble(0x03, false)?;
        self.delay.delay_us(150);
        self.write_nibble(0x03, false)?;
        self.delay.delay_us(150);

        // Then switch to 4-bit
        self.write_nibble(0x02, false)?;
        self.delay.delay_us(150);

        for c in [
            cmd::FUNCTION_SET,
            cmd::DISPLAY_OFF,
            cmd::CLEAR,
            cmd::ENTRY_MODE,
            cmd::DISPLAY_ON,
        ] {
            self.command(c)?;
        }
        Ok(())
    }

    /// Clear the panel and home the cursor
    pub fn clear_screen(&mut self) -> Result<(), LcdError<I2C::Error>> {
        self.command(cmd::CLEAR)
    }

    /// Move the cursor; rows past the last are clamped
    pub fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), LcdError<I2C::Error>> {
        let row = usize::from(row).min(ROW_OFFSETS.len() - 1);
        self.command(cmd::SET_DDRAM_ADDR | ROW_OFFSETS[row].wrapping_add(col))
    }

    /// Write exactly one full row: truncated or padded with spaces
    ///
    /// Characters outside printable ASCII are shown as `?`.
    pub fn print_line(&mut self, row: u8, text: &str) -> Result<(), LcdError<I2C::Error>> {
        self.set_cursor(0, row)?;
        let mut chars = text.chars();
        for _ in 0..SCREEN_COLS {
            self.data(chars.next().map(to_rom).unwrap_or(b' '))?;
        }
        Ok(())
    }

    /// Release the bus and delay
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    fn command(&mut self, command: u8) -> Result<(), LcdError<I2C::Error>> {
        self.send(command, false)?;
        if command == cmd::CLEAR || command == cmd::HOME {
            self.delay.delay_ms(2);
        }
        Ok(())
    }

    fn data(&mut self, byte: u8) -> Result<(), LcdError<I2C::Error>> {
        self.send(byte, true)
    }

    fn send(&mut self, value: u8, rs: bool) -> Result<(), LcdError<I2C::Error>> {
        self.write_nibble(value >> 4, rs)?;
        self.write_nibble(value & 0x0F, rs)
    }

    fn write_nibble(&mut self, nibble: u8, rs: bool) -> Result<(), LcdError<I2C::Error>> {
        let mut data = (nibble & 0x0F) << 4;
        if rs {
            data |= pin::RS;
        }
        self.expander_write(data)?;
        self.expander_write(data | pin::EN)?;
        self.delay.delay_us(1);
        self.expander_write(data & !pin::EN)?;
        self.delay.delay_us(50);
        Ok(())
    }

    /// The backlight bit rides along with every write
    fn expander_write(&mut self, data: u8) -> Result<(), LcdError<I2C::Error>> {
        self.i2c
            .write(PCF8574_ADDR, &[data | pin::BACKLIGHT])
            .map_err(LcdError::Bus)
    }
}

impl<I2C: I2c, D: DelayNs> DisplayBackend for Hd44780<I2C, D> {
    fn clear(&mut self) -> Result<(), DisplayError> {
        self.clear_screen().map_err(|_| DisplayError::Communication)
    }

    fn draw_line(&mut self, row: u8, text: &str) -> Result<(), DisplayError> {
        if usize::from(row) >= SCREEN_ROWS {
            return Err(DisplayError::InvalidCoordinates);
        }
        self.print_line(row, text)
            .map_err(|_| DisplayError::Communication)
    }

    fn dimensions(&self) -> (u8, u8) {
        (SCREEN_COLS as u8, SCREEN_ROWS as u8)
    }
}

fn to_rom(c: char) -> u8 {
    if c.is_ascii() && !c.is_ascii_control() {
        c as u8
    } else {
        b'?'
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::{ErrorKind, ErrorType, Operation};
    use heapless::Vec;

    /// Records every byte written to the expander
    struct RecordingBus {
        writes: Vec<u8, 1024>,
        address: Option<u8>,
        fail: bool,
    }

    impl RecordingBus {
        fn new() -> Self {
            Self {
                writes: Vec::new(),
                address: None,
                fail: false,
            }
        }
    }

    impl ErrorType for RecordingBus {
        type Error = ErrorKind;
    }

    impl I2c for RecordingBus {
        fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            if self.fail {
                return Err(ErrorKind::Other);
            }
            self.address = Some(address);
            for op in operations {
                if let Operation::Write(bytes) = op {
                    self.writes.extend_from_slice(bytes).unwrap();
                }
            }
            Ok(())
        }
    }

    struct NoDelay;

    impl DelayNs for NoDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    fn lcd() -> Hd44780<RecordingBus, NoDelay> {
        Hd44780::new(RecordingBus::new(), NoDelay)
    }

    /// Expected expander bytes for one nibble, backlight on
    fn nibble(n: u8, rs: bool) -> [u8; 3] {
        let base = (n << 4) | pin::BACKLIGHT | if rs { pin::RS } else { 0 };
        [base, base | pin::EN, base]
    }

    /// Expected expander bytes for one data byte
    fn data_byte(b: u8) -> [u8; 6] {
        let (hi, lo) = (nibble(b >> 4, true), nibble(b & 0x0F, true));
        [hi[0], hi[1], hi[2], lo[0], lo[1], lo[2]]
    }

    #[test]
    fn test_init_sequence() {
        let mut lcd = lcd();
        lcd.init().unwrap();
        let (bus, _) = lcd.release();
        assert_eq!(bus.address, Some(0x27));

        let mut expected: Vec<u8, 64> = Vec::new();
        for n in [0x3, 0x3, 0x3, 0x2] {
            expected.extend_from_slice(&nibble(n, false)).unwrap();
        }
        for c in [0x28u8, 0x08, 0x01, 0x06, 0x0C] {
            expected.extend_from_slice(&nibble(c >> 4, false)).unwrap();
            expected.extend_from_slice(&nibble(c & 0x0F, false)).unwrap();
        }
        assert_eq!(bus.writes.as_slice(), expected.as_slice());
        assert_eq!(&bus.writes[..3], &[0x38, 0x3C, 0x38]);
    }

    #[test]
    fn test_set_cursor_second_row() {
        let mut lcd = lcd();
        lcd.set_cursor(3, 1).unwrap();
        let (bus, _) = lcd.release();
        // 0x80 | 0x43
        let mut expected: Vec<u8, 6> = Vec::new();
        expected.extend_from_slice(&nibble(0xC, false)).unwrap();
        expected.extend_from_slice(&nibble(0x3, false)).unwrap();
        assert_eq!(bus.writes.as_slice(), expected.as_slice());
    }

    #[test]
    fn test_draw_line_pads_to_width() {
        let mut lcd = lcd();
        lcd.draw_line(0, "Hi").unwrap();
        let (bus, _) = lcd.release();

        // Cursor command, then 16 characters
        assert_eq!(bus.writes.len(), 6 + 16 * 6);
        let data = &bus.writes[6..];
        assert_eq!(&data[..6], &data_byte(b'H'));
        assert_eq!(&data[6..12], &data_byte(b'i'));
        assert_eq!(&data[data.len() - 6..], &data_byte(b' '));
    }

    #[test]
    fn test_draw_line_rejects_bad_row() {
        let mut lcd = lcd();
        assert_eq!(lcd.draw_line(2, "x"), Err(DisplayError::InvalidCoordinates));
    }

    #[test]
    fn test_bus_error_maps_to_communication() {
        let mut bus = RecordingBus::new();
        bus.fail = true;
        let mut lcd = Hd44780::new(bus, NoDelay);
        assert_eq!(lcd.init(), Err(LcdError::Bus(ErrorKind::Other)));
        assert_eq!(DisplayBackend::clear(&mut lcd), Err(DisplayError::Communication));
    }

    #[test]
    fn test_clear_keeps_backlight_on() {
        let mut lcd = lcd();
        lcd.clear_screen().unwrap();
        let (bus, _) = lcd.release();
        assert_eq!(bus.writes.len(), 6);
        assert!(bus.writes.iter().all(|b| b & pin::BACKLIGHT != 0));
    }

    #[test]
    fn test_non_ascii_shown_as_question_mark() {
        assert_eq!(to_rom('A'), b'A');
        assert_eq!(to_rom('°'), b'?');
        assert_eq!(to_rom('\n'), b'?');
    }
}
