//! HD44780 character LCD behind a PCF8574 I2C backpack
//!
//! The backpack maps its eight outputs to the LCD as
//! `D7 D6 D5 D4 BL EN RW RS`, so the controller runs in 4-bit mode and
//! every byte goes out as two nibbles, each strobed on EN.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use thermopress_core::display::{RenderFrame, DEGREE, SCREEN_COLS, SCREEN_ROWS};
use thermopress_core::traits::DisplaySink;

/// Usual backpack address with A0..A2 open
pub const DEFAULT_ADDRESS: u8 = 0x27;

const BACKLIGHT: u8 = 0x08;
const ENABLE: u8 = 0x04;
const REGISTER_SELECT: u8 = 0x01;

const CMD_CLEAR: u8 = 0x01;
const CMD_ENTRY_MODE: u8 = 0x06; // increment, no shift
const CMD_DISPLAY_ON: u8 = 0x0C; // no cursor, no blink
const CMD_FUNCTION_SET: u8 = 0x28; // 4-bit, 2 line, 5x8
const CMD_SET_DDRAM: u8 = 0x80;

/// DDRAM address of the first column of each row on a 20x4 panel
const ROW_OFFSETS: [u8; SCREEN_ROWS] = [0x00, 0x40, 0x14, 0x54];

/// Selection marker drawn in column 0
const MARKER: u8 = b'*';

/// Degree sign in the HD44780 A00 character ROM
const ROM_DEGREE: u8 = 0xDF;

/// LCD errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LcdError<E> {
    /// I2C write failed
    I2c(E),
    /// Row outside the panel
    InvalidRow(u8),
}

/// 20x4 LCD on an I2C backpack
pub struct LcdI2c<I2C, D> {
    i2c: I2C,
    delay: D,
    address: u8,
}

impl<I2C: I2c, D: DelayNs> LcdI2c<I2C, D> {
    /// Create a driver; call [`init`](Self::init) before drawing
    pub fn new(i2c: I2C, delay: D, address: u8) -> Self {
        Self {
            i2c,
            delay,
            address,
        }
    }

    /// Run the 4-bit initialisation sequence and clear the panel
    pub fn init(&mut self) -> Result<(), LcdError<I2C::Error>> {
        // Power-on wait for Vcc > 4.5V
        self.delay.delay_ms(50);
        self.expander_write(BACKLIGHT)?;

        // Force 8-bit mode three times, then switch to 4-bit
        self.write_nibble(0x03, false)?;
        self.delay.delay_us(4500);
        self.write_nibble(0x03, false)?;
        self.delay.delay_us(4500);
        self.write_nibble(0x03, false)?;
        self.delay.delay_us(150);
        self.write_nibble(0x02, false)?;

        self.command(CMD_FUNCTION_SET)?;
        self.command(CMD_DISPLAY_ON)?;
        self.clear()?;
        self.command(CMD_ENTRY_MODE)
    }

    /// Clear the panel and home the cursor
    pub fn clear(&mut self) -> Result<(), LcdError<I2C::Error>> {
        self.command(CMD_CLEAR)?;
        self.delay.delay_ms(2);
        Ok(())
    }

    /// Move the cursor
    pub fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), LcdError<I2C::Error>> {
        let offset = *ROW_OFFSETS
            .get(row as usize)
            .ok_or(LcdError::InvalidRow(row))?;
        self.command(CMD_SET_DDRAM | (offset + col))
    }

    /// Redraw one row, padded to the full width
    fn draw_row(&mut self, frame: &RenderFrame, row: u8) -> Result<(), LcdError<I2C::Error>> {
        self.set_cursor(0, row)?;

        let mut chars = frame.line(row as usize).chars();
        let first = chars.next().map(rom_byte).unwrap_or(b' ');
        self.data(if frame.selected_row() == row { MARKER } else { first })?;

        for _ in 1..SCREEN_COLS {
            self.data(chars.next().map(rom_byte).unwrap_or(b' '))?;
        }
        Ok(())
    }

    fn command(&mut self, byte: u8) -> Result<(), LcdError<I2C::Error>> {
        self.send(byte, false)
    }

    fn data(&mut self, byte: u8) -> Result<(), LcdError<I2C::Error>> {
        self.send(byte, true)
    }

    fn send(&mut self, byte: u8, data: bool) -> Result<(), LcdError<I2C::Error>> {
        self.write_nibble(byte >> 4, data)?;
        self.write_nibble(byte & 0x0F, data)
    }

    fn write_nibble(&mut self, nibble: u8, data: bool) -> Result<(), LcdError<I2C::Error>> {
        let rs = if data { REGISTER_SELECT } else { 0 };
        let bits = (nibble << 4) | BACKLIGHT | rs;
        self.expander_write(bits | ENABLE)?;
        self.delay.delay_us(1);
        self.expander_write(bits)?;
        // Most commands settle in 37us
        self.delay.delay_us(50);
        Ok(())
    }

    fn expander_write(&mut self, bits: u8) -> Result<(), LcdError<I2C::Error>> {
        self.i2c.write(self.address, &[bits]).map_err(LcdError::I2c)
    }

    /// Release the bus and delay
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }
}

impl<I2C: I2c, D: DelayNs> DisplaySink for LcdI2c<I2C, D> {
    type Error = LcdError<I2C::Error>;

    fn show(&mut self, frame: &RenderFrame) -> Result<(), Self::Error> {
        for row in 0..SCREEN_ROWS as u8 {
            self.draw_row(frame, row)?;
        }
        Ok(())
    }

    fn move_marker(&mut self, frame: &RenderFrame, previous_row: u8) -> Result<(), Self::Error> {
        let row = frame.selected_row();
        if previous_row != row {
            let restored = frame
                .line(previous_row as usize)
                .chars()
                .next()
                .map(rom_byte)
                .unwrap_or(b' ');
            self.set_cursor(0, previous_row)?;
            self.data(restored)?;
        }
        self.set_cursor(0, row)?;
        self.data(MARKER)
    }
}

/// Map a character to the A00 character ROM
fn rom_byte(ch: char) -> u8 {
    match ch {
        DEGREE => ROM_DEGREE,
        ' '..='}' => ch as u8,
        _ => b'?',
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::{ErrorKind, ErrorType, Operation};

    /// Mock I2C bus recording every byte written to the expander
    #[derive(Default)]
    struct MockI2c {
        writes: Vec<u8>,
        address: Option<u8>,
        fail: bool,
    }

    impl ErrorType for MockI2c {
        type Error = ErrorKind;
    }

    impl I2c for MockI2c {
        fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), ErrorKind> {
            if self.fail {
                return Err(ErrorKind::Other);
            }
            self.address = Some(address);
            for op in operations.iter() {
                if let Operation::Write(bytes) = op {
                    self.writes.extend_from_slice(bytes);
                }
            }
            Ok(())
        }
    }

    struct NoDelay;

    impl DelayNs for NoDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    /// Reassemble (is_data, byte) pairs from the strobed nibbles
    fn decode_bus(writes: &[u8]) -> Vec<(bool, u8)> {
        let strobes: Vec<u8> = writes.iter().copied().filter(|b| b & ENABLE != 0).collect();
        strobes
            .chunks(2)
            .filter(|pair| pair.len() == 2)
            .map(|pair| (pair[0] & REGISTER_SELECT != 0, (pair[0] & 0xF0) | (pair[1] >> 4)))
            .collect()
    }

    fn lcd() -> LcdI2c<MockI2c, NoDelay> {
        LcdI2c::new(MockI2c::default(), NoDelay, DEFAULT_ADDRESS)
    }

    fn frame() -> RenderFrame {
        let mut frame = RenderFrame::new();
        frame.set_line(0, "---- Heat press ----");
        frame.set_line(1, "  Start cycle");
        frame.set_line(2, "  Avg: 20.0°C");
        frame.set_line(3, "--------------------");
        frame.set_selected_row(1);
        frame
    }

    #[test]
    fn test_init_sequence() {
        let mut lcd = lcd();
        lcd.init().unwrap();
        let (i2c, _) = lcd.release();
        assert_eq!(i2c.address, Some(DEFAULT_ADDRESS));

        // Three 8-bit wake-ups and the 4-bit switch are single nibbles
        let strobes: Vec<u8> = i2c.writes.iter().copied().filter(|b| b & ENABLE != 0).collect();
        assert_eq!(&strobes[..4], &[0x3C, 0x3C, 0x3C, 0x2C]);

        let commands = decode_bus(&i2c.writes[8..]);
        assert_eq!(
            commands,
            vec![
                (false, CMD_FUNCTION_SET),
                (false, CMD_DISPLAY_ON),
                (false, CMD_CLEAR),
                (false, CMD_ENTRY_MODE),
            ]
        );
        assert!(i2c.writes.iter().all(|b| b & BACKLIGHT != 0));
    }

    #[test]
    fn test_show_draws_marker_and_rows() {
        let mut lcd = lcd();
        lcd.show(&frame()).unwrap();
        let (i2c, _) = lcd.release();
        let bus = decode_bus(&i2c.writes);

        // Four rows of cursor move plus 20 characters
        assert_eq!(bus.len(), 4 * 21);
        let rows: Vec<Vec<u8>> = bus.chunks(21).map(|c| c[1..].iter().map(|(_, b)| *b).collect()).collect();
        let cursors: Vec<(bool, u8)> = bus.chunks(21).map(|c| c[0]).collect();

        assert_eq!(
            cursors,
            vec![(false, 0x80), (false, 0xC0), (false, 0x94), (false, 0xD4)]
        );
        assert_eq!(&rows[1][..13], b"* Start cycle");
        assert_eq!(rows[1][13..], [b' '; 7]);
        assert_eq!(&rows[2][..12], b"  Avg: 20.0\xDF");
        assert_eq!(rows[2][12], b'C');
    }

    #[test]
    fn test_move_marker_restores_previous_row() {
        let mut frame = frame();
        frame.set_selected_row(2);
        let mut lcd = lcd();
        lcd.move_marker(&frame, 1).unwrap();
        let (i2c, _) = lcd.release();

        assert_eq!(
            decode_bus(&i2c.writes),
            vec![(false, 0xC0), (true, b' '), (false, 0x94), (true, b'*')]
        );
    }

    #[test]
    fn test_invalid_row() {
        let mut lcd = lcd();
        assert_eq!(lcd.set_cursor(0, 4), Err(LcdError::InvalidRow(4)));
    }

    #[test]
    fn test_bus_error_propagates() {
        let mut lcd = LcdI2c::new(
            MockI2c {
                fail: true,
                ..MockI2c::default()
            },
            NoDelay,
            DEFAULT_ADDRESS,
        );
        assert_eq!(lcd.show(&frame()), Err(LcdError::I2c(ErrorKind::Other)));
    }

    #[test]
    fn test_rom_mapping() {
        assert_eq!(rom_byte('A'), b'A');
        assert_eq!(rom_byte(DEGREE), 0xDF);
        assert_eq!(rom_byte('é'), b'?');
    }
}
