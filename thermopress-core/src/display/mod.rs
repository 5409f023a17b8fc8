//! Render frames for the 20x4 character display
//!
//! A frame is four lines of text plus the row carrying the selection marker.
//! Lines are stored as UTF-8 so the degree sign survives until the LCD driver
//! maps it to the controller's own glyph.

use core::fmt::{self, Write};

use heapless::String;

/// Number of character rows on the display
pub const SCREEN_ROWS: usize = 4;

/// Number of character columns on the display
pub const SCREEN_COLS: usize = 20;

/// Byte capacity per line (room for a few multi-byte glyphs)
pub const LINE_BYTES: usize = 32;

/// Degree sign as written into frames
pub const DEGREE: char = '°';

/// One display line
pub type Line = String<LINE_BYTES>;

/// A complete screen: four lines and one marked row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderFrame {
    lines: [Line; SCREEN_ROWS],
    selected_row: u8,
}

impl Default for RenderFrame {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderFrame {
    /// Create a blank frame with the marker on row 0
    pub fn new() -> Self {
        Self {
            lines: core::array::from_fn(|_| String::new()),
            selected_row: 0,
        }
    }

    /// Set the content of a row, truncated to the display width
    pub fn set_line(&mut self, row: usize, text: &str) {
        if let Some(line) = self.lines.get_mut(row) {
            line.clear();
            for ch in text.chars().take(SCREEN_COLS) {
                if line.push(ch).is_err() {
                    break;
                }
            }
        }
    }

    /// Set the content of a row from format arguments
    pub fn set_line_fmt(&mut self, row: usize, args: fmt::Arguments<'_>) {
        if let Some(line) = self.lines.get_mut(row) {
            line.clear();
            let mut writer = ColumnWriter { line, cols: 0 };
            let _ = writer.write_fmt(args);
        }
    }

    /// Get the content of a row
    pub fn line(&self, row: usize) -> &str {
        self.lines.get(row).map(|l| l.as_str()).unwrap_or("")
    }

    /// All four rows
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|l| l.as_str())
    }

    /// Row carrying the selection marker
    pub fn selected_row(&self) -> u8 {
        self.selected_row
    }

    /// Move the selection marker
    pub fn set_selected_row(&mut self, row: u8) {
        if (row as usize) < SCREEN_ROWS {
            self.selected_row = row;
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for RenderFrame {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Frame[sel={}", self.selected_row);
        for line in self.lines.iter() {
            defmt::write!(f, ", {=str}", line.as_str());
        }
        defmt::write!(f, "]");
    }
}

/// Writer that stops at the display width
struct ColumnWriter<'a> {
    line: &'a mut Line,
    cols: usize,
}

impl Write for ColumnWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for ch in s.chars() {
            if self.cols >= SCREEN_COLS {
                return Ok(());
            }
            self.line.push(ch).map_err(|_| fmt::Error)?;
            self.cols += 1;
        }
        Ok(())
    }
}

/// Displays a 0.1°C fixed-point value as `185.5`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Celsius(pub i16);

impl fmt::Display for Celsius {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{}", sign, abs / 10, abs % 10)
    }
}

/// Displays a second count as `MM:SS`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinSec(pub u32);

impl fmt::Display for MinSec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}
