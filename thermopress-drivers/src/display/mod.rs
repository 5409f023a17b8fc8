//! Character display drivers

pub mod lcd_i2c;

pub use lcd_i2c::{LcdError, LcdI2c, DEFAULT_ADDRESS};
