//! Encoder and button input decoding

pub mod button;
pub mod encoder;
pub mod events;

pub use button::ButtonClassifier;
pub use encoder::RotaryDecoder;
pub use events::InputEvent;
