mod combat_event;
mod decoder;
mod error;

pub use combat_event::*;
pub use decoder::{TabularDecoder, decode_events};
pub use error::DecodeError;
