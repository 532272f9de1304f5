//! Naipes españoles y mazos de cartas.
mod carta;
pub use carta::*;

mod mazo;
pub use mazo::*;

mod baraja_error;
pub use baraja_error::BarajaError;
