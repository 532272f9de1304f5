//! Modelos de los juegos, sus opciones, el registro de juegos disponibles y el manejador que
//! conecta todo durante una partida.
mod jugador;
pub use jugador::*;

mod juego_error;
pub use juego_error::JuegoError;

mod juego;
pub use juego::*;

mod opciones;
pub use opciones::*;

mod tateti;
pub use tateti::*;

mod cuatro_en_linea;
pub use cuatro_en_linea::*;

mod ppt;
pub use ppt::*;

mod ahorcado;
pub use ahorcado::*;

mod chinchon;
pub use chinchon::*;

mod modelo;
pub use modelo::*;

mod registrador;
pub use registrador::*;

mod registro;
pub use registro::*;

mod manejador;
pub use manejador::*;
