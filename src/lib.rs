pub mod arena;
pub mod baraja;
pub mod juegos;
