use std::io;

use thiserror::Error;

use crate::baraja::BarajaError;

use super::TipoJuego;

#[derive(Debug, Error)]
pub enum JuegoError {
    #[error("{juego} admite entre {min} y {max} jugadores, pero hay {actual}.")]
    CantidadJugadores {
        juego: &'static str,
        min: usize,
        max: usize,
        actual: usize,
    },

    #[error(transparent)]
    Baraja(#[from] BarajaError),

    #[error("Número de columna `{0}` no válido.")]
    ColumnaNoValida(usize),

    #[error("Coordenadas ({0}, {1}) no válidas.")]
    CoordenadasNoValidas(usize, usize),

    #[error("'{0}' debe ser una cadena de un (1) solo caracter.")]
    LetraNoValida(String),

    #[error("No se puede hacer el recuento sin una mano que haya cortado.")]
    SinCortador,

    #[error("No hay ninguna frase para adivinar.")]
    FraseVacia,

    #[error("No se pudo leer la lista de palabras: {1}")]
    ListaPalabras(#[source] io::Error, String),

    #[error("No se pudo acceder a las estadísticas en {1}")]
    Registrador(#[source] io::Error, String),

    #[error("No se pudieron procesar las estadísticas.")]
    EstadisticasJson(#[from] serde_json::Error),

    #[error("El modelo del juego todavía no se ha iniciado.")]
    ModeloNoIniciado,

    #[error("Juego no registrado: {0}")]
    JuegoNoRegistrado(TipoJuego),
}
