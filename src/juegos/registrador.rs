use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{JuegoError, Jugador};

/// Victorias, empates y derrotas de un jugador en un juego.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Estadisticas {
    pub victorias: u32,
    pub empates: u32,
    pub derrotas: u32,
}

impl fmt::Display for Estadisticas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} - {}", self.victorias, self.empates, self.derrotas)
    }
}

/// Guarda las estadísticas de los jugadores de un juego.
pub trait Registrador {
    /// Estadísticas de un jugador. Un jugador del que no hay datos tiene todo en cero.
    fn get_datos(&self, id_jugador: &str) -> Estadisticas;

    fn refrescar_datos(&mut self, id_jugador: &str, datos: Estadisticas) -> Result<(), JuegoError>;

    /// Suma el resultado de una partida terminada a todos sus jugadores. Si no hubo empate ni
    /// ganador no se registra nada.
    fn sumar(
        &mut self,
        jugadores: &[Jugador],
        ganador: Option<&str>,
        empate: bool,
    ) -> Result<(), JuegoError> {
        if !empate && ganador.is_none() {
            return Ok(());
        }
        for jugador in jugadores {
            let mut datos = self.get_datos(jugador.id());
            if empate {
                datos.empates += 1;
            } else if ganador == Some(jugador.id()) {
                datos.victorias += 1;
            } else {
                datos.derrotas += 1;
            }
            self.refrescar_datos(jugador.id(), datos)?;
        }
        Ok(())
    }
}

/// Registrador que sólo dura lo que dura el proceso.
#[derive(Debug, Clone, Default)]
pub struct RegistradorMemoria {
    datos: HashMap<String, Estadisticas>,
}

impl RegistradorMemoria {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Registrador for RegistradorMemoria {
    fn get_datos(&self, id_jugador: &str) -> Estadisticas {
        self.datos.get(id_jugador).copied().unwrap_or_default()
    }

    fn refrescar_datos(&mut self, id_jugador: &str, datos: Estadisticas) -> Result<(), JuegoError> {
        self.datos.insert(id_jugador.to_string(), datos);
        Ok(())
    }
}

/// Registrador que guarda las estadísticas en un archivo JSON, reescribiéndolo en cada cambio.
#[derive(Debug, Clone)]
pub struct RegistradorJson {
    ruta: PathBuf,
    datos: BTreeMap<String, Estadisticas>,
}

impl RegistradorJson {
    /// Abre el archivo de estadísticas. Si todavía no existe, se empieza sin datos y se crea en el
    /// primer cambio.
    pub fn abrir(ruta: impl AsRef<Path>) -> Result<Self, JuegoError> {
        let ruta = ruta.as_ref().to_path_buf();
        let datos = match fs::read_to_string(&ruta) {
            Ok(contenido) => serde_json::from_str(&contenido)?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => return Err(JuegoError::Registrador(err, ruta.display().to_string())),
        };
        Ok(Self { ruta, datos })
    }

    pub fn ruta(&self) -> &Path {
        &self.ruta
    }

    pub fn guardar(&self) -> Result<(), JuegoError> {
        let contenido = serde_json::to_string_pretty(&self.datos)?;
        fs::write(&self.ruta, contenido)
            .map_err(|err| JuegoError::Registrador(err, self.ruta.display().to_string()))?;
        debug!(ruta = %self.ruta.display(), jugadores = self.datos.len(), "Estadísticas guardadas");
        Ok(())
    }
}

impl Registrador for RegistradorJson {
    fn get_datos(&self, id_jugador: &str) -> Estadisticas {
        self.datos.get(id_jugador).copied().unwrap_or_default()
    }

    fn refrescar_datos(&mut self, id_jugador: &str, datos: Estadisticas) -> Result<(), JuegoError> {
        self.datos.insert(id_jugador.to_string(), datos);
        self.guardar()
    }
}
