use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use clap::ValueEnum;
use rand::Rng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use super::{
    Ahorcado, Chinchon, CuatroEnLinea, Juego, JuegoError, Jugador, Manejador, Modelo, Opciones,
    OpcionesAhorcado, OpcionesChinchon, OpcionesCuatroEnLinea, OpcionesTaTeTi, Ppt,
    Registrador, RegistradorMemoria, TaTeTi,
};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum,
)]
pub enum TipoJuego {
    TaTeTi,
    CuatroEnLinea,
    Ppt,
    Ahorcado,
    Chinchon,
}

impl TipoJuego {
    pub const TODOS: [TipoJuego; 5] = [
        TipoJuego::TaTeTi,
        TipoJuego::CuatroEnLinea,
        TipoJuego::Ppt,
        TipoJuego::Ahorcado,
        TipoJuego::Chinchon,
    ];

    pub fn metadatos(&self) -> Metadatos {
        match self {
            TipoJuego::TaTeTi => Metadatos::de::<TaTeTi>(),
            TipoJuego::CuatroEnLinea => Metadatos::de::<CuatroEnLinea>(),
            TipoJuego::Ppt => Metadatos::de::<Ppt>(),
            TipoJuego::Ahorcado => Metadatos::de::<Ahorcado>(),
            TipoJuego::Chinchon => Metadatos::de::<Chinchon>(),
        }
    }
}

impl fmt::Display for TipoJuego {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.metadatos().nombre)
    }
}

/// Lo que se muestra de un juego antes de empezar una partida.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Metadatos {
    pub nombre: &'static str,
    pub descripcion: &'static str,
    pub emojis: &'static [&'static str],
    pub min_jugadores: usize,
    pub max_jugadores: usize,
}

impl Metadatos {
    pub fn de<J: Juego>() -> Self {
        Self {
            nombre: J::NOMBRE,
            descripcion: J::DESCRIPCION,
            emojis: J::EMOJIS,
            min_jugadores: J::MIN_JUGADORES,
            max_jugadores: J::MAX_JUGADORES,
        }
    }

    pub fn elegir_emoji<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&'static str> {
        if self.emojis.is_empty() {
            return None;
        }
        Some(self.emojis[rng.gen_range(0..self.emojis.len())])
    }
}

pub type RegistradorCompartido = Rc<RefCell<dyn Registrador>>;

pub type CrearModelo = fn(Vec<Jugador>, Option<&Opciones>, StdRng) -> Result<Modelo, JuegoError>;

/// Todo lo necesario para armar partidas de un juego.
#[derive(Clone)]
pub struct EntradaJuego {
    pub metadatos: Metadatos,
    /// Opciones por defecto, si el juego tiene.
    pub crear_opciones: fn() -> Option<Opciones>,
    pub crear_modelo: CrearModelo,
    /// Dónde se guardan las estadísticas. Sin registrador no se guarda nada.
    pub registrador: Option<RegistradorCompartido>,
}

impl fmt::Debug for EntradaJuego {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntradaJuego")
            .field("metadatos", &self.metadatos)
            .field("registrador", &self.registrador.is_some())
            .finish()
    }
}

fn memoria() -> Option<RegistradorCompartido> {
    Some(Rc::new(RefCell::new(RegistradorMemoria::new())))
}

impl EntradaJuego {
    pub fn por_defecto(tipo: TipoJuego) -> Self {
        let metadatos = tipo.metadatos();
        match tipo {
            TipoJuego::TaTeTi => Self {
                metadatos,
                crear_opciones: || Some(Opciones::TaTeTi(OpcionesTaTeTi::default())),
                crear_modelo: |jugadores, opciones, rng| {
                    Modelo::crear(TipoJuego::TaTeTi, jugadores, opciones, rng)
                },
                registrador: None,
            },
            TipoJuego::CuatroEnLinea => Self {
                metadatos,
                crear_opciones: || Some(Opciones::CuatroEnLinea(OpcionesCuatroEnLinea::default())),
                crear_modelo: |jugadores, opciones, rng| {
                    Modelo::crear(TipoJuego::CuatroEnLinea, jugadores, opciones, rng)
                },
                registrador: memoria(),
            },
            TipoJuego::Ppt => Self {
                metadatos,
                crear_opciones: || None,
                crear_modelo: |jugadores, opciones, rng| {
                    Modelo::crear(TipoJuego::Ppt, jugadores, opciones, rng)
                },
                registrador: memoria(),
            },
            TipoJuego::Ahorcado => Self {
                metadatos,
                crear_opciones: || Some(Opciones::Ahorcado(OpcionesAhorcado::default())),
                crear_modelo: |jugadores, opciones, rng| {
                    Modelo::crear(TipoJuego::Ahorcado, jugadores, opciones, rng)
                },
                registrador: None,
            },
            TipoJuego::Chinchon => Self {
                metadatos,
                crear_opciones: || Some(Opciones::Chinchon(OpcionesChinchon::default())),
                crear_modelo: |jugadores, opciones, rng| {
                    Modelo::crear(TipoJuego::Chinchon, jugadores, opciones, rng)
                },
                registrador: None,
            },
        }
    }
}

/// Juegos disponibles. Se llena explícitamente con `registrar` o con
/// `con_juegos_por_defecto`.
#[derive(Debug, Clone, Default)]
pub struct RegistroJuegos {
    juegos: BTreeMap<TipoJuego, EntradaJuego>,
}

impl RegistroJuegos {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn con_juegos_por_defecto() -> Self {
        let mut registro = Self::new();
        for tipo in TipoJuego::TODOS {
            registro.registrar(tipo, EntradaJuego::por_defecto(tipo));
        }
        registro
    }

    /// Registra un juego. Devuelve la entrada que hubiera antes para ese juego.
    pub fn registrar(&mut self, tipo: TipoJuego, entrada: EntradaJuego) -> Option<EntradaJuego> {
        self.juegos.insert(tipo, entrada)
    }

    /// Cambia dónde guarda sus estadísticas un juego ya registrado.
    pub fn cambiar_registrador(
        &mut self,
        tipo: TipoJuego,
        registrador: Option<RegistradorCompartido>,
    ) -> bool {
        match self.juegos.get_mut(&tipo) {
            Some(entrada) => {
                entrada.registrador = registrador;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, tipo: TipoJuego) -> Option<&EntradaJuego> {
        self.juegos.get(&tipo)
    }

    pub fn tipos(&self) -> impl Iterator<Item = TipoJuego> + '_ {
        self.juegos.keys().copied()
    }

    /// Abre un lobby de un juego registrado, con `host` como primer jugador.
    pub fn manejador(&self, tipo: TipoJuego, host: Jugador) -> Result<Manejador, JuegoError> {
        let entrada = self
            .get(tipo)
            .ok_or(JuegoError::JuegoNoRegistrado(tipo))?;
        Ok(Manejador::new(tipo, entrada.clone(), host))
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn juegos_por_defecto() {
        let registro = RegistroJuegos::con_juegos_por_defecto();
        assert_eq!(registro.tipos().count(), 5);
        let ppt = registro.get(TipoJuego::Ppt).unwrap();
        assert!(ppt.registrador.is_some());
        assert!((ppt.crear_opciones)().is_none());
        assert!(registro.get(TipoJuego::CuatroEnLinea).unwrap().registrador.is_some());
        assert!(registro.get(TipoJuego::TaTeTi).unwrap().registrador.is_none());
        let chinchon = registro.get(TipoJuego::Chinchon).unwrap();
        assert_eq!(chinchon.metadatos.max_jugadores, 4);
        assert!(matches!((chinchon.crear_opciones)(), Some(Opciones::Chinchon(_))));
    }

    #[test]
    fn juego_no_registrado() {
        let registro = RegistroJuegos::new();
        let err = registro
            .manejador(TipoJuego::Ahorcado, Jugador::new("1", "Ana"))
            .unwrap_err();
        assert!(matches!(err, JuegoError::JuegoNoRegistrado(TipoJuego::Ahorcado)));
        assert_eq!(err.to_string(), "Juego no registrado: Ahorcado");
    }

    #[test]
    fn registrar_reemplaza() {
        let mut registro = RegistroJuegos::con_juegos_por_defecto();
        let anterior = registro.registrar(TipoJuego::TaTeTi, EntradaJuego::por_defecto(TipoJuego::TaTeTi));
        assert!(anterior.is_some());
        assert!(registro.cambiar_registrador(TipoJuego::TaTeTi, memoria()));
        assert!(registro.get(TipoJuego::TaTeTi).unwrap().registrador.is_some());
    }

    #[test]
    fn fabrica_de_modelos() {
        let registro = RegistroJuegos::con_juegos_por_defecto();
        let entrada = registro.get(TipoJuego::CuatroEnLinea).unwrap();
        let jugadores = vec![Jugador::new("1", "Ana"), Jugador::new("2", "Beto")];
        let opciones = (entrada.crear_opciones)();
        let modelo = (entrada.crear_modelo)(jugadores, opciones.as_ref(), StdRng::seed_from_u64(1))
            .unwrap();
        assert_eq!(modelo.tipo(), TipoJuego::CuatroEnLinea);
    }

    #[test]
    fn emoji_del_juego() {
        let mut rng = StdRng::seed_from_u64(5);
        let metadatos = TipoJuego::Chinchon.metadatos();
        for _ in 0..20 {
            let emoji = metadatos.elegir_emoji(&mut rng).unwrap();
            assert!(metadatos.emojis.contains(&emoji));
        }
        assert_eq!(TipoJuego::Ppt.to_string(), "Piedra, Papel o Tijeras");
    }
}
