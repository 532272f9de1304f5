use std::fmt;

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use super::{
    AccionChinchon, Ahorcado, Chinchon, CuatroEnLinea, EleccionJugador, Juego, JuegoError,
    Jugador, MovimientoTaTeTi, Opciones, Ppt, TaTeTi, TipoJuego,
};

/// Jugada de cualquiera de los juegos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Accion {
    TaTeTi(MovimientoTaTeTi),
    CuatroEnLinea(usize),
    Ppt(EleccionJugador),
    Ahorcado(char),
    Chinchon(AccionChinchon),
}

impl fmt::Display for Accion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Accion::TaTeTi(m) => write!(f, "Columna {}, fila {}", m.col + 1, m.fil + 1),
            Accion::CuatroEnLinea(col) => write!(f, "Columna {}", col + 1),
            Accion::Ppt(e) => write!(f, "{}", e.eleccion),
            Accion::Ahorcado(letra) => write!(f, "Letra {letra}"),
            Accion::Chinchon(a) => write!(f, "{}", a.jugada),
        }
    }
}

/// Modelo de una partida de cualquiera de los juegos.
#[derive(Debug, Clone)]
pub enum Modelo {
    TaTeTi(TaTeTi),
    CuatroEnLinea(CuatroEnLinea),
    Ppt(Ppt),
    Ahorcado(Ahorcado),
    Chinchon(Chinchon),
}

fn acciones<A>(jugadas: Vec<A>, f: impl Fn(A) -> Accion) -> Vec<Accion> {
    jugadas.into_iter().map(f).collect()
}

impl Modelo {
    /// Crea el modelo de un juego. Las opciones que no correspondan al juego se ignoran y se usan
    /// las de por defecto.
    pub fn crear(
        tipo: TipoJuego,
        jugadores: Vec<Jugador>,
        opciones: Option<&Opciones>,
        rng: StdRng,
    ) -> Result<Modelo, JuegoError> {
        let modelo = match (tipo, opciones) {
            (TipoJuego::TaTeTi, Some(Opciones::TaTeTi(o))) => {
                Modelo::TaTeTi(TaTeTi::crear(jugadores, Some(o), rng)?)
            }
            (TipoJuego::TaTeTi, _) => Modelo::TaTeTi(TaTeTi::crear(jugadores, None, rng)?),
            (TipoJuego::CuatroEnLinea, Some(Opciones::CuatroEnLinea(o))) => {
                Modelo::CuatroEnLinea(CuatroEnLinea::crear(jugadores, Some(o), rng)?)
            }
            (TipoJuego::CuatroEnLinea, _) => {
                Modelo::CuatroEnLinea(CuatroEnLinea::crear(jugadores, None, rng)?)
            }
            (TipoJuego::Ppt, _) => Modelo::Ppt(Ppt::crear(jugadores, None, rng)?),
            (TipoJuego::Ahorcado, Some(Opciones::Ahorcado(o))) => {
                Modelo::Ahorcado(Ahorcado::crear(jugadores, Some(o), rng)?)
            }
            (TipoJuego::Ahorcado, _) => Modelo::Ahorcado(Ahorcado::crear(jugadores, None, rng)?),
            (TipoJuego::Chinchon, Some(Opciones::Chinchon(o))) => {
                Modelo::Chinchon(Chinchon::crear(jugadores, Some(o), rng)?)
            }
            (TipoJuego::Chinchon, _) => Modelo::Chinchon(Chinchon::crear(jugadores, None, rng)?),
        };
        Ok(modelo)
    }

    pub fn tipo(&self) -> TipoJuego {
        match self {
            Modelo::TaTeTi(_) => TipoJuego::TaTeTi,
            Modelo::CuatroEnLinea(_) => TipoJuego::CuatroEnLinea,
            Modelo::Ppt(_) => TipoJuego::Ppt,
            Modelo::Ahorcado(_) => TipoJuego::Ahorcado,
            Modelo::Chinchon(_) => TipoJuego::Chinchon,
        }
    }

    pub fn iniciar(&mut self) -> bool {
        match self {
            Modelo::TaTeTi(j) => j.iniciar(),
            Modelo::CuatroEnLinea(j) => j.iniciar(),
            Modelo::Ppt(j) => j.iniciar(),
            Modelo::Ahorcado(j) => j.iniciar(),
            Modelo::Chinchon(j) => j.iniciar(),
        }
    }

    /// Aplica una jugada. Una jugada de otro juego no se acepta.
    pub fn actualizar(&mut self, accion: Accion) -> bool {
        match (self, accion) {
            (Modelo::TaTeTi(j), Accion::TaTeTi(a)) => j.actualizar(a),
            (Modelo::CuatroEnLinea(j), Accion::CuatroEnLinea(a)) => j.actualizar(a),
            (Modelo::Ppt(j), Accion::Ppt(a)) => j.actualizar(a),
            (Modelo::Ahorcado(j), Accion::Ahorcado(a)) => j.actualizar(a),
            (Modelo::Chinchon(j), Accion::Chinchon(a)) => j.actualizar(a),
            _ => false,
        }
    }

    pub fn terminado(&self) -> bool {
        match self {
            Modelo::TaTeTi(j) => j.terminado(),
            Modelo::CuatroEnLinea(j) => j.terminado(),
            Modelo::Ppt(j) => j.terminado(),
            Modelo::Ahorcado(j) => j.terminado(),
            Modelo::Chinchon(j) => j.terminado(),
        }
    }

    pub fn empate(&self) -> bool {
        match self {
            Modelo::TaTeTi(j) => j.empate(),
            Modelo::CuatroEnLinea(j) => j.empate(),
            Modelo::Ppt(j) => j.empate(),
            Modelo::Ahorcado(j) => j.empate(),
            Modelo::Chinchon(j) => j.empate(),
        }
    }

    /// Vuelve a empezar con las opciones dadas, si son de este juego.
    pub fn reiniciar(&mut self, opciones: Option<&Opciones>) {
        match (self, opciones) {
            (Modelo::TaTeTi(j), Some(Opciones::TaTeTi(o))) => j.reiniciar(Some(o)),
            (Modelo::TaTeTi(j), _) => j.reiniciar(None),
            (Modelo::CuatroEnLinea(j), Some(Opciones::CuatroEnLinea(o))) => j.reiniciar(Some(o)),
            (Modelo::CuatroEnLinea(j), _) => j.reiniciar(None),
            (Modelo::Ppt(j), _) => j.reiniciar(None),
            (Modelo::Ahorcado(j), Some(Opciones::Ahorcado(o))) => j.reiniciar(Some(o)),
            (Modelo::Ahorcado(j), _) => j.reiniciar(None),
            (Modelo::Chinchon(j), Some(Opciones::Chinchon(o))) => j.reiniciar(Some(o)),
            (Modelo::Chinchon(j), _) => j.reiniciar(None),
        }
    }

    pub fn mensaje(&self) -> &str {
        match self {
            Modelo::TaTeTi(j) => j.mensaje(),
            Modelo::CuatroEnLinea(j) => j.mensaje(),
            Modelo::Ppt(j) => j.mensaje(),
            Modelo::Ahorcado(j) => j.mensaje(),
            Modelo::Chinchon(j) => j.mensaje(),
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Modelo::TaTeTi(j) => j.id(),
            Modelo::CuatroEnLinea(j) => j.id(),
            Modelo::Ppt(j) => j.id(),
            Modelo::Ahorcado(j) => j.id(),
            Modelo::Chinchon(j) => j.id(),
        }
    }

    pub fn jugadores(&self) -> &[Jugador] {
        match self {
            Modelo::TaTeTi(j) => j.jugadores(),
            Modelo::CuatroEnLinea(j) => j.jugadores(),
            Modelo::Ppt(j) => j.jugadores(),
            Modelo::Ahorcado(j) => j.jugadores(),
            Modelo::Chinchon(j) => j.jugadores(),
        }
    }

    pub fn existe_jugador(&self, id_jugador: &str) -> bool {
        self.jugadores().iter().any(|j| j.id() == id_jugador)
    }

    pub fn ganador(&self) -> Option<&Jugador> {
        match self {
            Modelo::TaTeTi(j) => j.ganador(),
            Modelo::CuatroEnLinea(j) => j.ganador(),
            Modelo::Ppt(j) => j.ganador(),
            Modelo::Ahorcado(j) => j.ganador(),
            Modelo::Chinchon(j) => j.ganador(),
        }
    }

    pub fn jugadores_por_actuar(&self) -> Vec<&Jugador> {
        match self {
            Modelo::TaTeTi(j) => j.jugadores_por_actuar(),
            Modelo::CuatroEnLinea(j) => j.jugadores_por_actuar(),
            Modelo::Ppt(j) => j.jugadores_por_actuar(),
            Modelo::Ahorcado(j) => j.jugadores_por_actuar(),
            Modelo::Chinchon(j) => j.jugadores_por_actuar(),
        }
    }

    pub fn jugadas_posibles(&self, id_jugador: &str) -> Vec<Accion> {
        match self {
            Modelo::TaTeTi(j) => acciones(j.jugadas_posibles(id_jugador), Accion::TaTeTi),
            Modelo::CuatroEnLinea(j) => {
                acciones(j.jugadas_posibles(id_jugador), Accion::CuatroEnLinea)
            }
            Modelo::Ppt(j) => acciones(j.jugadas_posibles(id_jugador), Accion::Ppt),
            Modelo::Ahorcado(j) => acciones(j.jugadas_posibles(id_jugador), Accion::Ahorcado),
            Modelo::Chinchon(j) => acciones(j.jugadas_posibles(id_jugador), Accion::Chinchon),
        }
    }
}

impl fmt::Display for Modelo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Modelo::TaTeTi(j) => write!(f, "{j}"),
            Modelo::CuatroEnLinea(j) => write!(f, "{j}"),
            Modelo::Ppt(j) => write!(f, "{}", j.mensaje()),
            Modelo::Ahorcado(j) => write!(f, "{j}"),
            Modelo::Chinchon(j) => write!(f, "{j}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;
    use crate::juegos::{EleccionPpt, OpcionesAhorcado, OpcionesTaTeTi};

    fn jugadores() -> Vec<Jugador> {
        vec![Jugador::new("1", "Ana"), Jugador::new("2", "Beto")]
    }

    #[test]
    fn jugada_de_otro_juego_no_se_acepta() {
        let mut modelo =
            Modelo::crear(TipoJuego::TaTeTi, jugadores(), None, StdRng::seed_from_u64(0)).unwrap();
        modelo.iniciar();
        assert!(!modelo.actualizar(Accion::CuatroEnLinea(0)));
        assert!(modelo.actualizar(Accion::TaTeTi(MovimientoTaTeTi { col: 0, fil: 0 })));
        assert_eq!(modelo.tipo(), TipoJuego::TaTeTi);
    }

    #[test]
    fn opciones_de_otro_juego_se_ignoran() {
        let opciones = Opciones::Ahorcado(OpcionesAhorcado {
            frase: "hola".to_string(),
            ..Default::default()
        });
        let modelo = Modelo::crear(
            TipoJuego::TaTeTi,
            jugadores(),
            Some(&opciones),
            StdRng::seed_from_u64(0),
        );
        assert!(modelo.is_ok());

        let mut modelo = Modelo::crear(
            TipoJuego::Ahorcado,
            jugadores(),
            Some(&opciones),
            StdRng::seed_from_u64(0),
        )
        .unwrap();
        modelo.iniciar();
        assert_eq!(modelo.jugadas_posibles("1").len(), 27);
        assert!(modelo.actualizar(Accion::Ahorcado('h')));
        modelo.reiniciar(Some(&Opciones::TaTeTi(OpcionesTaTeTi::default())));
        assert!(!modelo.terminado());
    }

    #[test]
    fn jugadas_posibles_envueltas() {
        let mut modelo =
            Modelo::crear(TipoJuego::Ppt, jugadores(), None, StdRng::seed_from_u64(0)).unwrap();
        modelo.iniciar();
        let posibles = modelo.jugadas_posibles("2");
        assert_eq!(posibles.len(), 3);
        assert!(posibles.iter().all(|a| matches!(a, Accion::Ppt(_))));
        assert!(modelo.actualizar(Accion::Ppt(EleccionJugador {
            id_jugador: "1".to_string(),
            eleccion: EleccionPpt::Piedra,
        })));
        assert_eq!(modelo.jugadores_por_actuar().len(), 1);
        assert!(modelo.existe_jugador("2"));
        assert!(!modelo.existe_jugador("3"));
        assert_eq!(modelo.id().len(), 64);
    }

    #[test]
    fn cantidad_de_jugadores_invalida() {
        let err = Modelo::crear(
            TipoJuego::Chinchon,
            vec![Jugador::new("1", "Ana")],
            None,
            StdRng::seed_from_u64(0),
        )
        .unwrap_err();
        assert!(matches!(err, JuegoError::CantidadJugadores { min: 2, max: 4, .. }));
    }

    #[test]
    fn acciones_legibles() {
        assert_eq!(
            Accion::TaTeTi(MovimientoTaTeTi { col: 0, fil: 2 }).to_string(),
            "Columna 1, fila 3"
        );
        assert_eq!(Accion::CuatroEnLinea(6).to_string(), "Columna 7");
        assert_eq!(Accion::Ahorcado('Ñ').to_string(), "Letra Ñ");
    }
}
