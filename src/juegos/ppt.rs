use std::fmt;

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Juego, JuegoError, Jugador, Partida};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EleccionPpt {
    Piedra,
    Papel,
    Tijeras,
}

impl EleccionPpt {
    pub const TODAS: [EleccionPpt; 3] = [EleccionPpt::Piedra, EleccionPpt::Papel, EleccionPpt::Tijeras];

    pub fn emoji(&self) -> &'static str {
        match self {
            EleccionPpt::Piedra => "\u{1FAA8}",
            EleccionPpt::Papel => "\u{1F9FB}",
            EleccionPpt::Tijeras => "\u{2702}",
        }
    }

    fn indice(&self) -> usize {
        match self {
            EleccionPpt::Piedra => 0,
            EleccionPpt::Papel => 1,
            EleccionPpt::Tijeras => 2,
        }
    }
}

impl fmt::Display for EleccionPpt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nombre = match self {
            EleccionPpt::Piedra => "Piedra",
            EleccionPpt::Papel => "Papel",
            EleccionPpt::Tijeras => "Tijeras",
        };
        write!(f, "{} {nombre}", self.emoji())
    }
}

/// Índice del jugador que gana según lo que eligió cada uno, `None` si es empate.
const GRILLA_WIN: [[Option<usize>; 3]; 3] = [
    // PIEDRA - PAPEL - TIJERAS
    [None, Some(1), Some(0)], // PIEDRA
    [Some(0), None, Some(1)], // PAPEL
    [Some(1), Some(0), None], // TIJERAS
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EleccionJugador {
    pub id_jugador: String,
    pub eleccion: EleccionPpt,
}

/// Piedra, Papel o Tijeras. Los dos jugadores eligen en cualquier orden y la ronda se resuelve
/// en cuanto ambos decidieron.
#[derive(Debug, Clone)]
pub struct Ppt {
    partida: Partida,
    elecciones: [Option<EleccionPpt>; 2],
    terminado: bool,
    empate: bool,
}

impl Ppt {
    pub fn ya_decidieron(&self) -> bool {
        self.elecciones.iter().all(Option::is_some)
    }

    pub fn eleccion(&self, id_jugador: &str) -> Option<EleccionPpt> {
        let ind = self.indice_jugador(id_jugador)?;
        self.elecciones[ind]
    }

    fn indice_jugador(&self, id_jugador: &str) -> Option<usize> {
        self.partida
            .jugadores()
            .iter()
            .position(|j| j.id() == id_jugador)
    }

    /// Ganador de la ronda, `None` si alguien no decidió todavía o si fue empate.
    pub fn determinar_ganador(&self) -> Option<&Jugador> {
        let [Some(e1), Some(e2)] = self.elecciones else {
            return None;
        };
        GRILLA_WIN[e1.indice()][e2.indice()].map(|i| &self.partida.jugadores()[i])
    }

    pub fn determinar_perdedor(&self) -> Option<&Jugador> {
        let [Some(e1), Some(e2)] = self.elecciones else {
            return None;
        };
        GRILLA_WIN[e2.indice()][e1.indice()].map(|i| &self.partida.jugadores()[i])
    }

    fn verificar_win(&mut self) {
        if !self.ya_decidieron() {
            return;
        }
        self.terminado = true;
        let [Some(e1), Some(e2)] = self.elecciones else {
            return;
        };
        let mensaje = match GRILLA_WIN[e1.indice()][e2.indice()] {
            Some(ind) => {
                let eleccion = if ind == 0 { e1 } else { e2 };
                let nombre = self.partida.jugadores()[ind].nombre();
                format!("¡**{nombre}** ganó con {eleccion}!")
            }
            None => {
                self.empate = true;
                format!("¡Empate! Ambos eligieron {e1}.")
            }
        };
        self.partida.set_mensaje(mensaje);
    }
}

impl Juego for Ppt {
    const NOMBRE: &'static str = "Piedra, Papel o Tijeras";
    const DESCRIPCION: &'static str =
        "Vence a tu oponente: Piedra > Tijeras, Tijeras > Papel, Papel > Piedra.";
    const EMOJIS: &'static [&'static str] = &["\u{1FAA8}", "\u{1F9FB}", "\u{2702}"];
    const MIN_JUGADORES: usize = 2;
    const MAX_JUGADORES: usize = 2;

    type Opciones = ();
    type Accion = EleccionJugador;

    fn crear(jugadores: Vec<Jugador>, _opciones: Option<&()>, rng: StdRng) -> Result<Self, JuegoError> {
        Ok(Self {
            partida: Partida::new::<Self>(jugadores, rng)?,
            elecciones: [None, None],
            terminado: false,
            empate: false,
        })
    }

    fn partida(&self) -> &Partida {
        &self.partida
    }

    fn partida_mut(&mut self) -> &mut Partida {
        &mut self.partida
    }

    fn iniciar(&mut self) -> bool {
        self.partida
            .set_mensaje("**¡Cada uno elija!** Piedra, Papel o Tijeras.");
        true
    }

    /// Registra lo que eligió un jugador. No se acepta si el jugador no está en la partida, si ya
    /// había elegido o si la ronda terminó.
    fn actualizar(&mut self, accion: EleccionJugador) -> bool {
        if self.terminado {
            return false;
        }
        let Some(ind) = self.indice_jugador(&accion.id_jugador) else {
            return false;
        };
        let nombre = self.partida.jugadores()[ind].nombre().to_string();
        if self.elecciones[ind].is_some() {
            self.partida
                .set_mensaje(format!("¡**{nombre}** ya había decidido!"));
            return false;
        }
        debug!(jugador = %accion.id_jugador, eleccion = ?accion.eleccion, "Elección");
        self.elecciones[ind] = Some(accion.eleccion);
        self.partida.set_mensaje(format!("¡**{nombre}** ya decidió!"));
        self.verificar_win();
        true
    }

    fn terminado(&self) -> bool {
        self.terminado
    }

    fn empate(&self) -> bool {
        self.empate
    }

    fn reiniciar(&mut self, _opciones: Option<&()>) {
        self.elecciones = [None, None];
        self.terminado = false;
        self.empate = false;
        self.iniciar();
    }

    fn ganador(&self) -> Option<&Jugador> {
        self.determinar_ganador()
    }

    fn jugadores_por_actuar(&self) -> Vec<&Jugador> {
        if self.terminado {
            return vec![];
        }
        self.partida
            .jugadores()
            .iter()
            .zip(self.elecciones.iter())
            .filter(|(_, e)| e.is_none())
            .map(|(j, _)| j)
            .collect()
    }

    fn jugadas_posibles(&self, id_jugador: &str) -> Vec<EleccionJugador> {
        match self.indice_jugador(id_jugador) {
            Some(ind) if !self.terminado && self.elecciones[ind].is_none() => EleccionPpt::TODAS
                .iter()
                .map(|&eleccion| EleccionJugador {
                    id_jugador: id_jugador.to_string(),
                    eleccion,
                })
                .collect(),
            _ => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;
    use EleccionPpt::*;

    fn nuevo() -> Ppt {
        let jugadores = vec![Jugador::new("1", "Ana"), Jugador::new("2", "Beto")];
        let mut juego = Ppt::crear(jugadores, None, StdRng::seed_from_u64(0)).unwrap();
        juego.iniciar();
        juego
    }

    fn elegir(juego: &mut Ppt, id: &str, eleccion: EleccionPpt) -> bool {
        juego.actualizar(EleccionJugador {
            id_jugador: id.to_string(),
            eleccion,
        })
    }

    #[test]
    fn tabla_de_victorias() {
        let casos = [
            (Piedra, Tijeras, Some("1")),
            (Tijeras, Papel, Some("1")),
            (Papel, Piedra, Some("1")),
            (Tijeras, Piedra, Some("2")),
            (Papel, Tijeras, Some("2")),
            (Piedra, Papel, Some("2")),
            (Piedra, Piedra, None),
            (Papel, Papel, None),
            (Tijeras, Tijeras, None),
        ];
        for (e1, e2, ganador) in casos {
            let mut juego = nuevo();
            assert!(elegir(&mut juego, "2", e2));
            assert!(!juego.terminado());
            assert!(elegir(&mut juego, "1", e1));
            assert!(juego.terminado());
            assert_eq!(juego.empate(), ganador.is_none());
            assert_eq!(juego.ganador().map(|j| j.id()), ganador);
            if ganador.is_some() {
                assert_ne!(
                    juego.determinar_perdedor().map(|j| j.id()),
                    juego.determinar_ganador().map(|j| j.id())
                );
            }
        }
    }

    #[test]
    fn eleccion_repetida_o_desconocida() {
        let mut juego = nuevo();
        assert!(!elegir(&mut juego, "3", Piedra));
        assert!(elegir(&mut juego, "1", Piedra));
        assert!(!elegir(&mut juego, "1", Papel));
        assert_eq!(juego.eleccion("1"), Some(Piedra));
        assert_eq!(juego.jugadores_por_actuar().len(), 1);
        assert!(juego.jugadas_posibles("1").is_empty());
        assert_eq!(juego.jugadas_posibles("2").len(), 3);
    }

    #[test]
    fn reiniciar_limpia_las_elecciones() {
        let mut juego = nuevo();
        elegir(&mut juego, "1", Piedra);
        elegir(&mut juego, "2", Tijeras);
        assert!(juego.terminado());
        juego.reiniciar(None);
        assert!(!juego.terminado());
        assert!(!juego.ya_decidieron());
        assert_eq!(juego.eleccion("1"), None);
        assert_eq!(juego.eleccion("2"), None);
        assert_eq!(juego.cantidad_jugadores(), 2);
        assert!(!elegir(&mut juego, "3", Piedra));
    }
}
