use std::fmt;

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Juego, JuegoError, Jugador, OpcionesTaTeTi, Partida};

pub const FICHA_X: &str = "\u{274C}";
pub const FICHA_O: &str = "\u{2B55}";

const DIM: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovimientoTaTeTi {
    pub col: usize,
    pub fil: usize,
}

/// Tres en Raya.
#[derive(Debug, Clone)]
pub struct TaTeTi {
    partida: Partida,
    opciones: OpcionesTaTeTi,
    grilla: [[String; DIM]; DIM],
    turno_actual: usize,
    ficha_1: String,
    ficha_2: String,
    terminado: bool,
    empate: bool,
}

impl TaTeTi {
    pub fn turno_actual(&self) -> usize {
        self.turno_actual
    }

    pub fn opciones(&self) -> &OpcionesTaTeTi {
        &self.opciones
    }

    pub fn jugador_actual(&self) -> &Jugador {
        let paridad = self.turno_actual % 2;
        let ind = if self.opciones.empieza_primer_jugador {
            paridad
        } else {
            1 - paridad
        };
        &self.partida.jugadores()[ind]
    }

    fn orden_fichas(&self) -> (&str, &str) {
        if self.opciones.empieza_primer_jugador {
            (&self.ficha_1, &self.ficha_2)
        } else {
            (&self.ficha_2, &self.ficha_1)
        }
    }

    pub fn ficha_actual(&self) -> &str {
        let (prim, seg) = self.orden_fichas();
        if self.turno_actual % 2 == 0 { prim } else { seg }
    }

    pub fn ficha_anterior(&self) -> &str {
        let (prim, seg) = self.orden_fichas();
        if self.turno_actual % 2 == 1 { prim } else { seg }
    }

    fn coord_valida(col: usize, fil: usize) -> bool {
        col < DIM && fil < DIM
    }

    /// Contenido de una casilla, vacío si no hay ficha. `None` si está fuera de la grilla.
    pub fn casilla(&self, col: usize, fil: usize) -> Option<&str> {
        if !Self::coord_valida(col, fil) {
            return None;
        }
        Some(&self.grilla[fil][col])
    }

    pub fn casilla_esta_ocupada(&self, col: usize, fil: usize) -> bool {
        self.casilla(col, fil).is_some_and(|c| !c.is_empty())
    }

    fn es_ficha_actual(&self, col: usize, fil: usize) -> bool {
        self.casilla(col, fil) == Some(self.ficha_actual())
    }

    /// Coloca la ficha del turno actual, sin comprobar si la casilla estaba ocupada.
    fn mover(&mut self, col: usize, fil: usize) -> Result<(), JuegoError> {
        if !Self::coord_valida(col, fil) {
            return Err(JuegoError::CoordenadasNoValidas(col, fil));
        }
        self.grilla[fil][col] = self.ficha_actual().to_string();
        Ok(())
    }

    fn verificar_win(&mut self, col: usize, fil: usize) {
        let (mut cols, mut fils, mut diags, mut rdiags) = (0, 0, 0, 0);
        for i in 0..DIM {
            if self.es_ficha_actual(col, i) {
                cols += 1;
            }
            if self.es_ficha_actual(i, fil) {
                fils += 1;
            }
            if self.es_ficha_actual(i, i) {
                diags += 1;
            }
            if self.es_ficha_actual(i, DIM - 1 - i) {
                rdiags += 1;
            }
        }
        if [cols, fils, diags, rdiags].contains(&DIM) {
            self.terminado = true;
        } else if self.turno_actual >= DIM * DIM - 1 {
            self.terminado = true;
            self.empate = true;
        }
    }

    fn actualizar_mensaje_turno(&mut self) {
        let mensaje = if self.empate {
            "¡Empate!".to_string()
        } else if self.terminado {
            format!(
                "¡**{} [ {} ]** ganó la partida!",
                self.jugador_actual().nombre(),
                self.ficha_actual()
            )
        } else {
            format!(
                "Turno de **{} [ {} ]**",
                self.jugador_actual().nombre(),
                self.ficha_actual()
            )
        };
        self.partida.set_mensaje(mensaje);
    }
}

impl Juego for TaTeTi {
    const NOMBRE: &'static str = "Tres en Raya";
    const DESCRIPCION: &'static str = "Alinea tres fichas antes que tu rival en una grilla de 3x3.";
    const EMOJIS: &'static [&'static str] = &[FICHA_X, FICHA_O];
    const MIN_JUGADORES: usize = 2;
    const MAX_JUGADORES: usize = 2;

    type Opciones = OpcionesTaTeTi;
    type Accion = MovimientoTaTeTi;

    fn crear(
        jugadores: Vec<Jugador>,
        opciones: Option<&OpcionesTaTeTi>,
        rng: StdRng,
    ) -> Result<Self, JuegoError> {
        let partida = Partida::new::<Self>(jugadores, rng)?;
        let ficha_1 = partida.jugadores()[0].emoji().unwrap_or(FICHA_X).to_string();
        let ficha_2 = partida.jugadores()[1].emoji().unwrap_or(FICHA_O).to_string();
        Ok(Self {
            partida,
            opciones: opciones.cloned().unwrap_or_default(),
            grilla: Default::default(),
            turno_actual: 0,
            ficha_1,
            ficha_2,
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
        self.actualizar_mensaje_turno();
        true
    }

    fn actualizar(&mut self, accion: MovimientoTaTeTi) -> bool {
        if self.terminado {
            return false;
        }
        let MovimientoTaTeTi { col, fil } = accion;
        if !Self::coord_valida(col, fil) || self.casilla_esta_ocupada(col, fil) {
            self.partida.set_mensaje("*Movimiento Inválido.*");
            return false;
        }
        if self.mover(col, fil).is_err() {
            return false;
        }
        debug!(col, fil, turno = self.turno_actual, "Ficha colocada");
        self.verificar_win(col, fil);
        if !self.terminado {
            self.turno_actual += 1;
        }
        self.actualizar_mensaje_turno();
        true
    }

    fn terminado(&self) -> bool {
        self.terminado
    }

    fn empate(&self) -> bool {
        self.empate
    }

    fn reiniciar(&mut self, opciones: Option<&OpcionesTaTeTi>) {
        if let Some(opciones) = opciones {
            self.opciones = opciones.clone();
        }
        self.grilla = Default::default();
        self.turno_actual = 0;
        self.terminado = false;
        self.empate = false;
        self.iniciar();
    }

    fn ganador(&self) -> Option<&Jugador> {
        if self.terminado && !self.empate {
            Some(self.jugador_actual())
        } else {
            None
        }
    }

    fn jugadores_por_actuar(&self) -> Vec<&Jugador> {
        if self.terminado {
            return vec![];
        }
        vec![self.jugador_actual()]
    }

    fn jugadas_posibles(&self, id_jugador: &str) -> Vec<MovimientoTaTeTi> {
        if self.terminado || self.jugador_actual().id() != id_jugador {
            return vec![];
        }
        (0..DIM)
            .flat_map(|fil| (0..DIM).map(move |col| MovimientoTaTeTi { col, fil }))
            .filter(|m| !self.casilla_esta_ocupada(m.col, m.fil))
            .collect()
    }
}

impl fmt::Display for TaTeTi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, fila) in self.grilla.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            let fila: Vec<&str> = fila
                .iter()
                .map(|c| if c.is_empty() { "-" } else { c.as_str() })
                .collect();
            write!(f, "{}", fila.join(" "))?;
        }
        Ok(())
    }
}
