//! Mesa de juego para la terminal: agentes que eligen jugadas, kibitzers que miran la partida y
//! la arena que los junta alrededor de un `Manejador`.
use std::collections::HashMap;

use rand::rngs::StdRng;
use tracing::{debug, warn};

use crate::juegos::{JuegoError, Jugador, Manejador, Modelo};

mod agent;
pub use agent::*;

mod kibitzer;
pub use kibitzer::*;

/// Pasos por partida a partir de los cuales la arena corta la partida.
pub const MAX_PASOS_POR_DEFECTO: usize = 10_000;

/// Cómo terminó una partida jugada en la arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultadoPartida {
    /// Id del ganador, si lo hubo.
    pub ganador: Option<String>,
    pub empate: bool,
    /// Jugadas pedidas a los agentes, aceptadas o no.
    pub pasos: usize,
    /// `false` si la partida se cortó antes de terminar.
    pub completa: bool,
}

pub struct Arena {
    manejador: Manejador,
    agentes: HashMap<String, Box<dyn Agente>>,
    kibitzers: Vec<Box<dyn Kibitzer>>,
    max_pasos: usize,
}

impl Arena {
    pub fn new(manejador: Manejador, max_pasos: usize) -> Self {
        Self {
            manejador,
            agentes: HashMap::new(),
            kibitzers: vec![],
            max_pasos,
        }
    }

    pub fn manejador(&self) -> &Manejador {
        &self.manejador
    }

    pub fn manejador_mut(&mut self) -> &mut Manejador {
        &mut self.manejador
    }

    /// Asigna el agente que juega por `id_jugador`. Devuelve el que hubiera antes.
    pub fn agregar_agente(
        &mut self,
        id_jugador: impl Into<String>,
        agente: Box<dyn Agente>,
    ) -> Option<Box<dyn Agente>> {
        self.agentes.insert(id_jugador.into(), agente)
    }

    pub fn agregar_kibitzer(&mut self, kibitzer: Box<dyn Kibitzer>) {
        self.kibitzers.push(kibitzer);
    }

    fn notificar(&mut self, evento: &EventoArena) {
        if let Some(modelo) = self.manejador.modelo() {
            self.kibitzers
                .iter_mut()
                .for_each(|k| k.registrar(modelo, evento));
        }
    }

    fn ids_por_actuar(modelo: &Modelo) -> Vec<String> {
        modelo
            .jugadores_por_actuar()
            .into_iter()
            .map(|j| j.id().to_string())
            .collect()
    }

    /// Juega una partida completa. La primera vez crea el modelo con `rng`; las siguientes juega
    /// la revancha sobre el mismo modelo.
    pub fn jugar_partida(&mut self, rng: StdRng) -> Result<ResultadoPartida, JuegoError> {
        if self.manejador.modelo().is_some() {
            self.manejador.revancha()?;
        } else {
            self.manejador.iniciar_modelo(rng)?;
        }
        self.notificar(&EventoArena::Inicio);

        let mut pasos = 0;
        'partida: loop {
            let modelo = self.manejador.modelo().ok_or(JuegoError::ModeloNoIniciado)?;
            if modelo.terminado() {
                break;
            }
            let ids = Self::ids_por_actuar(modelo);
            if ids.is_empty() {
                warn!(juego = %self.manejador.tipo(), "Nadie puede actuar y la partida no terminó");
                break;
            }
            for id in ids {
                if pasos >= self.max_pasos {
                    warn!(juego = %self.manejador.tipo(), pasos, "Partida cortada por límite de pasos");
                    break 'partida;
                }
                let modelo = self.manejador.modelo().ok_or(JuegoError::ModeloNoIniciado)?;
                if modelo.terminado() {
                    break 'partida;
                }
                let Some(agente) = self.agentes.get_mut(&id) else {
                    warn!(juego = %self.manejador.tipo(), jugador = %id, "Jugador sin agente");
                    break 'partida;
                };
                let Some(accion) = agente.actuar(modelo, &id) else {
                    warn!(juego = %self.manejador.tipo(), jugador = %id, "El agente no eligió ninguna jugada");
                    break 'partida;
                };
                pasos += 1;
                let aceptada = self.manejador.procesar(accion.clone())?;
                debug!(jugador = %id, %accion, aceptada, "Jugada");
                self.notificar(&EventoArena::Jugada {
                    id_jugador: id,
                    accion,
                    aceptada,
                });
            }
        }

        self.notificar(&EventoArena::Fin);
        let modelo = self.manejador.modelo().ok_or(JuegoError::ModeloNoIniciado)?;
        Ok(ResultadoPartida {
            ganador: modelo.ganador().map(Jugador::id).map(str::to_string),
            empate: modelo.empate(),
            pasos,
            completa: modelo.terminado(),
        })
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;
    use crate::juegos::{Registrador, RegistroJuegos, TipoJuego};

    fn arena(tipo: TipoJuego, jugadores: usize, max_pasos: usize) -> Arena {
        let registro = RegistroJuegos::con_juegos_por_defecto();
        let mut manejador = registro.manejador(tipo, Jugador::new("0", "J0")).unwrap();
        for i in 1..jugadores {
            assert!(manejador.agregar_jugador(Jugador::new(i.to_string(), &format!("J{i}"))));
        }
        let mut arena = Arena::new(manejador, max_pasos);
        for i in 0..jugadores {
            let agente = AgenteAleatorio::new(StdRng::seed_from_u64(i as u64 + 10));
            arena.agregar_agente(i.to_string(), Box::new(agente));
        }
        arena
    }

    #[test]
    fn partidas_aleatorias_terminan() {
        for tipo in [TipoJuego::TaTeTi, TipoJuego::CuatroEnLinea, TipoJuego::Ppt] {
            let mut arena = arena(tipo, 2, MAX_PASOS_POR_DEFECTO);
            let resultado = arena.jugar_partida(StdRng::seed_from_u64(3)).unwrap();
            assert!(resultado.completa, "{tipo}");
            assert!(resultado.empate || resultado.ganador.is_some(), "{tipo}");
        }
    }

    #[test]
    fn revanchas_y_marcador() {
        let mut arena = arena(TipoJuego::Ppt, 2, MAX_PASOS_POR_DEFECTO);
        let marcador = Marcador::new();
        let totales = marcador.totales();
        arena.agregar_kibitzer(Box::new(marcador));
        for i in 0..5 {
            arena.jugar_partida(StdRng::seed_from_u64(i)).unwrap();
        }
        let totales = totales.borrow();
        assert_eq!(totales.partidas, 5);
        assert_eq!(
            totales.empates + totales.victorias_de("0") + totales.victorias_de("1"),
            5
        );

        let registrador = arena.manejador().registrador().unwrap().borrow();
        let datos = registrador.get_datos("0");
        assert_eq!(datos.victorias + datos.empates + datos.derrotas, 5);
    }

    #[test]
    fn limite_de_pasos() {
        let mut arena = arena(TipoJuego::Chinchon, 3, 5);
        let resultado = arena.jugar_partida(StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(resultado.pasos, 5);
        assert!(!resultado.completa);
        assert_eq!(resultado.ganador, None);
    }

    #[test]
    fn jugador_sin_agente_corta_la_partida() {
        let registro = RegistroJuegos::con_juegos_por_defecto();
        let mut manejador = registro
            .manejador(TipoJuego::TaTeTi, Jugador::new("0", "J0"))
            .unwrap();
        manejador.agregar_jugador(Jugador::new("1", "J1"));
        let mut arena = Arena::new(manejador, MAX_PASOS_POR_DEFECTO);
        let resultado = arena.jugar_partida(StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(resultado.pasos, 0);
        assert!(!resultado.completa);
    }
}
