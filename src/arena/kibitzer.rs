use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::juegos::{Accion, Jugador, Modelo};

/// Lo que pasa en la mesa durante una partida.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventoArena {
    /// Empieza una partida.
    Inicio,
    Jugada {
        id_jugador: String,
        accion: Accion,
        aceptada: bool,
    },
    /// Terminó la partida, o se cortó por llegar al límite de pasos.
    Fin,
}

pub trait Kibitzer {
    fn registrar(&mut self, modelo: &Modelo, evento: &EventoArena);
}

/// Muestra la partida por la terminal. Si hay un jugador humano, se le avisa cuándo le toca.
#[derive(Debug, Clone, Default)]
pub struct KibitzerCli {
    id_cli: Option<String>,
}

impl KibitzerCli {
    pub fn new(id_cli: Option<String>) -> Self {
        Self { id_cli }
    }

    fn nombre(modelo: &Modelo, id_jugador: &str) -> String {
        modelo
            .jugadores()
            .iter()
            .find(|j| j.id() == id_jugador)
            .map(|j| j.nombre().to_string())
            .unwrap_or_else(|| id_jugador.to_string())
    }

    fn avisar_turno(&self, modelo: &Modelo) {
        let Some(id_cli) = &self.id_cli else {
            return;
        };
        if !modelo.terminado() && modelo.jugadores_por_actuar().iter().any(|j| j.id() == id_cli)
        {
            println!("👉 Te toca.");
        }
    }
}

impl Kibitzer for KibitzerCli {
    fn registrar(&mut self, modelo: &Modelo, evento: &EventoArena) {
        match evento {
            EventoArena::Inicio => {
                println!();
                println!("🥊🥊🥊 Game starts! Fight! 🥊🥊🥊");
                println!("{}", modelo.mensaje());
                println!("{modelo}");
                self.avisar_turno(modelo);
            }
            EventoArena::Jugada {
                id_jugador,
                accion,
                aceptada,
            } => {
                println!(
                    "❗❗❗{} ha actuado: {accion}",
                    Self::nombre(modelo, id_jugador)
                );
                if !aceptada {
                    println!("Jugada no válida.");
                }
                if !modelo.mensaje().is_empty() {
                    println!("{}", modelo.mensaje());
                }
                println!("{modelo}");
                self.avisar_turno(modelo);
            }
            EventoArena::Fin => {
                if modelo.empate() {
                    println!("🤝 ¡Empate!");
                } else if let Some(ganador) = modelo.ganador() {
                    println!("🏆 ¡Ganó {}!", ganador.nombre());
                } else {
                    println!("Partida terminada.");
                }
            }
        }
    }
}

/// Cuentas de todas las partidas que vio un `Marcador`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Totales {
    pub partidas: u32,
    pub empates: u32,
    /// Victorias por id de jugador.
    pub victorias: BTreeMap<String, u32>,
}

impl Totales {
    pub fn victorias_de(&self, id_jugador: &str) -> u32 {
        self.victorias.get(id_jugador).copied().unwrap_or(0)
    }
}

/// Kibitzer que lleva la cuenta de victorias y empates. Las cuentas se comparten a través de
/// totales(), así se pueden leer después de entregar el marcador a la arena.
#[derive(Debug)]
pub struct Marcador {
    totales: Rc<RefCell<Totales>>,
}

impl Marcador {
    pub fn new() -> Self {
        Self {
            totales: Rc::new(RefCell::new(Totales::default())),
        }
    }

    pub fn totales(&self) -> Rc<RefCell<Totales>> {
        self.totales.clone()
    }
}

impl Default for Marcador {
    fn default() -> Self {
        Self::new()
    }
}

impl Kibitzer for Marcador {
    fn registrar(&mut self, modelo: &Modelo, evento: &EventoArena) {
        if *evento != EventoArena::Fin || !modelo.terminado() {
            return;
        }
        let mut totales = self.totales.borrow_mut();
        totales.partidas += 1;
        if modelo.empate() {
            totales.empates += 1;
        } else if let Some(id) = modelo.ganador().map(Jugador::id) {
            *totales.victorias.entry(id.to_string()).or_default() += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::juegos::TipoJuego;

    fn tateti() -> Modelo {
        let jugadores = vec![Jugador::new("1", "Ana"), Jugador::new("2", "Beto")];
        let mut modelo =
            Modelo::crear(TipoJuego::TaTeTi, jugadores, None, StdRng::seed_from_u64(0)).unwrap();
        modelo.iniciar();
        modelo
    }

    #[test]
    fn marcador_ignora_partidas_sin_terminar() {
        let mut marcador = Marcador::new();
        let totales = marcador.totales();
        let modelo = tateti();
        marcador.registrar(&modelo, &EventoArena::Inicio);
        marcador.registrar(&modelo, &EventoArena::Fin);
        assert_eq!(*totales.borrow(), Totales::default());
    }

    #[test]
    fn marcador_cuenta_victorias() {
        let mut marcador = Marcador::new();
        let totales = marcador.totales();
        let mut modelo = tateti();
        while !modelo.terminado() {
            let id = modelo.jugadores_por_actuar()[0].id().to_string();
            let accion = modelo.jugadas_posibles(&id).remove(0);
            assert!(modelo.actualizar(accion));
        }
        marcador.registrar(&modelo, &EventoArena::Fin);
        let totales = totales.borrow();
        assert_eq!(totales.partidas, 1);
        let ganador = modelo.ganador().map(Jugador::id);
        match ganador {
            Some(id) => assert_eq!(totales.victorias_de(id), 1),
            None => assert_eq!(totales.empates, 1),
        }
    }
}
