use std::io::{self, BufRead};

use rand::Rng;
use rand::rngs::StdRng;

use crate::juegos::{Accion, Modelo, letra_de_texto};

pub trait Agente {
    /// Elige la próxima jugada de `id_jugador`. `None` si el agente no puede o no quiere seguir.
    fn actuar(&mut self, modelo: &Modelo, id_jugador: &str) -> Option<Accion>;
}

/// Agente que juega cualquiera de las jugadas posibles, todas con la misma probabilidad.
#[derive(Debug, Clone)]
pub struct AgenteAleatorio {
    rng: StdRng,
}

impl AgenteAleatorio {
    pub fn new(rng: StdRng) -> Self {
        Self { rng }
    }
}

impl Agente for AgenteAleatorio {
    fn actuar(&mut self, modelo: &Modelo, id_jugador: &str) -> Option<Accion> {
        let mut acciones = modelo.jugadas_posibles(id_jugador);
        if acciones.is_empty() {
            return None;
        }
        let idx = self.rng.gen_range(0..acciones.len());
        Some(acciones.swap_remove(idx))
    }
}

/// Agente que pregunta la jugada por la terminal.
#[derive(Debug, Clone, Default)]
pub struct AgenteCli;

impl AgenteCli {
    pub fn new() -> Self {
        Self
    }

    fn leer_linea() -> Option<String> {
        let mut input = String::new();
        match io::stdin().lock().read_line(&mut input) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(input),
        }
    }

    fn pedir_letra(acciones: &[Accion]) -> Option<Accion> {
        loop {
            println!("Escriba una letra:");
            let input = Self::leer_linea()?;
            match letra_de_texto(&input) {
                Ok(letra) if acciones.contains(&Accion::Ahorcado(letra)) => {
                    return Some(Accion::Ahorcado(letra));
                }
                Ok(letra) => println!("La letra {letra} ya fue usada."),
                Err(err) => println!("{err}"),
            }
        }
    }
}

impl Agente for AgenteCli {
    fn actuar(&mut self, modelo: &Modelo, id_jugador: &str) -> Option<Accion> {
        let mut acciones = modelo.jugadas_posibles(id_jugador);
        if acciones.is_empty() {
            return None;
        }
        if let Modelo::Ahorcado(_) = modelo {
            return Self::pedir_letra(&acciones);
        }
        println!("Elija una acción:");
        acciones
            .iter()
            .enumerate()
            .for_each(|(i, a)| println!("{i}: {a}"));
        loop {
            let input = Self::leer_linea()?;
            match input.trim().parse::<usize>() {
                Ok(n) if n < acciones.len() => return Some(acciones.swap_remove(n)),
                _ => println!("Opción no válida."),
            }
        }
    }
}
