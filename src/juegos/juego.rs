use rand::Rng;
use rand::rngs::StdRng;

use super::{JuegoError, Jugador};

/// Datos comunes a cualquier partida: un id opaco, los jugadores en orden de llegada, el último
/// mensaje de estado y el generador de números aleatorios propio de la partida.
#[derive(Debug, Clone)]
pub struct Partida {
    id: String,
    jugadores: Vec<Jugador>,
    mensaje: String,
    rng: StdRng,
}

impl Partida {
    /// Crea los datos de una partida de `J`, comprobando que la cantidad de jugadores sea válida
    /// para ese juego.
    pub fn new<J: Juego>(jugadores: Vec<Jugador>, mut rng: StdRng) -> Result<Self, JuegoError> {
        if !(J::MIN_JUGADORES..=J::MAX_JUGADORES).contains(&jugadores.len()) {
            return Err(JuegoError::CantidadJugadores {
                juego: J::NOMBRE,
                min: J::MIN_JUGADORES,
                max: J::MAX_JUGADORES,
                actual: jugadores.len(),
            });
        }
        let mut bytes = [0u8; 32];
        rng.fill(&mut bytes);
        let id = bytes.iter().map(|b| format!("{b:02x}")).collect();
        Ok(Self {
            id,
            jugadores,
            mensaje: String::new(),
            rng,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn jugadores(&self) -> &[Jugador] {
        &self.jugadores
    }

    pub fn mensaje(&self) -> &str {
        &self.mensaje
    }

    pub fn set_mensaje(&mut self, mensaje: impl Into<String>) {
        self.mensaje = mensaje.into();
    }

    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }
}

/// Juego por turnos.
///
/// Las jugadas no válidas nunca son un error: `actualizar` devuelve `false` y deja una explicación
/// en el mensaje de la partida. Sólo la construcción puede fallar.
pub trait Juego: Sized {
    const NOMBRE: &'static str;
    const DESCRIPCION: &'static str;
    const EMOJIS: &'static [&'static str];
    const MIN_JUGADORES: usize;
    const MAX_JUGADORES: usize;

    type Opciones: Clone + Default;
    type Accion;

    fn crear(
        jugadores: Vec<Jugador>,
        opciones: Option<&Self::Opciones>,
        rng: StdRng,
    ) -> Result<Self, JuegoError>;

    fn partida(&self) -> &Partida;

    fn partida_mut(&mut self) -> &mut Partida;

    /// Deja el juego listo para la primera jugada y genera el primer mensaje.
    fn iniciar(&mut self) -> bool;

    /// Aplica una jugada. Devuelve si fue aceptada.
    fn actualizar(&mut self, accion: Self::Accion) -> bool;

    fn terminado(&self) -> bool;

    fn empate(&self) -> bool {
        false
    }

    /// Vuelve a empezar el juego con los mismos jugadores. Quien quiera alternar el orden de los
    /// jugadores tiene que cambiar las opciones antes de llamar a este método.
    fn reiniciar(&mut self, opciones: Option<&Self::Opciones>);

    /// Ganador de una partida terminada. `None` si no terminó, si fue empate o si el juego no
    /// tiene un ganador individual.
    fn ganador(&self) -> Option<&Jugador>;

    /// Jugadores de los que se espera una jugada.
    fn jugadores_por_actuar(&self) -> Vec<&Jugador>;

    /// Jugadas que `id_jugador` puede hacer en este momento.
    fn jugadas_posibles(&self, id_jugador: &str) -> Vec<Self::Accion>;

    fn mensaje(&self) -> &str {
        self.partida().mensaje()
    }

    fn id(&self) -> &str {
        self.partida().id()
    }

    fn jugadores(&self) -> &[Jugador] {
        self.partida().jugadores()
    }

    fn cantidad_jugadores(&self) -> usize {
        self.jugadores().len()
    }

    fn get_jugador(&self, id_jugador: &str) -> Option<&Jugador> {
        self.jugadores().iter().find(|j| j.id() == id_jugador)
    }

    fn existe_jugador(&self, id_jugador: &str) -> bool {
        self.get_jugador(id_jugador).is_some()
    }

    fn elegir_emoji<R: Rng + ?Sized>(rng: &mut R) -> Option<&'static str> {
        if Self::EMOJIS.is_empty() {
            return None;
        }
        Some(Self::EMOJIS[rng.gen_range(0..Self::EMOJIS.len())])
    }
}
