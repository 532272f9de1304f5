use std::fmt;

use itertools::Itertools;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{Juego, JuegoError, Jugador, OpcionesChinchon, Partida};
use crate::baraja::{Carta, Mazo};

mod mano;
pub use mano::*;

/// Veces que se mezclan los descartes cuando se acaba el mazo.
const MEZCLAS_REPOSICION: usize = 10;
/// Cartas que recibe cada mano al repartir.
const CARTAS_POR_MANO: usize = 7;
/// Bonificación por cortar sin cartas que sumen.
const MENOS_DIEZ: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Jugada {
    LevantarMazo,
    LevantarDescarte,
    Agrupar {
        carta: usize,
        grupo: Grupo,
        comodin_alto: bool,
    },
    Desagrupar {
        carta: usize,
    },
    Cambiar(usize, usize),
    Descartar {
        carta: usize,
    },
    Cortar {
        carta: usize,
    },
    PasarTurno,
    Mostrar,
    NuevaRonda,
    Reenganchar,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccionChinchon {
    pub id_jugador: String,
    pub jugada: Jugada,
}

impl AccionChinchon {
    pub fn new(id_jugador: impl Into<String>, jugada: Jugada) -> Self {
        Self {
            id_jugador: id_jugador.into(),
            jugada,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FaseChinchon {
    /// Se juegan los turnos de la ronda.
    EnCurso,
    /// Alguien cortó y se espera que todos muestren sus cartas.
    Mostrando,
    /// Se hizo el recuento y se espera para empezar otra ronda.
    FinRonda,
}

/// Chinchón para entre dos y cuatro jugadores, con la baraja de 50 cartas.
///
/// Las manos se guardan en el orden de los jugadores de la partida y los índices de turno apuntan
/// siempre a ese vector, salteando las manos que quedaron afuera.
#[derive(Debug, Clone)]
pub struct Chinchon {
    partida: Partida,
    opciones: OpcionesChinchon,
    ronda: u32,
    fase: FaseChinchon,
    mazo: Mazo,
    descartes: Mazo,
    manos: Vec<Mano>,
    ind_primero: usize,
    ind_actual: usize,
    cortador: Option<usize>,
    posiciones: Vec<usize>,
    terminado: bool,
}

impl Chinchon {
    pub fn opciones(&self) -> &OpcionesChinchon {
        &self.opciones
    }

    pub fn ronda(&self) -> u32 {
        self.ronda
    }

    pub fn fase(&self) -> FaseChinchon {
        self.fase
    }

    pub fn mazo(&self) -> &Mazo {
        &self.mazo
    }

    pub fn descartes(&self) -> &Mazo {
        &self.descartes
    }

    pub fn manos(&self) -> &[Mano] {
        &self.manos
    }

    pub fn mano(&self, id_jugador: &str) -> Option<&Mano> {
        self.manos.iter().find(|m| m.jugador().id() == id_jugador)
    }

    pub fn mano_actual(&self) -> &Mano {
        &self.manos[self.ind_actual]
    }

    /// Mano que empezó la ronda.
    pub fn mano_primera(&self) -> &Mano {
        &self.manos[self.ind_primero]
    }

    pub fn cortador(&self) -> Option<&Mano> {
        self.cortador.map(|i| &self.manos[i])
    }

    pub fn manos_en_juego(&self) -> impl Iterator<Item = &Mano> {
        self.manos.iter().filter(|m| !m.afuera())
    }

    pub fn cantidad_manos_jugando(&self) -> usize {
        self.manos_en_juego().count()
    }

    /// Todas las manos ordenadas por puntaje, de menor a mayor.
    pub fn posiciones(&self) -> Vec<&Mano> {
        self.posiciones.iter().map(|&i| &self.manos[i]).collect()
    }

    pub fn hay_descartes(&self) -> bool {
        !self.descartes.esta_vacio()
    }

    pub fn hay_cartas(&self) -> bool {
        !self.mazo.esta_vacio()
    }

    fn indice_mano(&self, id_jugador: &str) -> Option<usize> {
        self.manos.iter().position(|m| m.jugador().id() == id_jugador)
    }

    fn siguiente_en_juego(&self, desde: usize) -> usize {
        let cant = self.manos.len();
        (1..=cant)
            .map(|paso| (desde + paso) % cant)
            .find(|&i| !self.manos[i].afuera())
            .unwrap_or(desde)
    }

    fn sig_jugador(&mut self) -> usize {
        self.ind_actual = self.siguiente_en_juego(self.ind_actual);
        self.ind_actual
    }

    fn dar_carta(&mut self, ind: usize) -> bool {
        let Some(carta) = self.mazo.get() else {
            return false;
        };
        match self.manos[ind].agregar_carta(carta) {
            Ok(()) => true,
            Err(carta) => {
                self.mazo.put(carta, true);
                false
            }
        }
    }

    /// Reparte siete cartas a cada mano en juego, empezando por la primera, y una octava a la
    /// primera, que queda como si ya hubiera levantado. Devuelve las cartas que quedan en el mazo.
    pub fn repartir_cartas(&mut self) -> usize {
        let en_juego: Vec<usize> = (0..self.manos.len())
            .filter(|&i| !self.manos[i].afuera())
            .collect();
        for _ in 0..CARTAS_POR_MANO {
            for &i in &en_juego {
                self.dar_carta(i);
            }
        }
        self.ind_actual = self.ind_primero;
        if self.dar_carta(self.ind_primero) {
            self.manos[self.ind_primero].sig_estado();
        }
        self.mazo.len()
    }

    fn reponer_mazo(&mut self) {
        debug!(descartes = self.descartes.len(), "Se repone el mazo");
        self.mazo.extender(&mut self.descartes);
        self.mazo.mezclar(MEZCLAS_REPOSICION, self.partida.rng());
    }

    fn levantar_carta(&mut self) -> Option<Carta> {
        if self.mazo.esta_vacio() {
            self.reponer_mazo();
        }
        let carta = self.mazo.get()?;
        if let Err(carta) = self.manos[self.ind_actual].agregar_carta(carta.clone()) {
            self.mazo.put(carta, true);
            return None;
        }
        self.manos[self.ind_actual].sig_estado();
        if self.mazo.esta_vacio() {
            self.reponer_mazo();
        }
        Some(carta)
    }

    fn levantar_descarte(&mut self) -> Option<Carta> {
        let carta = self.descartes.get()?;
        if let Err(carta) = self.manos[self.ind_actual].agregar_carta(carta.clone()) {
            self.descartes.put(carta, true);
            return None;
        }
        self.manos[self.ind_actual].sig_estado();
        Some(carta)
    }

    fn aportar_descarte(&mut self, carta: Carta) {
        self.descartes.put(carta, true);
    }

    /// Suma los puntos de la ronda a todas las manos en juego.
    ///
    /// Si quien cortó no tiene cartas que sumen, o hizo chinchón y el resto suma el tope, o se
    /// lleva un menos diez. Las manos que llegan al tope quedan afuera una vez sumadas todas.
    pub fn recuento_cartas(&mut self) -> Result<(), JuegoError> {
        let cortador = self.cortador.ok_or(JuegoError::SinCortador)?;
        let en_juego: Vec<usize> = (0..self.manos.len())
            .filter(|&i| !self.manos[i].afuera())
            .collect();
        let tope = self.opciones.tope;

        for &i in &en_juego {
            let mano = &self.manos[i];
            let mut puntos = mano.puntaje();
            if i == cortador && mano.cartas_que_suman().is_empty() {
                if mano.chequear_chinchon() {
                    info!(jugador = mano.jugador().id(), "Chinchón");
                    for &otro in en_juego.iter().filter(|&&otro| otro != cortador) {
                        let puntaje = self.manos[otro].puntaje();
                        self.manos[otro].set_puntaje(puntaje + tope);
                    }
                } else {
                    puntos -= MENOS_DIEZ;
                }
            } else {
                puntos += mano.puntos_que_suman();
            }
            self.manos[i].set_puntaje(puntos);
        }

        for &i in &en_juego {
            let mano = &mut self.manos[i];
            if !self.opciones.hay_puntaje_negativo && mano.puntaje() < 0 {
                mano.set_puntaje(0);
            }
            if mano.puntaje() >= tope {
                debug!(jugador = mano.jugador().id(), puntaje = mano.puntaje(), "Mano eliminada");
                mano.descalificar();
            }
        }

        self.ordenar_puntajes();
        Ok(())
    }

    fn ordenar_puntajes(&mut self) {
        let manos = &self.manos;
        self.posiciones.sort_by_key(|&i| manos[i].puntaje());
    }

    /// Mano que ganó la partida: la única que sigue en juego, o la de menor puntaje si no quedó
    /// ninguna.
    pub fn mano_ganadora(&self) -> Option<&Mano> {
        match self.cantidad_manos_jugando() {
            0 => self.posiciones.first().map(|&i| &self.manos[i]),
            1 => self.manos_en_juego().next(),
            _ => None,
        }
    }

    /// Prepara y reparte otra ronda, salvo que ya haya un ganador.
    pub fn nueva_ronda(&mut self) {
        if self.mano_ganadora().is_some() {
            self.terminar();
            return;
        }
        self.ronda += 1;
        self.ind_primero = self.siguiente_en_juego(self.ind_primero);
        self.cortador = None;
        self.fase = FaseChinchon::EnCurso;
        self.mazo = Mazo::new(true, self.partida.rng());
        self.descartes = Mazo::vacio();
        for mano in &mut self.manos {
            mano.vaciar_cartas();
            mano.set_estado(EstadoMano::Inicial);
        }
        self.repartir_cartas();
        info!(id = self.partida.id(), ronda = self.ronda, "Nueva ronda");
        self.partida.set_mensaje("¡Iniciando nueva ronda!");
    }

    fn terminar(&mut self) {
        self.terminado = true;
        let mensaje = match self.mano_ganadora() {
            Some(mano) => format!(
                "¡**{}** ganó la partida con {} puntos!",
                mano.jugador().nombre(),
                mano.puntaje()
            ),
            None => "¡Partida terminada!".to_string(),
        };
        info!(id = self.partida.id(), ronda = self.ronda, "Partida terminada");
        self.partida.set_mensaje(mensaje);
    }

    fn fin_de_ronda(&mut self) {
        if let Err(err) = self.recuento_cartas() {
            warn!(%err, "No se pudo hacer el recuento");
            return;
        }
        if self.mano_ganadora().is_some() {
            self.terminar();
            return;
        }
        self.fase = FaseChinchon::FinRonda;
        let tabla = self
            .posiciones()
            .iter()
            .map(|m| {
                let afuera = if m.afuera() { " (afuera)" } else { "" };
                format!("{}: {}{afuera}", m.jugador().nombre(), m.puntaje())
            })
            .join("\n");
        self.partida
            .set_mensaje(format!("**¡Ronda acabada!**\n{tabla}"));
    }

    /// Una mano eliminada por primera vez puede volver si las opciones lo permiten y siguen
    /// jugando al menos dos.
    pub fn puede_reenganchar(&self, id_jugador: &str) -> bool {
        self.fase == FaseChinchon::FinRonda
            && self.opciones.admitir_reenganche
            && self.cantidad_manos_jugando() >= 2
            && self
                .mano(id_jugador)
                .is_some_and(|m| m.afuera() && !m.reenganchado())
    }

    fn reenganchar(&mut self, ind: usize) {
        let maximo = self.manos_en_juego().map(Mano::puntaje).max().unwrap_or(0);
        let mano = &mut self.manos[ind];
        mano.reenganchar();
        mano.set_puntaje(maximo);
        self.ordenar_puntajes();
    }

    /// Se pueden acomodar las cartas en el turno propio, o después de un corte hasta mostrarlas.
    fn puede_acomodar(&self, ind: usize) -> bool {
        let mano = &self.manos[ind];
        if mano.afuera() {
            return false;
        }
        match self.fase {
            FaseChinchon::EnCurso => ind == self.ind_actual,
            FaseChinchon::Mostrando => mano.estado() != EstadoMano::Mostrado,
            FaseChinchon::FinRonda => false,
        }
    }

    fn es_turno_de(&self, ind: usize, estado: EstadoMano) -> bool {
        self.fase == FaseChinchon::EnCurso
            && ind == self.ind_actual
            && self.manos[ind].estado() == estado
    }

    fn jugadas_de_grupos(&self, ind: usize, jugadas: &mut Vec<Jugada>) {
        let mano = &self.manos[ind];
        for carta in 0..mano.cantidad_cartas() {
            let Some(origen) = mano.grupo_de(carta) else {
                continue;
            };
            if origen != Grupo::Sueltas {
                jugadas.push(Jugada::Desagrupar { carta });
            }
            let es_comodin = mano.carta(carta).is_some_and(Carta::es_comodin);
            for grupo in [Grupo::Primero, Grupo::Segundo] {
                let variantes: &[bool] = if es_comodin { &[true, false] } else { &[true] };
                for &comodin_alto in variantes {
                    if mano.clone().agrupar(carta, grupo, comodin_alto) {
                        jugadas.push(Jugada::Agrupar {
                            carta,
                            grupo,
                            comodin_alto,
                        });
                    }
                }
            }
        }
    }

    fn jugar(&mut self, ind: usize, jugada: Jugada) -> bool {
        let nombre = self.manos[ind].jugador().nombre().to_string();
        match jugada {
            Jugada::LevantarMazo => {
                if !self.es_turno_de(ind, EstadoMano::Inicial) {
                    return false;
                }
                if self.levantar_carta().is_none() {
                    return false;
                }
                self.partida
                    .set_mensaje(format!("**{nombre}** levantó una carta del mazo."));
            }
            Jugada::LevantarDescarte => {
                if !self.es_turno_de(ind, EstadoMano::Inicial) {
                    return false;
                }
                let Some(carta) = self.levantar_descarte() else {
                    return false;
                };
                self.partida
                    .set_mensaje(format!("**{nombre}** levantó del descarte: {carta}."));
            }
            Jugada::Agrupar {
                carta,
                grupo,
                comodin_alto,
            } => {
                if !self.puede_acomodar(ind) {
                    return false;
                }
                return self.manos[ind].agrupar(carta, grupo, comodin_alto);
            }
            Jugada::Desagrupar { carta } => {
                if !self.puede_acomodar(ind) {
                    return false;
                }
                return self.manos[ind].desagrupar(carta);
            }
            Jugada::Cambiar(carta_1, carta_2) => {
                if !self.puede_acomodar(ind) {
                    return false;
                }
                return self.manos[ind].cambiar(carta_1, carta_2);
            }
            Jugada::Descartar { carta } => {
                if !self.es_turno_de(ind, EstadoMano::Levanto) || !self.manos[ind].apto_descarte()
                {
                    return false;
                }
                let Some(carta) = self.manos[ind].descartar(carta) else {
                    return false;
                };
                self.manos[ind].sig_estado();
                self.partida
                    .set_mensaje(format!("**{nombre}** descartó: {carta}."));
                self.aportar_descarte(carta);
            }
            Jugada::Cortar { carta } => {
                let mano = &self.manos[ind];
                if !self.es_turno_de(ind, EstadoMano::Levanto)
                    || !mano.apto_descarte()
                    || !mano.cartas_para_cortar().contains(&carta)
                {
                    return false;
                }
                let Some(carta) = self.manos[ind].descartar(carta) else {
                    return false;
                };
                self.manos[ind].sig_estado();
                self.aportar_descarte(carta);
                self.cortador = Some(ind);
                self.fase = FaseChinchon::Mostrando;
                info!(id = self.partida.id(), jugador = %self.manos[ind].jugador().id(), "Corte");
                self.partida
                    .set_mensaje(format!("¡**{nombre}** cortó! ¡Mostrando cartas!"));
            }
            Jugada::PasarTurno => {
                if !self.es_turno_de(ind, EstadoMano::Descarto) {
                    return false;
                }
                self.manos[ind].sig_estado();
                let sig = self.sig_jugador();
                let sig_nombre = self.manos[sig].jugador().nombre();
                self.partida
                    .set_mensaje(format!("Turno de **{sig_nombre}**."));
            }
            Jugada::Mostrar => {
                if self.fase != FaseChinchon::Mostrando
                    || self.manos[ind].afuera()
                    || self.manos[ind].estado() == EstadoMano::Mostrado
                {
                    return false;
                }
                self.manos[ind].set_estado(EstadoMano::Mostrado);
                self.partida
                    .set_mensaje(format!("**{nombre}** mostró sus cartas."));
                if self
                    .manos_en_juego()
                    .all(|m| m.estado() == EstadoMano::Mostrado)
                {
                    self.fin_de_ronda();
                }
            }
            Jugada::NuevaRonda => {
                if self.fase != FaseChinchon::FinRonda || self.manos[ind].afuera() {
                    return false;
                }
                self.nueva_ronda();
            }
            Jugada::Reenganchar => {
                if !self.puede_reenganchar(self.manos[ind].jugador().id()) {
                    return false;
                }
                self.reenganchar(ind);
                self.partida
                    .set_mensaje(format!("¡**{nombre}** se reenganchó!"));
            }
        }
        true
    }
}

impl Juego for Chinchon {
    const NOMBRE: &'static str = "Chinchón";
    const DESCRIPCION: &'static str =
        "Vence a tus amigos en el clásico 'Chinchón' de la baraja española.";
    const EMOJIS: &'static [&'static str] =
        &["\u{1FAB5}", "\u{1F3C6}", "\u{1F5E1}", "\u{1FA99}", "\u{1F0CF}"];
    const MIN_JUGADORES: usize = 2;
    const MAX_JUGADORES: usize = 4;

    type Opciones = OpcionesChinchon;
    type Accion = AccionChinchon;

    fn crear(
        jugadores: Vec<Jugador>,
        opciones: Option<&OpcionesChinchon>,
        rng: StdRng,
    ) -> Result<Self, JuegoError> {
        let mut partida = Partida::new::<Self>(jugadores, rng)?;
        let manos: Vec<Mano> = partida.jugadores().iter().cloned().map(Mano::new).collect();
        Ok(Self {
            opciones: opciones.cloned().unwrap_or_default(),
            ronda: 0,
            fase: FaseChinchon::EnCurso,
            mazo: Mazo::new(true, partida.rng()),
            descartes: Mazo::vacio(),
            posiciones: (0..manos.len()).collect(),
            manos,
            ind_primero: 0,
            ind_actual: 0,
            cortador: None,
            terminado: false,
            partida,
        })
    }

    fn partida(&self) -> &Partida {
        &self.partida
    }

    fn partida_mut(&mut self) -> &mut Partida {
        &mut self.partida
    }

    /// Reparte la primera ronda.
    fn iniciar(&mut self) -> bool {
        if self.manos.iter().any(|m| !m.sin_cartas()) {
            return false;
        }
        self.repartir_cartas();
        info!(id = self.partida.id(), jugadores = self.manos.len(), "Partida de Chinchón iniciada");
        self.partida
            .set_mensaje("¡Iniciando partida de Chinchón!");
        true
    }

    fn actualizar(&mut self, accion: AccionChinchon) -> bool {
        if self.terminado {
            return false;
        }
        let Some(ind) = self.indice_mano(&accion.id_jugador) else {
            return false;
        };
        debug!(jugador = %accion.id_jugador, jugada = ?accion.jugada, "Jugada");
        self.jugar(ind, accion.jugada)
    }

    fn terminado(&self) -> bool {
        self.terminado
    }

    fn reiniciar(&mut self, opciones: Option<&OpcionesChinchon>) {
        if let Some(opciones) = opciones {
            self.opciones = opciones.clone();
        }
        self.manos = self
            .partida
            .jugadores()
            .iter()
            .cloned()
            .map(Mano::new)
            .collect();
        self.posiciones = (0..self.manos.len()).collect();
        self.ronda = 0;
        self.fase = FaseChinchon::EnCurso;
        self.mazo = Mazo::new(true, self.partida.rng());
        self.descartes = Mazo::vacio();
        self.ind_primero = 0;
        self.ind_actual = 0;
        self.cortador = None;
        self.terminado = false;
        self.iniciar();
    }

    fn ganador(&self) -> Option<&Jugador> {
        if !self.terminado {
            return None;
        }
        self.mano_ganadora().map(Mano::jugador)
    }

    fn jugadores_por_actuar(&self) -> Vec<&Jugador> {
        if self.terminado {
            return vec![];
        }
        match self.fase {
            FaseChinchon::EnCurso => vec![self.mano_actual().jugador()],
            FaseChinchon::Mostrando => self
                .manos_en_juego()
                .filter(|m| m.estado() != EstadoMano::Mostrado)
                .map(Mano::jugador)
                .collect(),
            FaseChinchon::FinRonda => self
                .manos
                .iter()
                .filter(|m| !m.afuera() || self.puede_reenganchar(m.jugador().id()))
                .map(Mano::jugador)
                .collect(),
        }
    }

    /// Las jugadas de acomodar las cartas sólo incluyen las que se pueden hacer; `Cambiar` no se
    /// ofrece porque no cambia el juego.
    fn jugadas_posibles(&self, id_jugador: &str) -> Vec<AccionChinchon> {
        let Some(ind) = self.indice_mano(id_jugador) else {
            return vec![];
        };
        if self.terminado {
            return vec![];
        }
        let mano = &self.manos[ind];
        let mut jugadas = Vec::new();
        match self.fase {
            FaseChinchon::EnCurso if ind == self.ind_actual => match mano.estado() {
                EstadoMano::Inicial => {
                    if self.hay_cartas() || self.hay_descartes() {
                        jugadas.push(Jugada::LevantarMazo);
                    }
                    if self.hay_descartes() {
                        jugadas.push(Jugada::LevantarDescarte);
                    }
                }
                EstadoMano::Levanto if mano.apto_descarte() => {
                    jugadas.extend(
                        (0..mano.cantidad_cartas()).map(|carta| Jugada::Descartar { carta }),
                    );
                    jugadas.extend(
                        mano.cartas_para_cortar()
                            .into_iter()
                            .map(|carta| Jugada::Cortar { carta }),
                    );
                }
                EstadoMano::Descarto => jugadas.push(Jugada::PasarTurno),
                _ => {}
            },
            FaseChinchon::Mostrando if !mano.afuera() && mano.estado() != EstadoMano::Mostrado => {
                jugadas.push(Jugada::Mostrar);
            }
            FaseChinchon::FinRonda => {
                if !mano.afuera() {
                    jugadas.push(Jugada::NuevaRonda);
                } else if self.puede_reenganchar(id_jugador) {
                    jugadas.push(Jugada::Reenganchar);
                }
            }
            _ => {}
        }
        if self.puede_acomodar(ind) {
            self.jugadas_de_grupos(ind, &mut jugadas);
        }
        jugadas
            .into_iter()
            .map(|jugada| AccionChinchon::new(id_jugador, jugada))
            .collect()
    }
}

impl fmt::Display for Chinchon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let descarte = self
            .descartes
            .tope()
            .map(Carta::codigo)
            .unwrap_or_else(|| "-".to_string());
        writeln!(
            f,
            "Ronda {} | Mazo: {} | Descarte: {descarte}",
            self.ronda + 1,
            self.mazo.len()
        )?;
        for (i, mano) in self.manos.iter().enumerate() {
            let marca = if mano.afuera() {
                "x"
            } else if i == self.ind_actual && self.fase == FaseChinchon::EnCurso {
                ">"
            } else {
                " "
            };
            writeln!(
                f,
                "{marca} {} ({}) {mano}",
                mano.jugador().nombre(),
                mano.puntaje()
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for Jugada {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Jugada::LevantarMazo => write!(f, "Levantar del mazo"),
            Jugada::LevantarDescarte => write!(f, "Levantar el descarte"),
            Jugada::Agrupar {
                carta,
                grupo,
                comodin_alto,
            } => {
                write!(f, "Agrupar la carta {carta} en {grupo:?}")?;
                if !comodin_alto {
                    write!(f, " (comodín bajo)")?;
                }
                Ok(())
            }
            Jugada::Desagrupar { carta } => write!(f, "Desagrupar la carta {carta}"),
            Jugada::Cambiar(a, b) => write!(f, "Cambiar las cartas {a} y {b}"),
            Jugada::Descartar { carta } => write!(f, "Descartar la carta {carta}"),
            Jugada::Cortar { carta } => write!(f, "Cortar con la carta {carta}"),
            Jugada::PasarTurno => write!(f, "Pasar el turno"),
            Jugada::Mostrar => write!(f, "Mostrar las cartas"),
            Jugada::NuevaRonda => write!(f, "Nueva ronda"),
            Jugada::Reenganchar => write!(f, "Reengancharse"),
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    fn nuevo(cant: usize, opciones: Option<OpcionesChinchon>) -> Chinchon {
        let jugadores = (1..=cant)
            .map(|i| Jugador::new(i.to_string(), &format!("Jugador {i}")))
            .collect();
        let mut juego =
            Chinchon::crear(jugadores, opciones.as_ref(), StdRng::seed_from_u64(3)).unwrap();
        assert!(juego.iniciar());
        juego
    }

    fn jugar(juego: &mut Chinchon, id: &str, jugada: Jugada) -> bool {
        juego.actualizar(AccionChinchon::new(id, jugada))
    }

    fn dar_mano(juego: &mut Chinchon, ind: usize, codigos: &[&str]) {
        let mano = &mut juego.manos[ind];
        mano.vaciar_cartas();
        for codigo in codigos {
            mano.agregar_carta(Carta::try_from(*codigo).unwrap()).unwrap();
        }
    }

    fn agrupar(juego: &mut Chinchon, ind: usize, codigos: &[&str], grupo: Grupo) {
        for codigo in codigos {
            let carta = Carta::try_from(*codigo).unwrap();
            let mano = &mut juego.manos[ind];
            let i = mano.cartas().position(|c| *c == carta).unwrap();
            assert!(mano.agrupar(i, grupo, true));
        }
    }

    fn indice(juego: &Chinchon, ind: usize, codigo: &str) -> usize {
        let carta = Carta::try_from(codigo).unwrap();
        juego.manos[ind].cartas().position(|c| *c == carta).unwrap()
    }

    #[test]
    fn reparto_inicial() {
        let juego = nuevo(3, None);
        assert_eq!(juego.manos[0].cantidad_cartas(), 8);
        assert_eq!(juego.manos[0].estado(), EstadoMano::Levanto);
        for mano in &juego.manos[1..] {
            assert_eq!(mano.cantidad_cartas(), 7);
            assert_eq!(mano.estado(), EstadoMano::Inicial);
        }
        assert_eq!(juego.mazo.len(), 50 - 22);
        assert_eq!(juego.mensaje(), "¡Iniciando partida de Chinchón!");
        assert!(Chinchon::crear(vec![Jugador::new("1", "Ana")], None, StdRng::seed_from_u64(0)).is_err());
    }

    #[test]
    fn un_turno_completo() {
        let mut juego = nuevo(2, None);
        assert!(!jugar(&mut juego, "1", Jugada::PasarTurno));
        assert!(!jugar(&mut juego, "2", Jugada::LevantarMazo));
        let posibles = juego.jugadas_posibles("1");
        assert!(posibles.iter().any(|a| a.jugada == Jugada::Descartar { carta: 7 }));
        assert!(!posibles.iter().any(|a| a.jugada == Jugada::PasarTurno));
        assert!(juego.jugadas_posibles("2").is_empty());

        assert!(jugar(&mut juego, "1", Jugada::Descartar { carta: 0 }));
        assert_eq!(juego.manos[0].cantidad_cartas(), 7);
        assert_eq!(juego.manos[0].estado(), EstadoMano::Descarto);
        assert!(!jugar(&mut juego, "1", Jugada::Descartar { carta: 0 }));
        assert!(jugar(&mut juego, "1", Jugada::PasarTurno));
        assert_eq!(juego.mano_actual().jugador().id(), "2");
        assert_eq!(juego.jugadores_por_actuar()[0].id(), "2");

        assert!(jugar(&mut juego, "2", Jugada::LevantarDescarte));
        assert!(!jugar(&mut juego, "2", Jugada::LevantarMazo));
        assert!(!juego.hay_descartes());
        assert_eq!(juego.manos[1].cantidad_cartas(), 8);
        assert_eq!(juego.manos[1].estado(), EstadoMano::Levanto);
    }

    #[test]
    fn mazo_se_repone_con_los_descartes() {
        let mut juego = nuevo(2, None);
        assert!(jugar(&mut juego, "1", Jugada::Descartar { carta: 0 }));
        assert!(jugar(&mut juego, "1", Jugada::PasarTurno));
        juego.mazo.vaciar();
        juego.descartes.put(Carta::try_from("3O").unwrap(), true);
        juego.descartes.put(Carta::try_from("4O").unwrap(), true);
        assert!(jugar(&mut juego, "2", Jugada::LevantarMazo));
        assert_eq!(juego.mazo.len(), 2);
        assert!(!juego.hay_descartes());
    }

    #[test]
    fn cortar_requiere_carta_apta() {
        let mut juego = nuevo(2, None);
        dar_mano(&mut juego, 0, &["1O", "2O", "3O", "7C", "7E", "7B", "*", "9E"]);
        let comodin = indice(&juego, 0, "*");
        let nueve = indice(&juego, 0, "9E");
        assert!(!jugar(&mut juego, "1", Jugada::Cortar { carta: comodin }));
        assert!(!jugar(&mut juego, "1", Jugada::Cortar { carta: nueve }));
        let uno = indice(&juego, 0, "1O");
        assert!(jugar(&mut juego, "1", Jugada::Cortar { carta: uno }));
        assert_eq!(juego.fase(), FaseChinchon::Mostrando);
        assert_eq!(juego.cortador().unwrap().jugador().id(), "1");
        assert_eq!(juego.jugadores_por_actuar().len(), 2);
        assert_eq!(juego.descartes.tope(), Some(&Carta::try_from("1O").unwrap()));
    }

    #[test]
    fn recuento_sin_cortador() {
        let mut juego = nuevo(2, None);
        assert!(matches!(juego.recuento_cartas(), Err(JuegoError::SinCortador)));
    }

    #[test]
    fn menos_diez() {
        let opciones = OpcionesChinchon {
            hay_puntaje_negativo: true,
            ..Default::default()
        };
        let mut juego = nuevo(2, Some(opciones));
        dar_mano(&mut juego, 0, &["1O", "2O", "3O", "7C", "7E", "7B", "7O", "2E"]);
        agrupar(&mut juego, 0, &["1O", "2O", "3O"], Grupo::Primero);
        agrupar(&mut juego, 0, &["7C", "7E", "7B", "7O"], Grupo::Segundo);
        dar_mano(&mut juego, 1, &["1B", "2B", "4B", "5B", "6C", "7C", "3E"]);
        let dos = indice(&juego, 0, "2E");
        assert!(jugar(&mut juego, "1", Jugada::Cortar { carta: dos }));
        assert!(jugar(&mut juego, "2", Jugada::Mostrar));
        assert!(!jugar(&mut juego, "2", Jugada::Mostrar));
        assert_eq!(juego.fase(), FaseChinchon::Mostrando);
        assert!(jugar(&mut juego, "1", Jugada::Mostrar));
        assert_eq!(juego.manos[0].puntaje(), -10);
        assert_eq!(juego.manos[1].puntaje(), 28);
        assert_eq!(juego.fase(), FaseChinchon::FinRonda);
        assert!(juego.mensaje().starts_with("**¡Ronda acabada!**"));
        let posiciones: Vec<&str> = juego.posiciones().iter().map(|m| m.jugador().id()).collect();
        assert_eq!(posiciones, vec!["1", "2"]);
    }

    #[test]
    fn puntaje_negativo_se_recorta() {
        let mut juego = nuevo(2, None);
        dar_mano(&mut juego, 0, &["1O", "2O", "3O", "7C", "7E", "7B", "7O", "2E"]);
        agrupar(&mut juego, 0, &["1O", "2O", "3O"], Grupo::Primero);
        agrupar(&mut juego, 0, &["7C", "7E", "7B", "7O"], Grupo::Segundo);
        juego.cortador = Some(0);
        let dos = indice(&juego, 0, "2E");
        juego.manos[0].descartar(dos);
        juego.recuento_cartas().unwrap();
        assert_eq!(juego.manos[0].puntaje(), 0);
    }

    #[test]
    fn chinchon_termina_la_partida() {
        let mut juego = nuevo(2, None);
        dar_mano(&mut juego, 0, &["1C", "2C", "3C", "4C", "5C", "6C", "7C", "2O"]);
        agrupar(&mut juego, 0, &["1C", "2C", "3C", "4C"], Grupo::Primero);
        agrupar(&mut juego, 0, &["5C", "6C", "7C"], Grupo::Segundo);
        let dos = indice(&juego, 0, "2O");
        assert!(jugar(&mut juego, "1", Jugada::Cortar { carta: dos }));
        assert!(jugar(&mut juego, "1", Jugada::Mostrar));
        assert_eq!(juego.ganador(), None);
        assert!(jugar(&mut juego, "2", Jugada::Mostrar));
        assert!(juego.manos[1].puntaje() >= 100);
        assert!(juego.manos[1].afuera());
        assert!(juego.terminado());
        assert_eq!(juego.ganador().map(Jugador::id), Some("1"));
        assert!(juego.jugadores_por_actuar().is_empty());
        assert!(!jugar(&mut juego, "1", Jugada::NuevaRonda));
    }

    #[test]
    fn eliminacion_reenganche_y_nueva_ronda() {
        let mut juego = nuevo(3, None);
        dar_mano(&mut juego, 0, &["1O", "2O", "3O", "7C", "7E", "7B", "7O", "1E"]);
        agrupar(&mut juego, 0, &["1O", "2O", "3O"], Grupo::Primero);
        agrupar(&mut juego, 0, &["7C", "7E", "7B", "7O"], Grupo::Segundo);
        dar_mano(&mut juego, 1, &["12O", "12C", "11O", "11C", "10O", "10C", "4E"]);
        juego.manos[1].set_puntaje(95);
        dar_mano(&mut juego, 2, &["1B", "2B", "4B", "5B", "6C", "7C", "3E"]);
        juego.manos[2].set_puntaje(20);

        let uno = indice(&juego, 0, "1E");
        assert!(jugar(&mut juego, "1", Jugada::Cortar { carta: uno }));
        for id in ["1", "2", "3"] {
            assert!(jugar(&mut juego, id, Jugada::Mostrar));
        }
        assert!(!juego.terminado());
        assert!(juego.manos[1].afuera());
        assert_eq!(juego.manos[0].puntaje(), 0);
        assert_eq!(juego.manos[1].puntaje(), 165);
        assert_eq!(juego.manos[2].puntaje(), 48);
        let posiciones: Vec<&str> = juego.posiciones().iter().map(|m| m.jugador().id()).collect();
        assert_eq!(posiciones, vec!["1", "3", "2"]);

        let posibles = juego.jugadas_posibles("2");
        assert_eq!(posibles, vec![AccionChinchon::new("2", Jugada::Reenganchar)]);
        assert!(!jugar(&mut juego, "2", Jugada::NuevaRonda));
        assert!(jugar(&mut juego, "2", Jugada::Reenganchar));
        assert_eq!(juego.manos[1].puntaje(), 48);
        assert!(juego.manos[1].reenganchado());
        assert!(!jugar(&mut juego, "2", Jugada::Reenganchar));

        assert!(jugar(&mut juego, "3", Jugada::NuevaRonda));
        assert_eq!(juego.ronda(), 1);
        assert_eq!(juego.fase(), FaseChinchon::EnCurso);
        assert_eq!(juego.mano_primera().jugador().id(), "2");
        assert_eq!(juego.manos[1].cantidad_cartas(), 8);
        assert_eq!(juego.manos[0].cantidad_cartas(), 7);
        assert_eq!(juego.mensaje(), "¡Iniciando nueva ronda!");
    }

    #[test]
    fn acomodar_solo_en_turno_propio() {
        let mut juego = nuevo(2, None);
        assert!(!jugar(&mut juego, "2", Jugada::Cambiar(0, 1)));
        assert!(jugar(&mut juego, "1", Jugada::Cambiar(0, 1)));
        assert!(!jugar(&mut juego, "2", Jugada::Desagrupar { carta: 0 }));
        let posibles = juego.jugadas_posibles("1");
        assert!(!posibles.iter().any(|a| matches!(a.jugada, Jugada::Cambiar(..))));
        for accion in posibles {
            if let Jugada::Agrupar { .. } = accion.jugada {
                let mut copia = juego.clone();
                assert!(copia.actualizar(accion));
            }
        }
    }

    #[test]
    fn reiniciar_vuelve_a_repartir() {
        let mut juego = nuevo(2, None);
        juego.manos[1].set_puntaje(40);
        juego.reiniciar(Some(&OpcionesChinchon {
            tope: 50,
            ..Default::default()
        }));
        assert_eq!(juego.opciones().tope, 50);
        assert_eq!(juego.manos[1].puntaje(), 0);
        assert_eq!(juego.manos[0].cantidad_cartas(), 8);
        assert!(!juego.iniciar());
    }
}
