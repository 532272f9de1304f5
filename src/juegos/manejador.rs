use std::mem;

use rand::Rng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use super::{
    Accion, EntradaJuego, JuegoError, Jugador, Metadatos, Modelo, Opciones,
    RegistradorCompartido, TipoJuego,
};

const CUMPLIDOS: [&str; 5] = ["", " la máquina", " el papu", " es el que", " el más capo(ronga)"];

/// Conecta un juego con sus opciones, sus estadísticas y los jugadores del lobby.
///
/// Mientras no se inicia el modelo los jugadores pueden entrar y salir. El primero de la lista es
/// siempre quien hostea la partida.
#[derive(Debug)]
pub struct Manejador {
    tipo: TipoJuego,
    entrada: EntradaJuego,
    jugadores: Vec<Jugador>,
    opciones: Option<Opciones>,
    modelo: Option<Modelo>,
    resultado_registrado: bool,
}

impl Manejador {
    pub fn new(tipo: TipoJuego, entrada: EntradaJuego, host: Jugador) -> Self {
        let opciones = (entrada.crear_opciones)();
        Self {
            tipo,
            entrada,
            jugadores: vec![host],
            opciones,
            modelo: None,
            resultado_registrado: false,
        }
    }

    pub fn tipo(&self) -> TipoJuego {
        self.tipo
    }

    pub fn metadatos(&self) -> &Metadatos {
        &self.entrada.metadatos
    }

    pub fn jugadores(&self) -> &[Jugador] {
        &self.jugadores
    }

    pub fn jugador_host(&self) -> Option<&Jugador> {
        self.jugadores.first()
    }

    pub fn cantidad_jugadores(&self) -> usize {
        self.jugadores.len()
    }

    pub fn min_jugadores(&self) -> usize {
        self.entrada.metadatos.min_jugadores
    }

    pub fn max_jugadores(&self) -> usize {
        self.entrada.metadatos.max_jugadores
    }

    pub fn hay_suficientes(&self) -> bool {
        self.cantidad_jugadores() >= self.min_jugadores()
    }

    pub fn esta_lleno(&self) -> bool {
        self.cantidad_jugadores() >= self.max_jugadores()
    }

    pub fn existe_jugador(&self, id_jugador: &str) -> bool {
        self.jugadores.iter().any(|j| j.id() == id_jugador)
    }

    /// Suma un jugador al lobby. No se puede si ya está, si no hay lugar o si la partida ya
    /// empezó.
    pub fn agregar_jugador(&mut self, jugador: Jugador) -> bool {
        if self.modelo.is_some() || self.esta_lleno() || self.existe_jugador(jugador.id()) {
            return false;
        }
        debug!(juego = %self.tipo, jugador = jugador.id(), "Jugador agregado");
        self.jugadores.push(jugador);
        true
    }

    /// Saca a un jugador del lobby mientras la partida no haya empezado. Al host no se lo puede
    /// sacar.
    pub fn quitar_jugador(&mut self, id_jugador: &str) -> bool {
        if self.modelo.is_some() || self.jugadores.len() <= 1 {
            return false;
        }
        if self.jugador_host().is_some_and(|host| host.id() == id_jugador) {
            return false;
        }
        let antes = self.jugadores.len();
        self.jugadores.retain(|j| j.id() != id_jugador);
        antes != self.jugadores.len()
    }

    pub fn opciones(&self) -> Option<&Opciones> {
        self.opciones.as_ref()
    }

    pub fn opciones_mut(&mut self) -> Option<&mut Opciones> {
        self.opciones.as_mut()
    }

    /// Reemplaza las opciones, sólo si son del mismo juego que las actuales.
    pub fn cambiar_opciones(&mut self, opciones: Opciones) -> bool {
        match &self.opciones {
            Some(actuales) if mem::discriminant(actuales) == mem::discriminant(&opciones) => {
                self.opciones = Some(opciones);
                true
            }
            _ => false,
        }
    }

    pub fn registrador(&self) -> Option<&RegistradorCompartido> {
        self.entrada.registrador.as_ref()
    }

    pub fn modelo(&self) -> Option<&Modelo> {
        self.modelo.as_ref()
    }

    /// Crea el modelo con los jugadores del lobby y lo inicia.
    pub fn iniciar_modelo(&mut self, rng: StdRng) -> Result<&Modelo, JuegoError> {
        let mut modelo =
            (self.entrada.crear_modelo)(self.jugadores.clone(), self.opciones.as_ref(), rng)?;
        modelo.iniciar();
        info!(juego = %self.tipo, id = modelo.id(), jugadores = self.jugadores.len(), "Modelo iniciado");
        self.resultado_registrado = false;
        Ok(self.modelo.insert(modelo))
    }

    /// Pasa una jugada al modelo. Cuando la partida termina, el resultado se suma al registrador
    /// una única vez.
    pub fn procesar(&mut self, accion: Accion) -> Result<bool, JuegoError> {
        let modelo = self.modelo.as_mut().ok_or(JuegoError::ModeloNoIniciado)?;
        let aceptada = modelo.actualizar(accion);
        if aceptada && modelo.terminado() && !self.resultado_registrado {
            self.registrar_resultado();
        }
        Ok(aceptada)
    }

    fn registrar_resultado(&mut self) {
        self.resultado_registrado = true;
        let (Some(modelo), Some(registrador)) = (&self.modelo, &self.entrada.registrador) else {
            return;
        };
        let ganador = modelo.ganador().map(Jugador::id);
        let resultado = registrador
            .borrow_mut()
            .sumar(modelo.jugadores(), ganador, modelo.empate());
        if let Err(err) = resultado {
            warn!(juego = %self.tipo, %err, "No se pudo registrar el resultado");
        }
    }

    /// Vuelve a empezar el modelo con las opciones actuales.
    pub fn reiniciar(&mut self) -> Result<(), JuegoError> {
        let modelo = self.modelo.as_mut().ok_or(JuegoError::ModeloNoIniciado)?;
        modelo.reiniciar(self.opciones.as_ref());
        self.resultado_registrado = false;
        debug!(juego = %self.tipo, "Modelo reiniciado");
        Ok(())
    }

    /// Reinicia invirtiendo antes quién empieza, en los juegos que lo permiten, para que las
    /// revanchas se alternen.
    pub fn revancha(&mut self) -> Result<(), JuegoError> {
        if self.modelo.is_none() {
            return Err(JuegoError::ModeloNoIniciado);
        }
        if let Some(opciones) = self.opciones.as_mut() {
            opciones.cambiar_orden_jugadores();
        }
        self.reiniciar()
    }

    /// Texto que describe el lobby: el juego, quiénes esperan y, si se guardan, sus estadísticas.
    pub fn resumen<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        let metadatos = &self.entrada.metadatos;
        let emoji = metadatos
            .elegir_emoji(rng)
            .map(|e| format!("{e} "))
            .unwrap_or_default();
        let mut resumen = format!(
            "Partida de {emoji}{}\n{}\n-\n*Máx jug: **{}***\n\n",
            metadatos.nombre, metadatos.descripcion, metadatos.max_jugadores
        );
        resumen.push_str(&format!(
            "Jugadores en espera ({}/{})\n",
            self.cantidad_jugadores(),
            self.min_jugadores()
        ));
        for jugador in &self.jugadores {
            let emoji = jugador.emoji().map(|e| format!("{e} ")).unwrap_or_else(|| " ".to_string());
            resumen.push_str(&format!("- {emoji}`{}`\n", jugador.nombre()));
        }
        if let Some(registrador) = &self.entrada.registrador {
            resumen.push_str("\nV - E - D\n");
            let registrador = registrador.borrow();
            for jugador in &self.jugadores {
                resumen.push_str(&format!("{}\n", registrador.get_datos(jugador.id())));
            }
        }
        if let Some(host) = self.jugador_host() {
            let cumplido = CUMPLIDOS[rng.gen_range(0..CUMPLIDOS.len())];
            resumen.push_str(&format!("\n{}{cumplido} hostea esta partida.", host.nombre()));
        }
        resumen
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;
    use crate::juegos::{
        EleccionJugador, EleccionPpt, MovimientoTaTeTi, OpcionesTaTeTi, RegistroJuegos,
    };

    fn lobby(tipo: TipoJuego) -> Manejador {
        let registro = RegistroJuegos::con_juegos_por_defecto();
        registro.manejador(tipo, Jugador::new("1", "Ana")).unwrap()
    }

    fn elegir(id: &str, eleccion: EleccionPpt) -> Accion {
        Accion::Ppt(EleccionJugador {
            id_jugador: id.to_string(),
            eleccion,
        })
    }

    #[test]
    fn lobby_rechaza_duplicados_y_llenos() {
        let mut manejador = lobby(TipoJuego::Ppt);
        assert!(!manejador.hay_suficientes());
        assert!(!manejador.agregar_jugador(Jugador::new("1", "Otra Ana")));
        assert!(manejador.agregar_jugador(Jugador::new("2", "Beto")));
        assert!(manejador.hay_suficientes());
        assert!(!manejador.agregar_jugador(Jugador::new("3", "Caro")));
        assert!(manejador.quitar_jugador("2"));
        assert!(!manejador.quitar_jugador("2"));
        assert!(!manejador.quitar_jugador("1"));
        assert_eq!(manejador.jugador_host().unwrap().id(), "1");
    }

    #[test]
    fn el_host_no_se_quita() {
        let mut manejador = lobby(TipoJuego::Chinchon);
        assert!(manejador.agregar_jugador(Jugador::new("2", "Beto")));
        assert!(manejador.agregar_jugador(Jugador::new("3", "Caro")));
        assert!(!manejador.quitar_jugador("1"));
        assert_eq!(manejador.jugador_host().unwrap().id(), "1");
        assert!(manejador.quitar_jugador("3"));
        assert!(!manejador.quitar_jugador("1"));
        assert_eq!(manejador.jugadores().len(), 2);
    }

    #[test]
    fn no_se_cambia_el_lobby_despues_de_iniciar() {
        let mut manejador = lobby(TipoJuego::TaTeTi);
        assert!(manejador.agregar_jugador(Jugador::new("2", "Beto")));
        manejador.iniciar_modelo(StdRng::seed_from_u64(0)).unwrap();
        assert!(!manejador.quitar_jugador("2"));
        assert!(!manejador.agregar_jugador(Jugador::new("3", "Caro")));
    }

    #[test]
    fn sin_modelo_no_se_procesa() {
        let mut manejador = lobby(TipoJuego::Ahorcado);
        assert!(matches!(
            manejador.procesar(Accion::Ahorcado('a')),
            Err(JuegoError::ModeloNoIniciado)
        ));
        assert!(manejador.reiniciar().is_err());
    }

    #[test]
    fn pocos_jugadores_no_inician() {
        let mut manejador = lobby(TipoJuego::CuatroEnLinea);
        assert!(matches!(
            manejador.iniciar_modelo(StdRng::seed_from_u64(0)),
            Err(JuegoError::CantidadJugadores { actual: 1, .. })
        ));
        assert!(manejador.modelo().is_none());
    }

    #[test]
    fn estadisticas_se_registran_una_vez() {
        let mut manejador = lobby(TipoJuego::Ppt);
        manejador.agregar_jugador(Jugador::new("2", "Beto"));
        manejador.iniciar_modelo(StdRng::seed_from_u64(0)).unwrap();
        assert!(manejador.procesar(elegir("1", EleccionPpt::Piedra)).unwrap());
        assert!(manejador.procesar(elegir("2", EleccionPpt::Tijeras)).unwrap());
        assert!(!manejador.procesar(elegir("2", EleccionPpt::Papel)).unwrap());
        {
            let registrador = manejador.registrador().unwrap().borrow();
            assert_eq!(registrador.get_datos("1").victorias, 1);
            assert_eq!(registrador.get_datos("2").derrotas, 1);
        }

        manejador.reiniciar().unwrap();
        assert!(manejador.procesar(elegir("1", EleccionPpt::Papel)).unwrap());
        assert!(manejador.procesar(elegir("2", EleccionPpt::Papel)).unwrap());
        let registrador = manejador.registrador().unwrap().borrow();
        assert_eq!(registrador.get_datos("1").to_string(), "1 - 1 - 0");
        assert_eq!(registrador.get_datos("2").to_string(), "0 - 1 - 1");
    }

    #[test]
    fn revancha_alterna_quien_empieza() {
        let mut manejador = lobby(TipoJuego::TaTeTi);
        manejador.agregar_jugador(Jugador::new("2", "Beto"));
        manejador.iniciar_modelo(StdRng::seed_from_u64(0)).unwrap();
        let primero = |m: &Manejador| m.modelo().unwrap().jugadores_por_actuar()[0].id().to_string();
        assert_eq!(primero(&manejador), "1");
        manejador.revancha().unwrap();
        assert_eq!(primero(&manejador), "2");
        assert_eq!(
            manejador.opciones(),
            Some(&Opciones::TaTeTi(OpcionesTaTeTi {
                empieza_primer_jugador: false
            }))
        );
        assert!(
            manejador
                .procesar(Accion::TaTeTi(MovimientoTaTeTi { col: 0, fil: 0 }))
                .unwrap()
        );
    }

    #[test]
    fn cambiar_opciones_de_otro_juego() {
        let mut manejador = lobby(TipoJuego::TaTeTi);
        assert!(!manejador.cambiar_opciones(Opciones::Chinchon(Default::default())));
        assert!(manejador.cambiar_opciones(Opciones::TaTeTi(OpcionesTaTeTi {
            empieza_primer_jugador: false
        })));
        let mut ppt = lobby(TipoJuego::Ppt);
        assert!(ppt.opciones_mut().is_none());
        assert!(!ppt.cambiar_opciones(Opciones::TaTeTi(OpcionesTaTeTi::default())));
    }

    #[test]
    fn resumen_del_lobby() {
        let mut manejador = lobby(TipoJuego::Ppt);
        manejador.agregar_jugador(Jugador::new("2", "Beto").con_emoji("\u{1F60E}"));
        let mut rng = StdRng::seed_from_u64(2);
        let resumen = manejador.resumen(&mut rng);
        assert!(resumen.starts_with("Partida de "));
        assert!(resumen.contains("Piedra, Papel o Tijeras"));
        assert!(resumen.contains("*Máx jug: **2***"));
        assert!(resumen.contains("Jugadores en espera (2/2)"));
        assert!(resumen.contains("- \u{1F60E} `Beto`"));
        assert!(resumen.contains("V - E - D\n0 - 0 - 0\n0 - 0 - 0"));
        assert!(resumen.contains("hostea esta partida."));
        assert!(resumen.contains("\nAna"));

        let resumen = lobby(TipoJuego::TaTeTi).resumen(&mut rng);
        assert!(!resumen.contains("V - E - D"));
    }
}
