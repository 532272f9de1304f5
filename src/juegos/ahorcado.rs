use std::fmt;
use std::fs;
use std::path::Path;

use itertools::Itertools;
use rand::Rng;
use rand::rngs::StdRng;
use tracing::{debug, warn};

use super::{Juego, JuegoError, Jugador, OpcionesAhorcado, Partida};

const NUDO: &str = "\u{1FAA2}";

/// Tope de líneas que se recorren al elegir una frase de la lista de palabras.
const MAX_SALTOS: u32 = 1 << 24;

/// Letras que se ofrecen como jugadas posibles.
const ABECEDARIO: &str = "ABCDEFGHIJKLMNÑOPQRSTUVWXYZ";

/// Letra de la frase del ahorcado. Una vez descubierta no se puede volver a ocultar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LetraAhorcado {
    valor: char,
    oculta: bool,
}

impl LetraAhorcado {
    pub fn new(valor: char, oculta: bool) -> Self {
        Self { valor, oculta }
    }

    pub fn valor(&self) -> char {
        self.valor
    }

    pub fn oculta(&self) -> bool {
        self.oculta
    }

    pub fn set_oculta(&mut self, oculta: bool) {
        if !oculta {
            self.oculta = false;
        }
    }
}

impl fmt::Display for LetraAhorcado {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.oculta {
            write!(f, "<{}>", self.valor)
        } else {
            write!(f, "{}", self.valor)
        }
    }
}

/// Convierte un texto de un único carácter en la letra a adivinar.
pub fn letra_de_texto(texto: &str) -> Result<char, JuegoError> {
    let mut chars = texto.trim().chars();
    match (chars.next(), chars.next()) {
        (Some(letra), None) => Ok(mayuscula(letra)),
        _ => Err(JuegoError::LetraNoValida(texto.to_string())),
    }
}

fn mayuscula(letra: char) -> char {
    letra.to_uppercase().next().unwrap_or(letra)
}

/// Elige una frase de la lista de palabras.
///
/// Se avanza una cantidad aleatoria de líneas, volviendo al principio del fichero cada vez que se
/// llega al final, y se toma la última línea no vacía que se leyó. El final del fichero cuenta
/// como una línea vacía más.
pub fn cargar_palabra<R: Rng + ?Sized>(ruta: &Path, rng: &mut R) -> Result<String, JuegoError> {
    let contenido = fs::read_to_string(ruta)
        .map_err(|err| JuegoError::ListaPalabras(err, ruta.display().to_string()))?;
    let lineas: Vec<&str> = contenido.lines().map(str::trim).collect();
    let ciclo = lineas.len() + 1;
    let saltos = rng.gen_range(0..=MAX_SALTOS) as usize;

    let elegida = (0..saltos.min(ciclo))
        .map(|atras| (saltos - 1 - atras) % ciclo)
        .find_map(|i| lineas.get(i).filter(|l| !l.is_empty()));
    elegida
        .or_else(|| lineas.iter().find(|l| !l.is_empty()))
        .map(|l| l.to_string())
        .ok_or(JuegoError::FraseVacia)
}

/// Ahorcado cooperativo: todos los jugadores adivinan la misma frase y comparten las vidas.
#[derive(Debug, Clone)]
pub struct Ahorcado {
    partida: Partida,
    opciones: OpcionesAhorcado,
    maximos_intentos: u32,
    intentos: u32,
    caracteres_usados: Vec<char>,
    frase: Vec<LetraAhorcado>,
    terminado: bool,
    victoria: bool,
}

impl Ahorcado {
    fn generar_frase(frase: &str) -> Vec<LetraAhorcado> {
        frase
            .chars()
            .flat_map(char::to_uppercase)
            .map(|c| LetraAhorcado::new(c, c != ' '))
            .collect()
    }

    fn elegir_frase(opciones: &OpcionesAhorcado, rng: &mut StdRng) -> Result<String, JuegoError> {
        if !opciones.frase.trim().is_empty() {
            return Ok(opciones.frase.trim().to_string());
        }
        cargar_palabra(Path::new(&opciones.lista_palabras), rng)
    }

    pub fn intentos(&self) -> u32 {
        self.intentos
    }

    pub fn maximos_intentos(&self) -> u32 {
        self.maximos_intentos
    }

    pub fn caracteres_usados(&self) -> &[char] {
        &self.caracteres_usados
    }

    pub fn frase(&self) -> &[LetraAhorcado] {
        &self.frase
    }

    pub fn get_frase(&self) -> String {
        self.frase.iter().map(|l| l.valor).collect()
    }

    /// Intenta adivinar una letra, sin distinguir mayúsculas. Devuelve si la letra ya se había
    /// usado y si está en la frase. Sólo se pierde una vida la primera vez que se prueba una letra
    /// que no está.
    pub fn adivinar(&mut self, letra: char) -> (bool, bool) {
        let letra = mayuscula(letra);
        let fue_usado = self.caracteres_usados.contains(&letra);
        if !fue_usado {
            self.caracteres_usados.push(letra);
        }
        let mut esta_presente = false;
        for l in self.frase.iter_mut().filter(|l| l.valor == letra) {
            l.set_oculta(false);
            esta_presente = true;
        }
        if !esta_presente && !fue_usado {
            self.intentos = self.intentos.saturating_sub(1);
        }
        (fue_usado, esta_presente)
    }

    pub fn victoria(&self) -> bool {
        self.terminado && self.victoria
    }

    fn termino_juego(&mut self) {
        if self.intentos == 0 {
            self.terminado = true;
            return;
        }
        if self.frase.iter().all(|l| !l.oculta) {
            self.terminado = true;
            self.victoria = true;
        }
    }

    fn refrescar_mensaje(&mut self, extra: Option<String>) {
        let mensaje = match extra {
            Some(extra) => format!("{extra}\n{self}"),
            None => self.to_string(),
        };
        self.partida.set_mensaje(mensaje);
    }
}

impl Juego for Ahorcado {
    const NOMBRE: &'static str = "Ahorcado";
    const DESCRIPCION: &'static str = "Adivina la frase antes de que se te acaben las vidas.";
    const EMOJIS: &'static [&'static str] = &[NUDO];
    const MIN_JUGADORES: usize = 1;
    const MAX_JUGADORES: usize = 8;

    type Opciones = OpcionesAhorcado;
    type Accion = char;

    fn crear(
        jugadores: Vec<Jugador>,
        opciones: Option<&OpcionesAhorcado>,
        rng: StdRng,
    ) -> Result<Self, JuegoError> {
        let mut partida = Partida::new::<Self>(jugadores, rng)?;
        let opciones = opciones.cloned().unwrap_or_default();
        let frase = Self::elegir_frase(&opciones, partida.rng())?;
        let maximos_intentos = opciones.vidas.max(1);
        Ok(Self {
            partida,
            opciones,
            maximos_intentos,
            intentos: maximos_intentos,
            caracteres_usados: vec![],
            frase: Self::generar_frase(&frase),
            terminado: false,
            victoria: false,
        })
    }

    fn partida(&self) -> &Partida {
        &self.partida
    }

    fn partida_mut(&mut self) -> &mut Partida {
        &mut self.partida
    }

    fn iniciar(&mut self) -> bool {
        self.termino_juego();
        self.refrescar_mensaje(None);
        true
    }

    /// Adivina una letra. Una letra repetida no se acepta; una letra nueva sí, esté o no en la
    /// frase.
    fn actualizar(&mut self, letra: char) -> bool {
        if self.terminado {
            return false;
        }
        let letra = mayuscula(letra);
        let (fue_usado, es_correcta) = self.adivinar(letra);
        if fue_usado {
            self.refrescar_mensaje(Some(format!("`{letra}` ya fue utilizada. Prueba otra.")));
            return false;
        }
        debug!(%letra, es_correcta, intentos = self.intentos, "Letra adivinada");
        let extra = if es_correcta {
            format!("¡`{letra}` es **CORRECTA**!")
        } else {
            format!("¡`{letra}` es **INCORRECTA**!")
        };
        self.termino_juego();
        self.refrescar_mensaje(Some(extra));
        true
    }

    fn terminado(&self) -> bool {
        self.terminado
    }

    /// Vuelve a empezar. Si las opciones traen una frase se vuelve a jugar esa; si no, se elige
    /// otra de la lista de palabras, y si la lista no se puede leer se repite la frase anterior.
    fn reiniciar(&mut self, opciones: Option<&OpcionesAhorcado>) {
        if let Some(opciones) = opciones {
            self.opciones = opciones.clone();
        }
        self.maximos_intentos = self.opciones.vidas.max(1);
        self.intentos = self.maximos_intentos;
        self.caracteres_usados.clear();

        let frase = match Self::elegir_frase(&self.opciones, self.partida.rng()) {
            Ok(frase) => frase,
            Err(err) => {
                warn!(%err, "No se pudo elegir una frase nueva");
                self.get_frase()
            }
        };
        self.frase = Self::generar_frase(&frase);
        self.terminado = false;
        self.victoria = false;
        self.iniciar();
    }

    /// Es un juego cooperativo: no hay un ganador individual.
    fn ganador(&self) -> Option<&Jugador> {
        None
    }

    fn jugadores_por_actuar(&self) -> Vec<&Jugador> {
        if self.terminado {
            return vec![];
        }
        self.partida.jugadores().iter().collect()
    }

    fn jugadas_posibles(&self, id_jugador: &str) -> Vec<char> {
        if self.terminado || !self.existe_jugador(id_jugador) {
            return vec![];
        }
        let fuera_del_abecedario = self
            .frase
            .iter()
            .filter(|l| l.oculta && !ABECEDARIO.contains(l.valor))
            .map(|l| l.valor);
        ABECEDARIO
            .chars()
            .chain(fuera_del_abecedario)
            .unique()
            .filter(|c| !self.caracteres_usados.contains(c))
            .collect()
    }
}

impl fmt::Display for Ahorcado {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let frase: Vec<String> = self
            .frase
            .iter()
            .map(|l| if l.oculta { "_".to_string() } else { l.valor.to_string() })
            .collect();
        let frase = frase.join("  ");
        let usados = if self.caracteres_usados.is_empty() {
            "-".to_string()
        } else {
            let usados: Vec<String> = self.caracteres_usados.iter().map(|c| c.to_string()).collect();
            usados.join(" - ")
        };

        const SIMBOLOS: [&str; 7] = ["O", "|", "/", "\\", "|", "/", "\\"];
        let piezas: Vec<&str> = SIMBOLOS
            .iter()
            .enumerate()
            .map(|(k, s)| if self.intentos < (7 - k) as u32 { *s } else { "" })
            .collect();
        let torso = if piezas[2].is_empty() && piezas[3].is_empty() {
            format!("{} {} {}", piezas[2], piezas[1], piezas[3])
        } else {
            format!("{}{}{}", piezas[2], piezas[1], piezas[3])
        };

        writeln!(f, "```")?;
        writeln!(f)?;
        writeln!(f, "    -=-= AHORCADO =-=-")?;
        writeln!(f)?;
        writeln!(f, "    +--------+")?;
        writeln!(f, "    |        |")?;
        writeln!(f, "    |        {}", piezas[0])?;
        writeln!(f, "    |       {torso}            {frase}")?;
        writeln!(f, "    |        {}", piezas[4])?;
        writeln!(f, "    |       {} {}", piezas[5], piezas[6])?;
        writeln!(f, "    |                       LETRAS USADAS: {usados}")?;
        writeln!(f, "    |")?;
        writeln!(
            f,
            "==============           -= VIDAS RESTANTES: {} =-",
            self.intentos
        )?;
        write!(f, "```")
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use rand::SeedableRng;

    use super::*;

    fn nuevo(frase: &str, vidas: u32) -> Ahorcado {
        let opciones = OpcionesAhorcado {
            vidas,
            frase: frase.to_string(),
            ..Default::default()
        };
        let jugadores = vec![Jugador::new("1", "Ana"), Jugador::new("2", "Beto")];
        let mut juego = Ahorcado::crear(jugadores, Some(&opciones), StdRng::seed_from_u64(0)).unwrap();
        juego.iniciar();
        juego
    }

    #[test]
    fn letra_descubierta_no_se_oculta() {
        let mut letra = LetraAhorcado::new('A', true);
        letra.set_oculta(false);
        assert!(!letra.oculta());
        letra.set_oculta(true);
        assert!(!letra.oculta());
    }

    #[test]
    fn espacios_descubiertos_y_mayusculas() {
        let juego = nuevo("hola mundo", 7);
        assert_eq!(juego.get_frase(), "HOLA MUNDO");
        let ocultas: Vec<bool> = juego.frase().iter().map(|l| l.oculta()).collect();
        assert_eq!(ocultas.iter().filter(|o| !**o).count(), 1);
        assert!(!juego.frase()[4].oculta());
    }

    #[test]
    fn letra_repetida_no_cuesta_vidas() {
        let mut juego = nuevo("gato", 7);
        assert!(juego.actualizar('z'));
        assert_eq!(juego.intentos(), 6);
        assert!(!juego.actualizar('Z'));
        assert_eq!(juego.intentos(), 6);
        assert!(juego.mensaje().contains("ya fue utilizada"));
        assert!(juego.actualizar('g'));
        assert!(!juego.actualizar('G'));
        assert_eq!(juego.intentos(), 6);
        assert_eq!(juego.adivinar('z'), (true, false));
        assert_eq!(juego.adivinar('a'), (false, true));
    }

    #[test]
    fn victoria_al_descubrir_todo() {
        let mut juego = nuevo("Sol y mar", 3);
        for letra in ['s', 'o', 'l', 'y', 'm', 'a'] {
            assert!(!juego.terminado());
            juego.actualizar(letra);
        }
        assert!(!juego.terminado());
        juego.actualizar('r');
        assert!(juego.terminado());
        assert!(juego.victoria());
        assert_eq!(juego.intentos(), 3);
        assert!(juego.jugadas_posibles("1").is_empty());
    }

    #[test]
    fn derrota_sin_vidas() {
        let mut juego = nuevo("xyz", 2);
        juego.actualizar('a');
        assert!(!juego.terminado());
        juego.actualizar('b');
        assert!(juego.terminado());
        assert!(!juego.victoria());
        assert_eq!(juego.intentos(), 0);
        assert!(!juego.actualizar('x'));
        assert!(juego.to_string().contains("VIDAS RESTANTES: 0"));
    }

    #[test]
    fn dibujo_del_ahorcado() {
        let mut juego = nuevo("ab", 7);
        assert!(!juego.to_string().contains(" O\n"));
        juego.actualizar('z');
        let dibujo = juego.to_string();
        assert!(dibujo.contains("|        O\n"));
        assert!(dibujo.contains("LETRAS USADAS: Z"));
        assert!(dibujo.contains("_  _"));
        juego.actualizar('a');
        assert!(juego.to_string().contains("A  _"));
    }

    #[test]
    fn letras_de_texto() {
        assert_eq!(letra_de_texto("ñ").unwrap(), 'Ñ');
        assert_eq!(letra_de_texto(" a ").unwrap(), 'A');
        assert!(matches!(letra_de_texto("ab"), Err(JuegoError::LetraNoValida(_))));
        assert!(matches!(letra_de_texto(""), Err(JuegoError::LetraNoValida(_))));
    }

    fn lista_temporal(nombre: &str, contenido: &str) -> std::path::PathBuf {
        let ruta = std::env::temp_dir().join(format!(
            "botshot_{nombre}_{}.txt",
            std::process::id()
        ));
        let mut archivo = fs::File::create(&ruta).unwrap();
        write!(archivo, "{contenido}").unwrap();
        ruta
    }

    #[test]
    fn frase_de_la_lista_de_palabras() {
        let ruta = lista_temporal("palabras", "perro\n\n  gato  \nloro\n");

        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..20 {
            let frase = cargar_palabra(&ruta, &mut rng).unwrap();
            assert!(["perro", "gato", "loro"].contains(&frase.as_str()), "{frase}");
        }

        let vacio = lista_temporal("palabras_vacio", "\n \n");
        assert!(matches!(
            cargar_palabra(&vacio, &mut rng),
            Err(JuegoError::FraseVacia)
        ));
        assert!(matches!(
            cargar_palabra(Path::new("no/existe.txt"), &mut rng),
            Err(JuegoError::ListaPalabras(..))
        ));
        fs::remove_file(&ruta).unwrap();
        fs::remove_file(&vacio).unwrap();
    }

    #[test]
    fn caracteres_fuera_del_abecedario_se_pueden_jugar() {
        let mut juego = nuevo("café", 40);
        assert!(juego.jugadas_posibles("1").contains(&'É'));
        while !juego.terminado() {
            let jugadas = juego.jugadas_posibles("1");
            assert!(!jugadas.is_empty());
            assert!(juego.actualizar(jugadas[0]));
        }
        assert!(juego.victoria());
        assert!(!juego.jugadas_posibles("2").contains(&'É'));
    }

    #[test]
    fn reiniciar_con_frase_fija_la_repite() {
        let mut juego = nuevo("gato", 7);
        juego.actualizar('g');
        juego.reiniciar(None);
        assert_eq!(juego.get_frase(), "GATO");
        assert!(juego.frase().iter().all(|l| l.oculta()));
        assert_eq!(juego.intentos(), 7);
    }

    #[test]
    fn reiniciar_elige_de_la_lista() {
        let ruta = lista_temporal("palabras_reiniciar", "perro\ngato\nloro\n");
        let opciones = OpcionesAhorcado {
            lista_palabras: ruta.display().to_string(),
            ..Default::default()
        };
        let jugadores = vec![Jugador::new("1", "Ana")];
        let mut juego =
            Ahorcado::crear(jugadores, Some(&opciones), StdRng::seed_from_u64(3)).unwrap();
        juego.iniciar();
        let mut vistas = vec![juego.get_frase()];
        for _ in 0..30 {
            juego.actualizar('o');
            juego.reiniciar(None);
            assert!(juego.caracteres_usados().is_empty());
            vistas.push(juego.get_frase());
        }
        assert!(vistas.iter().all(|f| ["PERRO", "GATO", "LORO"].contains(&f.as_str())));
        assert!(vistas.iter().unique().count() > 1);
        fs::remove_file(&ruta).unwrap();
    }
}
