use std::fmt;

use rand::Rng;
use rand::rngs::StdRng;
use tracing::debug;

use super::{Juego, JuegoError, Jugador, OpcionesCuatroEnLinea, Partida};

pub const DIM_X: usize = 7;
pub const DIM_Y: usize = 6;
/// Fichas a alinear para ganar.
pub const EN_LINEA: usize = 4;

pub const FICHA_ROJA: &str = "#F02311";
pub const FICHA_AMARILLA: &str = "#F0D53C";

const ROJO: &str = "\u{1F534}";
const AMARILLO: &str = "\u{1F7E1}";

/// Casilla del tablero. Además de su letra guarda, para cada una de las ocho direcciones, cuántas
/// letras iguales seguidas tiene al lado.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Casilla {
    contenido: Option<char>,
    vecinos: [[usize; 3]; 3],
}

impl Casilla {
    pub fn contenido(&self) -> Option<char> {
        self.contenido
    }

    /// Vecinos iguales en la dirección `(dx, dy)`, con ambas componentes entre -1 y 1.
    pub fn vecinos(&self, dx: isize, dy: isize) -> usize {
        self.vecinos[(dy + 1) as usize][(dx + 1) as usize]
    }
}

impl fmt::Display for Casilla {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.contenido.unwrap_or('-'))
    }
}

/// 4 en Línea. La fila 0 es la de arriba: las letras caen hacia las filas más altas.
#[derive(Debug, Clone)]
pub struct CuatroEnLinea {
    partida: Partida,
    opciones: OpcionesCuatroEnLinea,
    letras: [char; 2],
    colores: [String; 2],
    turno: usize,
    grilla: [[Casilla; DIM_X]; DIM_Y],
    ultima_ficha: Option<(usize, usize)>,
    terminado: bool,
    empate: bool,
}

fn letra_random<R: Rng + ?Sized>(rng: &mut R) -> char {
    char::from(b'A' + rng.gen_range(0..26u8))
}

fn color_random<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("#{:06X}", rng.gen_range(0..=0xFFFFFFu32))
}

impl CuatroEnLinea {
    pub fn opciones(&self) -> &OpcionesCuatroEnLinea {
        &self.opciones
    }

    pub fn turno(&self) -> usize {
        self.turno
    }

    pub fn ultima_ficha(&self) -> Option<(usize, usize)> {
        self.ultima_ficha
    }

    fn ind_actual(&self) -> usize {
        let paridad = self.turno % 2;
        if self.opciones.primero_jugador_1 {
            paridad
        } else {
            1 - paridad
        }
    }

    pub fn jugador_actual(&self) -> &Jugador {
        &self.partida.jugadores()[self.ind_actual()]
    }

    pub fn jugador_anterior(&self) -> &Jugador {
        &self.partida.jugadores()[1 - self.ind_actual()]
    }

    pub fn letra_actual(&self) -> char {
        self.letras[self.ind_actual()]
    }

    pub fn letra_de(&self, id_jugador: &str) -> Option<char> {
        let ind = self
            .partida
            .jugadores()
            .iter()
            .position(|j| j.id() == id_jugador)?;
        Some(self.letras[ind])
    }

    pub fn color_actual(&self) -> &str {
        &self.colores[self.ind_actual()]
    }

    pub fn color_anterior(&self) -> &str {
        &self.colores[1 - self.ind_actual()]
    }

    fn coords_validas(col: isize, fil: isize) -> bool {
        (0..DIM_X as isize).contains(&col) && (0..DIM_Y as isize).contains(&fil)
    }

    pub fn casilla(&self, col: usize, fil: usize) -> Option<&Casilla> {
        self.grilla.get(fil)?.get(col)
    }

    pub fn casilla_esta_libre(&self, col: usize, fil: usize) -> bool {
        self.casilla(col, fil).is_some_and(|c| c.contenido.is_none())
    }

    /// Fila en la que caería una letra soltada en `col`, o `None` si la columna está llena o no
    /// existe.
    pub fn fila_libre(&self, col: usize) -> Option<usize> {
        let libres = (0..DIM_Y)
            .filter(|&fil| self.casilla_esta_libre(col, fil))
            .count();
        libres.checked_sub(1)
    }

    pub fn col_esta_llena(&self, col: usize) -> bool {
        self.fila_libre(col).is_none()
    }

    /// Suelta la letra actual en una columna. Devuelve `Ok(false)` si la columna estaba llena.
    pub fn dejar_caer(&mut self, col: usize) -> Result<bool, JuegoError> {
        if col >= DIM_X {
            return Err(JuegoError::ColumnaNoValida(col));
        }
        let Some(fil) = self.fila_libre(col) else {
            return Ok(false);
        };
        self.grilla[fil][col].contenido = Some(self.letra_actual());
        self.ultima_ficha = Some((col, fil));
        self.actualizar_vecinos(col, fil);
        self.verificar_fin(col, fil);
        Ok(true)
    }

    fn es_letra_actual(&self, col: isize, fil: isize) -> bool {
        Self::coords_validas(col, fil)
            && self.grilla[fil as usize][col as usize].contenido == Some(self.letra_actual())
    }

    fn actualizar_vecinos(&mut self, col: usize, fil: usize) {
        let (col, fil) = (col as isize, fil as isize);
        for dx in -1..=1 {
            for dy in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let n = self.verificar_direccion(col, fil, dx, dy, true);
                self.grilla[fil as usize][col as usize].vecinos[(dy + 1) as usize]
                    [(dx + 1) as usize] = n;
            }
        }
    }

    /// Cuenta las letras iguales seguidas en la dirección `(dx, dy)` sin contar la de `(col, fil)`.
    /// Con `actualizar`, cada casilla recorrida recalcula su cuenta en la dirección opuesta.
    fn verificar_direccion(
        &mut self,
        col: isize,
        fil: isize,
        dx: isize,
        dy: isize,
        actualizar: bool,
    ) -> usize {
        let (sig_col, sig_fil) = (col + dx, fil + dy);
        if !self.es_letra_actual(sig_col, sig_fil) {
            return 0;
        }
        if actualizar {
            let n = self.verificar_direccion(sig_col, sig_fil, -dx, -dy, false);
            self.grilla[sig_fil as usize][sig_col as usize].vecinos[(1 - dy) as usize]
                [(1 - dx) as usize] = n;
        }
        self.verificar_direccion(sig_col, sig_fil, dx, dy, actualizar) + 1
    }

    fn verificar_fin(&mut self, col: usize, fil: usize) {
        let casilla = self.grilla[fil][col];
        let hay_linea = [(1, 0), (0, 1), (1, 1), (1, -1)]
            .iter()
            .any(|&(dx, dy)| casilla.vecinos(dx, dy) + casilla.vecinos(-dx, -dy) + 1 >= EN_LINEA);
        if hay_linea {
            self.terminado = true;
        } else if self.turno >= DIM_X * DIM_Y - 1 {
            self.terminado = true;
            self.empate = true;
        }
    }

    fn refrescar_mensaje_turno(&mut self) {
        let nombre = self.jugador_actual().nombre();
        let mut mensaje = if self.empate {
            "¡Empate! El tablero está lleno.".to_string()
        } else if self.terminado {
            format!("¡**{nombre}** ganó la partida!")
        } else {
            format!("Turno de **{nombre}")
        };
        if !self.terminado {
            if self.opciones.modo_texto {
                mensaje += &format!(" [ {} ]**", self.letra_actual());
            } else {
                mensaje += "**";
            }
        }
        if self.opciones.modo_texto {
            mensaje += &format!("\n```\n{self}\n```");
        }
        self.partida.set_mensaje(mensaje);
    }
}

impl Juego for CuatroEnLinea {
    const NOMBRE: &'static str = "4 en Línea";
    const DESCRIPCION: &'static str =
        "Deja caer letras en el tablero y logra alinear 4 en un tablero 7x6.";
    const EMOJIS: &'static [&'static str] = &[ROJO, AMARILLO];
    const MIN_JUGADORES: usize = 2;
    const MAX_JUGADORES: usize = 2;

    type Opciones = OpcionesCuatroEnLinea;
    type Accion = usize;

    fn crear(
        jugadores: Vec<Jugador>,
        opciones: Option<&OpcionesCuatroEnLinea>,
        rng: StdRng,
    ) -> Result<Self, JuegoError> {
        let mut partida = Partida::new::<Self>(jugadores, rng)?;
        let opciones = opciones.cloned().unwrap_or_default();

        let rng = partida.rng();
        let letra_1 = letra_random(rng);
        let mut letra_2 = letra_random(rng);
        while letra_2 == letra_1 {
            letra_2 = letra_random(rng);
        }
        let colores = if opciones.colores_default {
            [FICHA_ROJA.to_string(), FICHA_AMARILLA.to_string()]
        } else {
            let color_1 = color_random(rng);
            let mut color_2 = color_random(rng);
            while color_2 == color_1 {
                color_2 = color_random(rng);
            }
            [color_1, color_2]
        };

        Ok(Self {
            partida,
            opciones,
            letras: [letra_1, letra_2],
            colores,
            turno: 0,
            grilla: [[Casilla::default(); DIM_X]; DIM_Y],
            ultima_ficha: None,
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
        self.refrescar_mensaje_turno();
        true
    }

    fn actualizar(&mut self, col: usize) -> bool {
        if self.terminado {
            return false;
        }
        match self.dejar_caer(col) {
            Ok(true) => {
                debug!(col, turno = self.turno, "Letra soltada");
                if !self.terminado {
                    self.turno += 1;
                }
                self.refrescar_mensaje_turno();
                true
            }
            Ok(false) | Err(_) => {
                self.partida.set_mensaje("*Movimiento Inválido.*");
                false
            }
        }
    }

    fn terminado(&self) -> bool {
        self.terminado
    }

    fn empate(&self) -> bool {
        self.empate
    }

    fn reiniciar(&mut self, opciones: Option<&OpcionesCuatroEnLinea>) {
        if let Some(opciones) = opciones {
            self.opciones = opciones.clone();
        }
        self.grilla = [[Casilla::default(); DIM_X]; DIM_Y];
        self.turno = 0;
        self.ultima_ficha = None;
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

    fn jugadas_posibles(&self, id_jugador: &str) -> Vec<usize> {
        if self.terminado || self.jugador_actual().id() != id_jugador {
            return vec![];
        }
        (0..DIM_X).filter(|&col| !self.col_esta_llena(col)).collect()
    }
}

impl fmt::Display for CuatroEnLinea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for fila in &self.grilla {
            let fila: Vec<String> = fila
                .iter()
                .map(|c| c.contenido.unwrap_or('-').to_string())
                .collect();
            writeln!(f, "{}", fila.join("\t"))?;
        }
        let indices: Vec<String> = (1..=DIM_X).map(|n| n.to_string()).collect();
        write!(f, "{}", indices.join("\t"))
    }
}
