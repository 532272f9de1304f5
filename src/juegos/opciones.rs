use serde::{Deserialize, Serialize};

/// Ruta por defecto de la lista de palabras del ahorcado.
pub const LISTA_PALABRAS_POR_DEFECTO: &str = "data/palabras_ahorcado.txt";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpcionesTaTeTi {
    pub empieza_primer_jugador: bool,
}

impl Default for OpcionesTaTeTi {
    fn default() -> Self {
        Self {
            empieza_primer_jugador: true,
        }
    }
}

impl OpcionesTaTeTi {
    /// Invierte quién empieza. Devuelve el nuevo valor.
    pub fn cambiar_orden_jugadores(&mut self) -> bool {
        self.empieza_primer_jugador = !self.empieza_primer_jugador;
        self.empieza_primer_jugador
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpcionesCuatroEnLinea {
    /// El mensaje de turno incluye el tablero dibujado con caracteres.
    pub modo_texto: bool,
    pub primero_jugador_1: bool,
    /// Usar rojo y amarillo en lugar de dos colores al azar.
    pub colores_default: bool,
}

impl Default for OpcionesCuatroEnLinea {
    fn default() -> Self {
        Self {
            modo_texto: false,
            primero_jugador_1: true,
            colores_default: true,
        }
    }
}

impl OpcionesCuatroEnLinea {
    pub fn cambiar_orden_jugadores(&mut self) -> bool {
        self.primero_jugador_1 = !self.primero_jugador_1;
        self.primero_jugador_1
    }

    pub fn cambiar_modo_texto(&mut self) -> bool {
        self.modo_texto = !self.modo_texto;
        self.modo_texto
    }

    pub fn usar_colores_default(&mut self) -> bool {
        self.colores_default = !self.colores_default;
        self.colores_default
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpcionesAhorcado {
    pub vidas: u32,
    /// Frase a adivinar. Si está vacía se elige una de la lista de palabras.
    pub frase: String,
    pub lista_palabras: String,
}

impl Default for OpcionesAhorcado {
    fn default() -> Self {
        Self {
            vidas: 7,
            frase: String::new(),
            lista_palabras: LISTA_PALABRAS_POR_DEFECTO.to_string(),
        }
    }
}

impl OpcionesAhorcado {
    /// Cambia las vidas. Nunca quedan menos de una.
    pub fn cambiar_vidas(&mut self, vidas: u32) -> u32 {
        self.vidas = vidas.max(1);
        self.vidas
    }

    pub fn mas_vidas(&mut self, mas: u32) -> u32 {
        self.vidas = self.vidas.saturating_add(mas);
        self.vidas
    }

    /// Resta vidas. No tiene efecto si se quedaría con menos de una.
    pub fn menos_vidas(&mut self, menos: u32) -> u32 {
        if self.vidas.saturating_sub(menos) >= 1 {
            self.vidas -= menos;
        }
        self.vidas
    }

    pub fn cambiar_frase(&mut self, frase: &str) -> &str {
        self.frase = frase.to_string();
        &self.frase
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpcionesChinchon {
    /// Puntos con los que se queda eliminado.
    pub tope: i32,
    pub hay_puntaje_negativo: bool,
    pub admitir_reenganche: bool,
}

impl Default for OpcionesChinchon {
    fn default() -> Self {
        Self {
            tope: 100,
            hay_puntaje_negativo: false,
            admitir_reenganche: true,
        }
    }
}

/// Opciones de cualquiera de los juegos que las tienen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "juego")]
pub enum Opciones {
    TaTeTi(OpcionesTaTeTi),
    CuatroEnLinea(OpcionesCuatroEnLinea),
    Ahorcado(OpcionesAhorcado),
    Chinchon(OpcionesChinchon),
}

impl Opciones {
    /// Invierte el orden de los jugadores en los juegos en los que se puede elegir quién empieza.
    /// Devuelve `false` si el juego no tiene esa opción.
    pub fn cambiar_orden_jugadores(&mut self) -> bool {
        match self {
            Opciones::TaTeTi(o) => {
                o.cambiar_orden_jugadores();
                true
            }
            Opciones::CuatroEnLinea(o) => {
                o.cambiar_orden_jugadores();
                true
            }
            Opciones::Ahorcado(_) | Opciones::Chinchon(_) => false,
        }
    }
}
