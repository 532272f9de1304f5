use serde::{Deserialize, Serialize};

/// Longitud máxima, en caracteres, del nombre de un jugador.
pub const LONGITUD_MAXIMA_NOMBRE: usize = 30;

/// Jugador de una partida. Dos jugadores son el mismo si coinciden su id y su nombre.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Jugador {
    id: String,
    nombre: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    emoji: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    foto_perfil: Option<Vec<u8>>,
}

impl Jugador {
    /// Crea un jugador. Si el nombre es demasiado largo se trunca.
    pub fn new(id: impl Into<String>, nombre: &str) -> Self {
        Self {
            id: id.into(),
            nombre: nombre.chars().take(LONGITUD_MAXIMA_NOMBRE).collect(),
            emoji: None,
            foto_perfil: None,
        }
    }

    pub fn con_emoji(mut self, emoji: impl Into<String>) -> Self {
        self.emoji = Some(emoji.into());
        self
    }

    pub fn con_foto_perfil(mut self, foto: Vec<u8>) -> Self {
        self.foto_perfil = Some(foto);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn nombre(&self) -> &str {
        &self.nombre
    }

    pub fn emoji(&self) -> Option<&str> {
        self.emoji.as_deref()
    }

    pub fn foto_perfil(&self) -> Option<&[u8]> {
        self.foto_perfil.as_deref()
    }

    /// Intenta cambiar el nombre del jugador. A diferencia de `new`, un nombre demasiado largo no
    /// se trunca sino que se rechaza.
    pub fn cambiar_nombre(&mut self, nuevo_nombre: &str) -> bool {
        if nuevo_nombre.chars().count() > LONGITUD_MAXIMA_NOMBRE {
            return false;
        }
        self.nombre = nuevo_nombre.to_string();
        true
    }
}

impl PartialEq for Jugador {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.nombre == other.nombre
    }
}

impl Eq for Jugador {}
