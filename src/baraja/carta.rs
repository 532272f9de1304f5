use std::cmp::Ordering;
use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::BarajaError;

/// Número que lleva un comodín mientras no forma parte de ningún grupo. Siempre es mayor que el de
/// cualquier otra carta.
pub const NUM_COMODIN: u8 = u8::MAX;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Palo {
    Basto,
    Copa,
    Espada,
    Oro,
    Comodin,
}

impl Palo {
    /// Los cuatro palos de la baraja, sin el comodín.
    pub const NORMALES: [Palo; 4] = [Palo::Basto, Palo::Copa, Palo::Espada, Palo::Oro];

    pub fn nombre(&self) -> &'static str {
        match self {
            Palo::Basto => "Basto",
            Palo::Copa => "Copa",
            Palo::Espada => "Espada",
            Palo::Oro => "Oro",
            Palo::Comodin => "Comodín",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Palo::Basto => "\u{1FAB5}",
            Palo::Copa => "\u{1F3C6}",
            Palo::Espada => "\u{1F5E1}",
            Palo::Oro => "\u{1FA99}",
            Palo::Comodin => "\u{1F0CF}",
        }
    }

    /// Elige uno de los cuatro palos normales al azar.
    pub fn aleatorio<R: Rng + ?Sized>(rng: &mut R) -> Palo {
        Palo::NORMALES[rng.gen_range(0..Palo::NORMALES.len())]
    }
}

impl From<&Palo> for char {
    fn from(other: &Palo) -> char {
        match other {
            Palo::Basto => 'B',
            Palo::Copa => 'C',
            Palo::Espada => 'E',
            Palo::Oro => 'O',
            Palo::Comodin => '*',
        }
    }
}

impl TryFrom<char> for Palo {
    type Error = BarajaError;

    fn try_from(other: char) -> Result<Self, Self::Error> {
        match other.to_ascii_uppercase() {
            'B' => Ok(Palo::Basto),
            'C' => Ok(Palo::Copa),
            'E' => Ok(Palo::Espada),
            'O' => Ok(Palo::Oro),
            '*' => Ok(Palo::Comodin),
            _ => Err(BarajaError::PaloNoValido(other)),
        }
    }
}

/// Naipe español.
///
/// Dos cartas son iguales si coinciden en número y palo. Las comparaciones de orden sólo miran el
/// número, por eso un comodín es mayor que cualquier otra carta. Cartas del mismo número y distinto
/// palo no son comparables.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Carta {
    num: u8,
    palo: Palo,
}

impl Carta {
    pub fn new(num: u8, palo: Palo) -> Result<Self, BarajaError> {
        if !(1..=12).contains(&num) {
            return Err(BarajaError::NumeroNoValido(num));
        }
        let num = if palo == Palo::Comodin { NUM_COMODIN } else { num };
        Ok(Carta { num, palo })
    }

    pub fn comodin() -> Self {
        Carta {
            num: NUM_COMODIN,
            palo: Palo::Comodin,
        }
    }

    /// Crea una carta eligiendo al azar lo que no se especifique. El número se elige entre 1 y 12
    /// y el palo entre los cuatro palos normales.
    pub fn aleatoria<R: Rng + ?Sized>(
        num: Option<u8>,
        palo: Option<Palo>,
        rng: &mut R,
    ) -> Result<Self, BarajaError> {
        let palo = palo.unwrap_or_else(|| Palo::aleatorio(rng));
        let num = num.unwrap_or_else(|| rng.gen_range(1..=12));
        Carta::new(num, palo)
    }

    pub fn num(&self) -> u8 {
        self.num
    }

    pub fn palo(&self) -> Palo {
        self.palo
    }

    pub fn es_comodin(&self) -> bool {
        self.palo == Palo::Comodin
    }

    pub fn mismo_num(&self, otra: &Carta) -> bool {
        self.num == otra.num
    }

    pub fn mismo_palo(&self, otra: &Carta) -> bool {
        self.palo == otra.palo
    }

    /// Los comodines son compatibles con cualquier carta. El resto, con las que compartan número o
    /// palo.
    pub fn compatible(&self, otra: &Carta) -> bool {
        self.es_comodin() || otra.es_comodin() || self.mismo_num(otra) || self.mismo_palo(otra)
    }

    /// Verifica si el número de esta carta es justo el anterior al de `otra`. Nada es anterior a
    /// un 1.
    pub fn es_anterior_a(&self, otra: &Carta) -> bool {
        otra.num != 1 && otra.num.checked_sub(1) == Some(self.num)
    }

    /// Verifica si el número de esta carta es justo el posterior al de `otra`. Nada es posterior a
    /// un 12.
    pub fn es_posterior_a(&self, otra: &Carta) -> bool {
        otra.num != 12 && otra.num.checked_add(1) == Some(self.num)
    }

    pub fn hace_escalera_a(&self, otra: &Carta) -> bool {
        self.mismo_palo(otra) && (self.es_anterior_a(otra) || self.es_posterior_a(otra))
    }

    pub fn cmp_num(&self, otra: &Carta) -> Ordering {
        self.num.cmp(&otra.num)
    }

    /// Código corto de la carta: número seguido de la inicial del palo, o `*` para el comodín.
    pub fn codigo(&self) -> String {
        if self.es_comodin() {
            return "*".to_string();
        }
        format!("{}{}", self.num, char::from(&self.palo))
    }

    /// El comodín toma el número que le haga falta al grupo en el que entra.
    pub(crate) fn asignar_num(&mut self, num: u8) {
        if self.es_comodin() {
            self.num = num;
        }
    }

    pub(crate) fn liberar_num(&mut self) {
        if self.es_comodin() {
            self.num = NUM_COMODIN;
        }
    }
}

impl PartialOrd for Carta {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.num.cmp(&other.num) {
            Ordering::Equal if self.palo != other.palo => None,
            orden => Some(orden),
        }
    }
}

impl TryFrom<&str> for Carta {
    type Error = BarajaError;

    fn try_from(other: &str) -> Result<Self, Self::Error> {
        let codigo = other.trim();
        if codigo == "*" {
            return Ok(Carta::comodin());
        }
        let mut chars = codigo.chars();
        let palo = chars
            .next_back()
            .ok_or_else(|| BarajaError::CodigoNoValido(other.to_string()))?;
        let palo = Palo::try_from(palo)?;
        let num: u8 = chars
            .as_str()
            .parse()
            .map_err(|_| BarajaError::CodigoNoValido(other.to_string()))?;
        Carta::new(num, palo)
    }
}

impl fmt::Display for Carta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.es_comodin() {
            return write!(f, "Carta Comodín");
        }
        write!(f, "Carta {} de {}", self.num, self.palo.nombre())
    }
}
