use std::collections::VecDeque;
use std::ops::Deref;

use rand::Rng;
use rand::seq::SliceRandom;

use super::{Carta, Palo};

/// Veces que se mezcla un mazo recién creado.
pub const MEZCLAS_POR_DEFECTO: usize = 5;

/// Mazo de naipes españoles. Las cartas se sacan siempre del final, pero se pueden devolver a
/// cualquiera de los dos extremos: como cola sirve de mazo boca abajo y como pila de descartes.
#[derive(Clone, Debug, Default)]
pub struct Mazo(VecDeque<Carta>);

impl Mazo {
    /// Crea un mazo mezclado. Un mazo `entero` tiene 50 cartas, incluyendo dos comodines. Si no, se
    /// dejan fuera los 8, los 9 y los comodines, quedando 40.
    pub fn new<R: Rng + ?Sized>(entero: bool, rng: &mut R) -> Self {
        let mut mazo = Mazo::ordenado(entero);
        mazo.mezclar(MEZCLAS_POR_DEFECTO, rng);
        mazo
    }

    pub fn ordenado(entero: bool) -> Self {
        let mut cartas = VecDeque::with_capacity(if entero { 50 } else { 40 });
        for palo in Palo::NORMALES {
            for num in 1..=12 {
                if !entero && (num == 8 || num == 9) {
                    continue;
                }
                if let Ok(carta) = Carta::new(num, palo) {
                    cartas.push_back(carta);
                }
            }
        }
        if entero {
            cartas.push_back(Carta::comodin());
            cartas.push_back(Carta::comodin());
        }
        Mazo(cartas)
    }

    pub fn vacio() -> Self {
        Mazo(VecDeque::new())
    }

    pub fn mezclar<R: Rng + ?Sized>(&mut self, veces: usize, rng: &mut R) {
        for _ in 0..veces {
            self.0.make_contiguous().shuffle(rng);
        }
    }

    /// Devuelve una carta al mazo. Con `al_final` queda encima y es la próxima en salir; si no,
    /// va al fondo.
    pub fn put(&mut self, carta: Carta, al_final: bool) {
        if al_final {
            self.0.push_back(carta);
        } else {
            self.0.push_front(carta);
        }
    }

    pub fn get(&mut self) -> Option<Carta> {
        self.0.pop_back()
    }

    /// Carta que saldría en el próximo `get`.
    pub fn tope(&self) -> Option<&Carta> {
        self.0.back()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn esta_vacio(&self) -> bool {
        self.0.is_empty()
    }

    pub fn vaciar(&mut self) {
        self.0.clear();
    }

    /// Pasa todas las cartas de `otro` al fondo de este mazo, dejando `otro` vacío.
    pub fn extender(&mut self, otro: &mut Mazo) {
        self.0.extend(otro.0.drain(..));
    }

    pub fn iter(&self) -> impl Iterator<Item = &Carta> {
        self.0.iter()
    }

    pub fn cantidad_num(&self, num: u8) -> usize {
        self.0
            .iter()
            .filter(|c| !c.es_comodin() && c.num() == num)
            .count()
    }

    pub fn cantidad_palo(&self, palo: Palo) -> usize {
        self.0.iter().filter(|c| c.palo() == palo).count()
    }

    /// Saca hasta `n` cartas del final para poder mirarlas. Vuelven al mazo, en el mismo orden, al
    /// soltar la vista. La primera carta de la vista es la de arriba, salvo con `inverso`.
    pub fn ver_primeras(&mut self, n: usize, inverso: bool) -> VistaPrimeras<'_> {
        let mut cartas = Vec::with_capacity(n.min(self.len()));
        while cartas.len() < n {
            match self.0.pop_back() {
                Some(c) => cartas.push(c),
                None => break,
            }
        }
        if inverso {
            cartas.reverse();
        }
        VistaPrimeras {
            mazo: self,
            cartas,
            inverso,
        }
    }
}

pub struct VistaPrimeras<'a> {
    mazo: &'a mut Mazo,
    cartas: Vec<Carta>,
    inverso: bool,
}

impl Deref for VistaPrimeras<'_> {
    type Target = [Carta];

    fn deref(&self) -> &Self::Target {
        &self.cartas
    }
}

impl Drop for VistaPrimeras<'_> {
    fn drop(&mut self) {
        if !self.inverso {
            self.cartas.reverse();
        }
        for carta in self.cartas.drain(..) {
            self.mazo.0.push_back(carta);
        }
    }
}
