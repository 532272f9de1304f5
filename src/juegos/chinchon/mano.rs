use std::cmp::Ordering;
use std::fmt;

use arrayvec::ArrayVec;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::baraja::Carta;
use crate::juegos::Jugador;

/// Cartas que puede llegar a tener una mano: siete más la que se levanta en cada turno.
pub const MAX_CARTAS: usize = 8;
/// Cartas que caben en un grupo.
pub const MAX_CARTAS_GRUPO: usize = 4;
/// Puntos que suma un comodín que queda suelto.
pub const PUNTOS_COMODIN: i32 = 50;

/// Parte de la mano en la que está una carta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grupo {
    Sueltas,
    Primero,
    Segundo,
}

impl Grupo {
    fn otro(&self) -> Grupo {
        match self {
            Grupo::Primero => Grupo::Segundo,
            Grupo::Segundo => Grupo::Primero,
            Grupo::Sueltas => Grupo::Sueltas,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EstadoMano {
    Inicial,
    Levanto,
    Descarto,
    Mostrado,
}

#[derive(Debug, Clone)]
struct CartaMano {
    carta: Carta,
    grupo: Grupo,
}

fn orden_grupo(a: &Carta, b: &Carta) -> Ordering {
    a.cmp_num(b).then(a.palo().cmp(&b.palo()))
}

/// Mano de un jugador de Chinchón.
///
/// Cada carta está siempre en uno solo de los tres grupos: las sueltas o uno de los dos grupos
/// que se van formando. El orden de `cartas` es el que ve el jugador; los grupos se consultan
/// ordenados por número y palo.
#[derive(Debug, Clone)]
pub struct Mano {
    jugador: Jugador,
    afuera: bool,
    reenganchado: bool,
    estado: EstadoMano,
    cartas: ArrayVec<CartaMano, MAX_CARTAS>,
    puntaje: i32,
}

impl Mano {
    pub fn new(jugador: Jugador) -> Self {
        Self {
            jugador,
            afuera: false,
            reenganchado: false,
            estado: EstadoMano::Inicial,
            cartas: ArrayVec::new(),
            puntaje: 0,
        }
    }

    pub fn jugador(&self) -> &Jugador {
        &self.jugador
    }

    pub fn puntaje(&self) -> i32 {
        self.puntaje
    }

    pub(crate) fn set_puntaje(&mut self, puntaje: i32) {
        self.puntaje = puntaje;
    }

    pub fn estado(&self) -> EstadoMano {
        self.estado
    }

    pub(crate) fn set_estado(&mut self, estado: EstadoMano) {
        self.estado = estado;
    }

    /// Pasa al siguiente estado del turno: `Inicial`, `Levanto`, `Descarto` y de vuelta a
    /// `Inicial`. Una mano que ya mostró sus cartas no cambia.
    pub fn sig_estado(&mut self) -> EstadoMano {
        self.estado = match self.estado {
            EstadoMano::Inicial => EstadoMano::Levanto,
            EstadoMano::Levanto => EstadoMano::Descarto,
            EstadoMano::Descarto => EstadoMano::Inicial,
            EstadoMano::Mostrado => EstadoMano::Mostrado,
        };
        self.estado
    }

    pub fn afuera(&self) -> bool {
        self.afuera
    }

    pub fn reenganchado(&self) -> bool {
        self.reenganchado
    }

    /// Con `definitivamente`, sólo cuenta como descalificada si ya no puede volver a
    /// engancharse.
    pub fn esta_descalificado(&self, definitivamente: bool) -> bool {
        self.afuera && (!definitivamente || self.reenganchado)
    }

    pub(crate) fn descalificar(&mut self) {
        self.afuera = true;
    }

    pub(crate) fn reenganchar(&mut self) {
        self.afuera = false;
        self.reenganchado = true;
    }

    pub fn cantidad_cartas(&self) -> usize {
        self.cartas.len()
    }

    pub fn sin_cartas(&self) -> bool {
        self.cartas.is_empty()
    }

    pub fn vaciar_cartas(&mut self) {
        self.cartas.clear();
    }

    /// Una mano debería tener siete, o como mucho ocho, cartas.
    pub fn tiene_suficientes_cartas(&self) -> bool {
        matches!(self.cantidad_cartas(), 7 | 8)
    }

    pub fn apto_descarte(&self) -> bool {
        self.cantidad_cartas() == MAX_CARTAS
    }

    pub fn indice_correcto(&self, ind: usize) -> bool {
        ind < self.cantidad_cartas()
    }

    /// Agrega una carta a las sueltas. Si la mano está llena, devuelve la carta.
    pub fn agregar_carta(&mut self, carta: Carta) -> Result<(), Carta> {
        self.cartas
            .try_push(CartaMano {
                carta,
                grupo: Grupo::Sueltas,
            })
            .map_err(|err| err.element().carta)
    }

    pub fn cartas(&self) -> impl Iterator<Item = &Carta> {
        self.cartas.iter().map(|c| &c.carta)
    }

    pub fn carta(&self, ind: usize) -> Option<&Carta> {
        self.cartas.get(ind).map(|c| &c.carta)
    }

    pub fn grupo_de(&self, ind: usize) -> Option<Grupo> {
        self.cartas.get(ind).map(|c| c.grupo)
    }

    /// Índices de las cartas de un grupo, ordenados por número y palo.
    pub fn indices_grupo(&self, grupo: Grupo) -> Vec<usize> {
        self.cartas
            .iter()
            .enumerate()
            .filter(|(_, c)| c.grupo == grupo)
            .sorted_by(|(_, a), (_, b)| orden_grupo(&a.carta, &b.carta))
            .map(|(i, _)| i)
            .collect()
    }

    pub fn grupo(&self, grupo: Grupo) -> Vec<&Carta> {
        self.indices_grupo(grupo)
            .into_iter()
            .map(|i| &self.cartas[i].carta)
            .collect()
    }

    pub fn sueltas(&self) -> Vec<&Carta> {
        self.grupo(Grupo::Sueltas)
    }

    /// Cambia de lugar dos cartas, sin tocar los grupos.
    pub fn cambiar(&mut self, ind1: usize, ind2: usize) -> bool {
        if !self.tiene_suficientes_cartas()
            || !self.indice_correcto(ind1)
            || !self.indice_correcto(ind2)
        {
            return false;
        }
        self.cartas.swap(ind1, ind2);
        true
    }

    /// Quita definitivamente una carta de la mano. Si estaba en un grupo se verifica que el grupo
    /// siga teniendo sentido.
    pub fn descartar(&mut self, ind: usize) -> Option<Carta> {
        if !self.indice_correcto(ind) {
            return None;
        }
        let CartaMano { mut carta, grupo } = self.cartas.remove(ind);
        carta.liberar_num();
        if grupo != Grupo::Sueltas {
            self.verificar_grupo(grupo);
        }
        Some(carta)
    }

    /// Verifica que un grupo siga encaminado a ligarse: que todas sus cartas tengan el mismo
    /// número o que formen una escalera sin huecos. Si no es así, todas sus cartas vuelven a las
    /// sueltas y se devuelve `false`.
    pub fn verificar_grupo(&mut self, grupo: Grupo) -> bool {
        if grupo == Grupo::Sueltas {
            return true;
        }
        let indices = self.indices_grupo(grupo);
        let cartas: Vec<&Carta> = indices.iter().map(|&i| &self.cartas[i].carta).collect();
        if cartas.len() <= 1 || mismo_num_todas(&cartas) {
            return true;
        }
        let consecutivas = cartas
            .iter()
            .tuple_windows()
            .all(|(act, sig)| act.num().checked_add(1) == Some(sig.num()));
        if consecutivas {
            return true;
        }
        for i in indices {
            self.soltar(i);
        }
        false
    }

    fn soltar(&mut self, ind: usize) {
        let carta_mano = &mut self.cartas[ind];
        carta_mano.grupo = Grupo::Sueltas;
        carta_mano.carta.liberar_num();
    }

    /// Devuelve una carta de un grupo a las sueltas.
    pub fn desagrupar(&mut self, ind: usize) -> bool {
        let Some(grupo) = self.grupo_de(ind) else {
            return false;
        };
        if grupo == Grupo::Sueltas {
            return false;
        }
        self.soltar(ind);
        self.verificar_grupo(grupo);
        true
    }

    /// Intenta pasar una carta a uno de los grupos.
    ///
    /// Entra si el grupo está vacío, si todas las cartas del grupo son de su mismo número y de
    /// otro palo, o si continúa la escalera del grupo por alguno de sus extremos. Un comodín no
    /// puede empezar un grupo y toma el número que le haga falta: el del grupo si son todas del
    /// mismo número, o el siguiente al mayor de la escalera (el anterior al menor si no es
    /// `comodin_alto`).
    pub fn agrupar(&mut self, ind: usize, destino: Grupo, comodin_alto: bool) -> bool {
        if destino == Grupo::Sueltas {
            return false;
        }
        let Some(origen) = self.grupo_de(ind) else {
            return false;
        };
        if origen == destino {
            return false;
        }
        let miembros: Vec<&Carta> = self.grupo(destino);
        if miembros.len() >= MAX_CARTAS_GRUPO {
            return false;
        }
        let carta = &self.cartas[ind].carta;

        let num_comodin = if carta.es_comodin() {
            match Self::num_para_comodin(&miembros, comodin_alto) {
                Some(num) => Some(num),
                None => return false,
            }
        } else {
            let entra = miembros.is_empty()
                || Self::chequear_num(carta, &miembros)
                || Self::chequear_escalera(carta, &miembros);
            if !entra {
                return false;
            }
            None
        };

        let carta_mano = &mut self.cartas[ind];
        carta_mano.grupo = destino;
        if let Some(num) = num_comodin {
            carta_mano.carta.asignar_num(num);
        }
        if origen != Grupo::Sueltas {
            self.verificar_grupo(origen);
        }
        true
    }

    fn num_para_comodin(miembros: &[&Carta], comodin_alto: bool) -> Option<u8> {
        if miembros.is_empty() || miembros.iter().any(|c| c.es_comodin()) {
            return None;
        }
        if mismo_num_todas(miembros) {
            return Some(miembros[0].num());
        }
        let num = if comodin_alto {
            miembros.iter().map(|c| c.num()).max()?.checked_add(1)?
        } else {
            miembros.iter().map(|c| c.num()).min()?.checked_sub(1)?
        };
        (1..=12).contains(&num).then_some(num)
    }

    /// La carta tiene el mismo número que todas las del grupo y ninguna es de su palo.
    fn chequear_num(carta: &Carta, miembros: &[&Carta]) -> bool {
        miembros
            .iter()
            .all(|c| carta.mismo_num(c) && !carta.mismo_palo(c))
    }

    /// La carta continúa la escalera del grupo por abajo o por arriba.
    fn chequear_escalera(carta: &Carta, miembros: &[&Carta]) -> bool {
        if miembros.len() >= 2 && mismo_num_todas(miembros) {
            return false;
        }
        let mismo_palo = miembros
            .iter()
            .filter(|c| !c.es_comodin())
            .all(|c| carta.mismo_palo(c));
        let (Some(prim), Some(ult)) = (miembros.first(), miembros.last()) else {
            return false;
        };
        mismo_palo && (carta.es_anterior_a(prim) || carta.es_posterior_a(ult))
    }

    /// Índices de las sueltas con las que se puede cortar. No valen los comodines, ni las cartas
    /// mayores que 5 salvo para quien ya tiene 96 puntos o más.
    pub fn cartas_para_cortar(&self) -> Vec<usize> {
        self.indices_grupo(Grupo::Sueltas)
            .into_iter()
            .filter(|&i| {
                let carta = &self.cartas[i].carta;
                !(carta.es_comodin() || (carta.num() > 5 && self.puntaje < 96))
            })
            .collect()
    }

    /// Cartas que suman puntos al final de la ronda: las sueltas y los grupos que no llegaron a
    /// formarse. Un grupo de menos de tres cartas nunca está formado, y uno de cuatro tampoco si
    /// el otro tiene menos de tres.
    pub fn cartas_que_suman(&self) -> Vec<&Carta> {
        let mut sumantes = self.sueltas();
        for grupo in [Grupo::Primero, Grupo::Segundo] {
            let act = self.grupo(grupo);
            let cant_otro = self.indices_grupo(grupo.otro()).len();
            if act.len() < 3 || (act.len() > 3 && cant_otro < 3) {
                sumantes.extend(act);
            }
        }
        sumantes
    }

    pub fn puntos_que_suman(&self) -> i32 {
        self.cartas_que_suman()
            .iter()
            .map(|c| {
                if c.es_comodin() {
                    PUNTOS_COMODIN
                } else {
                    i32::from(c.num())
                }
            })
            .sum()
    }

    /// Un chinchón son siete cartas del mismo palo, consecutivas y sin comodines, repartidas entre
    /// los dos grupos.
    pub fn chequear_chinchon(&self) -> bool {
        let primero = self.grupo(Grupo::Primero);
        let segundo = self.grupo(Grupo::Segundo);
        if !self.indices_grupo(Grupo::Sueltas).is_empty() || primero.len() < 3 || segundo.len() < 3
        {
            return false;
        }
        let total: Vec<&Carta> = primero
            .into_iter()
            .chain(segundo)
            .sorted_by(|a, b| orden_grupo(a, b))
            .collect();
        total.len() == 7
            && total.iter().all(|c| !c.es_comodin())
            && total
                .iter()
                .tuple_windows()
                .all(|(act, sig)| act.mismo_palo(sig) && sig.es_posterior_a(act))
    }
}

fn mismo_num_todas(cartas: &[&Carta]) -> bool {
    cartas.iter().map(|c| c.num()).all_equal()
}

impl fmt::Display for Mano {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let codigos = |grupo: Grupo| self.grupo(grupo).iter().map(|c| c.codigo()).join(" ");
        write!(
            f,
            "[{}] [{}] Sueltas: {}",
            codigos(Grupo::Primero),
            codigos(Grupo::Segundo),
            codigos(Grupo::Sueltas)
        )
    }
}
