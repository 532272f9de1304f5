use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use botshot::{
    arena::{AgenteAleatorio, Arena, MAX_PASOS_POR_DEFECTO, Marcador},
    juegos::{Jugador, Opciones, Registrador, RegistradorJson, RegistroJuegos, TipoJuego},
};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use rand::{RngCore, SeedableRng, rngs::StdRng};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Juego a simular.
    #[arg(short, long, value_enum)]
    tipo: TipoJuego,

    /// Número de partidas a jugar.
    #[arg(short, long, default_value_t = 1000)]
    iter: usize,

    /// Cantidad de jugadores. Por defecto, el mínimo que admite el juego.
    #[arg(short, long)]
    jugadores: Option<usize>,

    /// Semilla para que la simulación sea reproducible.
    #[arg(short, long)]
    semilla: Option<u64>,

    /// Ruta a un fichero JSON con las opciones del juego.
    #[arg(short, long)]
    opciones: Option<PathBuf>,

    /// Ruta al fichero JSON donde se acumulan las estadísticas de los jugadores.
    #[arg(short, long)]
    estadisticas: Option<PathBuf>,

    /// Jugadas máximas por partida antes de cortarla.
    #[arg(long, default_value_t = MAX_PASOS_POR_DEFECTO)]
    max_pasos: usize,
}

fn cargar_opciones(ruta: &Path) -> Opciones {
    let contenido = fs::read_to_string(ruta).expect("Error leyendo el fichero de opciones.");
    serde_json::from_str(&contenido).expect("Error interpretando el fichero de opciones.")
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();
    let args = Args::parse();

    let mut rng = match args.semilla {
        Some(semilla) => StdRng::seed_from_u64(semilla),
        None => StdRng::from_entropy(),
    };

    let mut registro = RegistroJuegos::con_juegos_por_defecto();
    if let Some(ruta) = &args.estadisticas {
        let registrador =
            RegistradorJson::abrir(ruta).expect("Error abriendo el fichero de estadísticas.");
        registro.cambiar_registrador(args.tipo, Some(Rc::new(RefCell::new(registrador))));
    }

    let metadatos = args.tipo.metadatos();
    let cantidad = args.jugadores.unwrap_or(metadatos.min_jugadores);
    let jugadores: Vec<Jugador> = (0..cantidad)
        .map(|i| Jugador::new(i.to_string(), &format!("Random#{i}")))
        .collect();

    let mut manejador = match jugadores.first() {
        Some(host) => registro
            .manejador(args.tipo, host.clone())
            .expect("Juego no registrado."),
        None => {
            eprintln!("Hace falta al menos un jugador.");
            return;
        }
    };
    for jugador in jugadores.iter().skip(1) {
        if !manejador.agregar_jugador(jugador.clone()) {
            eprintln!(
                "{} admite como máximo {} jugadores.",
                metadatos.nombre, metadatos.max_jugadores
            );
            return;
        }
    }
    if let Some(ruta) = &args.opciones {
        if !manejador.cambiar_opciones(cargar_opciones(ruta)) {
            eprintln!("Las opciones no son de {}.", metadatos.nombre);
            return;
        }
    }

    let mut arena = Arena::new(manejador, args.max_pasos);
    for jugador in &jugadores {
        let agente = AgenteAleatorio::new(StdRng::seed_from_u64(rng.next_u64()));
        arena.agregar_agente(jugador.id(), Box::new(agente));
    }
    let marcador = Marcador::new();
    let totales = marcador.totales();
    arena.agregar_kibitzer(Box::new(marcador));

    println!("BotShot {}", env!("CARGO_PKG_VERSION"));
    println!("Simulando: {} ({} jugadores)", metadatos.nombre, cantidad);

    let pb = ProgressBar::new(args.iter as u64);
    pb.set_style(
        ProgressStyle::with_template("{wide_bar:40.cyan/blue} {human_pos}/{human_len} {msg} ")
            .expect("Plantilla de la barra de progreso no válida.")
            .progress_chars("##-"),
    );
    let mut cortadas = 0;
    for i in 0..args.iter {
        match arena.jugar_partida(StdRng::seed_from_u64(rng.next_u64())) {
            Ok(resultado) if !resultado.completa => cortadas += 1,
            Ok(_) => {}
            Err(err) => {
                pb.abandon_with_message(format!("{err}"));
                return;
            }
        }
        pb.inc(1);
        if i % 100 == 0 {
            let totales = totales.borrow();
            pb.set_message(format!(
                "Partidas: {} Empates: {}",
                totales.partidas, totales.empates
            ));
        }
    }
    pb.finish_and_clear();

    let totales = totales.borrow();
    println!("Partidas terminadas: {}", totales.partidas);
    println!("Partidas cortadas: {cortadas}");
    println!("Empates: {}", totales.empates);
    for jugador in &jugadores {
        println!(
            "{}: {} victorias",
            jugador.nombre(),
            totales.victorias_de(jugador.id())
        );
    }
    if let Some(registrador) = arena.manejador().registrador() {
        println!();
        println!("V - E - D");
        let registrador = registrador.borrow();
        for jugador in &jugadores {
            println!("{}: {}", jugador.nombre(), registrador.get_datos(jugador.id()));
        }
    }
}
