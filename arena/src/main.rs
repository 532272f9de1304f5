use std::{fs, io, path::PathBuf};

use botshot::{
    arena::{AgenteAleatorio, AgenteCli, Arena, KibitzerCli, MAX_PASOS_POR_DEFECTO, Marcador},
    juegos::{Jugador, Opciones, RegistroJuegos, TipoJuego},
};
use clap::{Parser, ValueEnum};
use rand::{rngs::StdRng, RngCore, SeedableRng};
use tracing_subscriber::EnvFilter;

#[derive(Debug, ValueEnum, Clone, PartialEq)]
enum AgentType {
    Cli,
    Random,
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Juego a jugar.
    #[arg(short, long, value_enum)]
    tipo: TipoJuego,

    /// Un agente por jugador, en orden.
    #[arg(short, long, num_args = 1.., required = true, value_enum)]
    agents: Vec<AgentType>,

    /// Ruta a un fichero JSON con las opciones del juego.
    #[arg(short, long)]
    opciones: Option<PathBuf>,

    #[arg(short, long)]
    semilla: Option<u64>,
}

fn otra_partida() -> bool {
    println!();
    println!("¿Otra partida? [S/n]");
    let mut input = String::new();
    match io::stdin().read_line(&mut input) {
        Ok(0) | Err(_) => false,
        Ok(_) => !input.trim().eq_ignore_ascii_case("n"),
    }
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

    let jugadores: Vec<Jugador> = args
        .agents
        .iter()
        .enumerate()
        .map(|(i, agent)| match agent {
            AgentType::Cli => Jugador::new(i.to_string(), &format!("Hero#{i}")),
            AgentType::Random => Jugador::new(i.to_string(), &format!("Random#{i}")),
        })
        .collect();

    let registro = RegistroJuegos::con_juegos_por_defecto();
    let mut manejador = registro
        .manejador(args.tipo, jugadores[0].clone())
        .expect("Juego no registrado.");
    for jugador in jugadores.iter().skip(1) {
        if !manejador.agregar_jugador(jugador.clone()) {
            panic!(
                "{} admite como máximo {} jugadores.",
                args.tipo,
                manejador.max_jugadores()
            );
        }
    }
    if let Some(ruta) = &args.opciones {
        let contenido = fs::read_to_string(ruta).expect("Error leyendo el fichero de opciones.");
        let opciones: Opciones =
            serde_json::from_str(&contenido).expect("Error interpretando el fichero de opciones.");
        if !manejador.cambiar_opciones(opciones) {
            panic!("Las opciones no son de {}.", args.tipo);
        }
    }
    println!("{}", manejador.resumen(&mut rng));

    let mut arena = Arena::new(manejador, MAX_PASOS_POR_DEFECTO);
    let mut cli_player = None;
    for (jugador, agent) in jugadores.iter().zip(&args.agents) {
        match agent {
            AgentType::Cli => {
                arena.agregar_agente(jugador.id(), Box::new(AgenteCli::new()));
                cli_player.get_or_insert_with(|| jugador.id().to_string());
            }
            AgentType::Random => {
                let agente = AgenteAleatorio::new(StdRng::seed_from_u64(rng.next_u64()));
                arena.agregar_agente(jugador.id(), Box::new(agente));
            }
        }
    }
    let marcador = Marcador::new();
    let totales = marcador.totales();
    arena.agregar_kibitzer(Box::new(KibitzerCli::new(cli_player)));
    arena.agregar_kibitzer(Box::new(marcador));

    loop {
        if let Err(err) = arena.jugar_partida(StdRng::seed_from_u64(rng.next_u64())) {
            eprintln!("{err}");
            return;
        }
        {
            let totales = totales.borrow();
            let marcador: Vec<String> = jugadores
                .iter()
                .map(|j| format!("{} {}", j.nombre(), totales.victorias_de(j.id())))
                .collect();
            println!("Marcador: {} | Empates {}", marcador.join(" - "), totales.empates);
        }
        if !otra_partida() {
            break;
        }
    }
}
