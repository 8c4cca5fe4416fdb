// src/main.rs
use clap::Parser;
use lazy_static::lazy_static;
use log::{error, info};
use regex::Regex;
use std::error::Error;
use std::fmt;
use std::io::{self, Write};
use std::time::Instant;

use mailbox_chess::{GameState, MoveKind, Square};

// --- Constants ---
const DEFAULT_SNAPSHOT_FILENAME: &str = "mailbox_chess.json";
const REPORT_EVERY_GAMES: u32 = 100;

lazy_static! {
    static ref MOVE_COMMAND: Regex =
        Regex::new(r"^m\s+(\d{1,3})\s+(\d{1,3})\s+(\d{1,2})$").expect("move command pattern");
    static ref DUMP_COMMAND: Regex = Regex::new(r"^d(?:\s+(\S+))?$").expect("dump command pattern");
    static ref LIST_COMMAND: Regex = Regex::new(r"^l(?:\s+(\d{1,3}))?$").expect("list command pattern");
}

/// Console front end for the mailbox chess rules core.
#[derive(Parser, Debug)]
#[command(name = "mailbox_chess", about = "Play or simulate games on the mailbox chess rules core.")]
struct Cli {
    /// Seed for the random-move generator (default: OS entropy)
    #[arg(short, long)]
    seed: Option<u64>,
    /// Play this many random games without prompting, undoing each one afterwards
    #[arg(long)]
    simulate: Option<u32>,
    /// Ply limit for each simulated game
    #[arg(long, default_value_t = 500)]
    max_plies: u32,
    /// Write a JSON snapshot of the final position to this file on exit
    #[arg(long)]
    json: Option<String>,
}

// --- Input Parsing ---

#[derive(Debug, PartialEq, Eq)]
enum Command {
    RandomMove,
    Move { origin: Square, destination: Square, kind: MoveKind },
    Undo,
    List(Option<Square>),
    Dump(String),
    Help,
    Quit,
}

#[derive(Debug, PartialEq, Eq)]
enum CommandError {
    Unknown(String),
    BadSquare(String),
    BadKind(String),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Unknown(input) => write!(f, "Unknown command: '{}'. Type 'h' for commands.", input),
            CommandError::BadSquare(text) => write!(f, "Invalid square index: '{}'", text),
            CommandError::BadKind(text) => write!(f, "Invalid move kind code: '{}' (expected 0-10)", text),
        }
    }
}
impl Error for CommandError {}

fn parse_square(text: &str) -> Result<Square, CommandError> {
    text.parse::<Square>().map_err(|_| CommandError::BadSquare(text.to_string()))
}

/// Parses one line of user input into a Command.
fn parse_command(input: &str) -> Result<Command, CommandError> {
    let trimmed = input.trim();
    match trimmed {
        "r" => return Ok(Command::RandomMove),
        "u" => return Ok(Command::Undo),
        "h" | "?" | "help" => return Ok(Command::Help),
        "q" | "quit" | "exit" => return Ok(Command::Quit),
        _ => {}
    }

    if let Some(caps) = MOVE_COMMAND.captures(trimmed) {
        let origin = parse_square(&caps[1])?;
        let destination = parse_square(&caps[2])?;
        let kind = caps[3].parse::<u8>().ok()
            .and_then(MoveKind::from_code)
            .ok_or_else(|| CommandError::BadKind(caps[3].to_string()))?;
        return Ok(Command::Move { origin, destination, kind });
    }
    if let Some(caps) = LIST_COMMAND.captures(trimmed) {
        let square = caps.get(1).map(|m| parse_square(m.as_str())).transpose()?;
        return Ok(Command::List(square));
    }
    if let Some(caps) = DUMP_COMMAND.captures(trimmed) {
        let filename = caps.get(1).map_or(DEFAULT_SNAPSHOT_FILENAME, |m| m.as_str());
        return Ok(Command::Dump(filename.to_string()));
    }

    Err(CommandError::Unknown(trimmed.to_string()))
}

// --- Simulation ---

/// Plays random games back to back, undoing each one to the start position.
fn simulate(game: &mut GameState, games: u32, max_plies: u32) {
    let start = Instant::now();
    let mut total_plies: u64 = 0;

    for played in 1..=games {
        let mut plies = 0;
        while plies < max_plies && game.king_captured().is_none() && game.execute_random_move() {
            plies += 1;
        }
        total_plies += u64::from(plies);

        // Cheap backtracking, one refresh at the end
        while game.undo(false) {}
        game.refresh();

        if played % REPORT_EVERY_GAMES == 0 || played == games {
            let elapsed = start.elapsed().as_secs_f64().max(f64::EPSILON);
            info!(
                "{} games simulated and undone in {:.3}s ({:.1} games/s, {:.0} plies/s)",
                played, elapsed, f64::from(played) / elapsed, total_plies as f64 / elapsed
            );
        }
    }
}

// --- Main Game Loop ---

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let mut game = match cli.seed {
        Some(seed) => GameState::with_seed(seed),
        None => GameState::new(),
    };

    if let Some(games) = cli.simulate {
        simulate(&mut game, games, cli.max_plies);
        save_on_exit(&game, cli.json.as_deref());
        return Ok(());
    }

    println!("==============================");
    println!("|       Mailbox Chess        |");
    println!("==============================");
    print_help();

    'game_loop: loop {
        println!("------------------------------------------");
        println!("{}", game);
        if let Some(color) = game.king_captured() {
            println!("{}'s king has been captured. Undo with 'u' or quit with 'q'.", color);
        }

        print!("\n{}'s turn. Command: ", game.current_player());
        io::stdout().flush()?;

        let mut input_line = String::new();
        match io::stdin().read_line(&mut input_line) {
            Ok(0) => {
                println!("\nEnd of input detected. Quitting game.");
                break 'game_loop;
            }
            Ok(_) => {}
            Err(e) => {
                eprintln!("Error reading input: {}. Try again or use 'q'.", e);
                continue 'game_loop;
            }
        }
        if input_line.trim().is_empty() { continue 'game_loop; }

        match parse_command(&input_line) {
            Ok(Command::RandomMove) => {
                if !game.execute_random_move() {
                    println!("{} has no moves available.", game.current_player());
                }
            }
            Ok(Command::Move { origin, destination, kind }) => {
                if let Err(e) = game.try_execute_move(origin, destination, kind) {
                    println!("Invalid move: {}", e);
                }
            }
            Ok(Command::Undo) => {
                if !game.undo(true) {
                    println!("Nothing to undo.");
                }
            }
            Ok(Command::List(square)) => print_moves(&game, square),
            Ok(Command::Dump(filename)) => match game.snapshot().write_to(&filename) {
                Ok(()) => println!("Snapshot saved to '{}'.", filename),
                Err(e) => println!("Error saving snapshot: {}", e),
            },
            Ok(Command::Help) => print_help(),
            Ok(Command::Quit) => {
                println!("Exiting game.");
                break 'game_loop;
            }
            Err(e) => println!("Input Error: {}", e),
        }
    }

    save_on_exit(&game, cli.json.as_deref());
    println!("\nGame session finished.");
    Ok(())
}

fn save_on_exit(game: &GameState, path: Option<&str>) {
    if let Some(path) = path {
        match game.snapshot().write_to(path) {
            Ok(()) => info!("final position written to '{}'", path),
            Err(e) => error!("failed to write final position: {}", e),
        }
    }
}

/// Lists the mover's moves, optionally only those from one square.
fn print_moves(game: &GameState, from: Option<Square>) {
    let moves: Vec<_> = game.legal_moves().iter()
        .filter(|mv| from.map_or(true, |sq| mv.origin == sq))
        .collect();
    if moves.is_empty() {
        println!("No moves.");
        return;
    }
    for mv in moves {
        println!("  m {} {} {}   ({})", mv.origin, mv.destination, mv.kind.code(), mv.kind);
    }
}

/// Prints available commands.
fn print_help() {
    println!("\nAvailable Commands:");
    println!("  r                     Play a random move for the side to move.");
    println!("  m <from> <to> <kind>  Play a move by square index and kind code, e.g. 'm 90 66 2'.");
    println!("  l [square]            List the side to move's moves (optionally from one square).");
    println!("  u                     Undo the last move.");
    println!("  d [file]              Save a JSON snapshot (default: {}).", DEFAULT_SNAPSHOT_FILENAME);
    println!("  h                     Show this help message.");
    println!("  q                     Quit.");
    println!("\nKind codes:");
    for code in 0..=10 {
        if let Some(kind) = MoveKind::from_code(code) {
            println!("  [{:>2}] {}", code, kind);
        }
    }
    println!();
}
