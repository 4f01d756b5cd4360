pub mod card;
pub mod board;
pub mod rules;
pub mod supermove;
pub mod moves;
pub mod game;
pub mod deal;
pub mod display;

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context};
use clap::{ArgGroup, Parser};
use serde::Serialize;

use crate::board::{BoardSnapshot, CellId};
use crate::deal::DealSource;
use crate::display::{format_cards, print_board};
use crate::game::Game;
use crate::moves::MoveRequest;

/// Deal a FreeCell game, play moves on it and show the result.
#[derive(Parser, Debug)]
#[command(version, about)]
#[command(group(ArgGroup::new("deal").args(["game", "ms", "pysol", "deck_file"])))]
pub struct Args {
    /// Classic game number (1..=1000000); the default deal is game 1
    #[arg(long)]
    game: Option<u32>,

    /// Windows FreeCell deal number (1..=1000000)
    #[arg(long)]
    ms: Option<u32>,

    /// PySolFC seed, e.g. "ms123" or "13101775566348840960"
    #[arg(long)]
    pysol: Option<String>,

    /// File holding 52 card codes or a bracketed list of card indices
    #[arg(long)]
    deck_file: Option<PathBuf>,

    /// A move "SRC DST [COUNT]" with cells f1..f4, h1..h4, t1..t8; repeatable
    #[arg(long = "move", value_name = "MOVE")]
    moves: Vec<String>,

    /// Send cards home automatically after the deal and after every move
    #[arg(long, default_value_t = false)]
    auto: bool,

    /// Print the final position as JSON instead of text
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Log level: off, error, warn, info, debug or trace
    #[arg(long, default_value = "info")]
    log_level: log::LevelFilter,
}

impl Args {
    fn deal_source(&self) -> anyhow::Result<DealSource> {
        Ok(if let Some(n) = self.ms {
            DealSource::Microsoft(n)
        } else if let Some(seed) = &self.pysol {
            DealSource::PySol(seed.clone())
        } else if let Some(path) = &self.deck_file {
            DealSource::Deck(deal::load_deck_file(path)?)
        } else {
            DealSource::Classic(self.game.unwrap_or(1))
        })
    }
}

/// Final position, as printed by `--json`.
#[derive(Serialize)]
struct Report<'a> {
    deal: &'a str,
    moves: usize,
    won: bool,
    board: BoardSnapshot,
}

/// Parse "t1 t8 3" (count optional, default 1).
pub fn parse_move(s: &str) -> anyhow::Result<MoveRequest> {
    let parts: Vec<&str> = s.split_whitespace().collect();
    let (from, to, count) = match parts.as_slice() {
        [from, to] => (from, to, 1),
        [from, to, count] => (
            from,
            to,
            count
                .parse::<usize>()
                .with_context(|| format!("bad card count in move '{}'", s))?,
        ),
        _ => bail!("move '{}' must look like \"SRC DST [COUNT]\"", s),
    };
    let from: CellId = from.parse().map_err(|e| anyhow!("move '{}': {}", s, e))?;
    let to: CellId = to.parse().map_err(|e| anyhow!("move '{}': {}", s, e))?;
    Ok(MoveRequest::new(from, to, count))
}

fn init_logging(level: log::LevelFilter) -> anyhow::Result<()> {
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    simplelog::TermLogger::init(
        level,
        config,
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    )
    .context("initialize logger")
}

/// Entry point for the `freecell` binary.
///
///   - deals the chosen game (default: classic game 1)
///   - applies every `--move` in order, stopping at the first refused one
///   - optionally runs the auto-home pass after the deal and each move
///   - prints the final board as text or JSON
///
/// Example:
///   cargo run -- --ms 617 --move "t2 f1" --move "t7 t3 2" --auto
pub fn run() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.log_level)?;

    let mut game = Game::new(args.deal_source()?)?;
    log::debug!("deck: {}", format_cards(game.initial_deck()));

    if args.auto {
        game.auto_move_home();
    }

    for text in &args.moves {
        let req = parse_move(text)?;
        game.request_move(req)
            .with_context(|| format!("move '{}' refused", text))?;
        if args.auto {
            game.auto_move_home();
        }
    }

    if args.json {
        let report = Report {
            deal: game.label(),
            moves: game.move_count(),
            won: game.is_won(),
            board: game.snapshot(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("FreeCell: {}", game.label());
        println!();
        print_board(game.board());
        println!("Moves: {}", game.move_count());
        if game.is_won() {
            println!("Won!");
        }
    }
    Ok(())
}
