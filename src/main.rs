use std::io::{self, Write};
use std::path::PathBuf;
use std::thread;
use std::time::Instant;

use clap::Parser;
use grid_snake::body::Cell;
use grid_snake::clock::TickClock;
use grid_snake::config::{config_path, load_config_from_path, ConfigError, GameConfig, GridSize};
use grid_snake::food::RandomPlacer;
use grid_snake::game::{Game, GameOver, GameStatus, TickReport};
use grid_snake::score::HighScoreTable;
use thiserror::Error;

/// Token that leaves a tick without input.
const WAIT_TOKEN: &str = ".";

#[derive(Debug, Parser)]
#[command(name = "grid-snake", version, about = "Headless grid Snake driver")]
struct Cli {
    /// Config file. Defaults to the platform config directory.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Cells per side of the square grid.
    #[arg(long = "grid-size")]
    grid_size: Option<u16>,

    /// Tick interval in milliseconds (used with --realtime).
    #[arg(long = "tick-ms")]
    tick_ms: Option<u64>,

    /// Bound the pending-input queue.
    #[arg(long = "input-capacity")]
    input_capacity: Option<usize>,

    /// Seed for food placement. Random when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Player name recorded in the high-score table.
    #[arg(long, default_value = "")]
    name: String,

    /// Direction tokens separated by commas or spaces, one per tick; `.` waits.
    #[arg(long, default_value = "")]
    moves: String,

    /// Queue every move before the first tick instead of one per tick.
    #[arg(long)]
    burst: bool,

    /// Number of sessions to play with the same script.
    #[arg(long, default_value_t = 1)]
    rounds: u32,

    /// Stop a session after this many ticks even if it is still running.
    #[arg(long = "max-ticks", default_value_t = 1_000)]
    max_ticks: u64,

    /// Tick on the configured cadence instead of as fast as possible.
    #[arg(long)]
    realtime: bool,

    /// Print one JSON document per tick and per event.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

fn main() -> Result<(), CliError> {
    env_logger::init();
    let cli = Cli::parse();

    let config = resolve_config(&cli)?;
    let placer = match cli.seed {
        Some(seed) => RandomPlacer::seeded(seed),
        None => RandomPlacer::from_entropy(),
    };
    let mut game = Game::new(config, placer)?;
    let script: Vec<&str> = cli
        .moves
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .collect();

    let mut clock = TickClock::from_millis(game.config().tick_interval_ms, Instant::now());
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for round in 1..=cli.rounds {
        log::info!("round {round} of {}", cli.rounds);
        play_round(&mut game, &mut clock, &cli, &script, &mut out)?;
    }

    print_high_scores(game.high_scores(), cli.json, &mut out)?;
    Ok(())
}

fn resolve_config(cli: &Cli) -> Result<GameConfig, ConfigError> {
    let path = cli.config.clone().unwrap_or_else(config_path);
    let mut config = load_config_from_path(&path)?;

    if let Some(cells) = cli.grid_size {
        config.grid_size = GridSize::new(cells);
        if cells > 0 && !config.grid_size.contains(config.origin) {
            let centre = i32::from(cells / 2);
            log::warn!(
                "origin ({}, {}) is off a {cells}x{cells} grid, starting at the centre",
                config.origin.x,
                config.origin.y,
            );
            config.origin = Cell::new(centre, centre);
        }
    }
    if let Some(tick_ms) = cli.tick_ms {
        config.tick_interval_ms = tick_ms;
    }
    if let Some(capacity) = cli.input_capacity {
        config.input_capacity = Some(capacity);
    }

    config.validate()?;
    Ok(config)
}

fn play_round(
    game: &mut Game,
    clock: &mut TickClock,
    cli: &Cli,
    script: &[&str],
    out: &mut impl Write,
) -> Result<(), CliError> {
    game.start_session(&cli.name);
    if cli.burst {
        for token in script {
            enqueue(game, token);
        }
    }

    clock.reset(Instant::now());
    let mut ticks = 0;
    while ticks < cli.max_ticks {
        if cli.realtime {
            let now = Instant::now();
            if !clock.due(now) {
                thread::sleep(clock.time_until_due(now));
                continue;
            }
            clock.mark(now);
        }

        if !cli.burst {
            if let Some(token) = script.get(usize::try_from(ticks).unwrap_or(usize::MAX)) {
                enqueue(game, token);
            }
        }

        let Some(report) = game.tick() else {
            break;
        };
        ticks += 1;
        print_report(&report, cli.json, out)?;

        if report.status == GameStatus::GameOver {
            break;
        }
    }

    match game.take_game_over() {
        Some(event) => print_game_over(&event, cli.json, out)?,
        None => log::warn!("session still running after {ticks} ticks, abandoning it"),
    }
    Ok(())
}

fn enqueue(game: &mut Game, token: &str) {
    if token != WAIT_TOKEN && !game.enqueue_token(token) {
        log::warn!("input {token:?} was not queued");
    }
}

fn print_report(report: &TickReport, json: bool, out: &mut impl Write) -> Result<(), CliError> {
    if json {
        writeln!(out, "{}", serde_json::to_string(report)?)?;
        return Ok(());
    }

    let Some(head) = report.snapshot.body.first() else {
        return Ok(());
    };
    let food = report
        .snapshot
        .food
        .map_or_else(|| "-".to_owned(), |food| format!("({}, {})", food.x, food.y));
    writeln!(
        out,
        "head ({}, {})  length {}  food {food}  score {}",
        head.x,
        head.y,
        report.snapshot.body.len(),
        report.snapshot.score,
    )?;
    Ok(())
}

fn print_game_over(event: &GameOver, json: bool, out: &mut impl Write) -> Result<(), CliError> {
    if json {
        writeln!(out, "{}", serde_json::to_string(event)?)?;
        return Ok(());
    }

    let rank = event
        .rank
        .map_or_else(|| "unranked".to_owned(), |rank| format!("rank #{rank}"));
    writeln!(
        out,
        "Game over! {} scored {} ({:?}, {rank})",
        event.player_name, event.score, event.cause,
    )?;
    Ok(())
}

fn print_high_scores(
    table: &HighScoreTable,
    json: bool,
    out: &mut impl Write,
) -> Result<(), CliError> {
    if json {
        writeln!(out, "{}", serde_json::to_string(table.entries())?)?;
        return Ok(());
    }

    writeln!(out, "High scores")?;
    for (index, entry) in table.entries().iter().enumerate() {
        writeln!(out, "{:>2}. {}: {}", index + 1, entry.name, entry.score)?;
    }
    Ok(())
}
