//! `leaderboard` - command-line front end for the score service.
//!
//! Every subcommand opens the SQLite database, performs one service call and
//! prints the result, either as text or (with `--json`) in the same shapes a
//! web client receives.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use leaderboard_server::leaderboard::{
    DeleteResponse, Leaderboards, RankedEntry, SubmitResponse, DEFAULT_OVERVIEW_LIMIT,
    DEFAULT_QUERY_LIMIT,
};
use leaderboard_server::persistence::load_legacy_export;
use leaderboard_server::{config, Database, LeaderboardService, SqliteScoreStore};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "leaderboard", about = "Best-score leaderboards for the arcade games")]
struct Cli {
    /// SQLite database file. Defaults to LEADERBOARD_DB_PATH or the data directory.
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    /// JSON game catalog. Defaults to LEADERBOARD_CATALOG or the built-in catalog.
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Print machine-readable JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit a score; it is kept only if it beats the player's best.
    Submit {
        game: String,
        player: String,
        /// Points, or elapsed seconds for timed games.
        score: f64,
    },
    /// Show the top of one game's leaderboard.
    Top {
        game: String,
        #[arg(short, long, default_value_t = DEFAULT_QUERY_LIMIT)]
        limit: u32,
    },
    /// Show the top of every game's leaderboard.
    All {
        #[arg(short, long, default_value_t = DEFAULT_OVERVIEW_LIMIT)]
        limit: u32,
    },
    /// Show a player's personal best for a game.
    Best { game: String, player: String },
    /// Remove all of a player's records for a game.
    Delete { game: String, player: String },
    /// List the games in the catalog.
    Games,
    /// Import a JSON export of the hosted scores table.
    Import { path: PathBuf },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let _guard = init_tracing();
    let cli = Cli::parse();

    let catalog_path = cli.catalog.clone().or_else(config::get_catalog_path);
    let catalog = config::load_catalog(catalog_path.as_deref())?;

    let db_path = cli.database.clone().unwrap_or_else(config::get_database_path);
    tracing::info!(path = %db_path.display(), "Using score database");
    let db = Database::open(&db_path).await?;
    let service = LeaderboardService::new(SqliteScoreStore::new(db.pool().clone()), Arc::new(catalog));

    let result = run(&service, cli.command, cli.json).await;
    db.close().await;
    result
}

async fn run(
    service: &LeaderboardService<SqliteScoreStore>,
    command: Commands,
    json: bool,
) -> anyhow::Result<ExitCode> {
    match command {
        Commands::Submit { game, player, score } => {
            let result = service.submit(&game, &player, score).await;
            if json {
                println!("{}", serde_json::to_string(&SubmitResponse::from(&result))?);
            } else {
                match &result {
                    Ok(s) if s.is_new_best => println!("New best for {player}: {}", s.display_score),
                    Ok(s) => println!(
                        "Kept existing best for {player} ({} submitted)",
                        s.display_score
                    ),
                    Err(e) => eprintln!("Rejected: {e}"),
                }
                if let Ok(Some(notice)) = result.as_ref().map(|s| s.clamped) {
                    eprintln!("Note: score {} was clamped to {}", notice.raw, notice.ceiling);
                }
            }
            Ok(exit_code(result.is_ok()))
        }
        Commands::Top { game, limit } => {
            let entries = service.query(&game, limit).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else if entries.is_empty() {
                println!("No scores yet for {game}");
            } else {
                print_entries(&entries);
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::All { limit } => {
            let boards = service.query_all(limit).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&boards)?);
            } else {
                print_boards(&boards);
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Best { game, player } => {
            let best = service.best_for(&game, &player).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&best)?);
            } else {
                match best {
                    Some(b) => println!("{}: {}", b.player, b.display_score),
                    None => println!("No score recorded for {player} in {game}"),
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Delete { game, player } => {
            let result = service.delete_player(&game, &player).await;
            if json {
                println!("{}", serde_json::to_string(&DeleteResponse::from(&result))?);
            } else {
                match &result {
                    Ok(removed) => println!("Removed {removed} record(s) for {player} in {game}"),
                    Err(e) => eprintln!("Delete failed: {e}"),
                }
            }
            Ok(exit_code(result.is_ok()))
        }
        Commands::Import { path } => {
            let rows = load_legacy_export(&path)?;
            let report = service.import_legacy(&rows).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!(
                    "Imported {} row(s): {} inserted, {} replaced, {} kept, {} skipped, {} clamped",
                    rows.len(),
                    report.inserted,
                    report.replaced,
                    report.kept,
                    report.skipped,
                    report.clamped
                );
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Games => {
            let games = service.catalog().games();
            if json {
                println!("{}", serde_json::to_string_pretty(games)?);
            } else {
                for game in games {
                    println!("{:<24} {:<16} {}", game.id, game.polarity.as_str(), game.format.as_str());
                }
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn exit_code(ok: bool) -> ExitCode {
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn print_entries(entries: &[RankedEntry]) {
    for entry in entries {
        println!("{:>3}. {:<20} {:>12}", entry.rank, entry.player, entry.display_score);
    }
}

fn print_boards(boards: &Leaderboards) {
    for (game, entries) in boards {
        println!("{game}");
        if entries.is_empty() {
            println!("     (no scores)");
        } else {
            print_entries(entries);
        }
        println!();
    }
}

/// Logs go to stderr so stdout stays parseable; LEADERBOARD_LOG_DIR adds a
/// daily rolling file.
fn init_tracing() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let (file_layer, guard) = match config::get_log_dir() {
        Some(dir) => {
            let file_appender = tracing_appender::rolling::daily(dir, "leaderboard");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    guard
}
