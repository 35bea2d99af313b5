//! Command line entry point for the bookshelf backend.
//!
//! Configuration comes from flags or `BOOKSHELF_*` environment variables.
//! Every command prints one JSON envelope to stdout.

mod api;

use api::ApiResponse;
use bookshelf_core::db::open_db;
use bookshelf_core::{core_version, default_log_level, init_logging, ErrorKind};
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "bookshelf", version, about = "Manage users and the books they own")]
struct Cli {
    /// SQLite database file; created and migrated on first use.
    #[arg(long, env = "BOOKSHELF_DB_PATH", default_value = "bookshelf.sqlite3")]
    db_path: PathBuf,

    /// trace|debug|info|warn|error; defaults per build mode.
    #[arg(long, env = "BOOKSHELF_LOG_LEVEL")]
    log_level: Option<String>,

    /// Absolute directory for rolling log files. Logging is off when unset.
    #[arg(long, env = "BOOKSHELF_LOG_DIR")]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create a user with books from a JSON request (`-` reads stdin).
    Create { payload: String },
    /// Replace a user and add new books from a JSON request.
    Update { user_id: i64, payload: String },
    /// Show a user's id and book ids.
    Get { user_id: i64 },
    /// Delete a user and every book they own.
    Delete { user_id: i64 },
    /// Show one book.
    Book { book_id: i64 },
    /// Print the core version.
    Ping,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        if let Err(err) = init_logging(level, log_dir) {
            eprintln!("bookshelf: {err}");
            return ExitCode::FAILURE;
        }
    }

    let response = run(&cli);
    match serde_json::to_string_pretty(&response) {
        Ok(body) => println!("{body}"),
        Err(err) => {
            eprintln!("bookshelf: failed to encode response: {err}");
            return ExitCode::FAILURE;
        }
    }

    if response.ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn run(cli: &Cli) -> ApiResponse {
    if let Command::Ping = cli.command {
        return ping();
    }

    let mut conn = match open_db(&cli.db_path) {
        Ok(conn) => conn,
        Err(err) => return ApiResponse::failure(ErrorKind::Store, err.to_string()),
    };

    match &cli.command {
        Command::Create { payload } => match read_payload(payload) {
            Ok(payload) => api::create(&mut conn, &payload),
            Err(response) => response,
        },
        Command::Update { user_id, payload } => match read_payload(payload) {
            Ok(payload) => api::update(&mut conn, *user_id, &payload),
            Err(response) => response,
        },
        Command::Get { user_id } => api::get(&mut conn, *user_id),
        Command::Delete { user_id } => api::delete(&mut conn, *user_id),
        Command::Book { book_id } => api::book(&conn, *book_id),
        Command::Ping => ping(),
    }
}

fn ping() -> ApiResponse {
    ApiResponse::success(format!("pong {}", core_version()), None)
}

fn read_payload(payload: &str) -> Result<String, ApiResponse> {
    if payload != "-" {
        return Ok(payload.to_string());
    }
    let mut buffer = String::new();
    std::io::stdin().read_to_string(&mut buffer).map_err(|err| {
        ApiResponse::failure(ErrorKind::Invalid, format!("failed to read stdin: {err}"))
    })?;
    Ok(buffer)
}
