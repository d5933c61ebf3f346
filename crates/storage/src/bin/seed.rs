use std::fmt;

use chrono::NaiveDate;
use quest_core::Clock;
use quest_core::model::{Lives, MAX_LIVES, User, default_catalog};
use quest_core::time::parse_date;
use storage::records::save_json;
use storage::{Storage, StoreKey};

#[derive(Debug, Clone)]
struct Args {
    db_url: String,
    lives: u8,
    today: Option<NaiveDate>,
    with_user: bool,
}

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidLives { raw: String },
    InvalidToday { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidLives { raw } => {
                write!(f, "invalid --lives value (expected 0..={MAX_LIVES}): {raw}")
            }
            ArgsError::InvalidToday { raw } => {
                write!(f, "invalid --today value (expected YYYY-MM-DD): {raw}")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

impl Args {
    fn parse() -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("QUEST_DB_URL")
            .unwrap_or_else(|_| "sqlite://quest.sqlite3?mode=rwc".into());
        let mut lives = MAX_LIVES;
        let mut today = match std::env::var("QUEST_TODAY") {
            Ok(raw) => Some(parse_date(&raw).map_err(|_| ArgsError::InvalidToday { raw })?),
            Err(_) => None,
        };
        let mut with_user = true;

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = value;
                }
                "--lives" => {
                    let value = require_value(&mut args, "--lives")?;
                    lives = value
                        .parse::<u8>()
                        .ok()
                        .filter(|n| *n <= MAX_LIVES)
                        .ok_or_else(|| ArgsError::InvalidLives { raw: value.clone() })?;
                }
                "--today" => {
                    let value = require_value(&mut args, "--today")?;
                    today = Some(
                        parse_date(&value)
                            .map_err(|_| ArgsError::InvalidToday { raw: value.clone() })?,
                    );
                }
                "--no-user" => with_user = false,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            lives,
            today,
            with_user,
        })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p storage --bin seed -- [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --db <sqlite_url>         SQLite URL (default: sqlite://quest.sqlite3?mode=rwc)");
    eprintln!("  --lives <n>               Lives to store, 0..=3 (default: 3)");
    eprintln!("  --today <YYYY-MM-DD>      Date recorded as the last lives reset");
    eprintln!("  --no-user                 Leave the user slot empty (signed out)");
    eprintln!("  -h, --help                Show this help");
    eprintln!();
    eprintln!("Environment (same as flags):");
    eprintln!("  QUEST_DB_URL, QUEST_TODAY");
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse().map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let storage = Storage::sqlite(&args.db_url).await?;
    let today = args.today.unwrap_or_else(|| Clock::default_clock().today());

    let catalog = default_catalog();
    save_json(storage.kv.as_ref(), StoreKey::Courses, catalog.as_slice()).await?;
    save_json(
        storage.kv.as_ref(),
        StoreKey::Lives,
        &Lives::new(args.lives, today),
    )
    .await?;
    if args.with_user {
        save_json(storage.kv.as_ref(), StoreKey::User, &User::demo()).await?;
    } else {
        storage.kv.remove(StoreKey::User).await?;
    }

    println!(
        "Seeded {} courses and {} lives (reset {}) into {}",
        catalog.len(),
        args.lives,
        today,
        args.db_url
    );

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
