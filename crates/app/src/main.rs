mod terminal;

use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;
use quest_core::model::{CatalogStats, CourseId, MAX_LIVES};
use quest_core::time::parse_date;
use services::{AppServices, CatalogError, Clock, Effects, Route, SessionError};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use terminal::Terminal;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidToday { raw: String },
    InvalidCourseId { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidToday { raw } => {
                write!(f, "invalid --today value (expected YYYY-MM-DD): {raw}")
            }
            ArgsError::InvalidCourseId { raw } => write!(f, "invalid --course value: {raw:?}"),
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

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- play   [--course <id>] [--db <sqlite_url>] [--today <date>]");
    eprintln!("  cargo run -p app -- status [--db <sqlite_url>] [--today <date>]");
    eprintln!("  cargo run -p app -- login  [--email <email>] [--name <name>] [--password <pw>]");
    eprintln!("  cargo run -p app -- logout  # keeps progress");
    eprintln!("  cargo run -p app -- reset   # signs out and clears all local data");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite://quest.sqlite3");
    eprintln!("  --today the current UTC date");
    eprintln!("  --email demo@example.com");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUEST_DB_URL, QUEST_TODAY, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Play,
    Status,
    Login,
    Logout,
    Reset,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "play" => Some(Self::Play),
            "status" => Some(Self::Status),
            "login" => Some(Self::Login),
            "logout" => Some(Self::Logout),
            "reset" => Some(Self::Reset),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
struct Args {
    db_url: String,
    today: Option<NaiveDate>,
    course: Option<CourseId>,
    email: String,
    name: Option<String>,
    password: String,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("QUEST_DB_URL")
            .ok()
            .map_or_else(|| "sqlite://quest.sqlite3".into(), normalize_sqlite_url);
        let mut today = match std::env::var("QUEST_TODAY") {
            Ok(raw) => Some(parse_date(&raw).map_err(|_| ArgsError::InvalidToday { raw })?),
            Err(_) => None,
        };
        let mut course = None;
        let mut email = "demo@example.com".to_string();
        let mut name = None;
        let mut password = String::new();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--today" => {
                    let value = require_value(args, "--today")?;
                    today = Some(
                        parse_date(&value).map_err(|_| ArgsError::InvalidToday { raw: value })?,
                    );
                }
                "--course" => {
                    let value = require_value(args, "--course")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidCourseId { raw: value });
                    }
                    course = Some(CourseId::new(value.trim()));
                }
                "--email" => email = require_value(args, "--email")?,
                "--name" => name = Some(require_value(args, "--name")?),
                "--password" => password = require_value(args, "--password")?,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            today,
            course,
            email,
            name,
            password,
        })
    }

    fn clock(&self) -> Clock {
        self.today.map_or_else(Clock::default_clock, Clock::fixed_on)
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

async fn status(app: &AppServices) -> Result<(), Box<dyn std::error::Error>> {
    match app.auth().current_user().await? {
        Some(user) => println!("Signed in as {} <{}>", user.name(), user.email()),
        None => println!("Not signed in"),
    }
    let lives = app.lives().get_lives().await?;
    println!(
        "Lives: {} ({}/{MAX_LIVES})",
        terminal::hearts(lives),
        lives.count()
    );

    let courses = app.catalog().load_courses().await?;
    terminal::print_stats(&CatalogStats::from_courses(&courses));
    terminal::print_catalog(&courses);
    Ok(())
}

async fn play(
    app: &AppServices,
    terminal: &Terminal,
    course: Option<CourseId>,
) -> Result<(), Box<dyn std::error::Error>> {
    let course_id = match course {
        Some(id) => match app.catalog().play_course(&id).await {
            Ok(_) => id,
            Err(CatalogError::CourseNotFound(_)) => {
                terminal::print_catalog(&app.catalog().load_courses().await?);
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        },
        None => match app.catalog().resume().await? {
            Route::Course(id) => id,
            _ => {
                terminal::print_catalog(&app.catalog().load_courses().await?);
                println!("Pick one with --course <id>.");
                return Ok(());
            }
        },
    };
    terminal.take_route();

    let sessions = app.sessions();
    let mut session = sessions.open_course(&course_id).await?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while !session.is_locked() && !session.is_complete() {
        let Some(lesson) = session.current_lesson().cloned() else {
            break;
        };
        terminal::print_lesson(&session, &lesson);

        let Some(line) = lines.next_line().await? else {
            println!("Leaving the course.");
            return Ok(());
        };
        let Some(option) = line
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
        else {
            println!("Enter an option number between 1 and {}.", lesson.options().len());
            continue;
        };

        match session.select_option(option) {
            Ok(()) => {}
            Err(err @ SessionError::InvalidOption { .. }) => {
                println!("{err}");
                continue;
            }
            Err(err) => return Err(err.into()),
        }

        let answer = sessions.submit_answer(&mut session).await?;
        if answer.exhausted {
            break;
        }
        if !answer.outcome.correct {
            println!("The answer was {}.", lesson.correct_answer() + 1);
        }
        let step = sessions.advance(&mut session).await?;
        tracing::debug!(?step, "advanced");
    }

    if let Some(route) = terminal.take_route() {
        tracing::debug!(%route, "session ended");
    }
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let cmd = match argv.next() {
        None => {
            print_usage();
            return Ok(());
        }
        Some(first) if matches!(first.as_str(), "--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) => Command::from_arg(&first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    let parsed = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    prepare_sqlite_file(&parsed.db_url)?;
    let terminal = Arc::new(Terminal::default());
    let effects = Effects::new(terminal.clone(), terminal.clone());
    let app = AppServices::new_sqlite(&parsed.db_url, parsed.clock(), effects).await?;
    tracing::debug!(db_url = %parsed.db_url, ?cmd, "services ready");

    match cmd {
        Command::Play => play(&app, &terminal, parsed.course).await,
        Command::Status => status(&app).await,
        Command::Login => {
            let user = match parsed.name.as_deref() {
                Some(name) => app.auth().signup(name, &parsed.email, &parsed.password).await?,
                None => app.auth().login(&parsed.email, &parsed.password).await?,
            };
            println!("Hello, {}!", user.name());
            Ok(())
        }
        Command::Logout => Ok(app.auth().sign_out().await?),
        Command::Reset => Ok(app.auth().logout().await?),
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
