mod logger;

use std::fmt;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, LogicalSize, WindowBuilder};
use services::{AppServices, Clock, ServicesConfig, StudyPlanService};
use studypath_core::model::PlanId;
use tracing::info;
use ui::{App, DesktopLinkOpener, LinkOpenerRef, UiApp, build_app_context};

const DEFAULT_DB: &str = "studypath.sqlite3";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidPlanId { raw: String },
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidPlanId { raw } => write!(f, "invalid --plan-id value: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
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

struct DesktopApp {
    study_plans: Arc<StudyPlanService>,
    initial_plan_id: Option<PlanId>,
    generation_enabled: bool,
}

impl UiApp for DesktopApp {
    fn study_plans(&self) -> Arc<StudyPlanService> {
        Arc::clone(&self.study_plans)
    }

    fn initial_plan_id(&self) -> Option<PlanId> {
        self.initial_plan_id
    }

    fn generation_enabled(&self) -> bool {
        self.generation_enabled
    }

    fn link_opener(&self) -> LinkOpenerRef {
        Arc::new(DesktopLinkOpener)
    }
}

#[derive(Debug, PartialEq, Eq)]
struct Args {
    db_url: String,
    plan_id: Option<PlanId>,
    log: Option<String>,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  studypath [ui] [--db <sqlite_url>] [--plan-id <id>] [--log <filter>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite://{DEFAULT_DB} (relative to the working directory)");
    eprintln!("  --plan-id <most recent plan>");
    eprintln!("  --log info");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  STUDYPATH_DB_URL, STUDYPATH_PLAN_ID, STUDYPATH_LOG (or RUST_LOG)");
    eprintln!("  STUDYPATH_AI_API_KEY (or GOOGLE_API_KEY), STUDYPATH_AI_BASE_URL, STUDYPATH_AI_MODEL");
    eprintln!("  STUDYPATH_YOUTUBE_API_KEY, STUDYPATH_YOUTUBE_BASE_URL");
    eprintln!("  STUDYPATH_LOOKUP_CONCURRENCY, STUDYPATH_ENRICHMENT, STUDYPATH_HTTP_TIMEOUT_SECS");
}

impl Args {
    fn parse(
        args: impl IntoIterator<Item = String>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ArgsError> {
        let mut db_url = lookup("STUDYPATH_DB_URL")
            .map_or_else(|| normalize_sqlite_url(DEFAULT_DB.into()), normalize_sqlite_url);
        let mut plan_id = match lookup("STUDYPATH_PLAN_ID") {
            Some(raw) => Some(parse_plan_id(raw)?),
            None => None,
        };
        let mut log = None;

        let mut args = args.into_iter().peekable();
        if args.peek().is_some_and(|first| first == "ui") {
            args.next();
        }

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--plan-id" => {
                    plan_id = Some(parse_plan_id(require_value(&mut args, "--plan-id")?)?);
                }
                "--log" => log = Some(require_value(&mut args, "--log")?),
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            plan_id,
            log,
        })
    }
}

fn parse_plan_id(raw: String) -> Result<PlanId, ArgsError> {
    match raw.trim().parse::<PlanId>() {
        Ok(id) if id.value() > 0 => Ok(id),
        _ => Err(ArgsError::InvalidPlanId { raw }),
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    let trimmed = raw.trim();
    if trimmed == "sqlite::memory:" || trimmed.starts_with("sqlite://") {
        return trimmed.to_string();
    }

    let path_str = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    let path = std::path::Path::new(path_str);
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

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    let env = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
    let args = Args::parse(std::env::args().skip(1), env).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;
    logger::init(&logger::resolve_filter(args.log.as_deref(), env))?;

    let config = ServicesConfig::from_env()?;
    prepare_sqlite_file(&args.db_url)?;
    let services = AppServices::new_sqlite(&args.db_url, Clock::default_clock(), &config).await?;
    info!(
        db = %args.db_url,
        generation = services.generation_enabled(),
        video_search = services.video_search_enabled(),
        "starting StudyPath"
    );

    let app = DesktopApp {
        study_plans: services.study_plans(),
        initial_plan_id: args.plan_id,
        generation_enabled: services.generation_enabled(),
    };
    let app: Arc<dyn UiApp> = Arc::new(app);
    let context = build_app_context(&app);

    // Some dev setups default to an always-on-top window.
    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("StudyPath")
            .with_inner_size(LogicalSize::new(1100.0, 800.0))
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
