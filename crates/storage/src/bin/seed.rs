use std::fmt;

use chrono::{DateTime, Duration, Utc};
use storage::repository::{PlanRepository, Storage};
use studypath_core::model::{PlanRequest, ProficiencyLevel, StudyPlan, Topic, VideoRef, WeekPlan};

#[derive(Debug, Clone)]
struct Args {
    db_url: String,
    subject: String,
    plans: u32,
    completed: u32,
    now: Option<DateTime<Utc>>,
}

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidSubject { raw: String },
    InvalidPlans { raw: String },
    InvalidCompleted { raw: String },
    InvalidNow { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidSubject { raw } => write!(f, "invalid --subject value: {raw:?}"),
            ArgsError::InvalidPlans { raw } => write!(f, "invalid --plans value: {raw}"),
            ArgsError::InvalidCompleted { raw } => write!(f, "invalid --completed value: {raw}"),
            ArgsError::InvalidNow { raw } => {
                write!(f, "invalid --now value (expected RFC3339): {raw}")
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
        let mut db_url = std::env::var("STUDYPATH_DB_URL")
            .unwrap_or_else(|_| "sqlite://studypath.sqlite3?mode=rwc".into());
        let mut subject =
            std::env::var("STUDYPATH_SEED_SUBJECT").unwrap_or_else(|_| "Machine Learning".into());
        let mut plans = std::env::var("STUDYPATH_SEED_PLANS")
            .ok()
            .and_then(|value| value.parse::<u32>().ok())
            .unwrap_or(1);
        let mut completed = 2;
        let mut now: Option<DateTime<Utc>> = None;

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
                "--subject" => {
                    let value = require_value(&mut args, "--subject")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidSubject { raw: value });
                    }
                    subject = value;
                }
                "--plans" => {
                    let value = require_value(&mut args, "--plans")?;
                    plans = value
                        .parse::<u32>()
                        .map_err(|_| ArgsError::InvalidPlans { raw: value.clone() })?;
                }
                "--completed" => {
                    let value = require_value(&mut args, "--completed")?;
                    completed = value
                        .parse::<u32>()
                        .map_err(|_| ArgsError::InvalidCompleted { raw: value.clone() })?;
                }
                "--now" => {
                    let value = require_value(&mut args, "--now")?;
                    let parsed = DateTime::parse_from_rfc3339(&value)
                        .map_err(|_| ArgsError::InvalidNow { raw: value.clone() })?
                        .with_timezone(&Utc);
                    now = Some(parsed);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            subject,
            plans,
            completed,
            now,
        })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p storage --bin seed -- [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --db <sqlite_url>         SQLite URL (default: sqlite://studypath.sqlite3?mode=rwc)");
    eprintln!("  --subject <text>          Subject of the sample plan (default: Machine Learning)");
    eprintln!("  --plans <n>               Number of sample plans to insert (default: 1)");
    eprintln!("  --completed <n>           Topics to mark completed in each plan (default: 2)");
    eprintln!("  --now <rfc3339>           Fixed current time for deterministic seeding");
    eprintln!("  -h, --help                Show this help");
    eprintln!();
    eprintln!("Environment (same as flags):");
    eprintln!("  STUDYPATH_DB_URL, STUDYPATH_SEED_SUBJECT, STUDYPATH_SEED_PLANS");
}

const SAMPLE_WEEKS: [(&str, [(&str, f64, &str); 2]); 4] = [
    (
        "Foundations",
        [
            ("Core Vocabulary", 4.0, "Learn the terms every later week relies on."),
            ("Tooling Setup", 2.0, "Install and configure the tools used in the exercises."),
        ],
    ),
    (
        "Core Techniques",
        [
            ("Guided Practice", 5.0, "Work through structured exercises."),
            ("Common Mistakes", 2.0, "Recognise and correct typical errors."),
        ],
    ),
    (
        "Applied Work",
        [
            ("Small Project", 6.0, "Build a small end-to-end project."),
            ("Reading Real Examples", 2.0, "Study how practitioners approach the subject."),
        ],
    ),
    (
        "Consolidation",
        [
            ("Capstone Review", 4.0, "Revisit weak spots from earlier weeks."),
            ("Next Steps", 1.0, "Pick follow-up material for continued study."),
        ],
    ),
];

fn sample_weeks(subject: &str) -> Result<Vec<WeekPlan>, Box<dyn std::error::Error>> {
    let mut weeks = Vec::with_capacity(SAMPLE_WEEKS.len());
    for (week_number, (focus, topics)) in (1u32..).zip(SAMPLE_WEEKS) {
        let mut built = Vec::with_capacity(topics.len());
        for (idx, (name, hours, description)) in topics.into_iter().enumerate() {
            let mut topic = Topic::new(format!("{subject}: {name}"), hours, description)?;
            if idx == 0 {
                let video_id = format!("seed-{week_number}");
                topic.set_video(Some(VideoRef::from_search_hit(
                    video_id.as_str(),
                    format!("{subject} {name} explained"),
                    format!("https://i.ytimg.com/vi/{video_id}/default.jpg"),
                )?));
            }
            built.push(topic);
        }
        let total: f64 = built.iter().map(Topic::hours).sum();
        weeks.push(WeekPlan::new(
            week_number,
            format!("{subject}: {focus}"),
            vec![format!("Make progress on {focus} for {subject}")],
            built,
            total,
        )?);
    }
    Ok(weeks)
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse().map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let storage = Storage::sqlite(&args.db_url).await?;
    let now = args.now.unwrap_or_else(Utc::now);
    let request = PlanRequest::new(
        args.subject.as_str(),
        ProficiencyLevel::Beginner,
        ProficiencyLevel::Intermediate,
        10,
    )?;

    for i in 0..args.plans {
        let created_at = now - Duration::days(i64::from(i));
        let plan = StudyPlan::new(&request, sample_weeks(&args.subject)?, created_at)?;
        let topic_names: Vec<String> = plan
            .topics()
            .take(args.completed as usize)
            .map(|t| t.name().to_string())
            .collect();

        let id = storage.plans.insert_plan(&plan).await?;
        for name in &topic_names {
            storage.plans.set_topic_progress(id, name, true).await?;
        }
        println!("Seeded plan {id} ({} topics completed)", topic_names.len());
    }

    println!(
        "Seeded {} plan(s) for {:?} into {}",
        args.plans, args.subject, args.db_url
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
