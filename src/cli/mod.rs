use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context};
use chrono::NaiveDate;
use clap::{value_parser, Arg, ArgMatches, Command};
use rand::{rngs::StdRng, SeedableRng};
use tracing::{error, info};

use crate::services::sampling::surprise_interests;
use crate::types::samples::draw_samples;
use crate::{validate, ItineraryError, ItineraryPlan, Planner, PlannerConfig, TripPreferences};

fn command() -> Command {
    let connection_args = [
        Arg::new("model")
            .short('m')
            .long("model")
            .value_name("MODEL")
            .help("Model identifier (or set ITINERAE_MODEL)"),
        Arg::new("base-url")
            .short('u')
            .long("base-url")
            .value_name("URL")
            .help("OpenAI-compatible base URL (or set OPENAI_BASE_URL / OPENROUTER_BASE_URL)"),
        Arg::new("timeout")
            .short('t')
            .long("timeout")
            .value_name("SECONDS")
            .value_parser(value_parser!(u64))
            .help("HTTP timeout in seconds; unset waits for the provider"),
        Arg::new("output")
            .short('o')
            .long("output")
            .value_name("FILE")
            .value_parser(value_parser!(PathBuf))
            .help("Write the resulting plan as JSON instead of printing an outline"),
    ];

    Command::new("itinerae")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Generate and refine AI travel itineraries")
        .subcommand_required(true)
        .subcommand(
            Command::new("generate")
                .about("Create an itinerary from a preferences JSON file")
                .arg(
                    Arg::new("preferences")
                        .short('p')
                        .long("preferences")
                        .value_name("FILE")
                        .value_parser(value_parser!(PathBuf))
                        .required(true),
                )
                .args(connection_args.clone()),
        )
        .subcommand(
            Command::new("refine")
                .about("Apply a free-text change to an existing itinerary")
                .arg(
                    Arg::new("plan")
                        .long("plan")
                        .value_name("FILE")
                        .value_parser(value_parser!(PathBuf))
                        .required(true),
                )
                .arg(
                    Arg::new("request")
                        .short('r')
                        .long("request")
                        .value_name("TEXT")
                        .required(true),
                )
                .arg(
                    Arg::new("start-date")
                        .short('s')
                        .long("start-date")
                        .value_name("YYYY-MM-DD")
                        .value_parser(parse_start_date)
                        .help("First day of the trip, used to date each day of the outline"),
                )
                .args(connection_args),
        )
        .subcommand(
            Command::new("samples")
                .about("Show sample trips and a 'surprise me' interest pick")
                .arg(
                    Arg::new("count")
                        .short('n')
                        .long("count")
                        .value_parser(value_parser!(usize))
                        .default_value("3"),
                )
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .value_parser(value_parser!(u64))
                        .help("Seed for a reproducible draw"),
                ),
        )
}

/// CLI entry point for the itinerae tool
pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let matches = command().get_matches();
    match matches.subcommand() {
        Some(("generate", args)) => generate(args).await,
        Some(("refine", args)) => refine(args).await,
        Some(("samples", args)) => {
            samples(args);
            Ok(())
        }
        _ => Err(anyhow!("unknown command")),
    }
}

fn planner_from(args: &ArgMatches) -> anyhow::Result<Planner> {
    let mut config = PlannerConfig::from_env()?;
    if let Some(model) = args.get_one::<String>("model") {
        config = config.with_model(model.as_str());
    }
    if let Some(base_url) = args.get_one::<String>("base-url") {
        config = config.with_base_url(base_url.as_str());
    }
    if let Some(seconds) = args.get_one::<u64>("timeout") {
        config = config.with_timeout(Duration::from_secs(*seconds));
    }

    info!("Using model: {}", config.model());
    info!("Base URL: {}", config.base_url());
    Ok(Planner::new(config)?)
}

async fn generate(args: &ArgMatches) -> anyhow::Result<()> {
    let path = required_path(args, "preferences")?;
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading preferences from {}", path.display()))?;
    let preferences: TripPreferences = serde_json::from_str(&raw)
        .with_context(|| format!("parsing preferences in {}", path.display()))?;

    let planner = planner_from(args)?;
    let plan = planner
        .generate(&preferences)
        .await
        .map_err(report)?;

    emit(args, &plan, preferences.start_date())
}

async fn refine(args: &ArgMatches) -> anyhow::Result<()> {
    let path = required_path(args, "plan")?;
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading plan from {}", path.display()))?;
    let payload: serde_json::Value = serde_json::from_str(&raw)
        .with_context(|| format!("parsing plan in {}", path.display()))?;
    let current = validate(&payload)
        .with_context(|| format!("{} is not a valid itinerary", path.display()))?;

    let request = args
        .get_one::<String>("request")
        .map(String::as_str)
        .unwrap_or_default();

    let planner = planner_from(args)?;
    let plan = planner
        .refine(Some(&current), request)
        .await
        .map_err(report)?;

    emit(args, &plan, args.get_one::<NaiveDate>("start-date").copied())
}

fn samples(args: &ArgMatches) {
    let count = args.get_one::<usize>("count").copied().unwrap_or(3);
    let mut rng = match args.get_one::<u64>("seed") {
        Some(seed) => StdRng::seed_from_u64(*seed),
        None => StdRng::from_entropy(),
    };

    for sample in draw_samples(&mut rng, count) {
        println!("{} ({})", sample.title, sample.duration_label());
        println!("  {}", sample.description);
        println!(
            "  {} | {} | {}",
            sample.preset.destination, sample.preset.budget, sample.preset.pacing
        );
        println!("  Interests: {}", sample.preset.top_interests.join(", "));
    }

    println!();
    println!("Surprise me: {}", surprise_interests(&mut rng).join(", "));
}

fn required_path<'a>(args: &'a ArgMatches, name: &str) -> anyhow::Result<&'a Path> {
    args.get_one::<PathBuf>(name)
        .map(PathBuf::as_path)
        .ok_or_else(|| anyhow!("--{name} is required"))
}

fn report(err: ItineraryError) -> anyhow::Error {
    error!(code = err.error_code(), "{}", err);
    if let ItineraryError::InvalidPreferences(issues) = &err {
        for issue in issues {
            eprintln!("  - {}: {}", issue.field(), issue);
        }
    }
    anyhow!("{} [{}]", err.user_message(), err.error_code())
}

fn parse_start_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|err| format!("expected YYYY-MM-DD: {err}"))
}

fn emit(args: &ArgMatches, plan: &ItineraryPlan, start: Option<NaiveDate>) -> anyhow::Result<()> {
    match args.get_one::<PathBuf>("output") {
        Some(path) => {
            let json = serde_json::to_string_pretty(plan)?;
            std::fs::write(path, json)
                .with_context(|| format!("writing plan to {}", path.display()))?;
            info!("Plan written to {}", path.display());
        }
        None => println!("{}", plan.outline(start)),
    }
    Ok(())
}
