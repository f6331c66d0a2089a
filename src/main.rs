//! Salaty - Moroccan prayer times in your terminal
//!
//! Fetches the daily prayer times published by the Ministry of Habous,
//! caches them per city and date, and prints them as a table (`today`) or
//! as a countdown to the next prayer (`next`).

use chrono::Local;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use salaty::cache::CacheManager;
use salaty::cli::{parse_city_arg, parse_language_arg, Cli, Command, QueryArgs, SetupArgs};
use salaty::config::{ConfigStore, UserConfig};
use salaty::data::{City, HabousClient};
use salaty::display;
use salaty::i18n::{self, Language};
use salaty::service::PrayerTimeService;

/// Routes log output to stderr so tables and messages own stdout
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();
    if let Err(message) = run(cli).await {
        eprintln!("{message}");
        std::process::exit(1);
    }
}

/// Dispatches the parsed command; the error string is already localized
/// and ready for stderr.
async fn run(cli: Cli) -> Result<(), String> {
    let store = ConfigStore::new();
    let saved = store.as_ref().and_then(ConfigStore::load).unwrap_or_default();

    // Invoking with no subcommand behaves as `next`.
    let command = cli.command.unwrap_or(Command::Next(QueryArgs::default()));

    match command {
        Command::Config => {
            show_config(&saved);
            Ok(())
        }
        Command::Setup(args) => setup(store, saved, args),
        Command::Today(args) => {
            let (city, language) = resolve_query(&saved, &args)?;
            let service = build_service(language)?;
            let set = service
                .today_times(city.id)
                .await
                .map_err(|e| i18n::error_message(language, &e))?;
            print!("{}", display::render_today(&set, language));
            Ok(())
        }
        Command::Next(args) => {
            let (city, language) = resolve_query(&saved, &args)?;
            let service = build_service(language)?;
            let now = Local::now().naive_local();
            let next = service
                .next_prayer(city.id, now)
                .await
                .map_err(|e| i18n::error_message(language, &e))?;
            println!("{}", display::render_next(&next, language));
            Ok(())
        }
    }
}

/// Resolves the effective city and language for `today`/`next`: command-line
/// overrides win over the saved configuration, and a missing city yields the
/// localized setup hint.
fn resolve_query(
    saved: &UserConfig,
    args: &QueryArgs,
) -> Result<(&'static City, Language), String> {
    let language = match &args.language {
        Some(value) => parse_language_arg(value).map_err(|e| e.to_string())?,
        None => saved.language,
    };

    let city = match args.city.as_deref().or(saved.city_id.as_deref()) {
        Some(id) => parse_city_arg(id).map_err(|e| e.to_string())?,
        None => return Err(i18n::msg_not_configured(language).to_string()),
    };

    Ok((city, language))
}

/// Builds the production service: Habous client plus the on-disk cache.
/// Falls back to a temp-dir cache when no XDG cache path exists.
fn build_service(language: Language) -> Result<PrayerTimeService<HabousClient>, String> {
    let client = HabousClient::new().map_err(|e| i18n::error_message(language, &e.into()))?;
    let cache = CacheManager::new()
        .unwrap_or_else(|| CacheManager::with_dir(std::env::temp_dir().join("salaty-times")));
    Ok(PrayerTimeService::new(client, cache))
}

/// Prints the saved configuration (`config` command)
fn show_config(saved: &UserConfig) {
    println!("city={}", saved.city_id.as_deref().unwrap_or("-"));
    println!("language={}", saved.language.as_str());
}

/// Validates and persists preferences (`setup` command)
fn setup(
    store: Option<ConfigStore>,
    mut saved: UserConfig,
    args: SetupArgs,
) -> Result<(), String> {
    if args.city.is_none() && args.language.is_none() {
        return Err("Nothing to save. Pass --city and/or --language.".to_string());
    }

    if let Some(value) = &args.city {
        let city = parse_city_arg(value).map_err(|e| e.to_string())?;
        saved.city_id = Some(city.id.to_string());
    }
    if let Some(value) = &args.language {
        saved.language = parse_language_arg(value).map_err(|e| e.to_string())?;
    }

    let store = store.ok_or_else(|| "Could not determine a configuration directory.".to_string())?;
    store
        .save(&saved)
        .map_err(|e| format!("Could not save configuration: {e}"))?;

    println!("{}", i18n::msg_config_saved(saved.language));
    Ok(())
}
