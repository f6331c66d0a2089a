//! Command-line interface parsing for the prayer times CLI
//!
//! This module defines the clap command tree (`today`, `next`, `config`,
//! `setup`) and the validation of `--city` / `--language` values against
//! the supported sets.

use clap::{Args, Parser, Subcommand};
use thiserror::Error;

use crate::data::{get_city_by_id, City, CITIES};
use crate::i18n::Language;

/// Error types for CLI argument validation
#[derive(Debug, Error)]
pub enum CliError {
    /// The specified city is not in the supported registry
    #[error("Invalid city: '{id}'. Valid cities: {valid}", id = .0, valid = valid_city_ids())]
    InvalidCity(String),

    /// The specified language is not supported
    #[error("Invalid language: '{0}'. Valid languages: ar, en, fr")]
    InvalidLanguage(String),
}

fn valid_city_ids() -> String {
    CITIES
        .iter()
        .map(|city| city.id)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Salaty - Moroccan prayer times in your terminal
#[derive(Parser, Debug)]
#[command(name = "salaty")]
#[command(about = "Moroccan prayer times from the Ministry of Habous")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Display today's prayer times
    Today(QueryArgs),
    /// Display the time remaining until the next prayer
    Next(QueryArgs),
    /// Show the saved configuration
    Config,
    /// Save city and language preferences
    Setup(SetupArgs),
}

/// Arguments shared by the `today` and `next` commands
#[derive(Args, Debug, Default)]
pub struct QueryArgs {
    /// City to query, overriding the saved configuration
    #[arg(long, value_name = "CITY")]
    pub city: Option<String>,

    /// Display language (ar, en, fr), overriding the saved configuration
    #[arg(long, value_name = "LANG")]
    pub language: Option<String>,
}

/// Arguments for the `setup` command
#[derive(Args, Debug, Default)]
pub struct SetupArgs {
    /// City to save as the default
    #[arg(long, value_name = "CITY")]
    pub city: Option<String>,

    /// Language to save as the default (ar, en, fr)
    #[arg(long, value_name = "LANG")]
    pub language: Option<String>,
}

/// Parses a city argument into a registry entry.
///
/// # Returns
/// * `Ok(&City)` if the id is in the supported registry
/// * `Err(CliError::InvalidCity)` otherwise
pub fn parse_city_arg(s: &str) -> Result<&'static City, CliError> {
    get_city_by_id(s).ok_or_else(|| CliError::InvalidCity(s.to_string()))
}

/// Parses a language argument.
///
/// # Returns
/// * `Ok(Language)` if the value is a supported language code
/// * `Err(CliError::InvalidLanguage)` otherwise
pub fn parse_language_arg(s: &str) -> Result<Language, CliError> {
    Language::from_str(s).ok_or_else(|| CliError::InvalidLanguage(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_city_arg_known_cities() {
        assert_eq!(parse_city_arg("casablanca").unwrap().habous_id, 58);
        assert_eq!(parse_city_arg("Rabat").unwrap().id, "rabat");
    }

    #[test]
    fn test_parse_city_arg_invalid() {
        let err = parse_city_arg("atlantis").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("atlantis"));
        assert!(message.contains("casablanca"), "should list valid cities");
    }

    #[test]
    fn test_parse_language_arg() {
        assert_eq!(parse_language_arg("fr").unwrap(), Language::Fr);
        assert_eq!(parse_language_arg("AR").unwrap(), Language::Ar);
        assert!(parse_language_arg("de").is_err());
    }

    #[test]
    fn test_cli_parse_no_args_defaults_to_no_command() {
        let cli = Cli::parse_from(["salaty"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_parse_today_with_city() {
        let cli = Cli::parse_from(["salaty", "today", "--city", "rabat"]);
        match cli.command {
            Some(Command::Today(args)) => assert_eq!(args.city.as_deref(), Some("rabat")),
            other => panic!("expected today command, got {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_next_without_overrides() {
        let cli = Cli::parse_from(["salaty", "next"]);
        match cli.command {
            Some(Command::Next(args)) => {
                assert!(args.city.is_none());
                assert!(args.language.is_none());
            }
            other => panic!("expected next command, got {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_setup_with_both_flags() {
        let cli = Cli::parse_from(["salaty", "setup", "--city", "fes", "--language", "ar"]);
        match cli.command {
            Some(Command::Setup(args)) => {
                assert_eq!(args.city.as_deref(), Some("fes"));
                assert_eq!(args.language.as_deref(), Some("ar"));
            }
            other => panic!("expected setup command, got {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_config() {
        let cli = Cli::parse_from(["salaty", "config"]);
        assert!(matches!(cli.command, Some(Command::Config)));
    }
}
