//! Command-line driver for the anime catalog.
//!
//! # Responsibility
//! - Resolve configuration (env, then flags), start logging, open stores.
//! - Map each subcommand onto one core service call and print the result.

use anicat_core::{
    init_logging, AdvancedCriteria, AnimeEntry, AnimeService, ByRating, ByTitle, ByYear,
    CatalogConfig, EntryOrdering, Genre, LogLevel, RecommendationService, SortDirection,
    StatisticsService, WatchStatus,
};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "anicat", version, about = "Anime catalog manager", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory holding animes.json and lists.json
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Directory for rolling log files; logging is off when unset
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, global = true, value_parser = parse_level)]
    log_level: Option<LogLevel>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print catalog statistics
    Summary,

    /// List every entry
    List {
        #[arg(long, value_enum, default_value_t = SortKey::Title)]
        sort: SortKey,

        /// Force descending order
        #[arg(long, conflicts_with = "asc")]
        desc: bool,

        /// Force ascending order
        #[arg(long)]
        asc: bool,
    },

    /// Best rated entries, optionally narrowed by genre and status
    Top {
        #[arg(long, value_parser = parse_genre)]
        genre: Option<Genre>,

        #[arg(long, value_parser = parse_status)]
        status: Option<WatchStatus>,

        #[arg(long, default_value_t = 5)]
        limit: usize,
    },

    /// Import entries from a pipe-delimited text file
    Import { file: PathBuf },

    /// Export the catalog as pipe-delimited text (stdout when no file given)
    Export { file: Option<PathBuf> },

    /// Print the core version
    Version,
}

#[derive(Clone, Copy, ValueEnum)]
enum SortKey {
    Title,
    Year,
    Rating,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    if let Some(log_dir) = &config.log_dir {
        let log_dir = absolute(log_dir)?;
        init_logging(config.log_level, &log_dir).context("failed to start logging")?;
    }

    run(cli.command, &config)
}

fn resolve_config(cli: &Cli) -> Result<CatalogConfig> {
    let mut config = CatalogConfig::from_env().context("invalid ANICAT_* environment")?;
    if let Some(data_dir) = &cli.data_dir {
        config.data_dir = data_dir.clone();
    }
    if let Some(log_dir) = &cli.log_dir {
        config.log_dir = Some(log_dir.clone());
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    Ok(config)
}

fn run(command: Commands, config: &CatalogConfig) -> Result<()> {
    let (mut entries, _lists) = config.open_stores();

    match command {
        Commands::Summary => {
            let summary = StatisticsService::new(&mut entries).summary()?;
            print!("{summary}");
        }
        Commands::List { sort, desc, asc } => {
            let ordering = build_ordering(sort, direction_override(desc, asc));
            let listed = AnimeService::new(&mut entries).list_sorted(ordering.as_ref())?;
            println!("# {}", ordering.description());
            print_entries(&listed);
        }
        Commands::Top {
            genre,
            status,
            limit,
        } => {
            let criteria = AdvancedCriteria {
                genre,
                min_rating: None,
                status,
            };
            let top = RecommendationService::new(&mut entries).advanced(&criteria, limit)?;
            print_entries(&top);
        }
        Commands::Import { file } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read `{}`", file.display()))?;
            let report = AnimeService::new(&mut entries).import_text(&text)?;
            println!("{report}");
        }
        Commands::Export { file } => {
            let text = AnimeService::new(&mut entries).export_text()?;
            match file {
                Some(path) => {
                    std::fs::write(&path, text)
                        .with_context(|| format!("failed to write `{}`", path.display()))?;
                    info!("event=cli_export module=cli status=ok target=file");
                }
                None => print!("{text}"),
            }
        }
        Commands::Version => {
            println!("anicat_core version={}", anicat_core::core_version());
        }
    }

    Ok(())
}

fn direction_override(desc: bool, asc: bool) -> Option<SortDirection> {
    match (desc, asc) {
        (true, _) => Some(SortDirection::Descending),
        (_, true) => Some(SortDirection::Ascending),
        _ => None,
    }
}

fn build_ordering(key: SortKey, direction: Option<SortDirection>) -> Box<dyn EntryOrdering> {
    match (key, direction) {
        (SortKey::Title, Some(direction)) => Box::new(ByTitle::new(direction)),
        (SortKey::Title, None) => Box::new(ByTitle::default()),
        (SortKey::Year, Some(direction)) => Box::new(ByYear::new(direction)),
        (SortKey::Year, None) => Box::new(ByYear::default()),
        (SortKey::Rating, Some(direction)) => Box::new(ByRating::new(direction)),
        (SortKey::Rating, None) => Box::new(ByRating::default()),
    }
}

fn print_entries(entries: &[AnimeEntry]) {
    if entries.is_empty() {
        println!("(no entries)");
        return;
    }
    for entry in entries {
        println!("{entry}");
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("failed to resolve current directory")?;
    Ok(cwd.join(path))
}

fn parse_level(value: &str) -> Result<LogLevel, String> {
    value.parse().map_err(|err: anicat_core::LoggingError| err.to_string())
}

/// Accepts interchange codes (`SLICE_OF_LIFE`) or dashed names (`slice-of-life`).
fn parse_genre(value: &str) -> Result<Genre, String> {
    Genre::from_code(&value.replace('-', "_")).ok_or_else(|| {
        let known: Vec<&str> = Genre::ALL.iter().map(|genre| genre.code()).collect();
        format!("unknown genre `{value}`; expected one of {}", known.join(", "))
    })
}

/// Accepts interchange codes (`POR_VER`) or English names (`to-watch`).
fn parse_status(value: &str) -> Result<WatchStatus, String> {
    if let Some(status) = WatchStatus::from_code(value) {
        return Ok(status);
    }
    match value.trim().to_ascii_lowercase().replace('_', "-").as_str() {
        "to-watch" => Ok(WatchStatus::ToWatch),
        "watching" => Ok(WatchStatus::Watching),
        "finished" => Ok(WatchStatus::Finished),
        "abandoned" => Ok(WatchStatus::Abandoned),
        _ => Err(format!(
            "unknown status `{value}`; expected to-watch|watching|finished|abandoned"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn genre_and_status_accept_both_spellings() {
        assert_eq!(parse_genre("slice-of-life").unwrap(), Genre::SliceOfLife);
        assert_eq!(parse_genre("MECHA").unwrap(), Genre::Mecha);
        assert!(parse_genre("horror").is_err());
        assert_eq!(parse_status("viendo").unwrap(), WatchStatus::Watching);
        assert_eq!(parse_status("To_Watch").unwrap(), WatchStatus::ToWatch);
        assert!(parse_status("paused").is_err());
    }

    #[test]
    fn flags_pick_sort_direction() {
        let cli = Cli::try_parse_from(["anicat", "list", "--sort", "year", "--asc"]).unwrap();
        let Commands::List { sort, desc, asc } = cli.command else {
            panic!("expected list command");
        };
        let ordering = build_ordering(sort, direction_override(desc, asc));
        assert_eq!(ordering.description(), "By year (oldest first)");
    }
}
