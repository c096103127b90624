use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Select, Text};
use tracing::debug;
use weatherflow_core::{
    Config, LocationResolver, Outcome, WeatherStore, provider_from_config,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherflow", version, about = "Weather lookup with place autocomplete")]
pub struct Cli {
    /// Log requests and fallbacks to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the RapidAPI key, host and default place.
    Configure,

    /// List places matching a query.
    Search {
        /// Part of a city, region or country name.
        query: String,
    },

    /// Show weather for a place.
    Show {
        /// Place name or address; if absent, the configured default place.
        place: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Search for a place, choose one interactively, then show its weather.
    Pick {
        query: String,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Debug, Clone, Copy, clap::Args)]
pub struct OutputArgs {
    /// Number of upcoming days to list.
    #[arg(long, default_value_t = 6)]
    pub days: usize,

    /// Print JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load()?.with_env_overrides();
        debug!(default_place = %config.default_place, host = %config.api_host, "configuration loaded");

        match self.command {
            Command::Configure => configure(config),
            Command::Search { query } => {
                let resolver = LocationResolver::new(provider_from_config(&config)?);
                let candidates = resolver.resolve(&query).await;
                print!("{}", render::candidates(&query, &candidates));
                Ok(())
            }
            Command::Show { place, output } => {
                let store = WeatherStore::new(provider_from_config(&config)?, &config.default_place);
                let outcome = match place {
                    Some(place) => store.select(place.as_str()).await,
                    None => store.refresh().await,
                };
                report(&store, outcome, output)
            }
            Command::Pick { query, output } => {
                let store = WeatherStore::new(provider_from_config(&config)?, &config.default_place);
                store.suggest(&query).await;

                let candidates = store.suggestions();
                if candidates.is_empty() {
                    bail!("No places match '{query}'.");
                }

                let choice = Select::new("Choose a place:", candidates)
                    .with_page_size(8)
                    .prompt()
                    .context("No place selected")?;

                let outcome = store.select(choice).await;
                report(&store, outcome, output)
            }
        }
    }
}

fn report(
    store: &WeatherStore,
    outcome: Result<Outcome, weatherflow_core::WeatherFetchError>,
    output: OutputArgs,
) -> anyhow::Result<()> {
    let place = store.place();
    match outcome.with_context(|| format!("Could not load weather for '{place}'"))? {
        Outcome::Applied => {}
        Outcome::Ignored => bail!("Place must not be empty."),
        Outcome::Superseded => bail!("Weather for '{place}' was superseded by a newer request."),
    }

    let state = store.state();
    if output.json {
        println!("{}", render::json(&state, output.days)?);
    } else {
        print!("{}", render::report(&state, output.days));
    }
    Ok(())
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    let api_key = Password::new("RapidAPI key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let api_host = Text::new("API host:")
        .with_default(&config.api_host)
        .prompt()
        .context("Failed to read API host")?;

    let default_place = Text::new("Default place:")
        .with_default(&config.default_place)
        .prompt()
        .context("Failed to read default place")?;

    if !api_key.trim().is_empty() {
        config.set_api_key(api_key.trim().to_string());
    }
    config.api_host = api_host.trim().to_string();
    config.default_place = default_place.trim().to_string();
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_defaults() {
        let cli = Cli::try_parse_from(["weatherflow", "show"]).expect("valid args");
        match cli.command {
            Command::Show { place, output } => {
                assert_eq!(place, None);
                assert_eq!(output.days, 6);
                assert!(!output.json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert!(!cli.verbose);
    }

    #[test]
    fn show_with_place_and_flags() {
        let cli = Cli::try_parse_from([
            "weatherflow",
            "show",
            "Colombo, Western Province, Sri Lanka",
            "--days",
            "3",
            "--json",
            "-v",
        ])
        .expect("valid args");

        assert!(cli.verbose);
        match cli.command {
            Command::Show { place, output } => {
                assert_eq!(place.as_deref(), Some("Colombo, Western Province, Sri Lanka"));
                assert_eq!(output.days, 3);
                assert!(output.json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn search_requires_query() {
        assert!(Cli::try_parse_from(["weatherflow", "search"]).is_err());

        let cli = Cli::try_parse_from(["weatherflow", "search", "jaf"]).expect("valid args");
        assert!(matches!(cli.command, Command::Search { query } if query == "jaf"));
    }

    #[test]
    fn pick_accepts_output_flags() {
        let cli = Cli::try_parse_from(["weatherflow", "pick", "col", "--days", "2"])
            .expect("valid args");
        assert!(matches!(cli.command, Command::Pick { ref query, output } if query == "col" && output.days == 2));
    }

    #[test]
    fn clap_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
