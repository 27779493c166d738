use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dishcast_core::{App, Config};
use dishcast_ui::render::INGREDIENTS_BUTTON;
use dishcast_ui::{Action, Dispatcher, Feature, Mood, UiEvent};
use tokio::io::{AsyncBufReadExt, BufReader};

/// Weather-aware recipe discovery. Renders the page as HTML.
#[derive(Parser, Debug)]
#[command(name = "dishcast", version)]
struct Cli {
    /// Config file (defaults to the user config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the rendered page here instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Current weather and recipes that suit it
    Weather,
    /// Free-text recipe search
    Search { query: String },
    /// Recipes using a comma-separated ingredient list
    Ingredients { list: String },
    /// Dish suggestions for a mood
    Mood { mood: Mood },
    /// Full recipe card
    Recipe { id: u64 },
    /// Read UI events from stdin, one per line
    Interactive,
}

#[tokio::main]
async fn main() -> Result<()> {
    dishcast_core::init()?;
    let cli = Cli::parse();

    let mut app = match &cli.config {
        Some(path) => App::with_config(Config::load_from(path)?)?,
        None => App::new()?,
    };
    let dispatcher = Dispatcher::from_config(app.config())?;

    match cli.command {
        Command::Weather => dispatcher.handle(UiEvent::Startup).await,
        Command::Search { query } => dispatcher.handle(UiEvent::MainSearchSubmit(query)).await,
        Command::Ingredients { list } => {
            dispatcher
                .handle(UiEvent::OpenFeature(Feature::Ingredients))
                .await;
            dispatcher
                .handle(UiEvent::click_with(INGREDIENTS_BUTTON, list))
                .await;
        }
        Command::Mood { mood } => {
            dispatcher
                .handle(UiEvent::OpenFeature(Feature::MoodFood))
                .await;
            dispatcher.handle(UiEvent::click(mood.element_id())).await;
        }
        Command::Recipe { id } => dispatcher.perform(Action::ViewRecipe(id), None).await,
        Command::Interactive => interactive(&dispatcher).await?,
    }

    let document = dispatcher.page().lock().render_document();
    match &cli.output {
        Some(path) => {
            std::fs::write(path, document)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Wrote page to {}", path.display());
        }
        None => print!("{}", document),
    }

    app.shutdown()?;
    Ok(())
}

/// One UI event per line:
///
/// ```text
/// type <text>          header search as you type (debounced)
/// search <text>        header search submit
/// open <feature>       ingredients | recipe-search | mood-food
/// click <id> [value]   click a rendered element
/// input <id> <value>   type into a rendered input (debounced where bound)
/// recommend            reload weather recommendations
/// wait <ms>            let debounce timers and requests settle
/// show                 print the current page
/// quit
/// ```
async fn interactive(dispatcher: &Dispatcher) -> Result<()> {
    dispatcher.handle(UiEvent::Startup).await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim();

        match command {
            "" => {}
            "quit" | "exit" => break,
            "type" => dispatcher.handle(UiEvent::MainSearchInput(rest.into())).await,
            "search" => dispatcher.handle(UiEvent::MainSearchSubmit(rest.into())).await,
            "recommend" => dispatcher.handle(UiEvent::WeatherRecommendations).await,
            "open" => match rest.parse::<Feature>() {
                Ok(feature) => dispatcher.handle(UiEvent::OpenFeature(feature)).await,
                Err(e) => eprintln!("{}", e),
            },
            "click" => {
                let event = match rest.split_once(' ') {
                    Some((id, value)) => UiEvent::click_with(id, value.trim()),
                    None => UiEvent::click(rest),
                };
                dispatcher.handle(event).await;
            }
            "input" => {
                let (id, value) = rest.split_once(' ').unwrap_or((rest, ""));
                dispatcher.handle(UiEvent::input(id, value.trim())).await;
            }
            "wait" => {
                let ms = rest.parse::<u64>().unwrap_or(1000);
                tokio::time::sleep(Duration::from_millis(ms)).await;
            }
            "show" => println!("{}", dispatcher.page().lock().render_document()),
            other => eprintln!("unknown command '{}'", other),
        }
    }

    if dispatcher.has_pending_search() {
        tracing::debug!("Discarding pending search on exit");
    }
    Ok(())
}
