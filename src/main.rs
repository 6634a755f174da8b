use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};

use pokefav::api::{display_name, format_stat_name, Paginator, PokeApiClient, PokemonDetails};
use pokefav::config::Config;
use pokefav::favorites::{ChangeChannel, DetailsRefresh, FavoritesView, ToggleOutcome};
use pokefav::logging::init_tracing;
use pokefav::storage::FavoritesStore;

#[derive(Debug, Parser)]
#[command(name = "pokefav", version, about = "Browse the Pokédex and keep local favorites")]
struct Cli {
    /// Path to config file (default: ~/.config/pokefav/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the catalog page by page
    List {
        /// Number of pages to fetch
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// Find Pokémon whose name contains a term
    Search { term: String },
    /// Show one Pokémon's details
    Show { name: String },
    /// Show favorites with their details
    Favorites,
    /// Add or remove a favorite
    Toggle { name: String },
    /// Add a favorite
    Add { name: String },
    /// Remove a favorite
    Remove { name: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    match run(Cli::parse()).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config_path = cli.config.unwrap_or_else(Config::config_path);
    let config = Config::load_from(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;

    let client = PokeApiClient::new(&config.api)?;
    let store = FavoritesStore::from_config(&config.storage);
    let channel = ChangeChannel::new(config.storage.channel_capacity);
    let view = FavoritesView::mount(store, channel);

    match cli.command {
        Command::List { pages } => list(&client, &view, pages).await,
        Command::Search { term } => search(&client, &term).await,
        Command::Show { name } => Ok(show(&client, &view, &name).await),
        Command::Favorites => favorites(&client, &view).await,
        Command::Toggle { name } => Ok(report(view.toggle(&name), &name)),
        Command::Add { name } => Ok(report(view.add(&name), &name)),
        Command::Remove { name } => Ok(report(view.remove(&name), &name)),
    }
}

fn favorite_marker(view: &FavoritesView, name: &str) -> &'static str {
    match view.is_favorite(name) {
        Some(true) => "♥",
        Some(false) => " ",
        None => "?",
    }
}

async fn list(client: &PokeApiClient, view: &FavoritesView, pages: u32) -> anyhow::Result<ExitCode> {
    let mut paginator = Paginator::new(client.clone());
    for _ in 0..pages {
        if paginator.fetch_next_page().await?.is_none() {
            break;
        }
    }

    for pokemon in paginator.pokemons() {
        println!(
            "{} #{:<4} {}",
            favorite_marker(view, &pokemon.name),
            pokemon.id,
            display_name(&pokemon.name)
        );
    }
    if paginator.has_next_page() {
        println!("… more available (--pages {})", paginator.page_count() + 1);
    }
    Ok(ExitCode::SUCCESS)
}

async fn search(client: &PokeApiClient, term: &str) -> anyhow::Result<ExitCode> {
    let matches = client.search(term).await?;
    if matches.is_empty() {
        println!("No Pokémon match '{}'", term);
    }
    for pokemon in matches {
        println!("{}", pokemon.name);
    }
    Ok(ExitCode::SUCCESS)
}

async fn show(client: &PokeApiClient, view: &FavoritesView, name: &str) -> ExitCode {
    match client.fetch_pokemon(name).await {
        Ok(details) => {
            print_details(&details, view.is_favorite(&details.name).unwrap_or(false));
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to load Pokémon details: {}", e);
            eprintln!("Run `pokefav list` to go back to the catalog.");
            ExitCode::FAILURE
        }
    }
}

fn print_details(details: &PokemonDetails, favorite: bool) {
    let heart = if favorite { " ♥" } else { "" };
    println!("#{} {}{}", details.id, display_name(&details.name), heart);
    println!("Types:  {}", details.type_names().join(", "));
    println!(
        "Height: {:.1} m   Weight: {:.1} kg",
        f64::from(details.height) / 10.0,
        f64::from(details.weight) / 10.0
    );

    let abilities: Vec<String> = details
        .abilities
        .iter()
        .map(|a| {
            if a.is_hidden {
                format!("{} (hidden)", a.ability.name)
            } else {
                a.ability.name.clone()
            }
        })
        .collect();
    println!("Abilities: {}", abilities.join(", "));

    for stat in &details.stats {
        println!("  {:<8} {:>3}", format_stat_name(&stat.stat.name), stat.base_stat);
    }
    if let Some(url) = details.artwork_url() {
        println!("Artwork:    {}", url);
    }
    if let Some(url) = details.dream_world_url() {
        println!("Dream World: {}", url);
    }
}

async fn favorites(client: &PokeApiClient, view: &FavoritesView) -> anyhow::Result<ExitCode> {
    let Some(favorites) = view.favorites() else {
        println!("Favorites storage is not available yet.");
        return Ok(ExitCode::FAILURE);
    };
    if favorites.is_empty() {
        println!("No favorites yet");
        println!("Run `pokefav add <name>` to add a Pokémon to your favorites.");
        return Ok(ExitCode::SUCCESS);
    }

    let cancel = view.cancel_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    match view.refresh_details(client).await? {
        DetailsRefresh::Applied(resolved) => {
            for name in favorites.iter() {
                match resolved.get(name) {
                    Some(details) => println!(
                        "#{:<4} {:<12} {}",
                        details.id,
                        display_name(&details.name),
                        details.type_names().join("/")
                    ),
                    None => println!("      {:<12} (unavailable)", display_name(name)),
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        DetailsRefresh::Cancelled => {
            println!("Cancelled");
            Ok(ExitCode::FAILURE)
        }
        DetailsRefresh::Disabled | DetailsRefresh::Stale => Ok(ExitCode::SUCCESS),
    }
}

fn report(outcome: Option<ToggleOutcome>, name: &str) -> ExitCode {
    match outcome {
        Some(outcome) => {
            println!("{}: {}", outcome.title(), outcome.description());
            ExitCode::SUCCESS
        }
        None => {
            println!("Favorites unchanged for {}", display_name(name));
            ExitCode::SUCCESS
        }
    }
}
