//! livetrip - command line front end for livetrip option vocabularies.
//!
//! Lists and edits the option lists (areas, statuses, sellers, ...) shared
//! by schedules, traffic and stays, and previews how an exported entity file
//! would be grouped. Works offline from the local cache.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::de::DeserializeOwned;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use livetrip_core::api::ApiClient;
use livetrip_core::cache::FileStore;
use livetrip_core::config::Config;
use livetrip_core::models::{Category, ColorCode, Dimension, Groupable, Schedule, SelectOption, Stay, Traffic};
use livetrip_core::options::grouping::{partition, partition2, Group};
use livetrip_core::options::ordering::apply;
use livetrip_core::options::{OptionStore, RankMaps, SortMode};

#[derive(Parser, Debug)]
#[command(name = "livetrip")]
#[command(about = "Manage livetrip option vocabularies")]
#[command(version)]
struct Cli {
    /// Read another user's shared vocabularies (read-only)
    #[arg(long, global = true)]
    share: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every category
    Categories,
    /// Show a category's options in display order
    List {
        category: Category,
        /// Sort mode (custom or kana); defaults to the configured mode
        #[arg(long)]
        mode: Option<SortMode>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Add an option
    Add {
        category: Category,
        label: String,
        #[arg(long)]
        color: Option<ColorCode>,
    },
    /// Rename and/or recolor the option at a position
    Update {
        category: Category,
        index: usize,
        label: String,
        #[arg(long)]
        color: Option<ColorCode>,
    },
    /// Move an option to a new position
    Move { category: Category, from: usize, to: usize },
    /// Delete an option
    Delete { category: Category, label: String },
    /// Change how a category is sorted and save the choice
    Sort { category: Category, mode: SortMode },
    /// Print the color each label renders with
    Colors { category: Category, labels: Vec<String> },
    /// Group an exported entity file for display
    Group {
        kind: EntityKind,
        file: PathBuf,
        #[arg(long, default_value = "none")]
        by: Dimension,
        /// Second grouping level
        #[arg(long)]
        then: Option<Dimension>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum EntityKind {
    Schedules,
    Traffic,
    Stays,
}

/// One-line description of an entity for group listings.
trait Summary {
    fn summary(&self) -> String;
}

impl Summary for Schedule {
    fn summary(&self) -> String {
        match &self.datetime {
            Some(datetime) => format!("{} {}", datetime, self.title),
            None => self.title.clone(),
        }
    }
}

impl Summary for Traffic {
    fn summary(&self) -> String {
        format!("{} {} → {}", self.date, self.from, self.to)
    }
}

impl Summary for Stay {
    fn summary(&self) -> String {
        format!("{}〜{} {}", self.check_in, self.check_out, self.hotel_name)
    }
}

/// Initialize the tracing subscriber for logging.
///
/// Logs go to stderr unless a log file is configured. The returned guard
/// flushes the file writer and must live until exit.
fn init_tracing(log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=livetrip_core=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let Some(path) = log_file else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(io::stderr))
            .with(filter)
            .init();
        return Ok(None);
    };

    let name = path
        .file_name()
        .ok_or_else(|| anyhow!("Invalid log file path: {}", path.display()))?;
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(filter)
        .init();
    Ok(Some(guard))
}

fn build_store(config: &Config) -> Result<OptionStore> {
    let mut client = ApiClient::new(config.api_base_url()).context("Failed to create API client")?;
    if let Some(ref share_id) = config.share_id {
        client = client.shared(share_id.clone());
    } else if let Some(ref token) = config.token {
        client.set_token(token.clone());
    }

    let cache_dir = config.cache_dir()?;
    let local = FileStore::new(cache_dir.clone())
        .with_context(|| format!("Failed to open cache at {}", cache_dir.display()))?;
    Ok(OptionStore::new(Arc::new(client), Arc::new(local)))
}

fn print_options(options: &[SelectOption]) {
    for (index, option) in options.iter().enumerate() {
        let color = option.color.as_ref().map(ColorCode::as_str).unwrap_or("-");
        println!("{:>3}  {:<8} {}", index, color, option.label);
    }
}

fn read_entities<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let contents = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("Invalid entity file {}", path.display()))
}

fn print_group<T: Summary>(group: &Group<'_, T>, indent: usize) {
    let pad = " ".repeat(indent);
    if !group.title.is_empty() {
        println!("{}{} ({})", pad, group.title, group.entities.len());
    }
    for entity in &group.entities {
        println!("{}  {}", pad, entity.summary());
    }
}

fn print_grouped<T: Groupable + Summary>(
    entities: &[T],
    by: Dimension,
    then: Option<Dimension>,
    ranks: &RankMaps,
) {
    match then {
        Some(secondary) => {
            for nested in partition2(entities, by, secondary, ranks) {
                println!("{}", nested.title);
                for group in &nested.subgroups {
                    print_group(group, 2);
                }
            }
        }
        None => {
            for group in partition(entities, by, ranks.get(by)) {
                print_group(&group, 0);
            }
        }
    }
}

async fn run(cli: Cli, config: Config) -> Result<()> {
    let store = build_store(&config)?;

    match cli.command {
        Command::Categories => {
            for category in Category::ALL {
                println!("{:<16} {}", category.name(), config.sort_mode(category));
            }
        }
        Command::List { category, mode, json } => {
            let mode = mode.unwrap_or_else(|| config.sort_mode(category));
            let options = apply(&store.read(category).await, mode);
            if json {
                println!("{}", serde_json::to_string_pretty(&options)?);
            } else {
                print_options(&options);
            }
        }
        Command::Add { category, label, color } => {
            print_options(&store.add_option(category, &label, color).await?);
        }
        Command::Update {
            category,
            index,
            label,
            color,
        } => {
            print_options(&store.update_option(category, index, &label, color).await?);
        }
        Command::Move { category, from, to } => {
            print_options(&store.move_option(category, from, to).await?);
        }
        Command::Delete { category, label } => {
            print_options(&store.delete_option(category, &label).await?);
        }
        Command::Sort { category, mode } => {
            let sorted = apply(&store.read(category).await, mode);
            store.write_with_mode(category, &sorted, mode).await?;
            // Reload so command line and environment overrides are not persisted
            let mut saved = Config::load().context("Failed to load config")?;
            saved.sort_modes.insert(category, mode);
            saved.save().context("Failed to save config")?;
            print_options(&sorted);
        }
        Command::Colors { category, labels } => {
            let labels: Vec<&str> = labels.iter().map(String::as_str).collect();
            for (label, color) in store.colors_by_label(&labels, category).await {
                println!("{}  {}", color, label);
            }
        }
        Command::Group { kind, file, by, then } => {
            let ranks = store.load_rank_maps(&config.sort_modes).await;
            match kind {
                EntityKind::Schedules => print_grouped(&read_entities::<Schedule>(&file)?, by, then, &ranks),
                EntityKind::Traffic => print_grouped(&read_entities::<Traffic>(&file)?, by, then, &ranks),
                EntityKind::Stays => print_grouped(&read_entities::<Stay>(&file)?, by, then, &ranks),
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let mut config = Config::load().context("Failed to load config")?;
    config.apply_env();
    if let Some(ref share_id) = cli.share {
        config.share_id = Some(share_id.clone());
    }

    let _guard = init_tracing(config.log_file.as_deref())?;
    info!(api = config.api_base_url(), shared = config.share_id.is_some(), "livetrip starting");

    run(cli, config).await
}
