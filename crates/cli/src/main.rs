use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Deserialize;
use smolbot_bot::{BotConfig, ConfigFile, ConsoleTransport, PhraseBook, Runner};
use smolbot_catalog::{parse_announcement, Catalog, CatalogError};
use smolbot_search::{Engine, SearchConfig};

const DEFAULT_CONFIG_FILE: &str = "smolbot.toml";
const BLACKLIST_FILE: &str = "blacklist.txt";

#[derive(Parser)]
#[command(name = "smolbot")]
#[command(about = "Robot catalog query bot", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for replies)
    #[arg(long, global = true)]
    quiet: bool,

    /// Config file (default: ./smolbot.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Catalog JSON file (overrides the config file)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Directory holding blacklist and phrase files
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Directory for reply logs and the daily cursor
    #[arg(long, global = true)]
    state_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer a single query and exit
    Ask(AskArgs),

    /// Show one randomly chosen robot
    Random(RandomArgs),

    /// Parse announcement posts from a file into the catalog
    Ingest(IngestArgs),

    /// Show catalog statistics
    Info(InfoArgs),

    /// Run the bot loop on the console transport
    Run,
}

#[derive(Args)]
struct AskArgs {
    /// Query text (joined with spaces)
    #[arg(required = true)]
    query: Vec<String>,

    /// Output the structured reply as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct RandomArgs {
    /// Output the robot as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct IngestArgs {
    /// File of announcement posts, one per line
    file: PathBuf,

    /// Treat each line as a JSON object {"id": …, "text": …}
    #[arg(long)]
    jsonl: bool,
}

#[derive(Args)]
struct InfoArgs {
    /// Output the statistics as JSON
    #[arg(long)]
    json: bool,
}

/// One line of an `ingest --jsonl` file.
#[derive(Deserialize)]
struct FeedLine {
    id: String,
    text: String,
}

struct Settings {
    search: Arc<SearchConfig>,
    bot: BotConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut cli = Cli::parse();

    // Keep stdout clean for JSON parsing
    let json_output = match &cli.command {
        Commands::Ask(args) => args.json,
        Commands::Random(args) => args.json,
        Commands::Info(args) => args.json,
        _ => false,
    };
    if json_output {
        cli.quiet = true;
    }

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let settings = load_settings(&cli)?;

    match cli.command {
        Commands::Ask(args) => {
            let engine = build_engine(&settings)?;
            run_ask(args, &engine)
        }
        Commands::Random(args) => {
            let engine = build_engine(&settings)?;
            run_random(args, &engine)
        }
        Commands::Ingest(args) => run_ingest(args, &settings.bot),
        Commands::Info(args) => {
            let catalog = load_catalog_or_empty(&settings.bot.catalog_path)?;
            run_info(args, &catalog)
        }
        Commands::Run => {
            let catalog = load_catalog_or_empty(&settings.bot.catalog_path)?;
            run_bot(settings, catalog).await
        }
    }
}

/// Merge the config file, built-in defaults, and global flag overrides.
fn load_settings(cli: &Cli) -> Result<Settings> {
    let file = match &cli.config {
        Some(path) => ConfigFile::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => {
            let default = Path::new(DEFAULT_CONFIG_FILE);
            if default.exists() {
                ConfigFile::load(default)
                    .with_context(|| format!("Failed to load config {DEFAULT_CONFIG_FILE}"))?
            } else {
                ConfigFile::default()
            }
        }
    };

    let mut bot = BotConfig::from_overrides(file.bot);
    if let Some(catalog) = &cli.catalog {
        bot.catalog_path = catalog.clone();
    }
    if let Some(data_dir) = &cli.data_dir {
        bot.data_dir = data_dir.clone();
    }
    if let Some(state_dir) = &cli.state_dir {
        bot.state_dir = state_dir.clone();
    }

    let mut search = SearchConfig::from_overrides(file.search);
    let blacklist = bot.data_dir.join(BLACKLIST_FILE);
    if blacklist.exists() {
        search = search
            .with_blacklist_file(&blacklist)
            .with_context(|| format!("Failed to load {}", blacklist.display()))?;
    }

    Ok(Settings {
        search: Arc::new(search),
        bot,
    })
}

fn build_engine(settings: &Settings) -> Result<Engine> {
    let catalog = load_catalog_or_empty(&settings.bot.catalog_path)?;
    Ok(Engine::new(
        Arc::new(catalog),
        Arc::clone(&settings.search),
    ))
}

/// A missing catalog file is an empty catalog; any other failure is fatal.
fn load_catalog_or_empty(path: &Path) -> Result<Catalog> {
    match Catalog::load(path) {
        Ok(catalog) => Ok(catalog),
        Err(CatalogError::Io { ref source, .. }) if source.kind() == io::ErrorKind::NotFound => {
            log::warn!("No catalog at {}, starting empty", path.display());
            Ok(Catalog::new())
        }
        Err(err) => {
            Err(err).with_context(|| format!("Failed to load catalog {}", path.display()))
        }
    }
}

fn run_ask(args: AskArgs, engine: &Engine) -> Result<()> {
    let query = args.query.join(" ");
    let reply = engine.search(&query);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reply)?);
    } else {
        println!("{}", reply.text);
    }
    Ok(())
}

fn run_random(args: RandomArgs, engine: &Engine) -> Result<()> {
    let mut rng = rand::thread_rng();
    let Some(robot) = engine
        .catalog()
        .random_position(&mut rng)
        .and_then(|position| engine.catalog().get(position))
    else {
        anyhow::bail!("The catalog is empty");
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(robot)?);
    } else {
        println!(
            "{}",
            robot.display_line(engine.config().link_base.as_deref())
        );
    }
    Ok(())
}

fn run_ingest(args: IngestArgs, bot: &BotConfig) -> Result<()> {
    let text = fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let mut catalog = load_catalog_or_empty(&bot.catalog_path)?;

    let mut added = 0usize;
    let mut skipped = 0usize;
    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (source_id, body) = if args.jsonl {
            let post: FeedLine = serde_json::from_str(line)
                .with_context(|| format!("Invalid JSON on line {}", index + 1))?;
            (post.id, post.text)
        } else {
            (format!("line-{}", index + 1), line.to_string())
        };
        let Some(robot) = parse_announcement(&body, &source_id) else {
            continue;
        };
        if catalog.get_by_number(robot.number).is_some() {
            skipped += 1;
            continue;
        }
        log::info!("Found new robot: #{} {}", robot.number, robot.name);
        catalog
            .push(robot)
            .context("Announcement collides with an indexed robot")?;
        added += 1;
    }

    catalog
        .save(&bot.catalog_path)
        .with_context(|| format!("Failed to save catalog {}", bot.catalog_path.display()))?;
    eprintln!(
        "Added {added} robot(s), skipped {skipped} duplicate(s), {} total",
        catalog.len()
    );
    Ok(())
}

fn run_info(args: InfoArgs, catalog: &Catalog) -> Result<()> {
    let tags: BTreeSet<&str> = catalog
        .iter()
        .flat_map(|robot| robot.tags.iter().map(String::as_str))
        .collect();
    let lowest = catalog.iter().map(|robot| robot.number).min();
    let highest = catalog.iter().map(|robot| robot.number).max();

    if args.json {
        let stats = serde_json::json!({
            "robots": catalog.len(),
            "distinct_tags": tags.len(),
            "lowest_number": lowest,
            "highest_number": highest,
        });
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("Robots: {}", catalog.len());
        println!("Distinct tags: {}", tags.len());
        match (lowest, highest) {
            (Some(lowest), Some(highest)) => println!("Numbers: #{lowest} to #{highest}"),
            _ => println!("Numbers: none"),
        }
    }
    Ok(())
}

async fn run_bot(settings: Settings, catalog: Catalog) -> Result<()> {
    let transport = ConsoleTransport::spawn();
    let phrases = PhraseBook::load(&settings.bot.data_dir);
    let runner = Runner::new(
        transport,
        Arc::new(catalog),
        settings.search,
        settings.bot,
        phrases,
    )
    .context("Failed to start the bot")?;
    runner.run().await.context("Bot loop failed")
}
