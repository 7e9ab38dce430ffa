//! marketdb CLI - load and inspect the local news and price databases

use clap::{Parser, Subcommand, ValueEnum};
use marketdb::config;
use marketdb::ui::{self, Icons};
use marketdb::{Article, ArticleStore, PriceBatch, PriceColumn, PriceStore};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "marketdb")]
#[command(version)]
#[command(about = "Local SQLite store for news articles and daily stock prices")]
#[command(long_about = r#"
marketdb keeps two SQLite files under <root>/databases/:
  • reuters.db  - news articles keyed by URL
  • daily.db    - one table of daily bars per ticker, keyed by date

Example usage:
  marketdb news import --file articles.json
  marketdb prices import --ticker AAPL --file aapl.json
  marketdb prices daily --ticker AAPL --columns Open,Volume
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Directory that holds databases/ (overrides the config file)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Path to the config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// News article store
    News {
        #[command(subcommand)]
        command: NewsCommands,
    },

    /// Daily price store
    Prices {
        #[command(subcommand)]
        command: PriceCommands,
    },

    /// Show what is stored
    Stats,
}

#[derive(Subcommand)]
enum NewsCommands {
    /// Insert articles from a JSON array of {url, title, date, summary}
    Import {
        #[arg(short, long)]
        file: PathBuf,
    },

    /// List every stored article
    List {
        #[arg(short, long, value_enum, default_value = "text")]
        format: Format,
    },
}

#[derive(Subcommand)]
enum PriceCommands {
    /// Insert bars from a JSON array of {Date, Open, High, Low, Close, Volume}
    Import {
        #[arg(short, long)]
        ticker: String,

        #[arg(short, long)]
        file: PathBuf,
    },

    /// Show the requested columns for a ticker
    Daily {
        #[arg(short, long)]
        ticker: String,

        /// Comma-separated value columns
        #[arg(short, long, value_delimiter = ',', default_value = "Close")]
        columns: Vec<String>,

        #[arg(short, long, value_enum, default_value = "text")]
        format: Format,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let file_config = config::load_config(cli.config.as_deref())?;
    let root = config::resolve_root(cli.root, file_config.as_ref());

    match cli.command {
        Commands::News { command } => run_news(&root, command),
        Commands::Prices { command } => run_prices(&root, command),
        Commands::Stats => run_stats(&root),
    }
}

fn run_news(root: &std::path::Path, command: NewsCommands) -> anyhow::Result<()> {
    let mut store = ArticleStore::open(root)?;

    match command {
        NewsCommands::Import { file } => {
            let articles: Vec<Article> = serde_json::from_str(&std::fs::read_to_string(&file)?)?;
            let written = store.insert(&articles)?;
            ui::success(&format!(
                "Stored {} new of {} articles ({} already present)",
                written,
                articles.len(),
                articles.len() - written
            ));
        }

        NewsCommands::List { format } => {
            let articles = store.list()?;
            if format == Format::Json {
                println!("{}", serde_json::to_string_pretty(&articles)?);
            } else if articles.is_empty() {
                println!("{} No articles stored.", Icons::EMPTY);
            } else {
                ui::header(Icons::NEWS, &format!("{} articles", articles.len()));
                println!("{}", ui::articles_table(&articles));
            }
        }
    }

    Ok(())
}

fn run_prices(root: &std::path::Path, command: PriceCommands) -> anyhow::Result<()> {
    let mut store = PriceStore::open(root)?;

    match command {
        PriceCommands::Import { ticker, file } => {
            let batch: PriceBatch = serde_json::from_str(&std::fs::read_to_string(&file)?)?;
            let written = store.insert(&ticker, &batch)?;
            ui::success(&format!(
                "Stored {} new of {} rows for {}",
                written,
                batch.len(),
                ticker
            ));
        }

        PriceCommands::Daily { ticker, columns, format } => {
            let columns = PriceColumn::parse_list(columns.as_slice())?;
            let frame = store.daily(&ticker, &columns)?;

            if format == Format::Json {
                println!("{}", serde_json::to_string_pretty(&frame.to_json())?);
            } else if frame.is_empty() {
                println!("{} No rows for {}.", Icons::EMPTY, ticker);
            } else {
                ui::header(Icons::CHART, &format!("{} ({} rows)", ticker, frame.len()));
                println!("{}", ui::frame_table(&frame));
            }
        }
    }

    Ok(())
}

fn run_stats(root: &std::path::Path) -> anyhow::Result<()> {
    let articles = ArticleStore::open(root)?;
    let prices = PriceStore::open(root)?;

    ui::header(Icons::STATS, &format!("marketdb at {}", root.display()));

    ui::group(Icons::NEWS, "News (reuters.db)");
    ui::stat_line("articles", &articles.count()?.to_string());

    ui::group(Icons::CHART, "Prices (daily.db)");
    let tickers = prices.tickers()?;
    if tickers.is_empty() {
        ui::stat_placeholder("tickers", "none");
    }
    for ticker in tickers {
        match prices.count(&ticker) {
            Ok(rows) => ui::stat_line(&ticker, &format!("{rows} rows")),
            Err(e) => ui::warn(&format!("Skipping table {ticker}: {e}")),
        }
    }

    Ok(())
}
