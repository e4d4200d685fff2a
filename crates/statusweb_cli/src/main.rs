//! `statusweb` administration CLI.
//!
//! # Responsibility
//! - Manage the news feed of the status site from the command line.
//! - Own the store lifecycle: open once at start, close once before exit.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use log::info;
use statusweb_core::{
    date_range, format_timestamp, init_logging, news_archive_page, news_feed_page, parse_date,
    AppConfig, NewsDraft, NewsId, NewsPageView, NewsRepository, NewsStore, StoreError,
};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "statusweb",
    version,
    about = "Manage the news feed of the game server status site"
)]
struct Cli {
    /// SQLite database file holding the site data (overrides DATABASE_PATH)
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    /// Absolute directory for rolling log files (overrides LOG_DIR; logging is off when unset)
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Log level: trace|debug|info|warn|error (overrides LOG_LEVEL)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// News feed operations
    #[command(subcommand)]
    News(NewsCommand),
}

#[derive(Subcommand, Debug)]
enum NewsCommand {
    /// List one page of news, newest first
    List(ListArgs),
    /// Show one news entry
    Show {
        /// News ID
        id: NewsId,
    },
    /// Publish a news entry
    Create(DraftArgs),
    /// Replace title and content of a news entry
    Update {
        /// News ID
        id: NewsId,
        #[command(flatten)]
        draft: DraftArgs,
    },
    /// Delete a news entry
    Delete {
        /// News ID
        id: NewsId,
    },
    /// Count news entries
    Count(RangeArgs),
}

#[derive(Args, Debug)]
struct ListArgs {
    /// Page number, starting at 1
    #[arg(long, default_value_t = 1)]
    page: u32,

    /// Entries per page (defaults to NEWS_PAGE_SIZE or 10)
    #[arg(long)]
    page_size: Option<u32>,

    #[command(flatten)]
    range: RangeArgs,
}

#[derive(Args, Debug)]
struct RangeArgs {
    /// First day of the archive range (YYYY-MM-DD)
    #[arg(long, requires = "to")]
    from: Option<String>,

    /// Last day of the archive range (YYYY-MM-DD), included entirely
    #[arg(long, requires = "from")]
    to: Option<String>,
}

#[derive(Args, Debug)]
struct DraftArgs {
    /// Headline shown in the feed
    #[arg(long)]
    title: String,

    /// Body text
    #[arg(long)]
    content: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    if let Some(log_dir) = &config.log_dir {
        init_logging(&config.log_level, log_dir).context("failed to initialize logging")?;
    }

    let store = NewsStore::open(&config.database_path).with_context(|| {
        format!(
            "failed to open database `{}`",
            config.database_path.display()
        )
    })?;
    info!(
        "event=cli_start module=cli status=ok database={}",
        config.database_path.display()
    );

    let result = match cli.command {
        Commands::News(command) => run_news(&store, &config, command),
    };

    store.close();
    result
}

fn resolve_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = AppConfig::from_env().context("invalid environment configuration")?;
    if let Some(database) = &cli.database {
        config.database_path = database.clone();
    }
    if let Some(log_dir) = &cli.log_dir {
        config.log_dir = Some(log_dir.clone());
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    Ok(config)
}

fn run_news(store: &NewsStore, config: &AppConfig, command: NewsCommand) -> Result<()> {
    match command {
        NewsCommand::List(args) => {
            let page_size = args.page_size.unwrap_or(config.page_size);
            let view = match args.range.dates()? {
                Some((from, to)) => news_archive_page(store, from, to, args.page, page_size)?,
                None => news_feed_page(store, args.page, page_size)?,
            };
            print_page(&view);
        }
        NewsCommand::Show { id } => match store.get_by_id(id)? {
            Some(item) => {
                println!("#{} {}", item.id, item.title);
                println!("published {}", format_timestamp(item.created_at));
                println!();
                println!("{}", item.content);
            }
            None => bail!("news {id} not found"),
        },
        NewsCommand::Create(draft) => {
            let id = store.create(&draft.into_checked()?)?;
            println!("created news {id}");
        }
        NewsCommand::Update { id, draft } => {
            let draft = draft.into_checked()?;
            store.update(id, &draft).map_err(not_found_message)?;
            println!("updated news {id}");
        }
        NewsCommand::Delete { id } => {
            store.delete(id).map_err(not_found_message)?;
            println!("deleted news {id}");
        }
        NewsCommand::Count(range) => {
            let count = match range.dates()? {
                Some((from, to)) => store.count_in_range(date_range(from, to))?,
                None => store.count_all()?,
            };
            println!("{count}");
        }
    }

    Ok(())
}

impl RangeArgs {
    fn dates(&self) -> Result<Option<(NaiveDate, NaiveDate)>> {
        match (&self.from, &self.to) {
            (Some(from), Some(to)) => Ok(Some((parse_date(from)?, parse_date(to)?))),
            _ => Ok(None),
        }
    }
}

impl DraftArgs {
    /// Applies the publishing checks before anything reaches the store.
    fn into_checked(self) -> Result<NewsDraft> {
        let draft = NewsDraft::new(self.title, self.content);
        draft.validate()?;
        Ok(draft)
    }
}

fn not_found_message(err: StoreError) -> anyhow::Error {
    match err {
        StoreError::NotFound(id) => anyhow::anyhow!("news {id} not found"),
        other => other.into(),
    }
}

fn print_page(view: &NewsPageView) {
    if let Some(range) = &view.range {
        println!("archive {} .. {}", range.from, range.to);
    }
    for item in &view.items {
        println!("#{}\t{}\t{}", item.id, item.created_at_display, item.title);
    }
    println!(
        "page {}/{} ({} total)",
        view.page,
        view.total_pages.max(1),
        view.total_items
    );
}
