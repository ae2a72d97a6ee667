use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use crate::config::HistoryConfig;
use crate::index::LiveIndex;
use crate::logging::init_logging;
use crate::models::record::local_time;
use crate::models::{HistoryRecord, MessageHeader, MsgRecord, SubPayload, category};
use crate::store::HistoryStore;

const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Parser)]
#[command(name = "record-history")]
#[command(version = "0.1.0")]
#[command(about = "Store and query fixed-layout telemetry records", long_about = None)]
pub struct Cli {
    /// History root directory (overrides RECORD_HISTORY_DIR and the config file)
    #[arg(long, global = true, value_name = "DIR")]
    pub history_dir: Option<PathBuf>,

    /// Path to a TOML config file
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Args)]
pub struct CategoryArg {
    /// Record category (directory and file extension)
    #[arg(default_value = category::ECS_MSG_MODEL)]
    pub category: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Store one record
    Record {
        #[command(flatten)]
        category: CategoryArg,
        /// Receive time in epoch seconds (defaults to now)
        #[arg(long)]
        time: Option<u32>,
        /// Flag byte (decimal or 0x-prefixed hex)
        #[arg(long, value_parser = parse_byte, default_value = "0x01")]
        flag: u8,
        #[arg(long, value_parser = parse_byte, default_value = "0x0A")]
        sts: u8,
        #[arg(long, value_parser = parse_byte, default_value = "0x0A")]
        sas: u8,
        #[arg(long, value_parser = parse_byte, default_value = "0x0A")]
        scs: u8,
    },
    /// List records in a time range (defaults to today)
    List {
        #[command(flatten)]
        category: CategoryArg,
        /// Start, `YYYY-MM-DD` or `YYYY-MM-DD HH:MM:SS` in local time
        #[arg(long)]
        from: Option<String>,
        /// End (inclusive), `YYYY-MM-DD` or `YYYY-MM-DD HH:MM:SS` in local time
        #[arg(long)]
        to: Option<String>,
        /// Ignore --from/--to and list everything
        #[arg(long)]
        all: bool,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Show dates that have stored records, newest first
    Dates {
        #[command(flatten)]
        category: CategoryArg,
    },
    /// Delete records older than the retention window
    Purge {
        #[command(flatten)]
        category: CategoryArg,
        /// Age in days (defaults to the configured retention)
        #[arg(long)]
        days: Option<u32>,
    },
    /// Show statistics about stored records
    Stats {
        #[command(flatten)]
        category: CategoryArg,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = HistoryConfig::load(cli.config.as_deref())?;
    init_logging(&config.log_filter);
    let root = config.resolve_history_root(cli.history_dir.as_deref())?;
    let store = HistoryStore::new(root);

    match &cli.command {
        Some(Commands::Record { category, time, flag, sts, sas, scs }) => {
            let receive_time = match time {
                Some(t) => *t,
                None => u32::try_from(Utc::now().timestamp())
                    .context("Current time does not fit in 32-bit epoch seconds")?,
            };
            let path = match RecordKind::from_category(&category.category)? {
                RecordKind::Message => {
                    let record = MsgRecord::new(receive_time, *flag, SubPayload::new(*sts, *sas, *scs));
                    store_record(&store, &record)?
                }
                RecordKind::Header => store_record(&store, &MessageHeader::new(receive_time))?,
            };
            println!("{}", path.display());
        }
        Some(Commands::List { category, from, to, all, json }) => {
            let range = if *all { None } else { Some(resolve_range(from.as_deref(), to.as_deref())?) };
            match RecordKind::from_category(&category.category)? {
                RecordKind::Message => list_records::<MsgRecord>(&store, range, *json)?,
                RecordKind::Header => list_records::<MessageHeader>(&store, range, *json)?,
            }
        }
        Some(Commands::Dates { category }) => {
            for date in store.available_dates(&category.category) {
                println!("{}", date.format("%Y-%m-%d"));
            }
        }
        Some(Commands::Purge { category, days }) => {
            let days = days.unwrap_or(config.retention_days);
            if days == 0 {
                bail!("Retention of 0 days would delete everything; pass --days explicitly");
            }
            let removed = store.purge_older_than(&category.category, days);
            println!("Removed {} file(s) older than {} day(s)", removed, days);
        }
        Some(Commands::Stats { category }) => match RecordKind::from_category(&category.category)? {
            RecordKind::Message => show_stats::<MsgRecord>(&store),
            RecordKind::Header => show_stats::<MessageHeader>(&store),
        },
        None => {
            println!("Use --help for usage information");
        }
    }

    Ok(())
}

/// Record type stored under a category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RecordKind {
    Message,
    Header,
}

impl RecordKind {
    fn from_category(category: &str) -> Result<Self> {
        match category.trim() {
            c if c == MsgRecord::CATEGORY => Ok(Self::Message),
            c if c == MessageHeader::CATEGORY => Ok(Self::Header),
            other => bail!(
                "Unknown category {:?} (expected {} or {})",
                other,
                MsgRecord::CATEGORY,
                MessageHeader::CATEGORY
            ),
        }
    }
}

/// A record type the CLI can print
trait Listable: HistoryRecord + Serialize {
    fn line(&self) -> String;
}

impl Listable for MsgRecord {
    fn line(&self) -> String {
        format_record(self)
    }
}

impl Listable for MessageHeader {
    fn line(&self) -> String {
        let secs = self.receive_time;
        local_time(secs)
            .map(|t| t.format(DISPLAY_FORMAT).to_string())
            .unwrap_or_else(|| secs.to_string())
    }
}

fn store_record<R: HistoryRecord>(store: &HistoryStore, record: &R) -> Result<PathBuf> {
    store
        .try_persist(R::CATEGORY, record)
        .with_context(|| format!("Failed to store record at {}", record.receive_time()))
}

/// `--from`/`--to` as local bounds, each defaulting to today's edge
fn resolve_range(from: Option<&str>, to: Option<&str>) -> Result<(DateTime<Local>, DateTime<Local>)> {
    let today = Local::now().date_naive();
    let start = match from {
        Some(s) => parse_local(s, NaiveTime::MIN)?,
        None => local_at(today, NaiveTime::MIN)?,
    };
    let end_of_day = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN);
    let end = match to {
        Some(s) => parse_local(s, end_of_day)?,
        None => local_at(today, end_of_day)?,
    };
    Ok((start, end))
}

fn list_records<R: Listable>(
    store: &HistoryStore,
    range: Option<(DateTime<Local>, DateTime<Local>)>,
    json: bool,
) -> Result<()> {
    let index = LiveIndex::<R>::new();
    let records = match range {
        None => {
            index.merge(store.try_load_all(R::CATEGORY)?);
            index.snapshot()
        }
        Some((start, end)) => {
            index.merge(store.load_range::<R, _>(R::CATEGORY, &start, &end));
            index.range_query(&start, &end)
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    for record in &records {
        println!("{}", record.line());
    }
    Ok(())
}

fn show_stats<R: Listable>(store: &HistoryStore) {
    let category = R::CATEGORY;
    let index = LiveIndex::<R>::new();
    index.merge(store.load_all(category));
    let records = index.snapshot();

    println!("Record History Statistics");
    println!("=========================");
    println!("Category: {}", category);
    println!("History directory: {}", store.paths().category_path(category).display());
    println!("Total records: {}", records.len());
    println!("Days with records: {}", store.available_dates(category).len());

    if let Some(oldest) = records.first().and_then(|r| local_time(r.receive_time())) {
        println!("Oldest record: {}", oldest.format(DISPLAY_FORMAT));
    }
    if let Some(newest) = index.latest().and_then(|r| local_time(r.receive_time())) {
        println!("Newest record: {}", newest.format(DISPLAY_FORMAT));
    }
}

/// One line per record: local time, flag and sub flags
pub fn format_record(record: &MsgRecord) -> String {
    let time = record
        .received_at()
        .map(|t| t.format(DISPLAY_FORMAT).to_string())
        .unwrap_or_else(|| record.header.receive_time.to_string());
    let flag = match record.flag_kind() {
        Some(kind) => format!("{:?}", kind),
        None => "Unknown".to_string(),
    };
    let SubPayload { sts, sas, scs } = record.sub_payload;
    format!(
        "{}  flag=0x{:02X} ({})  sts=0x{:02X} sas=0x{:02X} scs=0x{:02X}",
        time, record.flag, flag, sts, sas, scs
    )
}

/// Parse `YYYY-MM-DD HH:MM:SS` or `YYYY-MM-DD` (at `default_time`) as local time
fn parse_local(input: &str, default_time: NaiveTime) -> Result<DateTime<Local>> {
    let input = input.trim();
    if let Ok(naive) = NaiveDateTime::parse_from_str(input, DISPLAY_FORMAT) {
        return Local
            .from_local_datetime(&naive)
            .earliest()
            .with_context(|| format!("{} does not exist in the local time zone", input));
    }
    let date = NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .with_context(|| format!("Invalid date/time: {} (expected YYYY-MM-DD[ HH:MM:SS])", input))?;
    local_at(date, default_time)
}

fn local_at(date: NaiveDate, time: NaiveTime) -> Result<DateTime<Local>> {
    Local
        .from_local_datetime(&date.and_time(time))
        .earliest()
        .with_context(|| format!("{} {} does not exist in the local time zone", date, time))
}

fn parse_byte(input: &str) -> Result<u8, String> {
    let parsed = match input.strip_prefix("0x").or_else(|| input.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => input.parse::<u8>(),
    };
    parsed.map_err(|e| format!("invalid byte {:?}: {}", input, e))
}
