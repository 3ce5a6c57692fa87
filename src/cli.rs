//! CLI commands for keiba-jbis.
//!
//! Each subcommand maps to one `Access` method and prints JSON to stdout:
//! one document per record for list pages, a single document otherwise.

use std::io::{self, Write};

use clap::{Parser, Subcommand};
use serde::Serialize;

use keiba_jbis::config::AppConfig;
use keiba_jbis::scraper::Access;
use keiba_jbis::types::{HorseResult, RaceInfo};

#[derive(Parser)]
#[command(name = "keiba-jbis")]
#[command(version, about = "Scrape race calendars, results and horse records from JBIS", long_about = None)]
pub struct Cli {
    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the race days of one month
    Calendar {
        #[arg(short, long)]
        year: i32,

        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: u32,
    },

    /// List the races of one race day
    Races {
        /// Race-day URL as printed by `calendar`
        #[arg(value_name = "URL")]
        url: String,
    },

    /// Show the result of one race
    #[command(name = "result")]
    RaceResult {
        #[arg(value_name = "URL")]
        url: String,
    },

    /// Show the full race history of a horse
    History {
        /// Horse page URL, e.g. https://www.jbis.or.jp/horse/0001339005/
        #[arg(value_name = "HORSE_URL")]
        url: String,
    },

    /// List upcoming entries of a sire's offspring
    Entries {
        #[arg(value_name = "SIRE_ID")]
        sire_id: String,
    },

    /// Show a horse's profile
    Horse {
        #[arg(value_name = "HORSE_ID")]
        horse_id: String,
    },
}

#[derive(Serialize)]
struct RaceResultOutput<'a> {
    race: &'a RaceInfo,
    results: &'a [HorseResult],
}

#[derive(Serialize)]
struct HistoryOutput<'a> {
    race: &'a RaceInfo,
    result: &'a HorseResult,
}

/// JSON writer for stdout
struct Output {
    pretty: bool,
}

impl Output {
    fn emit<T: Serialize>(&self, value: &T) -> anyhow::Result<()> {
        let mut stdout = io::stdout().lock();
        if self.pretty {
            serde_json::to_writer_pretty(&mut stdout, value)?;
        } else {
            serde_json::to_writer(&mut stdout, value)?;
        }
        writeln!(stdout)?;
        Ok(())
    }

    /// Print records as they are decoded; stops at the first bad row.
    fn emit_all<T, I>(&self, records: I) -> anyhow::Result<usize>
    where
        T: Serialize,
        I: IntoIterator<Item = keiba_jbis::Result<T>>,
    {
        let mut count = 0;
        for record in records {
            self.emit(&record?)?;
            count += 1;
        }
        Ok(count)
    }
}

/// Run one subcommand against the configured site.
pub async fn run(cli: Cli, config: AppConfig) -> anyhow::Result<()> {
    let access = Access::from_config(&config.fetch)?;
    let output = Output {
        pretty: cli.pretty || config.output.pretty,
    };

    match cli.command {
        Commands::Calendar { year, month } => {
            let count = output.emit_all(access.race_calendar(year, month).await?)?;
            tracing::info!("{} race days", count);
        }
        Commands::Races { url } => {
            let count = output.emit_all(access.races_by_url(&url).await?)?;
            tracing::info!("{} races", count);
        }
        Commands::RaceResult { url } => {
            let (race, results) = access.race_result_by_url(&url).await?;
            output.emit(&RaceResultOutput {
                race: &race,
                results: &results,
            })?;
        }
        Commands::History { url } => {
            let races = access.horse_history_by_url(&url).await?;
            for (race, result) in &races {
                output.emit(&HistoryOutput { race, result })?;
            }
            tracing::info!("{} races", races.len());
        }
        Commands::Entries { sire_id } => {
            let count = output.emit_all(access.sire_entries(&sire_id).await?)?;
            tracing::info!("{} entries", count);
        }
        Commands::Horse { horse_id } => {
            output.emit(&access.horse_info(&horse_id).await?)?;
        }
    }

    Ok(())
}
