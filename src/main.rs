use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;

use vacancy::config::EngineConfig;
use vacancy::engine::AvailabilityEngine;
use vacancy::model::{AvailabilityOptions, BatchEntry, BatchRequest, DateRange, Timestamp, UnitId};
use vacancy::snapshot::Snapshot;

#[derive(Parser)]
#[command(name = "vacancy")]
#[command(about = "Unit availability and booking-conflict queries", long_about = None)]
struct Cli {
    /// Snapshot file with units and bookings (defaults to $VACANCY_DATA)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Availability of a single unit
    Check {
        #[arg(long)]
        unit: UnitId,
        #[arg(long)]
        from: Timestamp,
        #[arg(long)]
        to: Timestamp,
        /// Skip conflict extraction
        #[arg(long)]
        no_conflicts: bool,
        /// Skip next-available computation
        #[arg(long)]
        no_next: bool,
        /// Give up on next-available past this date
        #[arg(long)]
        max_search_date: Option<Timestamp>,
    },
    /// Availability of several units at once
    Batch {
        #[arg(long, value_delimiter = ',', required = true)]
        units: Vec<UnitId>,
        #[arg(long)]
        from: Timestamp,
        #[arg(long)]
        to: Timestamp,
    },
    /// Free units of the given types ("all" matches every type)
    Search {
        #[arg(long = "type", value_delimiter = ',', default_value = "all")]
        types: Vec<String>,
        #[arg(long)]
        from: Timestamp,
        #[arg(long)]
        to: Timestamp,
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = EngineConfig::from_env();
    vacancy::observability::init(config.metrics_port)?;

    let data = cli
        .data
        .or_else(|| std::env::var("VACANCY_DATA").ok().map(PathBuf::from))
        .ok_or("no snapshot given: pass --data or set VACANCY_DATA")?;
    let (store, catalogue) = Snapshot::load(&data)?.into_adapters()?;
    info!("loaded {} units from {}", catalogue.len(), data.display());
    info!("  search_horizon_days: {}", config.search_horizon_days);
    info!("  batch_deadline: {:?}", config.batch_deadline);
    info!("  max_concurrency: {}", config.max_concurrency);

    let engine = AvailabilityEngine::new(Arc::new(store), Arc::new(catalogue), config);

    let output = match cli.command {
        Command::Check {
            unit,
            from,
            to,
            no_conflicts,
            no_next,
            max_search_date,
        } => {
            let options = AvailabilityOptions {
                include_conflicts: !no_conflicts,
                calculate_next_available: !no_next,
                max_search_date,
            };
            let result = engine
                .calculate_availability(unit, DateRange::new(from, to)?, options)
                .await?;
            serde_json::to_string_pretty(&result)?
        }
        Command::Batch { units, from, to } => {
            let result = engine
                .calculate_batch_availability(BatchRequest {
                    unit_ids: units,
                    requested_range: DateRange::new(from, to)?,
                    options: AvailabilityOptions::default(),
                })
                .await?;
            let entries: BTreeMap<UnitId, BatchEntry> = result
                .iter()
                .map(|(id, slot)| (*id, BatchEntry::from(slot)))
                .collect();
            serde_json::to_string_pretty(&entries)?
        }
        Command::Search {
            types,
            from,
            to,
            limit,
        } => {
            let found = engine
                .find_available_units(&types, DateRange::new(from, to)?, limit)
                .await?;
            serde_json::to_string_pretty(&found)?
        }
    };

    println!("{output}");
    Ok(())
}
