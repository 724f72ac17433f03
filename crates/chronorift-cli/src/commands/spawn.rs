use std::path::Path;

use chrono::{DateTime, Utc};
use clap::Subcommand;
use chronorift_core::{Forecaster, SpawnPrediction};

use super::load_config;

#[derive(Subcommand)]
pub enum SpawnAction {
    /// Next spawn time, countdown and location as JSON
    Next {
        /// Evaluate at this instant instead of now (RFC 3339)
        #[arg(long)]
        at: Option<DateTime<Utc>>,
    },
    /// Location active a number of hours from now, as JSON
    At {
        /// Hours ahead of the current hour (negative looks back)
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        offset: i64,
        #[arg(long)]
        at: Option<DateTime<Utc>>,
    },
    /// Next spawn boundary instant
    Boundary {
        #[arg(long)]
        at: Option<DateTime<Utc>>,
    },
    /// Upcoming hourly schedule
    List {
        /// Predictions per page (defaults to schedule.page_size)
        #[arg(long)]
        count: Option<usize>,
        /// Number of pages to load
        #[arg(long, default_value = "1")]
        pages: usize,
        #[arg(long)]
        at: Option<DateTime<Utc>>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: SpawnAction, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(path)?;
    let forecaster = Forecaster::from_config(&config)?;

    match action {
        SpawnAction::Next { at } => {
            let forecast = forecaster.next_spawn(at.unwrap_or_else(Utc::now))?;
            println!("{}", serde_json::to_string_pretty(&forecast)?);
        }
        SpawnAction::At { offset, at } => {
            let prediction = forecaster.slot_at_offset(at.unwrap_or_else(Utc::now), offset)?;
            println!("{}", serde_json::to_string_pretty(&prediction)?);
        }
        SpawnAction::Boundary { at } => {
            let boundary = forecaster.next_boundary(at.unwrap_or_else(Utc::now));
            println!("{}", boundary.to_rfc3339());
        }
        SpawnAction::List {
            count,
            pages,
            at,
            json,
        } => {
            let now = at.unwrap_or_else(Utc::now);
            let count = count.unwrap_or_else(|| forecaster.page_size());
            let mut predictions: Vec<SpawnPrediction> = Vec::new();
            for _ in 0..pages {
                predictions.extend(forecaster.next_n(now, count)?);
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&predictions)?);
            } else {
                for p in &predictions {
                    println!("{}", format_line(&forecaster, p, now));
                }
            }
        }
    }
    Ok(())
}

fn format_line(forecaster: &Forecaster, p: &SpawnPrediction, now: DateTime<Utc>) -> String {
    let tz = forecaster.engine().calendar().timezone();
    let marker = if p.is_current_hour(now) { "*" } else { " " };
    let time = p
        .instant
        .with_timezone(&tz)
        .format("%B %-d, %-I:%M %p")
        .to_string();
    if p.suppressed {
        format!("{marker} {time:<22} No Spawns Scheduled")
    } else {
        format!(
            "{marker} {time:<22} Chest: {:<20} Ore: {}",
            p.slot.primary, p.slot.secondary
        )
    }
}
