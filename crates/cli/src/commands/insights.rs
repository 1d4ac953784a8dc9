//! Historical waste insights command

use anyhow::Result;
use colored::Colorize;
use ecoflow_lib::{predictor::format_kg, reference, WasteInsights, ZoneRecord};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{print_json, print_table, OutputFormat};

/// Row for the zone reference table
#[derive(Tabled, Serialize)]
struct ZoneRow {
    #[tabled(rename = "Zone")]
    zone: String,
    #[tabled(rename = "Avg Distance")]
    average_distance: String,
    #[tabled(rename = "Waste Generated")]
    waste_generated: String,
}

impl From<&ZoneRecord> for ZoneRow {
    fn from(record: &ZoneRecord) -> Self {
        Self {
            zone: record.zone.to_string(),
            average_distance: format!("{} km", record.average_distance_km),
            waste_generated: format_kg(record.waste_generated_kg),
        }
    }
}

#[derive(Serialize)]
struct InsightsOutput<'a> {
    insights: WasteInsights,
    zones: &'a [ZoneRecord],
}

/// Show mean, maximum and minimum historical waste per zone
pub fn show_insights(format: OutputFormat) -> Result<()> {
    let insights = reference::insights();

    match format {
        OutputFormat::Json => print_json(&InsightsOutput {
            insights,
            zones: reference::zones(),
        })?,
        OutputFormat::Table => {
            println!("{}", "Waste Generation Insights".bold());
            println!("{}", "=".repeat(40));
            println!("Average Waste:  {}", format_kg(insights.mean_kg).cyan());
            println!("Maximum Waste:  {}", format_kg(insights.max_kg).cyan());
            println!("Minimum Waste:  {}", format_kg(insights.min_kg).cyan());
            println!();

            let rows: Vec<ZoneRow> = reference::zones().iter().map(ZoneRow::from).collect();
            print_table(&rows, format)?;
        }
    }

    Ok(())
}
