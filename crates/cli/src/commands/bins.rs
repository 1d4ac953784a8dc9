//! Bin listing and bin status commands

use anyhow::Result;
use ecoflow_lib::{reference, Bin, BinStatus};
use serde::Serialize;
use tabled::Tabled;

use super::Backend;
use crate::client::BinData;
use crate::output::{color_fill, print_json, print_table, OutputFormat};

/// Row for the bin overview table
#[derive(Tabled, Serialize)]
struct BinRow {
    #[tabled(rename = "Bin")]
    bin: String,
    #[tabled(rename = "Filled")]
    filled: String,
    #[tabled(rename = "Empty")]
    empty: String,
    #[tabled(rename = "Capacity")]
    capacity: String,
    #[tabled(rename = "Fill")]
    #[serde(skip)]
    fill: String,
}

impl From<&Bin> for BinRow {
    fn from(bin: &Bin) -> Self {
        let status = bin.status();
        Self {
            fill: color_fill(status.filled_kg, status.capacity_kg),
            filled: status.filled_label(),
            empty: status.empty_label(),
            capacity: status.capacity_label(),
            bin: status.bin,
        }
    }
}

impl From<BinStatus> for BinData {
    fn from(status: BinStatus) -> Self {
        Self {
            filled: status.filled_label(),
            empty: status.empty_label(),
            capacity: status.capacity_label(),
            bin: status.bin,
        }
    }
}

/// List every bin with its fill level
pub fn list_bins(format: OutputFormat) -> Result<()> {
    let rows: Vec<BinRow> = reference::bins().iter().map(BinRow::from).collect();
    print_table(&rows, format)
}

/// Show the fill report for one bin
pub async fn show_bin(backend: &Backend, id: &str, format: OutputFormat) -> Result<()> {
    let data = match backend {
        Backend::Local { .. } => BinData::from(reference::bin_status(id)?),
        Backend::Remote(client) => client.bin_data(id).await?,
    };

    match format {
        OutputFormat::Json => print_json(&data),
        OutputFormat::Table => print_table(&[data], format),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bin_data_from_status() {
        let data = BinData::from(reference::bin_status("Bin 4").unwrap());
        assert_eq!(
            data,
            BinData {
                bin: "Bin 4".to_string(),
                filled: "90 kg".to_string(),
                empty: "10 kg".to_string(),
                capacity: "100 kg".to_string(),
            }
        );
    }

    #[test]
    fn test_bin_rows_follow_table_order() {
        let rows: Vec<BinRow> = reference::bins().iter().map(BinRow::from).collect();
        let ids: Vec<&str> = rows.iter().map(|row| row.bin.as_str()).collect();
        assert_eq!(ids, ["Bin 1", "Bin 2", "Bin 3", "Bin 4", "Bin 5", "Bin 6"]);
        assert_eq!(rows[4].empty, "90 kg");
    }
}
