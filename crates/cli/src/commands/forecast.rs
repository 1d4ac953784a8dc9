//! Waste generation forecast command

use anyhow::Result;
use ecoflow_lib::predictor::PredictionRequest;
use serde::Serialize;

use super::{load_local_service, Backend};
use crate::client::PredictWasteRequest;
use crate::output::{print_json, print_success, OutputFormat};

#[derive(Serialize)]
struct ForecastOutput<'a> {
    location: &'a str,
    day_of_week: &'a str,
    temperature: f64,
    humidity: f64,
    predicted_waste: String,
}

/// Forecast waste for one location and day
pub async fn predict(
    backend: &Backend,
    location: &str,
    temperature: f64,
    humidity: f64,
    day_of_week: &str,
    format: OutputFormat,
) -> Result<()> {
    let predicted_waste = match backend {
        Backend::Local { model_path } => {
            let service = load_local_service(model_path)?;
            let request = PredictionRequest::new(location, temperature, humidity, day_of_week);
            service.predict(&request)?.to_string()
        }
        Backend::Remote(client) => {
            let request = PredictWasteRequest {
                location: location.to_string(),
                temperature,
                humidity,
                day_of_week: day_of_week.to_string(),
            };
            client.predict_waste(&request).await?
        }
    };

    match format {
        OutputFormat::Json => print_json(&ForecastOutput {
            location,
            day_of_week,
            temperature,
            humidity,
            predicted_waste,
        })?,
        OutputFormat::Table => {
            print_success(&format!("Predicted Waste Generation: {}", predicted_waste));
        }
    }

    Ok(())
}
