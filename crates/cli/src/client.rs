//! API client for a running EcoFlow server

use anyhow::{Context, Result};
use reqwest::{Client, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tabled::Tabled;
use url::Url;

/// Failure reported by the server itself
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    /// The server answered with an `{"error": ...}` body
    #[error("{message}")]
    Rejected { status: u16, message: String },
    /// The server answered with something that is not an error body
    #[error("API error ({status}): {body}")]
    Unexpected { status: u16, body: String },
}

/// API client for the EcoFlow server
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        let base_url = Url::parse(base_url).context("Invalid API URL")?;

        Ok(Self { client, base_url })
    }

    /// Make a POST request with JSON body
    pub async fn post_json<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let url = self.base_url.join(path).context("Invalid path")?;

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .context("Failed to send request")?;

        Self::parse(response).await
    }

    /// Make a POST request with a url-encoded form body
    pub async fn post_form<T: DeserializeOwned>(&self, path: &str, form: &[(&str, &str)]) -> Result<T> {
        let url = self.base_url.join(path).context("Invalid path")?;

        let response = self
            .client
            .post(url)
            .form(form)
            .send()
            .await
            .context("Failed to send request")?;

        Self::parse(response).await
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> Result<T> {
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            let err = match serde_json::from_str::<ErrorResponse>(&body) {
                Ok(parsed) => ClientError::Rejected {
                    status,
                    message: parsed.error,
                },
                Err(_) => ClientError::Unexpected { status, body },
            };
            return Err(err.into());
        }

        response.json().await.context("Failed to parse response")
    }

    /// Forecast waste on the server; returns the formatted amount
    pub async fn predict_waste(&self, request: &PredictWasteRequest) -> Result<String> {
        let response: PredictWasteResponse = self.post_json("predict_waste", request).await?;
        Ok(response.predicted_waste)
    }

    /// Look up the route for a zone; returns the route description
    pub async fn optimize_route(&self, location: &str) -> Result<String> {
        let request = OptimizeRouteRequest {
            location: location.to_string(),
        };
        let response: OptimizeRouteResponse = self.post_json("optimize_route", &request).await?;
        Ok(response.optimized_route)
    }

    /// Fetch the fill report for a bin
    pub async fn bin_data(&self, bin: &str) -> Result<BinData> {
        self.post_form("get_bin_data", &[("bin", bin)]).await
    }
}

// API request and response types

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictWasteRequest {
    pub location: String,
    pub temperature: f64,
    pub humidity: f64,
    pub day_of_week: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictWasteResponse {
    pub predicted_waste: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizeRouteRequest {
    pub location: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizeRouteResponse {
    pub optimized_route: String,
}

/// Bin fill report with amounts already formatted, e.g. `"90 kg"`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tabled)]
pub struct BinData {
    #[tabled(rename = "Bin")]
    pub bin: String,
    #[tabled(rename = "Filled")]
    pub filled: String,
    #[tabled(rename = "Empty")]
    pub empty: String,
    #[tabled(rename = "Capacity")]
    pub capacity: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
