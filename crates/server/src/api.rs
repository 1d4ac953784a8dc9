//! HTTP routes: HTML pages, JSON endpoints, health checks and Prometheus metrics

use crate::pages;
use axum::{
    body::Bytes,
    extract::{rejection::FormRejection, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use ecoflow_lib::{
    health::{components, ComponentStatus, HealthRegistry},
    observability::{ServiceMetrics, StructuredLogger},
    predictor::{category_text, ForecastService, PredictionRequest},
    reference, Forecast, ForecastError, ValidationError,
};
use prometheus::{Encoder, TextEncoder};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info};

/// Inference failures in a row before the model is reported unhealthy
pub const MAX_CONSECUTIVE_INFERENCE_FAILURES: u32 = 3;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub forecast: Arc<ForecastService>,
    pub health_registry: HealthRegistry,
    pub metrics: ServiceMetrics,
    pub logger: StructuredLogger,
}

impl AppState {
    pub fn new(
        forecast: Arc<ForecastService>,
        health_registry: HealthRegistry,
        metrics: ServiceMetrics,
        logger: StructuredLogger,
    ) -> Self {
        Self {
            forecast,
            health_registry,
            metrics,
            logger,
        }
    }

    /// Count the request and turn a handler result into a response,
    /// logging client errors as rejections
    fn respond<T: Serialize>(&self, route: &str, result: Result<T, ApiError>) -> Response {
        self.metrics.inc_requests(route);
        match result {
            Ok(body) => (StatusCode::OK, Json(body)).into_response(),
            Err(err) => {
                if err.status.is_client_error() {
                    self.logger.log_rejected(route, err.kind, &err.message);
                }
                err.into_response()
            }
        }
    }

    /// Mark the model unhealthy after repeated inference failures and
    /// healthy again once a forecast succeeds
    async fn track_model_health(&self, outcome: &Result<Forecast, ForecastError>) {
        match outcome {
            Err(ForecastError::Inference(_)) => {
                let failures = self.forecast.consecutive_failures();
                if failures >= MAX_CONSECUTIVE_INFERENCE_FAILURES {
                    self.health_registry
                        .set_unhealthy(
                            components::FORECAST_MODEL,
                            format!("{} consecutive inference failures", failures),
                        )
                        .await;
                }
            }
            Ok(_) => {
                let status = self.health_registry.status(components::FORECAST_MODEL).await;
                if status == Some(ComponentStatus::Unhealthy) {
                    self.health_registry.register(components::FORECAST_MODEL).await;
                }
            }
            Err(_) => {}
        }
    }
}

/// Body of every failed JSON request
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PredictWasteResponse {
    pub predicted_waste: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OptimizeRouteResponse {
    pub optimized_route: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BinDataResponse {
    pub bin: String,
    pub filled: String,
    pub empty: String,
    pub capacity: String,
}

/// Status code plus the user-facing message
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    kind: &'static str,
    message: String,
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

impl From<ForecastError> for ApiError {
    fn from(err: ForecastError) -> Self {
        let status = match &err {
            ForecastError::Validation(_) => StatusCode::BAD_REQUEST,
            ForecastError::ModelUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ForecastError::Inference(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}

/// Decode a JSON request body; an empty body counts as no data
fn parse_json(body: &[u8]) -> Result<Value, ValidationError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ValidationError::NoData);
    }
    serde_json::from_slice(body).map_err(|_| ValidationError::MalformedBody)
}

async fn home() -> Html<String> {
    Html(pages::home())
}

async fn predict_waste_page() -> Html<String> {
    Html(pages::predict_form())
}

async fn predict_waste(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let parsed = parse_json(&body).and_then(|value| PredictionRequest::from_json(&value));
    let request = match parsed {
        Ok(request) => request,
        Err(err) => {
            return state.respond::<PredictWasteResponse>("/predict_waste", Err(err.into()))
        }
    };

    let outcome = state.forecast.predict(&request);
    state.track_model_health(&outcome).await;

    let result = outcome
        .map(|forecast| PredictWasteResponse {
            predicted_waste: forecast.to_string(),
        })
        .map_err(ApiError::from);

    state.respond("/predict_waste", result)
}

/// Pull the route location out of a JSON body
fn route_location(body: &Value) -> Result<String, ValidationError> {
    let object = match body.as_object() {
        Some(object) if !object.is_empty() => object,
        _ => return Err(ValidationError::NoData),
    };

    category_text(object.get("location")).ok_or(ValidationError::MissingLocation)
}

async fn optimize_route_page() -> Html<String> {
    Html(pages::route_form())
}

async fn optimize_route(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let result = parse_json(&body)
        .and_then(|value| route_location(&value))
        .and_then(|location| reference::optimize_route(&location))
        .map(|route| OptimizeRouteResponse {
            optimized_route: route.to_string(),
        })
        .map_err(ApiError::from);

    state.respond("/optimize_route", result)
}

async fn get_insights(State(state): State<Arc<AppState>>) -> Html<String> {
    state.metrics.inc_requests("/get_insights");
    Html(pages::insights(&reference::insights()))
}

async fn bins_page() -> Html<String> {
    Html(pages::bins())
}

/// First `bin` value of a form; repeated keys are ignored
fn first_bin(fields: &[(String, String)]) -> &str {
    fields
        .iter()
        .find(|(key, _)| key == "bin")
        .map(|(_, value)| value.as_str())
        .unwrap_or_default()
}

async fn get_bin_data(
    State(state): State<Arc<AppState>>,
    form: Result<Form<Vec<(String, String)>>, FormRejection>,
) -> Response {
    let result = form
        .map_err(|_| ValidationError::MissingBin)
        .and_then(|Form(fields)| reference::bin_status(first_bin(&fields)))
        .map(|status| BinDataResponse {
            filled: status.filled_label(),
            empty: status.empty_label(),
            capacity: status.capacity_label(),
            bin: status.bin,
        })
        .map_err(ApiError::from);

    state.respond("/get_bin_data", result)
}

async fn maps() -> Html<String> {
    Html(pages::maps())
}

/// Health check response - returns 200 if operational, 503 if unhealthy
async fn healthz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = state.health_registry.health().await;

    let status_code = match health.status {
        ComponentStatus::Healthy | ComponentStatus::Degraded => StatusCode::OK,
        ComponentStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(health))
}

/// Readiness check response - returns 200 if ready, 503 if not ready
async fn readyz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let readiness = state.health_registry.readiness().await;

    let status_code = if readiness.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(readiness))
}

/// Prometheus metrics endpoint
async fn metrics() -> Response {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    if let Err(err) = encoder.encode(&metric_families, &mut buffer) {
        error!(error = %err, "Failed to encode metrics");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        buffer,
    )
        .into_response()
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/predict_waste", get(predict_waste_page).post(predict_waste))
        .route("/optimize_route", get(optimize_route_page).post(optimize_route))
        .route("/get_insights", get(get_insights))
        .route("/bins", get(bins_page))
        .route("/get_bin_data", post(get_bin_data))
        .route("/maps", get(maps))
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .with_state(state)
}

/// Start the API server
pub async fn serve(addr: String, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = create_router(state);

    info!(addr = %addr, "Starting API server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_json_body() {
        assert_eq!(parse_json(b""), Err(ValidationError::NoData));
        assert_eq!(parse_json(b"  \n"), Err(ValidationError::NoData));
        assert_eq!(parse_json(b"{oops"), Err(ValidationError::MalformedBody));
        assert_eq!(parse_json(b"{\"a\":1}"), Ok(json!({"a": 1})));
    }

    #[test]
    fn test_route_location() {
        assert_eq!(route_location(&json!({})), Err(ValidationError::NoData));
        assert_eq!(route_location(&json!(null)), Err(ValidationError::NoData));
        assert_eq!(
            route_location(&json!({"location": null})),
            Err(ValidationError::MissingLocation)
        );
        assert_eq!(
            route_location(&json!({"location": "Zone C"})),
            Ok("Zone C".to_string())
        );
        assert_eq!(route_location(&json!({"location": 3})), Ok("3".to_string()));
        assert_eq!(
            route_location(&json!({"location": false})),
            Err(ValidationError::MissingLocation)
        );
        assert_eq!(
            route_location(&json!({"location": 0})),
            Err(ValidationError::MissingLocation)
        );
    }

    #[test]
    fn test_first_bin_wins() {
        let fields = vec![
            ("other".to_string(), "x".to_string()),
            ("bin".to_string(), "Bin 1".to_string()),
            ("bin".to_string(), "Bin 2".to_string()),
        ];
        assert_eq!(first_bin(&fields), "Bin 1");
        assert_eq!(first_bin(&[]), "");
    }

    #[test]
    fn test_forecast_error_status_mapping() {
        let validation = ApiError::from(ForecastError::from(ValidationError::NoData));
        assert_eq!(validation.status, StatusCode::BAD_REQUEST);
        assert_eq!(validation.kind, "no_data");
        assert_eq!(validation.message, "No data provided");

        let unavailable = ApiError::from(ForecastError::ModelUnavailable);
        assert_eq!(unavailable.status, StatusCode::SERVICE_UNAVAILABLE);

        let failed = ApiError::from(ForecastError::Inference(anyhow::anyhow!("shape mismatch")));
        assert_eq!(failed.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(failed.message, "Prediction failed.");
    }
}
