//! Health check infrastructure for the waste management service
//!
//! Tracks the forecast model and reference tables separately so a service
//! started without a model can still report itself as partially working.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Health status of a component, ordered from best to worst
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    Healthy,
    /// Still serving, with reduced functionality
    Degraded,
    Unhealthy,
}

impl ComponentStatus {
    /// Returns true if the component is at least partially operational
    pub fn is_operational(&self) -> bool {
        *self != ComponentStatus::Unhealthy
    }
}

/// Last reported state of one component
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    pub status: ComponentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub last_check_timestamp: i64,
}

impl ComponentHealth {
    fn at_now(status: ComponentStatus, message: Option<String>) -> Self {
        Self {
            status,
            message,
            last_check_timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

/// Body of `/healthz`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: ComponentStatus,
    pub components: BTreeMap<String, ComponentHealth>,
}

/// Body of `/readyz`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Component names for health tracking
pub mod components {
    pub const FORECAST_MODEL: &str = "forecast_model";
    pub const REFERENCE_TABLES: &str = "reference_tables";
}

/// Shared registry of component health plus a startup-complete flag
#[derive(Debug, Clone, Default)]
pub struct HealthRegistry {
    components: Arc<RwLock<BTreeMap<String, ComponentHealth>>>,
    ready: Arc<RwLock<bool>>,
}

impl HealthRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a component as healthy
    pub async fn register(&self, name: &str) {
        self.report(name, ComponentStatus::Healthy, None).await;
    }

    pub async fn set_degraded(&self, name: &str, message: impl Into<String>) {
        self.report(name, ComponentStatus::Degraded, Some(message.into()))
            .await;
    }

    pub async fn set_unhealthy(&self, name: &str, message: impl Into<String>) {
        self.report(name, ComponentStatus::Unhealthy, Some(message.into()))
            .await;
    }

    async fn report(&self, name: &str, status: ComponentStatus, message: Option<String>) {
        self.components
            .write()
            .await
            .insert(name.to_string(), ComponentHealth::at_now(status, message));
    }

    /// Last reported status of one component
    pub async fn status(&self, name: &str) -> Option<ComponentStatus> {
        self.components
            .read()
            .await
            .get(name)
            .map(|health| health.status)
    }

    pub async fn set_ready(&self, ready: bool) {
        *self.ready.write().await = ready;
    }

    /// Overall status is the worst component status
    pub async fn health(&self) -> HealthResponse {
        let components = self.components.read().await.clone();
        let status = components
            .values()
            .map(|health| health.status)
            .max()
            .unwrap_or(ComponentStatus::Healthy);
        HealthResponse { status, components }
    }

    /// Ready once startup finished and nothing is unhealthy
    pub async fn readiness(&self) -> ReadinessResponse {
        let ready = *self.ready.read().await;
        let reason = if !ready {
            Some("Service not yet initialized")
        } else if !self.health().await.status.is_operational() {
            Some("Component unhealthy")
        } else {
            None
        };

        ReadinessResponse {
            ready: reason.is_none(),
            reason: reason.map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_registry_initial_state() {
        let registry = HealthRegistry::new();
        let health = registry.health().await;

        assert_eq!(health.status, ComponentStatus::Healthy);
        assert!(health.components.is_empty());
    }

    #[tokio::test]
    async fn test_health_registry_component_registration() {
        let registry = HealthRegistry::new();
        registry.register(components::FORECAST_MODEL).await;

        let health = registry.health().await;
        assert!(health.components.contains_key(components::FORECAST_MODEL));
        assert_eq!(
            health.components[components::FORECAST_MODEL].status,
            ComponentStatus::Healthy
        );
    }

    #[tokio::test]
    async fn test_missing_model_degrades_service() {
        let registry = HealthRegistry::new();
        registry.register(components::FORECAST_MODEL).await;
        registry.register(components::REFERENCE_TABLES).await;

        registry
            .set_degraded(components::FORECAST_MODEL, "Model file not found")
            .await;

        let health = registry.health().await;
        assert_eq!(health.status, ComponentStatus::Degraded);
        assert!(health.status.is_operational());
    }

    #[tokio::test]
    async fn test_health_registry_unhealthy_status() {
        let registry = HealthRegistry::new();
        registry.register(components::FORECAST_MODEL).await;
        registry.register(components::REFERENCE_TABLES).await;

        registry
            .set_unhealthy(components::FORECAST_MODEL, "Checksum mismatch")
            .await;

        let health = registry.health().await;
        assert_eq!(health.status, ComponentStatus::Unhealthy);
        assert!(!health.status.is_operational());
        assert_eq!(
            registry.status(components::FORECAST_MODEL).await,
            Some(ComponentStatus::Unhealthy)
        );
        assert_eq!(registry.status("unknown").await, None);
    }

    #[tokio::test]
    async fn test_readiness_not_ready_initially() {
        let registry = HealthRegistry::new();
        let readiness = registry.readiness().await;

        assert!(!readiness.ready);
        assert!(readiness.reason.is_some());
    }

    #[tokio::test]
    async fn test_readiness_ready_when_degraded() {
        let registry = HealthRegistry::new();
        registry.register(components::FORECAST_MODEL).await;
        registry.set_ready(true).await;
        registry
            .set_degraded(components::FORECAST_MODEL, "Model file not found")
            .await;

        let readiness = registry.readiness().await;
        assert!(readiness.ready);
    }

    #[tokio::test]
    async fn test_readiness_not_ready_when_unhealthy() {
        let registry = HealthRegistry::new();
        registry.register(components::REFERENCE_TABLES).await;
        registry.set_ready(true).await;
        registry
            .set_unhealthy(components::REFERENCE_TABLES, "Failed")
            .await;

        let readiness = registry.readiness().await;
        assert!(!readiness.ready);
    }
}
