//! Health report served by `GET /health`

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Overall health: healthy only when every component is.
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub is_healthy: bool,
    pub components: Vec<ComponentHealth>,
    pub checked_at: DateTime<Utc>,
}

impl HealthStatus {
    /// Healthy report with no components, stamped now.
    pub fn new() -> Self {
        Self { is_healthy: true, components: Vec::new(), checked_at: Utc::now() }
    }

    /// Append a component; any unhealthy component marks the whole report
    /// unhealthy.
    pub fn add_component(mut self, component: ComponentHealth) -> Self {
        self.is_healthy &= component.is_healthy;
        self.components.push(component);
        self
    }
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self::new()
    }
}

/// Health status of an individual component
#[derive(Debug, Clone, Serialize)]
pub struct ComponentHealth {
    pub name: String,
    pub is_healthy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ComponentHealth {
    /// Healthy component without a message.
    pub fn healthy(name: impl Into<String>) -> Self {
        Self { name: name.into(), is_healthy: true, message: None }
    }

    /// Unhealthy component with the failure reason.
    pub fn unhealthy(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self { name: name.into(), is_healthy: false, message: Some(message.into()) }
    }

    /// Attach a detail line, e.g. a count.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_failing_component_makes_the_report_unhealthy() {
        let status = HealthStatus::new()
            .add_component(ComponentHealth::healthy("sessions"))
            .add_component(ComponentHealth::unhealthy("database", "pool exhausted"));

        assert!(!status.is_healthy);
        assert_eq!(status.components.len(), 2);
        assert_eq!(status.components[1].message.as_deref(), Some("pool exhausted"));
    }

    #[test]
    fn empty_report_is_healthy() {
        assert!(HealthStatus::default().is_healthy);
    }
}
