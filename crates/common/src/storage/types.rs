//! Shared storage types

use serde::Serialize;

/// Health status of the connection pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthStatus {
    /// Whether the pool handed out a working connection
    pub healthy: bool,

    /// Number of open connections
    pub active_connections: usize,

    /// Number of idle connections
    pub idle_connections: usize,

    /// Maximum pool size
    pub max_connections: usize,

    /// Optional error message if unhealthy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl HealthStatus {
    /// Create a healthy status
    pub fn healthy(active: usize, idle: usize, max: usize) -> Self {
        Self {
            healthy: true,
            active_connections: active,
            idle_connections: idle,
            max_connections: max,
            message: None,
        }
    }

    /// Create an unhealthy status
    pub fn unhealthy(message: String) -> Self {
        Self {
            healthy: false,
            active_connections: 0,
            idle_connections: 0,
            max_connections: 0,
            message: Some(message),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for storage::types.
    use super::*;

    #[test]
    fn test_health_status_unhealthy_zeroes_counts() {
        let status = HealthStatus::unhealthy("Pool exhausted".to_string());

        assert!(!status.healthy);
        assert_eq!(status.max_connections, 0);
        assert_eq!(status.message.as_deref(), Some("Pool exhausted"));
    }

    #[test]
    fn test_health_status_serializes_without_message_when_healthy() {
        let json = serde_json::to_value(HealthStatus::healthy(1, 1, 8)).unwrap();
        assert_eq!(json["healthy"], true);
        assert!(json.get("message").is_none());
    }
}
