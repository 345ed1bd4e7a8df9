// =================================================================
// api/errors.rs - Gateway Errors
// =================================================================

use thiserror::Error;

/// Errors surfaced by an exchange gateway
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    #[error("Network error: {0}")]
    Network(String),

    /// Exchange rejected the request. `label` carries the exchange's
    /// machine-readable error code when one was returned.
    #[error("API error (HTTP {status}){}: {message}", label_suffix(.label))]
    Api {
        status: u16,
        label: Option<String>,
        message: String,
    },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Unknown trading pair: {0}")]
    UnknownPair(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

fn label_suffix(label: &Option<String>) -> String {
    label.as_deref().map(|l| format!(" {}", l)).unwrap_or_default()
}

impl GatewayError {
    pub fn label(&self) -> Option<&str> {
        match self {
            GatewayError::Api { label, .. } => label.as_deref(),
            _ => None,
        }
    }
}

#[cfg(feature = "gate_exec")]
impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            GatewayError::Parse(err.to_string())
        } else {
            GatewayError::Network(err.to_string())
        }
    }
}

#[cfg(feature = "gate_exec")]
impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        GatewayError::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display_includes_label() {
        let err = GatewayError::Api {
            status: 400,
            label: Some("BALANCE_NOT_ENOUGH".to_string()),
            message: "Not enough balance".to_string(),
        };
        assert_eq!(err.label(), Some("BALANCE_NOT_ENOUGH"));
        assert_eq!(
            err.to_string(),
            "API error (HTTP 400) BALANCE_NOT_ENOUGH: Not enough balance"
        );

        let bare = GatewayError::Api {
            status: 502,
            label: None,
            message: "bad gateway".to_string(),
        };
        assert_eq!(bare.to_string(), "API error (HTTP 502): bad gateway");
    }
}
