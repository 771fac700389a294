//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::client::CallOptions;

/// Root configuration for the adapter.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AdapterConfig {
    /// Where the bound contract lives; consumed by concrete client builders.
    pub endpoint: EndpointConfig,

    /// Advisory per-call defaults forwarded to the remote-call layer.
    pub call: CallConfig,

    /// Paginated read limits.
    pub paging: PagingConfig,
}

impl AdapterConfig {
    /// Per-call options derived from the configured defaults.
    pub fn call_options(&self) -> CallOptions {
        CallOptions {
            fee: self.call.fee,
            timeout_secs: Some(self.call.timeout_secs),
            ..CallOptions::default()
        }
    }
}

/// Remote endpoint settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct EndpointConfig {
    /// RPC endpoint URL (e.g., "https://rpc.testnet.example.org").
    pub rpc_url: String,

    /// Network identifier / passphrase distinguishing deployments.
    pub network_id: String,

    /// Address of the bound contract.
    pub contract_address: String,
}

/// Advisory call defaults.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CallConfig {
    /// Fee bid in the chain's smallest unit; None lets the binding choose.
    pub fee: Option<u64>,

    /// Advisory transaction timeout forwarded to the remote-call layer.
    pub timeout_secs: u64,
}

impl Default for CallConfig {
    fn default() -> Self {
        Self {
            fee: None,
            timeout_secs: 30,
        }
    }
}

/// Paginated read limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PagingConfig {
    /// Items requested per page.
    pub limit: u32,

    /// Hard cap on pages per listing read.
    pub max_pages: u32,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            limit: 100,
            max_pages: 50,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AdapterConfig::default();
        assert_eq!(config.call.timeout_secs, 30);
        assert_eq!(config.call.fee, None);
        assert_eq!(config.paging.limit, 100);
        assert_eq!(config.paging.max_pages, 50);
        assert!(config.endpoint.rpc_url.is_empty());
    }

    #[test]
    fn test_minimal_toml() {
        let config: AdapterConfig = toml::from_str(
            r#"
            [endpoint]
            rpc_url = "https://rpc.testnet.example.org"
            contract_address = "CA6PFGLU5J3GGWV2CWLKOWS65CQP"

            [paging]
            limit = 25
            "#,
        )
        .unwrap();
        assert_eq!(config.endpoint.rpc_url, "https://rpc.testnet.example.org");
        assert_eq!(config.paging.limit, 25);
        // Unspecified sections fall back to defaults.
        assert_eq!(config.paging.max_pages, 50);
        assert_eq!(config.call.timeout_secs, 30);
    }

    #[test]
    fn test_call_options_bridge() {
        let mut config = AdapterConfig::default();
        config.call.fee = Some(100);
        config.call.timeout_secs = 60;
        let options = config.call_options();
        assert_eq!(options.fee, Some(100));
        assert_eq!(options.timeout_secs, Some(60));
    }
}
