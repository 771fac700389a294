//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (limits > 0, timeouts > 0)
//! - Check endpoint coherence (URL scheme, contract address present)
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: AdapterConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use crate::config::schema::AdapterConfig;

/// A single semantic violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A field that must be non-empty when its section is in use.
    MissingField(&'static str),
    /// A URL field with an unrecognized scheme.
    InvalidUrl { field: &'static str, value: String },
    /// A numeric field that must be strictly positive.
    ZeroValue(&'static str),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::MissingField(field) => write!(f, "{} must be set", field),
            ValidationError::InvalidUrl { field, value } => {
                write!(f, "{} is not an http(s)/ws(s) URL: '{}'", field, value)
            }
            ValidationError::ZeroValue(field) => write!(f, "{} must be greater than zero", field),
        }
    }
}

/// Validate an [`AdapterConfig`], collecting every violation.
pub fn validate_config(config: &AdapterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let endpoint = &config.endpoint;
    if !endpoint.rpc_url.is_empty() {
        let scheme_ok = ["http://", "https://", "ws://", "wss://"]
            .iter()
            .any(|scheme| endpoint.rpc_url.starts_with(scheme));
        if !scheme_ok {
            errors.push(ValidationError::InvalidUrl {
                field: "endpoint.rpc_url",
                value: endpoint.rpc_url.clone(),
            });
        }
        if endpoint.contract_address.trim().is_empty() {
            errors.push(ValidationError::MissingField("endpoint.contract_address"));
        }
    }

    if config.call.timeout_secs == 0 {
        errors.push(ValidationError::ZeroValue("call.timeout_secs"));
    }
    if config.paging.limit == 0 {
        errors.push(ValidationError::ZeroValue("paging.limit"));
    }
    if config.paging.max_pages == 0 {
        errors.push(ValidationError::ZeroValue("paging.max_pages"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&AdapterConfig::default()).is_ok());
    }

    #[test]
    fn test_all_errors_reported_in_one_pass() {
        let mut config = AdapterConfig::default();
        config.endpoint.rpc_url = "ftp://example.org".into();
        config.call.timeout_secs = 0;
        config.paging.limit = 0;
        config.paging.max_pages = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 5);
        assert!(errors.contains(&ValidationError::ZeroValue("paging.limit")));
        assert!(errors.contains(&ValidationError::MissingField("endpoint.contract_address")));
    }

    #[test]
    fn test_configured_endpoint_requires_contract_address() {
        let mut config = AdapterConfig::default();
        config.endpoint.rpc_url = "https://rpc.testnet.example.org".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::MissingField("endpoint.contract_address")]
        );

        config.endpoint.contract_address = "CA6PFGLU5J3GGWV2CWLK".into();
        assert!(validate_config(&config).is_ok());
    }
}
