//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → AdapterConfig (validated, immutable)
//!     → handed to facades and client builders at construction
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; facades copy what they need at
//!   construction and never observe later edits
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{AdapterConfig, CallConfig, EndpointConfig, PagingConfig};
pub use validation::{validate_config, ValidationError};
