//! Typed, validated async services over loosely-specified on-chain contract
//! bindings.
//!
//! # Architecture Overview
//!
//! ```text
//!     caller (UI, CLI, tests)
//!         │ typed arguments
//!         ▼
//!     ┌──────────────────────────────────────────────────────┐
//!     │                  service facades                     │
//!     │  scheduling · goals · governance · projects ·        │
//!     │  recognition · collectibles · participation          │
//!     └───────┬──────────────┬──────────────┬───────────────┘
//!             ▼              ▼              ▼
//!       validate/time     resolve      paginate/conflict
//!             │        (negotiated          │
//!             │          bindings)          │
//!             ▼              ▼              ▼
//!     ┌──────────────────────────────────────────────────────┐
//!     │        simulate (preview) · submit (commit)          │
//!     └───────────────────────┬──────────────────────────────┘
//!                             ▼
//!       ContractClient / PreparedCall / Signer (collaborators)
//! ```
//!
//! The remote contract system is the sole source of truth; nothing here is
//! cached, retried, or persisted.

pub mod client;
pub mod config;
pub mod conflict;
pub mod error;
pub mod logging;
pub mod paginate;
pub mod resolve;
pub mod services;
pub mod simulate;
pub mod submit;
pub mod time;
pub mod validate;

pub use client::{CallMode, CallOptions, ClientError, ContractClient, PreparedCall, Signer};
pub use config::AdapterConfig;
pub use error::{AdapterError, AdapterResult};
pub use services::WriteResult;
pub use time::TimeInput;
