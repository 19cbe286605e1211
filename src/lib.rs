//! # WebinarJam Connector
//!
//! A declarative client for the WebinarJam and EverWebinar APIs.
//!
//! Every operation is a row in a routing table (`connectors/*.yaml`): a
//! method, a path, and a mapping from caller parameters to JSON body keys.
//! A single request builder interprets those rows, and a pager follows the
//! page numbers the registrants endpoint reports.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use webinarjam_connector::{
//!     ConnectorConfig, Connector, Operation, PaginationPolicy, ParameterBag, Resource, Result,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     // API key from WEBINARJAM_API_KEY
//!     let connector = Connector::from_config(&ConnectorConfig::default())?;
//!
//!     let params = ParameterBag::new().with("webinarId", 12).with("schedule", 3);
//!     let registrants = connector
//!         .execute(
//!             Resource::WebinarJam,
//!             Operation::GetRegistrants,
//!             params,
//!             PaginationPolicy::all(),
//!         )
//!         .await?;
//!
//!     println!("{} registrants", registrants.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                         Connector                             │
//! │  execute() → Vec<record>   pages() → Pager   check() → Status │
//! └───────────────────────────────────────────────────────────────┘
//!                                 │
//! ┌───────────┬─────────────┬─────┴───────┬────────────┬──────────┐
//! │  Catalog  │   Request   │  Paginate   │    HTTP    │   Auth   │
//! ├───────────┼─────────────┼─────────────┼────────────┼──────────┤
//! │ YAML rows │ field maps  │ page number │ Transport  │ api_key  │
//! │ (res, op) │ transforms  │ return_all  │ reqwest    │ in body  │
//! │           │             │ limit       │ rate limit │          │
//! └───────────┴─────────────┴─────────────┴────────────┴──────────┘
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Caller-supplied parameters
pub mod params;

/// API key credential
pub mod auth;

/// Routing tables
pub mod catalog;

/// Request building
pub mod request;

/// Response decoding
pub mod decode;

/// HTTP transport with rate limiting
pub mod http;

/// Page-number pagination
pub mod pagination;

/// Runtime configuration
pub mod config;

/// Connector client
pub mod connector;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use auth::ApiKeyCredential;
pub use catalog::{Catalog, OperationDescriptor};
pub use config::ConnectorConfig;
pub use connector::{CheckResult, Connector};
pub use pagination::{Page, PaginationPolicy, Pager};
pub use params::{ParamValue, ParameterBag};
pub use request::{ApiRequest, RequestBuilder};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
