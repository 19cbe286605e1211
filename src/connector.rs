//! Connector client
//!
//! Ties the routing table, credential and transport together. Every call
//! resolves a descriptor from the catalog and hands it to the request
//! builder and pager; there is no per-operation code here.

use crate::auth::ApiKeyCredential;
use crate::catalog::{Catalog, OperationDescriptor};
use crate::config::ConnectorConfig;
use crate::error::Result;
use crate::http::{HttpTransport, Transport};
use crate::pagination::{PaginationPolicy, Pager};
use crate::params::ParameterBag;
use crate::request::{ApiRequest, RequestBuilder};
use crate::types::{JsonValue, Operation, Platform, QueryMap, Resource};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

// ============================================================================
// Check Result
// ============================================================================

/// Result of a credential check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    /// Whether the check succeeded
    pub success: bool,

    /// Error message if failed
    pub message: Option<String>,
}

impl CheckResult {
    /// Create a successful check result
    pub fn success() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    /// Create a failed check result
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

// ============================================================================
// Connector
// ============================================================================

/// A configured WebinarJam / EverWebinar client
#[derive(Clone)]
pub struct Connector {
    catalog: Catalog,
    builder: RequestBuilder,
    credential: ApiKeyCredential,
    transport: Arc<dyn Transport>,
}

impl Connector {
    /// Create a connector from its parts
    pub fn new(
        catalog: Catalog,
        builder: RequestBuilder,
        credential: ApiKeyCredential,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            catalog,
            builder,
            credential,
            transport,
        }
    }

    /// Create a connector from config, using the HTTP transport
    pub fn from_config(config: &ConnectorConfig) -> Result<Self> {
        let credential = config.credential()?;
        Self::from_config_with_credential(config, credential)
    }

    /// Create a connector from config with an explicit credential
    pub fn from_config_with_credential(
        config: &ConnectorConfig,
        credential: ApiKeyCredential,
    ) -> Result<Self> {
        config.validate()?;

        let mut catalog = Catalog::builtin()?;
        if let Some(ref path) = config.catalog {
            catalog.merge(Catalog::load(path)?);
        }

        let transport = HttpTransport::with_config(config.to_transport_config())?;

        Ok(Self::new(
            catalog,
            RequestBuilder::new(config.base_url.clone()),
            credential,
            Arc::new(transport),
        ))
    }

    /// The routing table in use
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Look up an operation descriptor
    pub fn describe(&self, resource: Resource, operation: Operation) -> Result<&OperationDescriptor> {
        self.catalog.get(resource, operation)
    }

    /// Build the first request of an operation without sending it
    pub fn build_request(
        &self,
        resource: Resource,
        operation: Operation,
        params: &ParameterBag,
        query: Option<&QueryMap>,
    ) -> Result<ApiRequest> {
        let descriptor = self.describe(resource, operation)?;
        Ok(self.builder.build(descriptor, params, &self.credential, query))
    }

    /// Lazily page through an operation
    pub fn pages(
        &self,
        resource: Resource,
        operation: Operation,
        params: ParameterBag,
        policy: PaginationPolicy,
    ) -> Result<Pager<Arc<dyn Transport>>> {
        let descriptor = self.describe(resource, operation)?.clone();
        debug!(
            "Paging {} (return_all: {}, limit: {})",
            descriptor.key(),
            policy.return_all,
            policy.limit
        );

        Ok(Pager::new(
            self.builder.clone(),
            descriptor,
            params,
            self.credential.clone(),
            policy,
            Arc::clone(&self.transport),
        ))
    }

    /// Run an operation and return all records in page order
    ///
    /// Any error discards the records fetched so far; use [`Self::pages`]
    /// to keep them.
    pub async fn execute(
        &self,
        resource: Resource,
        operation: Operation,
        params: ParameterBag,
        policy: PaginationPolicy,
    ) -> Result<Vec<JsonValue>> {
        self.pages(resource, operation, params, policy)?
            .collect_records()
            .await
    }

    /// Test the credential against a platform
    pub async fn check(&self, platform: Platform) -> CheckResult {
        let request = self
            .builder
            .build_path(platform.check_path(), &self.credential);

        match self.transport.send(&request).await {
            Ok(_) => {
                info!("Credential accepted by {}", platform.as_str());
                CheckResult::success()
            }
            Err(e) => {
                warn!("Credential check against {} failed: {e}", platform.as_str());
                CheckResult::failure(e.to_string())
            }
        }
    }
}

impl std::fmt::Debug for Connector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connector")
            .field("base_url", &self.builder.base_url())
            .field("operations", &self.catalog.len())
            .field("credential", &self.credential)
            .finish_non_exhaustive()
    }
}
