//! CLI runner - executes commands

use crate::catalog::Catalog;
use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::ConnectorConfig;
use crate::connector::Connector;
use crate::error::{Result, ResultExt};
use crate::pagination::PaginationPolicy;
use crate::params::ParameterBag;
use crate::types::{Operation, Platform, Resource};
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Check { platform } => self.check(*platform).await,
            Commands::Operations => self.operations(),
            Commands::Describe {
                resource,
                operation,
            } => self.describe(*resource, *operation),
            Commands::Validate => self.validate(),
            Commands::Run {
                resource,
                operation,
                params,
                params_file,
                return_all,
                limit,
                dry_run,
            } => {
                let params = Self::load_params(params.as_deref(), params_file.as_deref())?;
                let policy = if *return_all {
                    PaginationPolicy::all()
                } else {
                    PaginationPolicy::limited(*limit)
                };

                if *dry_run {
                    self.dry_run(*resource, *operation, &params)
                } else {
                    self.execute(*resource, *operation, params, policy).await
                }
            }
        }
    }

    /// Load the config file, applying the `--table` override
    fn load_config(&self) -> Result<ConnectorConfig> {
        let mut config = ConnectorConfig::load(self.cli.config.as_deref())?;
        if let Some(ref table) = self.cli.table {
            config.catalog = Some(table.clone());
        }
        Ok(config)
    }

    /// Load the routing table without needing a credential
    fn load_catalog(&self) -> Result<Catalog> {
        let config = self.load_config()?;
        let mut catalog = Catalog::builtin()?;
        if let Some(ref path) = config.catalog {
            catalog.merge(Catalog::load(path)?);
        }
        Ok(catalog)
    }

    fn connector(&self) -> Result<Connector> {
        Connector::from_config(&self.load_config()?)
    }

    /// Parse parameters from inline JSON or a file
    pub(crate) fn load_params(inline: Option<&str>, file: Option<&Path>) -> Result<ParameterBag> {
        let raw = match (inline, file) {
            (Some(json), _) => json.to_string(),
            (None, Some(path)) => fs::read_to_string(path)
                .with_context(|| format!("Failed to read params {}", path.display()))?,
            (None, None) => return Ok(ParameterBag::new()),
        };

        let value: Value = serde_json::from_str(&raw)?;
        ParameterBag::from_json(value)
    }

    /// Test the credential
    async fn check(&self, platform: Platform) -> Result<()> {
        let connector = self.connector()?;
        info!("Checking credential against {}", platform.as_str());

        let result = connector.check(platform).await;
        let status = if result.success { "SUCCEEDED" } else { "FAILED" };

        self.output_message(&json!({
            "type": "CONNECTION_STATUS",
            "connectionStatus": {
                "platform": platform.as_str(),
                "status": status,
                "message": result.message
            }
        }));

        Ok(())
    }

    /// List the routing table
    fn operations(&self) -> Result<()> {
        let catalog = self.load_catalog()?;

        let operations: Vec<Value> = catalog
            .iter()
            .map(|d| {
                json!({
                    "resource": d.resource,
                    "operation": d.operation,
                    "method": d.method.to_string(),
                    "path": d.path,
                    "paginated": d.is_paginated(),
                    "description": d.description
                })
            })
            .collect();

        self.output_message(&json!({
            "type": "OPERATIONS",
            "operations": operations
        }));

        Ok(())
    }

    /// Show one descriptor
    fn describe(&self, resource: Resource, operation: Operation) -> Result<()> {
        let catalog = self.load_catalog()?;
        let descriptor = catalog.get(resource, operation)?;

        self.output_message(&json!({
            "type": "OPERATION",
            "operation": descriptor,
            "bodyKeys": descriptor.body_keys()
        }));

        Ok(())
    }

    /// Validate routing tables
    fn validate(&self) -> Result<()> {
        let catalog = self.load_catalog()?;

        for (key, dup) in catalog.duplicate_body_keys() {
            self.output_message(&json!({
                "type": "LOG",
                "log": {
                    "level": "WARN",
                    "message": format!(
                        "{key}: body key '{}' is written by {}",
                        dup.body_key,
                        dup.params.join(", ")
                    )
                }
            }));
        }

        self.output_message(&json!({
            "type": "LOG",
            "log": {
                "level": "INFO",
                "message": format!("Routing table is valid with {} operations", catalog.len())
            }
        }));

        Ok(())
    }

    /// Print the first request of an operation
    fn dry_run(&self, resource: Resource, operation: Operation, params: &ParameterBag) -> Result<()> {
        let connector = self.connector()?;
        let mut request = connector.build_request(resource, operation, params, None)?;

        if request.body.contains_key(crate::auth::API_KEY_FIELD) {
            request
                .body
                .insert(crate::auth::API_KEY_FIELD.to_string(), json!("***"));
        }

        self.output_message(&json!({
            "type": "REQUEST",
            "request": request
        }));

        Ok(())
    }

    /// Run an operation, printing records as pages arrive
    async fn execute(
        &self,
        resource: Resource,
        operation: Operation,
        params: ParameterBag,
        policy: PaginationPolicy,
    ) -> Result<()> {
        let connector = self.connector()?;
        let mut pager = connector.pages(resource, operation, params, policy)?;
        let mut total = 0usize;

        while let Some(page) = pager.next_page().await {
            let page = match page {
                Ok(page) => page,
                Err(e) => {
                    warn!(
                        "{resource}.{operation} stopped after {} page(s), {total} record(s)",
                        pager.pages_fetched()
                    );
                    return Err(e);
                }
            };

            for record in &page.records {
                self.output_message(&json!({
                    "type": "RECORD",
                    "record": {
                        "resource": resource,
                        "operation": operation,
                        "page": page.index,
                        "data": record
                    }
                }));
            }
            total += page.records.len();
        }

        info!(
            "{resource}.{operation}: {total} record(s) from {} page(s)",
            pager.pages_fetched()
        );

        Ok(())
    }

    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}
