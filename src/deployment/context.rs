//! A single deployed application and its url-pattern table.
//!
//! # Responsibilities
//! - Compile the deployment's servlet mappings into a MappingTable
//! - Resolve request paths (context path already stripped) to a servlet
//! - Swap in a freshly built table on reload
//!
//! # Design Decisions
//! - The table sits behind ArcSwap: readers never lock, reload is one pointer swap
//! - A request keeps the table it loaded even if a reload lands mid-request
//! - Results are owned so callers never hold a table guard

use std::sync::Arc;

use arc_swap::ArcSwap;
use serde::Serialize;

use crate::config::DeploymentConfig;
use crate::deployment::error::DeploymentError;
use crate::observability::metrics;
use crate::routing::{MappingError, MappingTable, MatchKind, Resolution};

/// Url-pattern table keyed to servlet names.
pub type ServletTable = MappingTable<String>;

/// The servlet selected for a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServletMatch {
    pub servlet: String,
    pub pattern: String,
    pub kind: MatchKind,
    pub servlet_path: String,
    pub path_info: Option<String>,
}

/// A deployed application mounted under a context path.
#[derive(Debug)]
pub struct Deployment {
    name: String,
    context_path: String,
    table: ArcSwap<ServletTable>,
}

impl Deployment {
    pub fn new(name: impl Into<String>, context_path: impl Into<String>, table: ServletTable) -> Self {
        Self {
            name: name.into(),
            context_path: context_path.into(),
            table: ArcSwap::from_pointee(table),
        }
    }

    /// Build the deployment's table from configuration.
    pub fn from_config(config: &DeploymentConfig) -> Result<Self, DeploymentError> {
        let table = build_table(config)?;
        Ok(Self::new(&config.name, &config.context_path, table))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn context_path(&self) -> &str {
        &self.context_path
    }

    /// Snapshot of the current table.
    pub fn table(&self) -> Arc<ServletTable> {
        self.table.load_full()
    }

    /// Atomically replace the table. In-flight lookups finish on the old one.
    pub fn replace(&self, table: ServletTable) {
        metrics::record_table_size(&self.name, table.len());
        self.table.store(Arc::new(table));
        tracing::info!(deployment = %self.name, "Mapping table replaced");
    }

    /// Resolve a path relative to this deployment's context path.
    ///
    /// `Ok(None)` means no url-pattern applies.
    pub fn resolve(&self, path: &str) -> Result<Option<ServletMatch>, MappingError> {
        let table = self.table.load();
        match table.resolve(path) {
            Ok(Resolution::Matched(m)) => {
                metrics::record_resolution(&self.name, m.kind.as_str());
                Ok(Some(ServletMatch {
                    servlet: m.handler.clone(),
                    pattern: m.pattern.to_string(),
                    kind: m.kind,
                    servlet_path: m.servlet_path.to_string(),
                    path_info: m.path_info.map(str::to_string),
                }))
            }
            Ok(Resolution::NoMatch) => {
                metrics::record_resolution(&self.name, "no_match");
                Ok(None)
            }
            Err(e) => {
                metrics::record_resolution(&self.name, "error");
                tracing::error!(deployment = %self.name, path = %path, error = %e, "Path resolution failed");
                Err(e)
            }
        }
    }
}

/// Compile one deployment's servlet mappings, servlet names as handler ids.
pub fn build_table(config: &DeploymentConfig) -> Result<ServletTable, DeploymentError> {
    let mut builder = MappingTable::builder();
    for servlet in &config.servlets {
        for raw in &servlet.mappings {
            builder
                .register(raw, servlet.name.clone())
                .map_err(|source| DeploymentError::Mapping {
                    deployment: config.name.clone(),
                    servlet: servlet.name.clone(),
                    source,
                })?;
        }
    }
    let table = builder.build();

    tracing::info!(
        deployment = %config.name,
        context_path = %config.context_path,
        servlets = config.servlets.len(),
        entries = table.len(),
        "Mapping table built"
    );
    metrics::record_table_size(&config.name, table.len());
    Ok(table)
}
