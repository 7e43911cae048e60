//! Deployment registry and context selection.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};

use crate::config::validation::is_valid_context_path;
use crate::config::ContainerConfig;
use crate::deployment::context::{build_table, Deployment, ServletTable};
use crate::deployment::error::DeploymentError;
use crate::observability::metrics;

/// All deployments served by one listener.
///
/// The set of deployments is fixed at startup; only their tables reload.
#[derive(Debug)]
pub struct Container {
    /// Longest context path first.
    deployments: Vec<Arc<Deployment>>,
}

impl Container {
    pub fn new(mut deployments: Vec<Arc<Deployment>>) -> Self {
        deployments.sort_by_key(|d| std::cmp::Reverse(d.context_path().len()));
        Self { deployments }
    }

    /// Build every deployment. Any failure rejects the whole container.
    pub fn from_config(config: &ContainerConfig) -> Result<Self, DeploymentError> {
        let mut names = HashSet::new();
        let mut context_paths = HashSet::new();
        let mut deployments = Vec::with_capacity(config.deployments.len());

        for deployment in &config.deployments {
            if !is_valid_context_path(&deployment.context_path) {
                return Err(DeploymentError::InvalidContextPath {
                    deployment: deployment.name.clone(),
                    context_path: deployment.context_path.clone(),
                });
            }
            if !names.insert(deployment.name.as_str()) {
                return Err(DeploymentError::DuplicateDeployment(deployment.name.clone()));
            }
            if !context_paths.insert(deployment.context_path.as_str()) {
                return Err(DeploymentError::DuplicateContextPath(
                    deployment.context_path.clone(),
                ));
            }
            deployments.push(Arc::new(Deployment::from_config(deployment)?));
        }

        Ok(Self::new(deployments))
    }

    pub fn deployments(&self) -> impl Iterator<Item = &Arc<Deployment>> {
        self.deployments.iter()
    }

    pub fn get(&self, name: &str) -> Option<&Arc<Deployment>> {
        self.deployments.iter().find(|d| d.name() == name)
    }

    /// Pick the deployment whose context path owns `request_path` and return
    /// the path relative to it.
    ///
    /// `/ctx` and `/ctx/` both leave the context root (`""` / `"/"`).
    pub fn select<'p>(&self, request_path: &'p str) -> Option<(&Arc<Deployment>, &'p str)> {
        self.deployments.iter().find_map(|deployment| {
            let rest = request_path.strip_prefix(deployment.context_path())?;
            (rest.is_empty() || rest.starts_with('/')).then_some((deployment, rest))
        })
    }

    /// Rebuild the tables of known deployments and swap them in.
    ///
    /// All tables are built before any is swapped, so a bad reload leaves
    /// every deployment untouched. Returns the number of tables replaced.
    pub fn reload(&self, config: &ContainerConfig) -> Result<usize, DeploymentError> {
        let mut staged: Vec<(&Arc<Deployment>, ServletTable)> = Vec::new();
        let mut seen = HashSet::new();

        for deployment_config in &config.deployments {
            seen.insert(deployment_config.name.as_str());
            let Some(deployment) = self.get(&deployment_config.name) else {
                tracing::warn!(
                    deployment = %deployment_config.name,
                    "New deployment in reloaded config is ignored until restart"
                );
                continue;
            };
            if deployment.context_path() != deployment_config.context_path {
                tracing::warn!(
                    deployment = %deployment.name(),
                    current = %deployment.context_path(),
                    requested = %deployment_config.context_path,
                    "Context path change is ignored until restart"
                );
            }
            staged.push((deployment, build_table(deployment_config)?));
        }

        for deployment in &self.deployments {
            if !seen.contains(deployment.name()) {
                tracing::warn!(
                    deployment = %deployment.name(),
                    "Deployment missing from reloaded config keeps its current table"
                );
            }
        }

        let replaced = staged.len();
        for (deployment, table) in staged {
            deployment.replace(table);
        }
        Ok(replaced)
    }

    /// Entry counts per deployment, for summaries.
    pub fn table_sizes(&self) -> HashMap<String, usize> {
        self.deployments
            .iter()
            .map(|d| (d.name().to_string(), d.table().len()))
            .collect()
    }
}

/// Apply configuration updates until the channel closes or shutdown fires.
pub async fn apply_updates(
    container: Arc<Container>,
    mut updates: mpsc::UnboundedReceiver<ContainerConfig>,
    mut shutdown: broadcast::Receiver<()>,
) {
    loop {
        tokio::select! {
            update = updates.recv() => {
                let Some(config) = update else { break };
                match container.reload(&config) {
                    Ok(replaced) => {
                        metrics::record_reload("ok");
                        tracing::info!(replaced, "Mapping tables reloaded");
                    }
                    Err(e) => {
                        metrics::record_reload("rejected");
                        tracing::error!(error = %e, "Reload rejected, keeping current mapping tables");
                    }
                }
            }
            _ = shutdown.recv() => break,
        }
    }
    tracing::debug!("Config update loop stopped");
}
