use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::json;

use servlet_router::config::load_config;
use servlet_router::deployment::Container;

#[derive(Parser)]
#[command(name = "mapping-cli")]
#[command(about = "Offline tooling for servlet url-pattern tables", long_about = None)]
struct Cli {
    /// Container configuration file (TOML).
    #[arg(short, long, default_value = "servlet-router.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the config and build every mapping table
    Check,
    /// Show which deployment and servlet a request path maps to
    Resolve {
        /// Request path including the context path, e.g. /servletContext/a/b
        path: String,
    },
    /// List every url-pattern per deployment
    Tables,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;
    let container = Container::from_config(&config)?;

    let output = match cli.command {
        Commands::Check => {
            let sizes = container.table_sizes();
            json!({
                "status": "ok",
                "deployments": container.deployments().map(|d| json!({
                    "name": d.name(),
                    "context_path": d.context_path(),
                    "entries": sizes.get(d.name()).copied().unwrap_or_default(),
                })).collect::<Vec<_>>(),
            })
        }
        Commands::Resolve { path } => match container.select(&path) {
            None => json!({ "path": path, "deployment": null, "match": null }),
            Some((deployment, relative)) => json!({
                "path": path,
                "deployment": deployment.name(),
                "relative_path": relative,
                "match": deployment.resolve(relative)?,
            }),
        },
        Commands::Tables => json!(container
            .deployments()
            .map(|d| json!({
                "name": d.name(),
                "context_path": d.context_path(),
                "mappings": d.table().entries().map(|e| json!({
                    "pattern": e.pattern.to_string(),
                    "kind": e.pattern.kind(),
                    "servlet": e.handler,
                })).collect::<Vec<_>>(),
            }))
            .collect::<Vec<_>>()),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
