use crate::cli::{Cli, Commands};
use crate::error::SuggestError;
use crate::suggest::{SuggestionFailure, SuggestionService, normalize_reply};
use anyhow::{Context, Result, bail};
use std::path::Path;
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tracing::info;

use crate::Config;

/// Run the pipeline over one raw reply and render the outcome as JSON.
///
/// `Ok` carries the suggestion, `Err` the failure tag and detail.
pub fn render_normalized(reply: &str) -> Result<String, String> {
    match normalize_reply(reply) {
        Ok(suggestion) => Ok(pretty(&suggestion)),
        Err(error) => Err(pretty(&SuggestionFailure::from(&error))),
    }
}

fn pretty<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| String::from("{}"))
}

async fn read_reply(file: Option<&Path>) -> Result<String> {
    if let Some(path) = file {
        return tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("read model reply from {}", path.display()));
    }
    let mut reply = String::new();
    tokio::io::stdin()
        .read_to_string(&mut reply)
        .await
        .context("read model reply from stdin")?;
    Ok(reply)
}

async fn run_suggest(config: &Config, description: &str) -> Result<()> {
    let service = SuggestionService::from_config(&config.llm);
    match service.suggest(description).await {
        Ok(suggestion) => {
            println!("{}", pretty(&suggestion));
            Ok(())
        }
        Err(SuggestError::Pipeline(error)) => {
            println!("{}", pretty(&SuggestionFailure::from(&error)));
            bail!("model reply rejected ({})", error.kind())
        }
        Err(other) => Err(other).context("suggestion request failed"),
    }
}

/// Run one command. Only `serve` and `suggest` load `~/.taskforge`;
/// `normalize` works without any config on disk.
pub async fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Serve { host, port } => {
            let config = Arc::new(Config::load_runtime()?);
            let port = port.unwrap_or(config.gateway.port);
            let host = host.unwrap_or_else(|| config.gateway.host.clone());
            if port == 0 {
                info!("Starting Taskforge gateway on {host} (random port)");
            } else {
                info!("Starting Taskforge gateway on {host}:{port}");
            }
            crate::gateway::run_gateway(&host, port, config).await
        }

        Commands::Suggest { description } => {
            let config = Config::load_runtime()?;
            run_suggest(&config, &description).await
        }

        Commands::Normalize { file } => {
            let reply = read_reply(file.as_deref()).await?;
            match render_normalized(&reply) {
                Ok(json) => {
                    println!("{json}");
                    Ok(())
                }
                Err(json) => {
                    println!("{json}");
                    bail!("model reply rejected")
                }
            }
        }
    }
}
