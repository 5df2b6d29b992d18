use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use nowyouseeme_api::types::{CreateVisualizationRequest, UpdateVisualizationRequest};
use nowyouseeme_client::api_client::encode_image_file;
use nowyouseeme_client::{ClientConfig, ClientError, RestClient};
use nowyouseeme_core::VisualizationMetadata;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "nowyouseeme", version, about = "Command-line client for the NowYouSeeMe API")]
struct Cli {
    /// API root including the version prefix [env: NOWYOUSEEME_API_URL]
    #[arg(long)]
    api_url: Option<String>,

    /// Request timeout in milliseconds [env: NOWYOUSEEME_TIMEOUT_MS]
    #[arg(long)]
    timeout_ms: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List every visualization, newest first
    List,
    /// Show one visualization
    Get { id: String },
    /// Upload an image as a new visualization
    Create {
        #[arg(long)]
        agent_name: String,
        /// Image file, sent base64-encoded
        #[arg(long)]
        image: PathBuf,
        #[arg(long)]
        description: Option<String>,
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// Change selected fields of a visualization
    Update {
        id: String,
        #[arg(long)]
        agent_name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        image: Option<PathBuf>,
        /// Replaces the stored tag list
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// Delete one visualization
    Delete { id: String },
    /// Delete every visualization
    ClearAll {
        /// Required confirmation
        #[arg(long)]
        yes: bool,
    },
    /// Check that the API is up
    Health,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}

/// Environment first, then command-line flags on top.
fn resolve_config(cli: &Cli, from_env: ClientConfig) -> Result<ClientConfig, ClientError> {
    let config = ClientConfig {
        api_base_url: cli.api_url.clone().unwrap_or(from_env.api_base_url),
        request_timeout_ms: cli.timeout_ms.unwrap_or(from_env.request_timeout_ms),
    };
    config.validate()?;
    Ok(config)
}

async fn run(cli: Cli) -> Result<(), ClientError> {
    let config = resolve_config(&cli, ClientConfig::from_env()?)?;
    let client = RestClient::new(&config)?;

    match cli.command {
        Command::List => print_json(&client.list_visualizations().await?),
        Command::Get { id } => print_json(&client.get_visualization(&id).await?),
        Command::Create {
            agent_name,
            image,
            description,
            tags,
        } => {
            let image_data = encode_image_file(&image).await?;
            let request = CreateVisualizationRequest {
                description,
                metadata: VisualizationMetadata {
                    tags,
                    ..Default::default()
                },
                ..CreateVisualizationRequest::new(agent_name, image_data)
            };
            print_json(&client.create_visualization(&request).await?)
        }
        Command::Update {
            id,
            agent_name,
            description,
            image,
            tags,
        } => {
            let image_data = match image {
                Some(path) => Some(encode_image_file(&path).await?),
                None => None,
            };
            let request = UpdateVisualizationRequest {
                agent_name,
                description,
                image_data,
                metadata: VisualizationMetadata {
                    tags,
                    ..Default::default()
                },
            };
            print_json(&client.update_visualization(&id, &request).await?)
        }
        Command::Delete { id } => print_json(&client.delete_visualization(&id).await?),
        Command::ClearAll { yes } => {
            if !yes {
                return Err(ClientError::Config(
                    "clear-all deletes every visualization; pass --yes to confirm".to_string(),
                ));
            }
            let deleted = client.clear_all().await?;
            print_json(&serde_json::json!({ "deleted": deleted }))
        }
        Command::Health => print_json(&client.health_check().await?),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), ClientError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
