//! Command-line client for the Mothr storage gateway.

mod api_client;

use anyhow::{Context, Result};
use api_client::ApiClient;
use clap::{Args, Parser, Subcommand};
use mothr_signer::SuiKeypair;
use std::path::{Path, PathBuf};

const DEFAULT_SERVER: &str = "http://127.0.0.1:8000";

#[derive(Parser)]
#[command(name = "mothrctl")]
#[command(about = "Estimate storage costs and move blobs through a Mothr gateway")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    api: ApiArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct ApiArgs {
    /// Gateway base URL
    #[arg(long, global = true, env = "MOTHR_SERVER", default_value = DEFAULT_SERVER)]
    server: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate the cost of storing a file
    Cost {
        /// Size in bytes
        #[arg(long, conflicts_with = "file", required_unless_present = "file")]
        size: Option<u64>,
        /// Take the size from a local file
        #[arg(long)]
        file: Option<PathBuf>,
        /// Number of storage epochs (server default when omitted)
        #[arg(long)]
        epochs: Option<u32>,
    },
    /// Upload a file and print its blob id
    Upload {
        /// File to upload
        path: PathBuf,
        /// Number of storage epochs (server default when omitted)
        #[arg(long)]
        epochs: Option<u32>,
    },
    /// Download a blob
    Download {
        /// Blob id returned by `upload`
        blob_id: String,
        /// Write to this file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Check gateway health and version
    Health,
    /// Signing key commands
    Key {
        #[command(subcommand)]
        command: KeyCommands,
    },
}

#[derive(Subcommand)]
enum KeyCommands {
    /// Generate a new Ed25519 key for the gateway
    Generate {
        /// Write the secret key to this file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Print the Sui address that will own uploaded blobs
    Address {
        /// Base64 secret key
        #[arg(long, env = "SUI_SECRET_KEY", hide_env_values = true)]
        secret_key: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let Cli { api, command } = Cli::parse();

    match command {
        Commands::Cost { size, file, epochs } => {
            handle_cost_command(&connect(&api)?, size, file.as_deref(), epochs).await
        }
        Commands::Upload { path, epochs } => {
            handle_upload_command(&connect(&api)?, &path, epochs).await
        }
        Commands::Download { blob_id, output } => {
            handle_download_command(&connect(&api)?, &blob_id, output.as_deref()).await
        }
        Commands::Health => handle_health_command(&connect(&api)?).await,
        Commands::Key { command } => handle_key_command(command).await,
    }
}

fn connect(api: &ApiArgs) -> Result<ApiClient> {
    tracing::debug!(server = %api.server, "using gateway");
    ApiClient::new(&api.server)
}

async fn handle_key_command(command: KeyCommands) -> Result<()> {
    match command {
        KeyCommands::Generate { output } => {
            let keypair = SuiKeypair::generate();
            let secret_key = keypair.to_base64();

            if let Some(path) = output {
                tokio::fs::write(&path, &secret_key)
                    .await
                    .with_context(|| format!("failed to write key to {}", path.display()))?;
                println!("Secret key written to: {}", path.display());
            } else {
                println!("Secret key:");
                println!("{secret_key}");
            }

            println!("\nAddress: {}", keypair.address());
            println!("\nSet SUI_SECRET_KEY to the secret key and fund the address before uploading.");
        }
        KeyCommands::Address { secret_key } => {
            let keypair =
                SuiKeypair::from_base64(&secret_key).context("failed to parse secret key")?;
            println!("{}", keypair.address());
        }
    }
    Ok(())
}

async fn handle_cost_command(
    client: &ApiClient,
    size: Option<u64>,
    file: Option<&Path>,
    epochs: Option<u32>,
) -> Result<()> {
    let size = match (size, file) {
        (Some(size), _) => size,
        (None, Some(path)) => tokio::fs::metadata(path)
            .await
            .with_context(|| format!("failed to stat {}", path.display()))?
            .len(),
        (None, None) => anyhow::bail!("either --size or --file is required"),
    };

    let estimate = client.estimate(size, epochs).await?;
    println!("File size:     {} bytes", estimate.file_size_bytes);
    println!("Epochs:        {}", estimate.epochs);
    println!("Storage cost:  {} MIST", estimate.storage_cost);
    println!("Write cost:    {} MIST", estimate.write_cost);
    println!("Total cost:    {} MIST", estimate.total_cost);
    println!("Total (SUI):   {}", estimate.total_cost_in_sui);
    if let Some(usd) = estimate.total_cost_in_usd {
        println!("Total (USD):   {usd:.6}");
    }
    Ok(())
}

async fn handle_upload_command(client: &ApiClient, path: &Path, epochs: Option<u32>) -> Result<()> {
    let contents = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let receipt = client.upload(&filename, contents, epochs).await?;
    println!("Blob ID:     {}", receipt.blob_id);
    println!("Identifier:  {}", receipt.identifier);
    println!("Size:        {} bytes", receipt.size_bytes);
    println!("Epochs:      {}", receipt.epochs);
    println!("Deletable:   {}", receipt.deletable);
    if let Some(end_epoch) = receipt.end_epoch {
        println!("End epoch:   {end_epoch}");
    }
    if let Some(cost) = receipt.cost {
        println!("Cost:        {cost} MIST");
    }
    Ok(())
}

async fn handle_download_command(
    client: &ApiClient,
    blob_id: &str,
    output: Option<&Path>,
) -> Result<()> {
    let bytes = client.download(blob_id).await?;
    match output {
        Some(path) => {
            tokio::fs::write(path, &bytes)
                .await
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("Wrote {} bytes to {}", bytes.len(), path.display());
        }
        None => {
            use tokio::io::AsyncWriteExt;
            let mut stdout = tokio::io::stdout();
            stdout.write_all(&bytes).await?;
            stdout.flush().await?;
        }
    }
    Ok(())
}

async fn handle_health_command(client: &ApiClient) -> Result<()> {
    let health = client.health().await?;

    println!("Status: {}", health.status);
    println!("Network: {}", health.network);
    println!("Server version: {}", health.version);
    println!("Client version: {}", env!("CARGO_PKG_VERSION"));

    if health.version != env!("CARGO_PKG_VERSION") {
        eprintln!(
            "Warning: version mismatch (server: {}, client: {})",
            health.version,
            env!("CARGO_PKG_VERSION")
        );
    }
    Ok(())
}
