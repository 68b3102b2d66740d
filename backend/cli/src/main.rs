mod config;
mod send_cmd;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use exfil_sink_gateway::UploadServer;

use config::Config;

#[derive(Parser)]
#[command(name = "exfil-sink")]
#[command(about = "exfil-sink — HTTP upload fixture for exfiltration testing")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the upload server (the default when no command is given)
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
        /// Address to bind the HTTP server to
        #[arg(short, long)]
        bind: Option<String>,
        /// Directory uploads are written into
        #[arg(short, long)]
        dir: Option<PathBuf>,
        /// File name used when a request has no `filename` header
        #[arg(long)]
        default_filename: Option<String>,
    },
    /// Upload a local file to a running server
    Send {
        /// File to upload
        file: PathBuf,
        /// Upload endpoint
        #[arg(short, long, default_value = "http://localhost:8089/")]
        endpoint: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env();
    let cli = Cli::parse();

    exfil_sink_logging::init_logger(&config.log_options());

    match cli.command {
        None => run_server(config).await?,
        Some(Commands::Serve {
            port,
            bind,
            dir,
            default_filename,
        }) => {
            let config = Config {
                port: port.unwrap_or(config.port),
                bind_address: bind.unwrap_or(config.bind_address),
                upload_dir: dir.unwrap_or(config.upload_dir),
                default_filename: default_filename.unwrap_or(config.default_filename),
                ..config
            };
            run_server(config).await?;
        }
        Some(Commands::Send { file, endpoint }) => {
            send_cmd::run(&endpoint, &file).await?;
        }
    }

    Ok(())
}

async fn run_server(config: Config) -> Result<()> {
    tracing::info!(
        port = config.port,
        bind = %config.bind_address,
        dir = %config.upload_dir.display(),
        "Starting exfil-sink"
    );

    UploadServer::bind(config.server_config()).await?.serve().await
}
