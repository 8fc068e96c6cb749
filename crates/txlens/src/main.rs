mod cli;
mod outcome;
mod server;

use std::path::Path;

use bitcoin::hex::FromHex;
use clap::Parser;
use eyre::{eyre, WrapErr};
use serde::{Deserialize, Serialize};

use txlens_core::txid::recompute_id;
use txlens_core::{decode, format_batch, format_transaction, NetworkParams, TxBundle};

use cli::{Cli, Command, HexSource};
use outcome::FormatOutcome;

/// A bundle file holds either one bundle or an array of them.
#[derive(Deserialize)]
#[serde(untagged)]
enum BundleFile {
    One(TxBundle),
    Many(Vec<TxBundle>),
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let args = Cli::parse();

    // Logs go to stderr so stdout stays machine-readable JSON.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_file(true)
        .with_line_number(true)
        .with_level(true)
        .init();

    let network = load_network(&args)?;
    tracing::debug!(coin = %network.coin, "network selected");

    match args.command {
        Command::Decode(source) => {
            let hex = read_hex(&source)?;
            let tx = decode(&hex, &network).wrap_err("decode transaction")?;
            print_json(&tx)
        }
        Command::Txid(source) => {
            let hex = read_hex(&source)?;
            let bytes = Vec::<u8>::from_hex(hex.trim()).wrap_err("parse transaction hex")?;
            println!("{}", recompute_id(&bytes));
            Ok(())
        }
        Command::Format {
            bundle,
            address,
            height,
        } => match read_bundles(&bundle)? {
            BundleFile::One(bundle) => {
                let classification = format_transaction(&bundle, &address, &network, height)
                    .wrap_err("format transaction")?;
                print_json(&classification.into_records())
            }
            BundleFile::Many(bundles) => {
                let outcomes: Vec<FormatOutcome> =
                    format_batch(&bundles, &address, &network, height)
                        .into_iter()
                        .map(FormatOutcome::from)
                        .collect();
                print_json(&outcomes)
            }
        },
        Command::Serve { bind, port } => serve(network, &bind, port).await,
    }
}

fn load_network(args: &Cli) -> eyre::Result<NetworkParams> {
    let network: NetworkParams = match &args.network_file {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .wrap_err_with(|| format!("read network file `{}`", path.display()))?;
            serde_json::from_str(&raw).wrap_err("parse network file")?
        }
        None => NetworkParams::preset(&args.coin)?,
    };
    network.validate()?;
    Ok(network)
}

fn read_hex(source: &HexSource) -> eyre::Result<String> {
    match (&source.hex, &source.file) {
        (Some(hex), _) => Ok(hex.clone()),
        (None, Some(path)) => std::fs::read_to_string(path)
            .wrap_err_with(|| format!("read transaction file `{}`", path.display())),
        (None, None) => Err(eyre!("either --hex or --file is required")),
    }
}

fn read_bundles(path: &Path) -> eyre::Result<BundleFile> {
    let raw = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("read bundle file `{}`", path.display()))?;
    serde_json::from_str(&raw).wrap_err("parse bundle file")
}

fn print_json<T: Serialize>(value: &T) -> eyre::Result<()> {
    let json = serde_json::to_string_pretty(value).wrap_err("serialize output")?;
    println!("{json}");
    Ok(())
}

async fn serve(network: NetworkParams, bind: &str, port: u16) -> eyre::Result<()> {
    let bind_addr = format!("{bind}:{port}");
    let origin = format!("http://{bind_addr}")
        .parse::<axum::http::HeaderValue>()
        .wrap_err("build allowed CORS origin")?;
    let router = server::build_router(server::AppState { network }, origin);

    if bind == "0.0.0.0" {
        tracing::warn!("server is bound to 0.0.0.0, it is accessible from the network");
    }

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .wrap_err("bind TCP listener")?;

    tracing::info!("listening on {bind_addr}");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .wrap_err("run HTTP server")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
    tracing::info!("shutting down");
}
