use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// txlens: decode raw UTXO transactions and classify them relative to a
/// wallet address.
#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    /// Built-in network preset (btc, kmd, vrsc, zec).
    #[arg(long, global = true, default_value = "btc", env = "TXLENS_COIN")]
    pub coin: String,

    /// JSON file with custom network parameters. Takes precedence over --coin.
    #[arg(long, global = true, env = "TXLENS_NETWORK_FILE")]
    pub network_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Decode a raw transaction and print it as JSON.
    Decode(HexSource),

    /// Print the double-SHA256 id of raw transaction bytes.
    Txid(HexSource),

    /// Classify one bundle, or an array of bundles, relative to an address.
    Format {
        /// JSON file holding a transaction bundle or an array of bundles.
        #[arg(long)]
        bundle: PathBuf,

        /// Wallet address the transactions are classified against.
        #[arg(long, env = "TXLENS_ADDRESS")]
        address: String,

        /// Current chain height, used for confirmation counts.
        #[arg(long)]
        height: u64,
    },

    /// Serve the local HTTP API.
    Serve {
        /// Address to bind the web server to.
        #[arg(long, default_value = "127.0.0.1", env = "TXLENS_BIND")]
        bind: String,

        /// Port to listen on.
        #[arg(long, default_value = "3080", env = "TXLENS_PORT")]
        port: u16,
    },
}

/// Where to read transaction hex from. Exactly one source is required.
#[derive(Args)]
#[group(required = true, multiple = false)]
pub struct HexSource {
    /// Raw transaction hex.
    #[arg(long)]
    pub hex: Option<String>,

    /// File containing raw transaction hex.
    #[arg(long)]
    pub file: Option<PathBuf>,
}
