use std::path::PathBuf;

use bitcoin::Network;
use clap::Parser;

/// coinrpc: send one JSON-RPC call to a Bitcoin Core compatible daemon
/// and print the result.
#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    /// Daemon RPC URL. When omitted, settings come from `--conf` or the
    /// default bitcoin.conf location.
    #[arg(long, env = "COINRPC_RPC_URL")]
    pub rpc_url: Option<String>,

    /// RPC username (optional; not needed for cookie or user-info auth).
    #[arg(long, env = "COINRPC_RPC_USER")]
    pub rpc_user: Option<String>,

    /// RPC password (optional; not needed for cookie or user-info auth).
    #[arg(long, env = "COINRPC_RPC_PASS")]
    pub rpc_pass: Option<String>,

    /// Path to the daemon's `.cookie` file.
    #[arg(long)]
    pub rpc_cookie_file: Option<PathBuf>,

    /// bitcoin.conf to read connection settings from.
    #[arg(long)]
    pub conf: Option<PathBuf>,

    /// Network whose default port and config section apply.
    #[arg(long, default_value = "main", value_parser = parse_network)]
    pub network: Network,

    /// Request timeout in seconds.
    #[arg(long, default_value = "30")]
    pub timeout: u64,

    /// Accept invalid TLS certificates on https endpoints.
    #[arg(long)]
    pub insecure: bool,

    /// RPC method name, e.g. `getblockcount`.
    pub method: String,

    /// Positional params. Each is sent as JSON when it parses as JSON,
    /// otherwise as a string. Leading hyphens are allowed, so `-1` is a
    /// param rather than a flag.
    #[arg(allow_hyphen_values = true)]
    pub params: Vec<String>,
}

fn parse_network(s: &str) -> Result<Network, String> {
    match s.to_ascii_lowercase().as_str() {
        "main" | "mainnet" | "bitcoin" => Ok(Network::Bitcoin),
        "test" | "testnet" => Ok(Network::Testnet),
        "testnet4" => Ok(Network::Testnet4),
        "signet" => Ok(Network::Signet),
        "regtest" => Ok(Network::Regtest),
        other => Err(format!(
            "unknown network `{other}`; expected main, test, testnet4, signet or regtest"
        )),
    }
}
