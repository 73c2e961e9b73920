mod cli;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use eyre::{eyre, WrapErr};
use serde_json::Value;

use coinrpc_core::rpc::{BitcoinRpc, HttpRpcClient};
use coinrpc_core::{CoreError, RpcConfig, RpcError};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let args = cli::Cli::parse();

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

    let config = build_config(&args).context("resolve RPC connection settings")?;
    let rpc: Arc<dyn BitcoinRpc> =
        Arc::new(HttpRpcClient::new(&config).context("build RPC client")?);

    let params: Vec<Value> = args.params.iter().map(|raw| parse_param(raw)).collect();
    tracing::debug!(method = %args.method, params = params.len(), url = %config.url, "sending query");

    let result = rpc.query(&args.method, params).await.map_err(|err| {
        if is_connection_error(&err) {
            let message = format_rpc_connect_error(&config.url, &err.to_string());
            eyre!(message).wrap_err("while attempting to reach the daemon")
        } else {
            eyre::Report::new(err).wrap_err(format!("`{}` failed", args.method))
        }
    })?;

    if let Some(output) = render_result(&result)? {
        println!("{output}");
    }
    Ok(())
}

/// Explicit URL wins; otherwise read `--conf` or the default bitcoin.conf.
/// Credential flags override whatever the file provided.
fn build_config(args: &cli::Cli) -> eyre::Result<RpcConfig> {
    let mut config = match (&args.rpc_url, &args.conf) {
        (Some(url), _) => RpcConfig::new(url.clone()),
        (None, Some(path)) => RpcConfig::from_bitcoin_conf(path, args.network)
            .wrap_err_with(|| format!("read {}", path.display()))?,
        (None, None) => RpcConfig::discover(args.network)?,
    };

    if args.rpc_user.is_some() || args.rpc_pass.is_some() {
        config.user = args.rpc_user.clone();
        config.pass = args.rpc_pass.clone();
    } else if args.rpc_cookie_file.is_some() {
        // File credentials would otherwise outrank the cookie.
        config.user = None;
        config.pass = None;
    }
    if let Some(cookie) = &args.rpc_cookie_file {
        config = config.with_cookie_file(cookie.clone());
    }

    Ok(config
        .with_timeout(Duration::from_secs(args.timeout))
        .with_accept_invalid_certs(args.insecure))
}

/// `6` and `true` and `["a"]` go out as JSON; anything that does not parse
/// (an address, a txid) goes out as a string.
fn parse_param(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_owned()))
}

/// Strings print bare and `null` prints nothing, like `bitcoin-cli`.
fn render_result(result: &Value) -> eyre::Result<Option<String>> {
    match result {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        other => Ok(Some(
            serde_json::to_string_pretty(other).context("format result")?,
        )),
    }
}

fn is_connection_error(err: &CoreError) -> bool {
    matches!(
        err,
        CoreError::Rpc(RpcError::Transport(_)) | CoreError::Rpc(RpcError::HttpStatus { .. })
    )
}

fn format_rpc_connect_error(rpc_url: &str, source_error: &str) -> String {
    let mut lines = vec![
        format!("could not query RPC endpoint `{rpc_url}`"),
        format!("RPC error: {source_error}"),
    ];

    if source_error.contains("Could not resolve host") || source_error.contains("dns error") {
        lines.push(
            "hint: hostname resolution failed; verify the endpoint hostname and your DNS/network"
                .into(),
        );
    } else if source_error.contains("tls")
        || source_error.contains("certificate")
        || source_error.contains("SSL")
    {
        lines.push(
            "hint: TLS handshake failed; verify certificate trust or pass --insecure".into(),
        );
    } else if source_error.contains("401") || source_error.contains("403") {
        lines.push(
            "hint: authentication failed; verify --rpc-user/--rpc-pass, the cookie file or rpcuser/rpcpassword in bitcoin.conf"
                .into(),
        );
    } else if source_error.contains("404") {
        lines.push("hint: endpoint path is invalid; verify the full RPC URL including any /wallet/<name> path".into());
    } else if source_error.contains("error sending request for url") {
        lines.push("hint: request could not be sent; check that the daemon is running with server=1 and the port is reachable".into());
    }

    lines.join("\n")
}
