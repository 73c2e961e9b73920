//! Connection settings for [`HttpRpcClient`](crate::rpc::HttpRpcClient).
//!
//! Settings can be built by hand or read from a `bitcoin.conf` file, the
//! same file the daemon itself reads.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use bitcoin::Network;
use tracing::debug;

use crate::error::CoreError;

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Credentials used by [`RpcConfig::discover`] when no config file exists.
const FALLBACK_USER: &str = "user";
const FALLBACK_PASS: &str = "pass";

#[derive(Debug, Clone)]
pub struct RpcConfig {
    /// `http://` or `https://` endpoint. May carry `user:pass@` user-info.
    pub url: String,
    pub user: Option<String>,
    pub pass: Option<String>,
    /// Cookie written by the daemon (`username:password` on the first line),
    /// used when no explicit credentials are given.
    pub cookie_file: Option<PathBuf>,
    pub connect_timeout: Duration,
    pub timeout: Duration,
    /// Skip TLS certificate verification for `https` endpoints.
    pub accept_invalid_certs: bool,
}

impl RpcConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            user: None,
            pass: None,
            cookie_file: None,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            timeout: DEFAULT_TIMEOUT,
            accept_invalid_certs: false,
        }
    }

    pub fn with_credentials(mut self, user: impl Into<String>, pass: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self.pass = Some(pass.into());
        self
    }

    pub fn with_cookie_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.cookie_file = Some(path.into());
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Build settings from a `bitcoin.conf` file.
    ///
    /// Reads `rpcuser`, `rpcpassword`, `rpcconnect` and `rpcport`. Keys in a
    /// network section (`[main]`, `[test]`, `[testnet4]`, `[signet]`,
    /// `[regtest]`) apply only to that network and override top-level keys.
    /// Without `rpcuser`, the daemon's cookie file next to the config is used.
    pub fn from_bitcoin_conf(path: &Path, network: Network) -> Result<Self, CoreError> {
        let content = std::fs::read_to_string(path)?;
        let conf = parse_bitcoin_conf(&content, network);

        let host = conf.get("rpcconnect").map_or("localhost", String::as_str);
        let port = match conf.get("rpcport") {
            Some(port) => port.parse::<u16>().map_err(|e| {
                CoreError::Config(format!(
                    "invalid rpcport `{port}` in {}: {e}",
                    path.display()
                ))
            })?,
            None => default_rpc_port(network),
        };

        let mut config = Self::new(format!("http://{host}:{port}"));
        match (conf.get("rpcuser"), conf.get("rpcpassword")) {
            (Some(user), Some(pass)) => config = config.with_credentials(user, pass),
            (None, None) => {
                let data_dir = path.parent().unwrap_or_else(|| Path::new("."));
                config = config.with_cookie_file(cookie_path(data_dir, network));
            }
            _ => {
                return Err(CoreError::Config(format!(
                    "{} must set both rpcuser and rpcpassword",
                    path.display()
                )))
            }
        }

        debug!(path = %path.display(), url = %config.url, "loaded bitcoin.conf");
        Ok(config)
    }

    /// Locate a `bitcoin.conf` in the usual places (`~/.bitcoin` on Unix,
    /// `%APPDATA%\Bitcoin` on Windows) and read it. When none exists, fall
    /// back to `user`/`pass` on `localhost` at the network's default port.
    pub fn discover(network: Network) -> Result<Self, CoreError> {
        Self::discover_in(&default_conf_paths(), network)
    }

    fn discover_in(candidates: &[PathBuf], network: Network) -> Result<Self, CoreError> {
        if let Some(path) = candidates.iter().find(|path| path.is_file()) {
            return Self::from_bitcoin_conf(path, network);
        }

        debug!(?network, "no bitcoin.conf found; using fallback credentials");
        Ok(
            Self::new(format!("http://localhost:{}", default_rpc_port(network)))
                .with_credentials(FALLBACK_USER, FALLBACK_PASS),
        )
    }
}

/// The daemon's default RPC port for `network`.
pub fn default_rpc_port(network: Network) -> u16 {
    match network {
        Network::Testnet => 18332,
        Network::Testnet4 => 48332,
        Network::Signet => 38332,
        Network::Regtest => 18443,
        _ => 8332,
    }
}

fn section_name(network: Network) -> &'static str {
    match network {
        Network::Testnet => "test",
        Network::Testnet4 => "testnet4",
        Network::Signet => "signet",
        Network::Regtest => "regtest",
        _ => "main",
    }
}

fn cookie_path(data_dir: &Path, network: Network) -> PathBuf {
    let dir = match network {
        Network::Testnet => data_dir.join("testnet3"),
        Network::Testnet4 => data_dir.join("testnet4"),
        Network::Signet => data_dir.join("signet"),
        Network::Regtest => data_dir.join("regtest"),
        _ => data_dir.to_path_buf(),
    };
    dir.join(".cookie")
}

fn default_conf_paths() -> Vec<PathBuf> {
    conf_paths(dirs::home_dir(), std::env::var_os("APPDATA").map(PathBuf::from))
}

fn conf_paths(home: Option<PathBuf>, app_data: Option<PathBuf>) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(home) = home {
        paths.push(home.join(".bitcoin").join("bitcoin.conf"));
    }
    if let Some(app_data) = app_data {
        paths.push(app_data.join("Bitcoin").join("bitcoin.conf"));
    }
    paths
}

/// Collect the `key=value` settings that apply to `network`.
fn parse_bitcoin_conf(content: &str, network: Network) -> HashMap<String, String> {
    let wanted = section_name(network);
    let mut global = HashMap::new();
    let mut scoped = HashMap::new();
    let mut section: Option<&str> = None;

    for line in content.lines() {
        let line = line.split('#').next().unwrap_or_default().trim();
        if line.is_empty() {
            continue;
        }
        if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            section = Some(name.trim());
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let entry = (key.trim().to_owned(), value.trim().to_owned());
        match section {
            None => {
                global.insert(entry.0, entry.1);
            }
            Some(name) if name == wanted => {
                scoped.insert(entry.0, entry.1);
            }
            Some(_) => {}
        }
    }

    global.extend(scoped);
    global
}
