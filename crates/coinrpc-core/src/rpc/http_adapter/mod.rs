//! Native JSON-RPC client for Bitcoin Core compatible endpoints.
//!
//! Implements [`BitcoinRpc`](super::BitcoinRpc) over JSON-RPC 1.0 using
//! `reqwest`, with basic auth from explicit credentials, URL user-info or a
//! cookie file.

mod client;
mod connection;
mod protocol;

pub use client::HttpRpcClient;
