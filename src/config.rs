//! Server configuration.
//! Precedence: command-line flags, then `DESIGNBOARD_*` environment variables, then defaults.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use clap::Parser;

pub const DEFAULT_HTTP_PORT: u16 = 5000;

fn parse_bool_flag(s: &str) -> Result<bool, String> {
    match s.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(format!("invalid boolean '{}'", other)),
    }
}

/// designboard server: in-memory file tree behind a REST API
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "designboard_server", version)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener to
    #[arg(long = "bind", env = "DESIGNBOARD_BIND", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub bind: IpAddr,

    /// HTTP API port
    #[arg(long = "http-port", env = "DESIGNBOARD_HTTP_PORT", default_value_t = DEFAULT_HTTP_PORT)]
    pub http_port: u16,

    /// Load the sample project on startup
    #[arg(long = "seed", env = "DESIGNBOARD_SEED", default_value_t = true, value_parser = parse_bool_flag, action = clap::ArgAction::Set)]
    pub seed: bool,

    /// Start with only the root folder (same as --seed false)
    #[arg(long = "no-seed")]
    pub no_seed: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind: IpAddr::V4(Ipv4Addr::UNSPECIFIED), http_port: DEFAULT_HTTP_PORT, seed: true, no_seed: false }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> SocketAddr { SocketAddr::new(self.bind, self.http_port) }

    pub fn seed_enabled(&self) -> bool { self.seed && !self.no_seed }
}
