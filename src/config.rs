//! Server configuration from command-line flags and environment

use clap::Parser;

/// makemyad-server - classified-ads marketplace API
#[derive(Debug, Clone, Parser)]
#[command(name = "makemyad-server", version, about)]
pub struct ServerConfig {
    /// Interface to bind
    #[arg(long, env = "MAKEMYAD_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Listen on PORT
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Start with an empty marketplace instead of the demo data
    #[arg(long)]
    pub no_seed: bool,

    /// tracing-subscriber filter directives
    #[arg(long, env = "MAKEMYAD_LOG", default_value = "makemyad=info,tower_http=info")]
    pub log_filter: String,
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_flags_win() {
        let cfg = ServerConfig::try_parse_from([
            "makemyad-server",
            "--host",
            "127.0.0.1",
            "--port",
            "8081",
            "--no-seed",
            "--log-filter",
            "debug",
        ])
        .unwrap();
        assert_eq!(cfg.addr(), "127.0.0.1:8081");
        assert!(cfg.no_seed);
        assert_eq!(cfg.log_filter, "debug");
    }

    #[test]
    fn rejects_non_numeric_port() {
        assert!(ServerConfig::try_parse_from(["makemyad-server", "--port", "http"]).is_err());
    }
}
