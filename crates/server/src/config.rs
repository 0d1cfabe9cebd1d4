// crates/server/src/config.rs
//! Startup configuration.
//!
//! Each setting resolves as: CLI flag, then environment, then default.
//! [`ServerConfig`] is built once in `main` and passed by reference.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use clap::Parser;
use fieldintel_db::SchemaVariant;

pub const DEFAULT_DB_FILE: &str = "field_intelligence.db";
pub const DEFAULT_PORT: u16 = 5000;
/// Bundle directory served when `--static-dir`/`STATIC_DIR` is unset.
pub const DEFAULT_STATIC_DIR: &str = "build";

#[derive(Debug, Parser)]
#[command(name = "fieldintel")]
#[command(about = "Read-only field intelligence analytics API", long_about = None)]
#[command(version)]
pub struct Cli {
    /// SQLite store to serve (env: FIELDINTEL_DB, DB_FILE)
    #[arg(long)]
    pub db: Option<PathBuf>,
    /// Schema layout: outcome, severity or auto (env: FIELDINTEL_SCHEMA)
    #[arg(long)]
    pub schema: Option<String>,
    /// Bind address (env: HOST)
    #[arg(long)]
    pub host: Option<IpAddr>,
    /// Listen port (env: FIELDINTEL_PORT, PORT)
    #[arg(long)]
    pub port: Option<u16>,
    /// Dashboard bundle directory (env: STATIC_DIR)
    #[arg(long)]
    pub static_dir: Option<PathBuf>,
}

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub db_path: PathBuf,
    /// `None` means detect from the store.
    pub schema: Option<SchemaVariant>,
    pub host: IpAddr,
    pub port: u16,
    pub static_dir: Option<PathBuf>,
}

impl ServerConfig {
    /// Resolve against the process environment.
    pub fn resolve(cli: Cli) -> anyhow::Result<Self> {
        Self::resolve_with(cli, |key| std::env::var(key).ok())
    }

    /// Resolve with an injectable environment lookup.
    pub fn resolve_with(cli: Cli, env: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let first = |keys: &[&str]| {
            keys.iter()
                .find_map(|k| env(*k).filter(|v| !v.trim().is_empty()))
        };

        let db_path = cli
            .db
            .or_else(|| first(&["FIELDINTEL_DB", "DB_FILE"]).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE));

        let schema = match cli.schema.or_else(|| first(&["FIELDINTEL_SCHEMA"])) {
            Some(raw) if raw.trim().eq_ignore_ascii_case("auto") => None,
            Some(raw) => Some(raw.parse::<SchemaVariant>()?),
            None => None,
        };

        let host = match cli.host {
            Some(host) => host,
            None => match first(&["HOST"]) {
                Some(raw) => raw
                    .trim()
                    .parse()
                    .map_err(|e| anyhow::anyhow!("invalid HOST {raw:?}: {e}"))?,
                None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            },
        };

        let port = cli
            .port
            .or_else(|| first(&["FIELDINTEL_PORT", "PORT"]).and_then(|p| p.trim().parse().ok()))
            .unwrap_or(DEFAULT_PORT);

        let static_dir = cli
            .static_dir
            .or_else(|| first(&["STATIC_DIR"]).map(PathBuf::from))
            .or_else(|| {
                let build = PathBuf::from(DEFAULT_STATIC_DIR);
                build.is_dir().then_some(build)
            });

        Ok(Self {
            db_path,
            schema,
            host,
            port,
            static_dir,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
