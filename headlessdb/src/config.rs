//! Process configuration, read from flags with environment fallbacks.

use std::net::SocketAddr;
use clap::{ArgAction, Parser, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendKind {
    /// Volatile in-process storage.
    Memory,
    /// MongoDB, available when built with the `mongodb` feature.
    Mongodb,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "headlessdb", version, about = "Headless JSON document database with schema-checked collections")]
pub struct Config {
    /// Address the HTTP server listens on.
    #[arg(long, env = "HEADLESSDB_BIND", default_value = "127.0.0.1:3000")]
    pub bind: SocketAddr,

    /// Storage backend for collections and documents.
    #[arg(long, env = "HEADLESSDB_BACKEND", value_enum, default_value = "memory")]
    pub backend: BackendKind,

    #[arg(long, env = "HEADLESSDB_MONGODB_URI", default_value = "mongodb://localhost:27017")]
    pub mongodb_uri: String,

    #[arg(long, env = "HEADLESSDB_MONGODB_DATABASE", default_value = "headlessdb")]
    pub mongodb_database: String,

    /// Emit logs as JSON.
    #[arg(long, env = "HEADLESSDB_LOG_JSON")]
    pub json: bool,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["headlessdb"]).unwrap();

        assert_eq!(config.bind, "127.0.0.1:3000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.backend, BackendKind::Memory);
        assert_eq!(config.mongodb_database, "headlessdb");
        assert!(!config.json);
        assert_eq!(config.verbose, 0);
    }

    #[test]
    fn test_flags() {
        let config = Config::try_parse_from([
            "headlessdb",
            "--bind",
            "0.0.0.0:8080",
            "--backend",
            "mongodb",
            "--mongodb-uri",
            "mongodb://db:27017",
            "--json",
            "-vv",
        ])
        .unwrap();

        assert_eq!(config.bind.port(), 8080);
        assert_eq!(config.backend, BackendKind::Mongodb);
        assert_eq!(config.mongodb_uri, "mongodb://db:27017");
        assert!(config.json);
        assert_eq!(config.verbose, 2);
    }

    #[test]
    fn test_rejects_unknown_backend() {
        assert!(Config::try_parse_from(["headlessdb", "--backend", "sqlite"]).is_err());
    }
}
