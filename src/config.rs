//! Command-line and environment configuration.

use std::net::SocketAddr;

use clap::{Parser, ValueEnum};

use crate::error::Error;

/// Which [`TweetStore`](crate::store::TweetStore) backs the service.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum StoreKind {
    /// Process memory; lost on restart.
    #[default]
    Memory,
    /// PostgreSQL via `--database-url`.
    Postgres,
}

/// A minimal tweet REST service.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Address to listen on
    #[arg(long, env = "TWEETD_LISTEN", default_value = "127.0.0.1:5000")]
    pub listen: SocketAddr,

    /// Storage backend
    #[arg(long, env = "TWEETD_STORE", value_enum, default_value_t = StoreKind::Memory)]
    pub store: StoreKind,

    /// PostgreSQL connection string, required with `--store postgres`
    #[arg(long, env = "TWEETD_DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// Upper bound on pooled database connections
    #[arg(long, env = "TWEETD_MAX_CONNECTIONS", default_value_t = 5)]
    pub max_connections: u32,

    /// Emit logs as JSON lines instead of human-readable text
    #[arg(long, env = "TWEETD_LOG_JSON")]
    pub log_json: bool,
}

impl Config {
    /// Cross-field checks clap cannot express on its own.
    pub fn validate(&self) -> Result<(), Error> {
        if self.store == StoreKind::Postgres && self.database_url.is_none() {
            return Err(Error::Config(
                "--store postgres requires --database-url (or TWEETD_DATABASE_URL)".to_owned(),
            ));
        }
        if self.max_connections == 0 {
            return Err(Error::Config("--max-connections must be at least 1".to_owned()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        Config::try_parse_from(std::iter::once("tweetd").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_to_memory_on_port_5000() {
        let config = parse(&[]);
        assert_eq!(config.listen, "127.0.0.1:5000".parse().unwrap());
        assert_eq!(config.store, StoreKind::Memory);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn postgres_needs_a_database_url() {
        let config = parse(&["--store", "postgres"]);
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let config = parse(&["--store", "postgres", "--database-url", "postgres://localhost/tweet"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_unknown_store_kind() {
        let res = Config::try_parse_from(["tweetd", "--store", "sqlite"]);
        assert!(res.is_err());
    }
}
