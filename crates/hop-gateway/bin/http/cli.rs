use clap::{Parser, ValueEnum};
use jiff::SignedDuration;
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;

pub const LISTEN_ADDR_ENV: &str = "HOP_LISTEN_ADDR";
pub const ENV_ENV: &str = "HOP_ENV";
pub const BASE_URL_ENV: &str = "HOP_BASE_URL";
pub const APP_NAME_ENV: &str = "HOP_APP_NAME";
pub const APP_SECRET_ENV: &str = "HOP_APP_SECRET";
pub const STORAGE_BACKEND_ENV: &str = "HOP_STORAGE_BACKEND";
pub const MYSQL_DSN_ENV: &str = "HOP_MYSQL_DSN";
pub const MYSQL_MAX_CONNECTIONS_ENV: &str = "HOP_MYSQL_MAX_CONNECTIONS";
pub const SKIP_MIGRATIONS_ENV: &str = "HOP_SKIP_MIGRATIONS";
pub const CACHE_BACKEND_ENV: &str = "HOP_CACHE_BACKEND";
pub const REDIS_URL_ENV: &str = "HOP_REDIS_URL";
pub const CACHE_TTL_ENV: &str = "HOP_CACHE_TTL";
pub const CACHE_CAPACITY_ENV: &str = "HOP_CACHE_CAPACITY";
pub const ALIAS_LENGTH_ENV: &str = "HOP_ALIAS_LENGTH";
pub const GENERATION_BUDGET_ENV: &str = "HOP_GENERATION_BUDGET";
pub const STORE_TIMEOUT_ENV: &str = "HOP_STORE_TIMEOUT";
pub const REQUEST_TIMEOUT_ENV: &str = "HOP_REQUEST_TIMEOUT";
pub const SSO_ADDR_ENV: &str = "HOP_SSO_ADDR";
pub const SSO_TIMEOUT_ENV: &str = "HOP_SSO_TIMEOUT";
pub const ADMIN_IDS_ENV: &str = "HOP_ADMIN_IDS";

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_APP_NAME: &str = "hop";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Environment {
    #[value(name = "local")]
    Local,
    #[value(name = "dev")]
    Dev,
    #[value(name = "prod")]
    Prod,
}

impl Environment {
    /// Filter used when `RUST_LOG` is unset.
    pub fn default_filter(self) -> &'static str {
        match self {
            Environment::Local | Environment::Dev => "debug",
            Environment::Prod => "info",
        }
    }
}

impl Display for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Local => write!(f, "local"),
            Environment::Dev => write!(f, "dev"),
            Environment::Prod => write!(f, "prod"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    #[value(name = "in-memory")]
    InMemory,
    #[value(name = "mysql")]
    Mysql,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::InMemory => write!(f, "in-memory"),
            StorageBackendArg::Mysql => write!(f, "mysql"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CacheBackendArg {
    #[value(name = "moka")]
    Moka,
    #[value(name = "redis")]
    Redis,
}

impl Display for CacheBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheBackendArg::Moka => write!(f, "moka"),
            CacheBackendArg::Redis => write!(f, "redis"),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "hop", about = "hop URL shortener HTTP gateway")]
pub struct CLI {
    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    #[arg(long, env = ENV_ENV, value_enum, default_value_t = Environment::Local)]
    pub env: Environment,

    /// Public prefix used to build short links.
    #[arg(long, env = BASE_URL_ENV, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    #[arg(long, env = APP_NAME_ENV, default_value = DEFAULT_APP_NAME)]
    pub app_name: String,

    /// Shared secret for verifying HMAC-signed tokens issued by the SSO service.
    #[arg(long, env = APP_SECRET_ENV, hide_env_values = true)]
    pub app_secret: String,

    #[arg(
        long,
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackendArg::InMemory
    )]
    pub storage: StorageBackendArg,

    #[arg(long, env = MYSQL_DSN_ENV, required_if_eq("storage", "mysql"), hide_env_values = true)]
    pub mysql_dsn: Option<String>,

    #[arg(long, env = MYSQL_MAX_CONNECTIONS_ENV, default_value_t = 10)]
    pub mysql_max_connections: u32,

    #[arg(long, env = SKIP_MIGRATIONS_ENV, default_value_t = false)]
    pub skip_migrations: bool,

    #[arg(
        long,
        env = CACHE_BACKEND_ENV,
        value_enum,
        default_value_t = CacheBackendArg::Moka
    )]
    pub cache: CacheBackendArg,

    #[arg(long, env = REDIS_URL_ENV, required_if_eq("cache", "redis"))]
    pub redis_url: Option<String>,

    /// Lifetime of cache entries. Bounds how long a deleted alias may
    /// still resolve from the cache.
    #[arg(long, env = CACHE_TTL_ENV, default_value = "10m")]
    pub cache_ttl: SignedDuration,

    #[arg(long, env = CACHE_CAPACITY_ENV, default_value_t = 100_000)]
    pub cache_capacity: u64,

    #[arg(long, env = ALIAS_LENGTH_ENV, default_value_t = 6, value_parser = clap::value_parser!(u16).range(1..=64))]
    pub alias_length: u16,

    #[arg(long, env = GENERATION_BUDGET_ENV, default_value = "5s")]
    pub generation_budget: SignedDuration,

    #[arg(long, env = STORE_TIMEOUT_ENV, default_value = "3s")]
    pub store_timeout: SignedDuration,

    #[arg(long, env = REQUEST_TIMEOUT_ENV, default_value = "10s")]
    pub request_timeout: SignedDuration,

    /// gRPC address of the SSO service. Without it, admins come from
    /// `--admin-ids` and login/registration are disabled.
    #[arg(long, env = SSO_ADDR_ENV)]
    pub sso_addr: Option<String>,

    #[arg(long, env = SSO_TIMEOUT_ENV, default_value = "5s")]
    pub sso_timeout: SignedDuration,

    #[arg(long, env = ADMIN_IDS_ENV, value_delimiter = ',')]
    pub admin_ids: Vec<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = CLI::try_parse_from(["hop", "--app-secret", "s"]).unwrap();

        assert_eq!(cli.env, Environment::Local);
        assert_eq!(cli.storage, StorageBackendArg::InMemory);
        assert_eq!(cli.cache, CacheBackendArg::Moka);
        assert_eq!(cli.cache_ttl, SignedDuration::from_mins(10));
        assert_eq!(cli.generation_budget, SignedDuration::from_secs(5));
        assert_eq!(cli.alias_length, 6);
        assert!(cli.sso_addr.is_none());
    }

    #[test]
    fn mysql_requires_dsn() {
        let result = CLI::try_parse_from(["hop", "--app-secret", "s", "--storage", "mysql"]);
        assert!(result.is_err());
    }

    #[test]
    fn admin_ids_are_comma_separated() {
        let cli =
            CLI::try_parse_from(["hop", "--app-secret", "s", "--admin-ids", "1,2,3"]).unwrap();
        assert_eq!(cli.admin_ids, vec![1, 2, 3]);
    }
}
