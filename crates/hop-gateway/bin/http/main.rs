mod cli;

use crate::cli::{CacheBackendArg, Environment, StorageBackendArg, CLI};
use anyhow::Context;
use clap::Parser;
use hop_auth::{IdentityProvider, SsoClient, SsoConfig, StaticAuthority};
use hop_cache::{MokaCacheStore, RedisCacheStore};
use hop_core::{AccessAuthority, CacheStore, DurableStore};
use hop_gateway::{App, AppState};
use hop_shortener::{AliasService, ServiceConfig};
use hop_storage::{InMemoryStore, MySqlStore};
use jiff::SignedDuration;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::parse();

    init_tracing(config.env);

    info!(
        listen_addr = %config.listen_addr,
        env = %config.env,
        storage_backend = %config.storage,
        cache_backend = %config.cache,
        "starting hop gateway"
    );

    let durable = durable_store(&config).await?;
    let cache = cache_store(&config).await?;

    let service_config = ServiceConfig::builder()
        .alias_length(usize::from(config.alias_length))
        .generation_budget(to_std(config.generation_budget, "generation budget")?)
        .store_timeout(to_std(config.store_timeout, "store timeout")?)
        .build();

    let mut identity: Option<Arc<dyn IdentityProvider>> = None;
    let authority: Arc<dyn AccessAuthority> = match &config.sso_addr {
        Some(addr) => {
            let sso_config = SsoConfig::builder()
                .addr(addr.as_str())
                .timeout(to_std(config.sso_timeout, "sso timeout")?)
                .build();
            let client = SsoClient::connect_lazy(&sso_config)?;
            let app_id = client
                .resolve_app_id(&config.app_name, &config.app_secret)
                .await
                .context("failed to resolve application id from SSO")?;
            let client = Arc::new(client.with_app_id(app_id));
            identity = Some(client.clone());
            client
        }
        None => {
            warn!(
                admins = config.admin_ids.len(),
                "no SSO address configured, login and registration are disabled"
            );
            Arc::new(StaticAuthority::new(config.admin_ids.iter().copied()))
        }
    };

    let service = AliasService::new(service_config, cache, durable, authority);

    let mut state = AppState::new(service, config.app_secret.as_bytes(), &config.base_url);
    if let Some(identity) = identity {
        state = state.with_identity(identity);
    }

    let app = App::router_with_timeout(state, to_std(config.request_timeout, "request timeout")?);

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    info!(listen_addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("gateway stopped");
    Ok(())
}

fn init_tracing(env: Environment) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(env.default_filter()));
    let registry = tracing_subscriber::registry().with(filter);

    match env {
        Environment::Local | Environment::Dev => registry.with(fmt::layer().pretty()).init(),
        Environment::Prod => registry.with(fmt::layer().json()).init(),
    }
}

async fn durable_store(config: &CLI) -> anyhow::Result<Arc<dyn DurableStore>> {
    match config.storage {
        StorageBackendArg::InMemory => Ok(Arc::new(InMemoryStore::new())),
        StorageBackendArg::Mysql => {
            let dsn = config
                .mysql_dsn
                .as_deref()
                .context("mysql dsn is required when storage backend is mysql")?;
            let store = MySqlStore::connect(dsn, config.mysql_max_connections)
                .await
                .context("failed to connect to mysql")?;
            if !config.skip_migrations {
                store.migrate().await.context("failed to run migrations")?;
                info!("database migrations applied");
            }
            Ok(Arc::new(store))
        }
    }
}

async fn cache_store(config: &CLI) -> anyhow::Result<Arc<dyn CacheStore>> {
    let ttl = to_std(config.cache_ttl, "cache ttl")?;

    match config.cache {
        CacheBackendArg::Moka => Ok(Arc::new(MokaCacheStore::from(
            MokaCacheStore::builder()
                .max_capacity(config.cache_capacity)
                .ttl(ttl)
                .build(),
        ))),
        CacheBackendArg::Redis => {
            let url = config
                .redis_url
                .as_deref()
                .context("redis url is required when cache backend is redis")?;
            let store = RedisCacheStore::connect(url)
                .await
                .context("failed to connect to redis")?;
            Ok(Arc::new(store.with_ttl(ttl)))
        }
    }
}

fn to_std(duration: SignedDuration, name: &str) -> anyhow::Result<Duration> {
    Duration::try_from(duration).with_context(|| format!("{name} must not be negative"))
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown signal received");
}
