use std::sync::Arc;

use hop_auth::IdentityProvider;
use hop_core::{AccessAuthority, CacheStore, DurableStore};
use hop_shortener::AliasService;

/// The alias service as assembled from backends chosen at startup.
pub type HopService = AliasService<dyn CacheStore, dyn DurableStore, dyn AccessAuthority>;

#[derive(Clone)]
pub struct AppState {
    pub(crate) service: Arc<HopService>,
    pub(crate) identity: Option<Arc<dyn IdentityProvider>>,
    pub(crate) app_secret: Arc<[u8]>,
    pub(crate) base_url: String,
}

impl AppState {
    pub fn new(
        service: HopService,
        app_secret: impl AsRef<[u8]>,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            service: Arc::new(service),
            identity: None,
            app_secret: Arc::from(app_secret.as_ref()),
            base_url: public_base_url.into(),
        }
    }

    /// Enables `/login` and `/register`.
    pub fn with_identity(mut self, identity: Arc<dyn IdentityProvider>) -> Self {
        self.identity = Some(identity);
        self
    }
}
