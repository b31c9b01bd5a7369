use crate::error::{AuthError, Result};
use async_trait::async_trait;
use hop_core::{AccessAuthority, AuthorityError, UserId};
use hop_proto_schema::v1::auth_client::AuthClient;
use hop_proto_schema::v1::{AppRequest, IsAdminRequest, LoginRequest, RegisterRequest};
use std::future::Future;
use std::time::Duration;
use tonic::transport::{Channel, Endpoint};
use tonic::{Code, Response, Status};
use tracing::{debug, error, info};
use typed_builder::TypedBuilder;

pub const DEFAULT_SSO_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, TypedBuilder)]
pub struct SsoConfig {
    /// gRPC endpoint, e.g. `http://127.0.0.1:44044`.
    #[builder(setter(into))]
    pub addr: String,
    #[builder(default = DEFAULT_SSO_TIMEOUT)]
    pub timeout: Duration,
}

/// Issues credentials for end users.
#[async_trait]
pub trait IdentityProvider: Send + Sync + 'static {
    /// Exchanges an email or username plus password for a signed token.
    async fn login(&self, placeholder: &str, password: &str) -> Result<String>;

    /// Creates a user and returns its id.
    async fn register(&self, email: &str, username: &str, password: &str) -> Result<UserId>;
}

/// Client for the external SSO service.
///
/// The channel connects on first use, so constructing a client never blocks
/// on the network.
#[derive(Debug, Clone)]
pub struct SsoClient {
    client: AuthClient<Channel>,
    timeout: Duration,
    app_id: i64,
}

impl SsoClient {
    pub fn connect_lazy(config: &SsoConfig) -> Result<Self> {
        let endpoint = Endpoint::from_shared(config.addr.clone())
            .map_err(|e| AuthError::Unavailable(format!("invalid sso address: {e}")))?
            .connect_timeout(config.timeout)
            .timeout(config.timeout);

        Ok(Self {
            client: AuthClient::new(endpoint.connect_lazy()),
            timeout: config.timeout,
            app_id: 0,
        })
    }

    /// Sets the application id sent with login requests.
    pub fn with_app_id(mut self, app_id: i64) -> Self {
        self.app_id = app_id;
        self
    }

    pub fn app_id(&self) -> i64 {
        self.app_id
    }

    /// Looks up the id the SSO service assigned to this application.
    pub async fn resolve_app_id(&self, name: &str, secret: &str) -> Result<i64> {
        let mut client = self.client.clone();
        let request = AppRequest {
            name: name.to_owned(),
            secret: secret.to_owned(),
        };

        let response = self
            .call(client.app_id(request))
            .await
            .map_err(|status| status_to_auth_error("app_id", status))?;

        info!(app_id = response.app_id, app = name, "Resolved SSO application id");
        Ok(response.app_id)
    }

    async fn call<T, F>(&self, call: F) -> std::result::Result<T, Status>
    where
        F: Future<Output = std::result::Result<Response<T>, Status>>,
    {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result.map(Response::into_inner),
            Err(_) => Err(Status::deadline_exceeded("sso call timed out")),
        }
    }
}

#[async_trait]
impl AccessAuthority for SsoClient {
    async fn is_admin(&self, user: UserId) -> std::result::Result<bool, AuthorityError> {
        let mut client = self.client.clone();

        let response = self
            .call(client.is_admin(IsAdminRequest { user_id: user }))
            .await
            .map_err(|status| {
                error!(user, code = ?status.code(), message = status.message(), "SSO is_admin failed");
                match status.code() {
                    Code::DeadlineExceeded => AuthorityError::Timeout(status.message().to_owned()),
                    Code::Unavailable => AuthorityError::Unavailable(status.message().to_owned()),
                    _ => AuthorityError::Rejected(status.message().to_owned()),
                }
            })?;

        debug!(user, is_admin = response.is_admin, "SSO admin check");
        Ok(response.is_admin)
    }
}

#[async_trait]
impl IdentityProvider for SsoClient {
    async fn login(&self, placeholder: &str, password: &str) -> Result<String> {
        let mut client = self.client.clone();
        let request = LoginRequest {
            placeholder: placeholder.to_owned(),
            password: password.to_owned(),
            app_id: self.app_id,
        };

        let response = self
            .call(client.login(request))
            .await
            .map_err(|status| status_to_auth_error("login", status))?;

        Ok(response.token)
    }

    async fn register(&self, email: &str, username: &str, password: &str) -> Result<UserId> {
        let mut client = self.client.clone();
        let request = RegisterRequest {
            email: email.to_owned(),
            username: username.to_owned(),
            password: password.to_owned(),
        };

        let response = self
            .call(client.register(request))
            .await
            .map_err(|status| status_to_auth_error("register", status))?;

        info!(user_id = response.user_id, "Registered user");
        Ok(response.user_id)
    }
}

fn status_to_auth_error(op: &'static str, status: Status) -> AuthError {
    let message = status.message().to_owned();
    match status.code() {
        Code::InvalidArgument | Code::Unauthenticated | Code::NotFound | Code::PermissionDenied => {
            debug!(op, code = ?status.code(), "SSO rejected credentials");
            AuthError::InvalidCredentials(message)
        }
        Code::AlreadyExists => AuthError::AlreadyExists(message),
        Code::DeadlineExceeded => {
            error!(op, "SSO call timed out");
            AuthError::Timeout
        }
        code => {
            error!(op, ?code, message = %message, "SSO call failed");
            AuthError::Unavailable(message)
        }
    }
}
