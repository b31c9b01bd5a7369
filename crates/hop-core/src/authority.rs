use crate::error::AuthorityError;
use crate::store::UserId;
use async_trait::async_trait;

/// External service that knows which principals are administrators.
#[async_trait]
pub trait AccessAuthority: Send + Sync + 'static {
    async fn is_admin(&self, user: UserId) -> Result<bool, AuthorityError>;
}
