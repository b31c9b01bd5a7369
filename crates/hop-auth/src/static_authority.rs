use async_trait::async_trait;
use hop_core::{AccessAuthority, AuthorityError, UserId};
use std::collections::HashSet;

/// An [`AccessAuthority`] backed by a fixed list of administrators.
#[derive(Debug, Clone, Default)]
pub struct StaticAuthority {
    admins: HashSet<UserId>,
}

impl StaticAuthority {
    pub fn new(admins: impl IntoIterator<Item = UserId>) -> Self {
        Self {
            admins: admins.into_iter().collect(),
        }
    }
}

#[async_trait]
impl AccessAuthority for StaticAuthority {
    async fn is_admin(&self, user: UserId) -> Result<bool, AuthorityError> {
        Ok(self.admins.contains(&user))
    }
}
