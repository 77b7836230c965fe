use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::identity::errors::RepositoryError;
use crate::identity::models::Identity;
use crate::identity::models::Username;
use crate::identity::ports::IdentityRepository;

/// Process-local identity store keyed by username.
///
/// Used when no database is configured. Contents are lost on restart, which
/// the default account bootstrap makes up for.
#[derive(Default)]
pub struct InMemoryIdentityRepository {
    identities: RwLock<HashMap<String, Identity>>,
}

impl InMemoryIdentityRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.identities.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.identities.read().await.is_empty()
    }
}

#[async_trait]
impl IdentityRepository for InMemoryIdentityRepository {
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<Identity>, RepositoryError> {
        let identities = self.identities.read().await;
        Ok(identities.get(username.as_str()).cloned())
    }

    async fn save(&self, identity: Identity) -> Result<(), RepositoryError> {
        let mut identities = self.identities.write().await;
        identities.insert(identity.username.as_str().to_string(), identity);
        Ok(())
    }

    async fn exists(&self, username: &Username) -> Result<bool, RepositoryError> {
        let identities = self.identities.read().await;
        Ok(identities.contains_key(username.as_str()))
    }
}
