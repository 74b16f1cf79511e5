use anyhow::{anyhow, Result};
use async_trait::async_trait;

/// Identity asserted by a third-party provider after its sign-in popup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderIdentity {
    pub name: String,
    pub email: String,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in(&self) -> Result<ProviderIdentity>;
}

/// Provider whose assertion is already known, e.g. handed over by a browser
/// helper or typed on the command line.
pub struct StaticIdentityProvider {
    identity: ProviderIdentity,
}

impl StaticIdentityProvider {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            identity: ProviderIdentity {
                name: name.into(),
                email: email.into(),
            },
        }
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentityProvider {
    async fn sign_in(&self) -> Result<ProviderIdentity> {
        if self.identity.email.trim().is_empty() {
            return Err(anyhow!("identity provider returned no email"));
        }
        Ok(self.identity.clone())
    }
}

pub struct MissingIdentityProvider;

#[async_trait]
impl IdentityProvider for MissingIdentityProvider {
    async fn sign_in(&self) -> Result<ProviderIdentity> {
        Err(anyhow!("identity provider is unavailable"))
    }
}
