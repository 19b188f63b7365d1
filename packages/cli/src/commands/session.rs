use std::sync::Arc;

use anyhow::{bail, Context, Result};
use contractform_sync::{Credentials, FileStore, IdentityState, SyncEngine};

use crate::config::Config;

/// Environment variable carrying the store token
pub const TOKEN_ENV: &str = "CONTRACTFORM_TOKEN";

const LOCAL_TOKEN: &str = "local";

/// Engine over the configured store, loaded once for a single command
pub struct Session {
    pub config: Config,
    pub engine: SyncEngine,
}

impl Session {
    /// Load config, sign in as `owner` (or the configured owner) and pull the
    /// current contracts into the index.
    pub async fn open(cwd: &str, owner: Option<String>) -> Result<Self> {
        let config = Config::load(cwd)?;
        let store = FileStore::new(config.get_store_dir(cwd));
        let engine = SyncEngine::new(Arc::new(store), config.sync_config());

        engine.set_identity(identity_for(owner.or_else(|| config.owner_id.clone())));
        engine.poll().await.context("loading contracts")?;

        Ok(Self { config, engine })
    }

    pub fn identity(&self) -> IdentityState {
        self.engine.identity()
    }

    pub fn require_signed_in(&self) -> Result<()> {
        if !self.identity().is_authenticated() {
            bail!("not signed in; pass --owner or set ownerId in the config");
        }
        Ok(())
    }

    /// Push everything committed during this command.
    pub async fn save(&self) -> Result<()> {
        self.engine.push_pending().await;
        let unsaved = self.engine.unpushed();
        if !unsaved.is_empty() {
            bail!("{} contract(s) could not be saved", unsaved.len());
        }
        Ok(())
    }
}

pub fn identity_for(owner: Option<String>) -> IdentityState {
    match owner {
        Some(owner_id) => {
            let token = std::env::var(TOKEN_ENV).unwrap_or_else(|_| LOCAL_TOKEN.to_string());
            IdentityState::Authenticated(Credentials::new(owner_id, token))
        }
        None => IdentityState::Unauthenticated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_CONFIG_NAME;

    #[test]
    fn test_no_owner_is_signed_out() {
        assert_eq!(identity_for(None), IdentityState::Unauthenticated);
        assert_eq!(identity_for(Some("me".into())).owner_id(), Some("me"));
    }

    #[tokio::test]
    async fn test_session_reads_and_saves_store() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().to_str().unwrap();
        std::fs::write(dir.path().join(DEFAULT_CONFIG_NAME), r#"{ "storeDir": "db" }"#).unwrap();

        let session = Session::open(cwd, Some("me".into())).await.unwrap();
        let id = session
            .engine
            .create(contractform_document::contract::template_body())
            .unwrap();
        session.save().await.unwrap();

        let reopened = Session::open(cwd, Some("me".into())).await.unwrap();
        assert!(reopened.engine.get(&id).is_some());
        assert!(dir.path().join("db").join(format!("{id}.json")).exists());

        let stranger = Session::open(cwd, Some("other".into())).await.unwrap();
        assert!(stranger.engine.get(&id).is_none());
    }
}
