use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::{
    config::CoreConfig,
    repository::{MemoryStore, Repository, RestStore, TokenCell, seed},
    session::{Authenticator, RemoteAuth, SessionContext, StaticAuth},
};

pub mod config;
pub mod content;
pub mod display;
pub mod editor;
pub mod fs;
pub mod relay;
pub mod repository;
pub mod router;
pub mod session;

pub use content::{LoadError, PortfolioContent};
pub use editor::Editor;
pub use repository::entities::{Edit, Record, Table};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] config::Error),
    #[error(transparent)]
    Store(#[from] repository::store::Error),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Editor(#[from] editor::Error),
    #[error(transparent)]
    Patch(#[from] repository::entities::PatchError),
    #[error(transparent)]
    Auth(#[from] session::auth::Error),
    #[error(transparent)]
    Relay(#[from] relay::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// The collaborators every frontend needs, wired from a [`CoreConfig`].
#[derive(Debug, Clone)]
pub struct Backend {
    pub repo: Repository,
    pub session: SessionContext,
    pub demo: bool,
}

impl Backend {
    /// Connect to the configured remote backend, or fall back to seeded in-memory data.
    pub fn from_config(cfg: &CoreConfig) -> Result<Self> {
        match &cfg.remote {
            Some(remote) => {
                info!("Using remote backend at {}", remote.url);

                let token = TokenCell::default();
                let store = RestStore::new(&remote.url, &remote.anon_key, token.clone());
                let auth = RemoteAuth::new(remote, token)?;

                Ok(Self::assemble(Arc::new(store), Arc::new(auth), false))
            }
            None => {
                info!("No remote backend configured, running on sample data");
                Ok(Self::demo(cfg))
            }
        }
    }

    pub fn demo(cfg: &CoreConfig) -> Self {
        let store = MemoryStore::new();
        seed::seed(&store);

        Self::assemble(
            Arc::new(store),
            Arc::new(StaticAuth::new(cfg.demo.clone())),
            true,
        )
    }

    fn assemble(
        store: Arc<dyn repository::store::Store>,
        auth: Arc<dyn Authenticator>,
        demo: bool,
    ) -> Self {
        Self {
            repo: Repository::new(store),
            session: SessionContext::new(auth),
            demo,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn test_demo_backend() {
        let backend = Backend::from_config(&CoreConfig::default()).unwrap();

        assert!(backend.demo);
        assert!(content::load(&backend.repo).await.is_ok());
        assert!(
            backend
                .session
                .sign_in("admin@example.com", "levelup")
                .await
                .is_ok()
        );
    }
}
