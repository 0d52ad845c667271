use std::{
    fs, io,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    config::{DemoConfig, RemoteConfig},
    fs::state_dir,
    repository::TokenCell,
};

const SESSION_FILE: &str = "session.toml";
const DEFAULT_REJECTION: &str = "Invalid login credentials";
/// Lifetime assumed when the token response does not state one.
const DEFAULT_LIFETIME_SECS: i64 = 3600;
/// A stored session this close to expiry is refreshed before use.
const EXPIRY_MARGIN_SECS: i64 = 60;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The collaborator refused the credentials. Displayed as-is on the login screen.
    #[error("{0}")]
    Rejected(String),
    #[error("authentication request failed: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
    /// Unix time at which `access_token` stops being accepted. Sessions persisted without one
    /// count as expired.
    #[serde(default)]
    pub expires_at: i64,
    pub user: User,
}

impl Session {
    pub fn is_expired(&self, now: i64) -> bool {
        self.expires_at <= now.saturating_add(EXPIRY_MARGIN_SECS)
    }
}

/// The external authentication collaborator.
#[async_trait]
pub trait Authenticator: std::fmt::Debug + Send + Sync {
    /// A previously established session, if one survived the last run.
    async fn restore(&self) -> Option<Session>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session>;

    /// End `session`. Local state is cleared even when the collaborator cannot be reached.
    async fn sign_out(&self, session: &Session) -> Result<()>;
}

/// Password authentication against the hosted backend (`{url}/auth/v1`).
///
/// The session is persisted between runs and its access token is published to the
/// [`TokenCell`] shared with the store.
#[derive(Debug, Clone)]
pub struct RemoteAuth {
    client: Client,
    base_url: String,
    anon_key: String,
    token: TokenCell,
    session_file: PathBuf,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    expires_at: Option<i64>,
    user: TokenUser,
}

impl TokenResponse {
    fn into_session(self, fallback_email: &str, now: i64) -> Session {
        let expires_at = self.expires_at.unwrap_or_else(|| {
            now.saturating_add(self.expires_in.unwrap_or(DEFAULT_LIFETIME_SECS))
        });

        Session {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at,
            user: User {
                id: self.user.id,
                email: self.user.email.unwrap_or_else(|| fallback_email.to_string()),
            },
        }
    }
}

#[derive(Deserialize)]
struct TokenUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

impl RemoteAuth {
    pub fn new(remote: &RemoteConfig, token: TokenCell) -> io::Result<Self> {
        Ok(Self::with_session_file(
            remote,
            token,
            state_dir()?.join(SESSION_FILE),
        ))
    }

    pub fn with_session_file(remote: &RemoteConfig, token: TokenCell, session_file: PathBuf) -> Self {
        Self {
            client: Client::new(),
            base_url: remote.url.trim_end_matches('/').to_string(),
            anon_key: remote.anon_key.clone(),
            token,
            session_file,
        }
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{path}", self.base_url)
    }

    fn persist(&self, session: &Session) {
        let written = toml::to_string(session)
            .map_err(io::Error::other)
            .and_then(|contents| fs::write(&self.session_file, contents));

        if let Err(err) = written {
            warn!(
                "Failed to persist session to {}: {err}",
                self.session_file.display()
            );
        }
    }

    fn forget(&self) {
        match fs::remove_file(&self.session_file) {
            Ok(()) => {}
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => warn!(
                "Failed to remove session file {}: {err}",
                self.session_file.display()
            ),
        }
        self.token.set(None);
    }

    /// Post to the token endpoint with the given grant. A non-2xx answer is a rejection carrying
    /// the collaborator's message.
    async fn request_token(&self, grant: &str, body: Value) -> Result<TokenResponse> {
        let response = self
            .client
            .post(self.auth_url("token"))
            .query(&[("grant_type", grant)])
            .header("apikey", &self.anon_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let body = response.json::<Value>().await.unwrap_or(Value::Null);
            return Err(Error::Rejected(rejection_message(&body)));
        }

        Ok(response.json::<TokenResponse>().await?)
    }

    /// Exchange the refresh token of `stale` for a new session.
    async fn refresh(&self, stale: &Session) -> Result<Session> {
        if stale.refresh_token.is_empty() {
            return Err(Error::Rejected("stored session cannot be refreshed".into()));
        }
        debug!("Refreshing session of {}", stale.user.email);

        let granted = self
            .request_token(
                "refresh_token",
                json!({ "refresh_token": stale.refresh_token }),
            )
            .await?;

        Ok(granted.into_session(&stale.user.email, Utc::now().timestamp()))
    }
}

fn read_session(path: &Path) -> Option<Session> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return None,
        Err(err) => {
            warn!("Failed to read session file {}: {err}", path.display());
            return None;
        }
    };

    toml::from_str(&contents)
        .inspect_err(|err| warn!("Discarding malformed session file {}: {err}", path.display()))
        .ok()
}

/// The message of a rejected token request. The hosted backend uses either
/// `error_description` or `msg` depending on the failure.
fn rejection_message(body: &Value) -> String {
    ["error_description", "msg", "message"]
        .into_iter()
        .find_map(|key| body.get(key).and_then(Value::as_str))
        .unwrap_or(DEFAULT_REJECTION)
        .to_string()
}

#[async_trait]
impl Authenticator for RemoteAuth {
    async fn restore(&self) -> Option<Session> {
        let stored = read_session(&self.session_file)?;

        let session = if stored.is_expired(Utc::now().timestamp()) {
            match self.refresh(&stored).await {
                Ok(session) => {
                    self.persist(&session);
                    session
                }
                Err(err) => {
                    warn!("Discarding expired session of {}: {err}", stored.user.email);
                    self.forget();
                    return None;
                }
            }
        } else {
            stored
        };

        info!("Restored session for {}", session.user.email);
        self.token.set(Some(session.access_token.clone()));
        Some(session)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        debug!("Signing in {email}");

        let session = self
            .request_token(
                "password",
                json!({ "email": email, "password": password }),
            )
            .await?
            .into_session(email, Utc::now().timestamp());

        info!("Signed in as {}", session.user.email);
        self.token.set(Some(session.access_token.clone()));
        self.persist(&session);

        Ok(session)
    }

    async fn sign_out(&self, session: &Session) -> Result<()> {
        let result = self
            .client
            .post(self.auth_url("logout"))
            .header("apikey", &self.anon_key)
            .bearer_auth(&session.access_token)
            .send()
            .await;

        self.forget();
        info!("Signed out {}", session.user.email);

        result?;
        Ok(())
    }
}

/// Fixed credentials, used while running against the in-memory backend.
#[derive(Debug, Clone)]
pub struct StaticAuth {
    credentials: DemoConfig,
}

impl StaticAuth {
    pub fn new(credentials: DemoConfig) -> Self {
        Self { credentials }
    }
}

#[async_trait]
impl Authenticator for StaticAuth {
    async fn restore(&self) -> Option<Session> {
        None
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        if email != self.credentials.email || password != self.credentials.password {
            return Err(Error::Rejected(DEFAULT_REJECTION.into()));
        }

        Ok(Session {
            access_token: "demo".into(),
            refresh_token: String::new(),
            expires_at: i64::MAX,
            user: User {
                id: "demo".into(),
                email: email.to_string(),
            },
        })
    }

    async fn sign_out(&self, _session: &Session) -> Result<()> {
        Ok(())
    }
}
