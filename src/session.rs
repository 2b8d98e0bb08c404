//! Session state: one opaque bearer token and a derived boolean flag.
//!
//! The token is the client's only durable state. It lives in a single
//! file under the app dir (the analogue of browser local storage under a
//! fixed key). The authenticated flag is broadcast through a watch
//! channel: the route guard and the request authorizer read it, and only
//! login, logout and 401 handling write it.

use std::fs;
use std::sync::RwLock;

use tokio::sync::watch;

use crate::config::Config;
use crate::{tlog_debug, tlog_warn, Result};

pub struct SessionStore {
    token: RwLock<Option<String>>,
    flag_tx: watch::Sender<bool>,
    persistent: bool,
}

impl SessionStore {
    /// Load the persisted token, if any. A missing token file just means
    /// an unauthenticated session.
    pub fn load() -> Result<Self> {
        let path = Config::token_path()?;
        let token = match fs::read_to_string(&path) {
            Ok(raw) => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            Err(_) => None,
        };
        tlog_debug!(
            "SessionStore::load authenticated={} path={}",
            token.is_some(),
            path.display()
        );
        let (flag_tx, _) = watch::channel(token.is_some());
        Ok(Self {
            token: RwLock::new(token),
            flag_tx,
            persistent: true,
        })
    }

    /// Construct an in-memory store, not backed by the token file.
    #[doc(hidden)]
    pub fn ephemeral(token: Option<String>) -> Self {
        let (flag_tx, _) = watch::channel(token.is_some());
        Self {
            token: RwLock::new(token),
            flag_tx,
            persistent: false,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.read().map(|t| t.is_some()).unwrap_or(false)
    }

    pub fn token(&self) -> Option<String> {
        self.token.read().ok().and_then(|t| t.clone())
    }

    /// Observe the authenticated flag. The receiver sees the current
    /// value immediately and every flip afterwards.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.flag_tx.subscribe()
    }

    /// Persist a freshly issued token and flip the flag true.
    pub fn set_token(&self, token: &str) -> Result<()> {
        if self.persistent {
            let dir = Config::taskdeck_dir()?;
            if !dir.exists() {
                fs::create_dir_all(&dir)?;
            }
            fs::write(Config::token_path()?, token)?;
        }
        if let Ok(mut slot) = self.token.write() {
            *slot = Some(token.to_string());
        }
        let _ = self.flag_tx.send(true);
        tlog_debug!("SessionStore::set_token stored");
        Ok(())
    }

    /// Drop the token and flip the flag false. Called on logout and on
    /// any 401. Clearing an already-clear session is a no-op.
    pub fn clear(&self) {
        let was_set = self
            .token
            .write()
            .map(|mut slot| slot.take().is_some())
            .unwrap_or(false);
        if self.persistent {
            if let Ok(path) = Config::token_path() {
                if let Err(e) = fs::remove_file(&path) {
                    if e.kind() != std::io::ErrorKind::NotFound {
                        tlog_warn!("SessionStore::clear failed to remove token file: {}", e);
                    }
                }
            }
        }
        if was_set {
            let _ = self.flag_tx.send(false);
            tlog_debug!("SessionStore::clear session ended");
        }
    }
}
