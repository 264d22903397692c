use anyhow::Result;
use chrono::NaiveDateTime;
use fintrack_core::{User, require_user};

use crate::auth::LocalSession;
use crate::config::{Config, load_config};
use crate::state::session_path;
use crate::store::JsonStore;

/// Everything a signed-in command needs.
pub struct App {
    pub config: Config,
    pub store: JsonStore,
    pub user: User,
}

impl App {
    pub fn open() -> Result<Self> {
        let session = LocalSession::open(session_path()?)?;
        let user = require_user(&session)?;
        let config = load_config()?;
        let store = JsonStore::open(config.store_path()?)?;
        Ok(Self { config, store, user })
    }

    pub fn owner(&self) -> &str {
        &self.user.id
    }

    pub fn now(&self) -> Result<NaiveDateTime> {
        self.config.local_now()
    }

    pub fn currency(&self) -> &str {
        &self.config.profile.currency_symbol
    }
}
