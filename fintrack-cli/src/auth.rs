use anyhow::{Context, Result, bail};
use fintrack_core::{AuthService, User};
use std::fs;
use std::path::PathBuf;

/// Signed-in user kept in `session.json`. Records are owned by the user id,
/// which is the normalized email, so signing in again reaches the same data.
#[derive(Debug, Clone)]
pub struct LocalSession {
    path: PathBuf,
    user: Option<User>,
}

impl LocalSession {
    pub fn open(path: PathBuf) -> Result<Self> {
        let user = if path.exists() {
            let s = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
            Some(serde_json::from_str(&s).with_context(|| format!("parse {}", path.display()))?)
        } else {
            None
        };
        Ok(Self { path, user })
    }

    pub fn sign_in(&mut self, email: &str, full_name: Option<String>) -> Result<User> {
        let email = email.trim().to_lowercase();
        if !email.contains('@') {
            bail!("not an email address: {email}");
        }

        let user = User {
            id: email.clone(),
            email,
            full_name: full_name.filter(|n| !n.trim().is_empty()),
        };
        let s = serde_json::to_string_pretty(&user)?;
        fs::write(&self.path, s).with_context(|| format!("write {}", self.path.display()))?;
        self.user = Some(user.clone());
        Ok(user)
    }
}

impl AuthService for LocalSession {
    fn current_user(&self) -> Result<Option<User>> {
        Ok(self.user.clone())
    }

    fn sign_out(&mut self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path).with_context(|| format!("remove {}", self.path.display()))?;
        }
        self.user = None;
        Ok(())
    }
}
