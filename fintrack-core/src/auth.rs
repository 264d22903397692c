//! Auth seam: who is signed in.

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub full_name: Option<String>,
}

impl User {
    pub fn display_name(&self) -> &str {
        self.full_name.as_deref().unwrap_or("Usuário")
    }
}

pub trait AuthService {
    fn current_user(&self) -> Result<Option<User>>;
    fn sign_out(&mut self) -> Result<()>;
}

/// Gate for everything except signing in: there must be a user.
pub fn require_user(auth: &dyn AuthService) -> Result<User> {
    match auth.current_user()? {
        Some(user) => Ok(user),
        None => bail!("not signed in (run `fintrack login <email>`)"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Option<User>);

    impl AuthService for Fixed {
        fn current_user(&self) -> Result<Option<User>> {
            Ok(self.0.clone())
        }

        fn sign_out(&mut self) -> Result<()> {
            self.0 = None;
            Ok(())
        }
    }

    #[test]
    fn test_require_user() {
        let mut auth = Fixed(Some(User {
            id: "u1".into(),
            email: "a@b.c".into(),
            full_name: None,
        }));
        assert_eq!(require_user(&auth).unwrap().display_name(), "Usuário");

        auth.sign_out().unwrap();
        assert!(require_user(&auth).is_err());
    }
}
