//! Username/password accounts. This is the identity provider the rest of
//! the app trusts: a session cookie names a user, and the lookup here
//! turns that into an [`Identity`] with its role.

use campus_club_hub_database::{Store, StoreError};
use thiserror::Error;

use crate::entities::{validate_username, Identity, Role, User, ValidationError};
use crate::password;

pub(crate) const USERS_TABLE: &str = "users";

#[derive(Error, Debug)]
pub enum SignUpError {
    #[error("Username already exists")]
    UsernameTaken,
    #[error("{0}")]
    Invalid(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Clone)]
pub struct Accounts {
    store: Store,
}

impl Accounts {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn sign_up(&self, username: &str, password: &str) -> Result<(), SignUpError> {
        validate_username(username)?;
        if password.is_empty() {
            return Err(ValidationError::Empty("Password").into());
        }
        let user = User {
            username: username.to_owned(),
            password_hash: password::hash_password(password),
            role: Role::Student,
        };
        self.store
            .mutate(move |txn| {
                if txn
                    .get_one(USERS_TABLE, |existing: &User| {
                        existing.username == user.username
                    })?
                    .is_some()
                {
                    return Err(SignUpError::UsernameTaken);
                }
                txn.insert(USERS_TABLE, &user)?;
                Ok(())
            })
            .await
    }

    /// Checks the password; `None` for unknown users and bad passwords
    /// alike.
    pub async fn verify(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<Identity>, StoreError> {
        let Some(user) = self
            .store
            .get_one(USERS_TABLE, |user: &User| user.username == username)
            .await?
        else {
            return Ok(None);
        };
        if password::verify_password(password, &user.password_hash) {
            Ok(Some(Identity {
                username: user.username,
                role: user.role,
            }))
        } else {
            Ok(None)
        }
    }

    pub async fn identity(&self, username: &str) -> Result<Option<Identity>, StoreError> {
        Ok(self
            .store
            .get_one(USERS_TABLE, |user: &User| user.username == username)
            .await?
            .map(|user| Identity {
                username: user.username,
                role: user.role,
            }))
    }
}
