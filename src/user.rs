use log::{debug, error};
use serde::{Deserialize, Serialize};

use crate::backend::{Storage, StoreError};

pub const USERS_KEY: &str = "users";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct User {
    pub username: String,
    pub password: String,
}

/// The signed-up students, in signup order. A missing or empty key is an empty list.
pub fn load_users(store: &impl Storage) -> Result<Vec<User>, StoreError> {
    let Some(raw) = store.get(USERS_KEY)?.filter(|raw| !raw.is_empty()) else {
        return Ok(vec![]);
    };

    let users: Vec<User> = serde_json::from_str(&raw).map_err(|e| {
        error!("couldn't parse stored users: {e}");
        StoreError::Malformed(format!("{USERS_KEY}: {e}"))
    })?;

    debug!("loaded {} users", users.len());
    Ok(users)
}

pub fn save_users(store: &mut impl Storage, users: &[User]) -> Result<(), StoreError> {
    let json = serde_json::to_string(users).map_err(|e| {
        error!("couldn't convert users to json: {e:?}");
        StoreError::Malformed(e.to_string())
    })?;

    store.set(USERS_KEY, &json)
}
