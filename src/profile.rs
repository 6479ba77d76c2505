use log::info;

use crate::backend::{Storage, StoreError};
use crate::wellness::{Error, Result};

pub const NAME_KEY: &str = "userName";
pub const EMAIL_KEY: &str = "userEmail";
pub const AGE_KEY: &str = "userAge";

/// Shown in place of a field that's never been saved.
pub const PLACEHOLDER: &str = "—";

pub const SAVED: &str = "Profile saved successfully!";

/// The saved profile, as displayed on the dashboard. There's one per store, shared by
/// every student account.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    name: Option<String>,
    email: Option<String>,
    age: Option<String>,
}

impl Profile {
    pub fn load(store: &impl Storage) -> std::result::Result<Self, StoreError> {
        // an empty value reads the same as a missing one
        let field = |key: &str| -> std::result::Result<Option<String>, StoreError> {
            Ok(store.get(key)?.filter(|v| !v.is_empty()))
        };

        Ok(Self {
            name: field(NAME_KEY)?,
            email: field(EMAIL_KEY)?,
            age: field(AGE_KEY)?,
        })
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(PLACEHOLDER)
    }

    pub fn email(&self) -> &str {
        self.email.as_deref().unwrap_or(PLACEHOLDER)
    }

    pub fn age(&self) -> &str {
        self.age.as_deref().unwrap_or(PLACEHOLDER)
    }
}

/// Persist all three fields, or none of them if any is empty.
pub fn save_profile(
    store: &mut impl Storage,
    name: &str,
    email: &str,
    age: &str,
) -> Result<Profile> {
    if name.is_empty() || email.is_empty() || age.is_empty() {
        return Err(Error::MissingProfileFields);
    }

    store.set_many(&[(NAME_KEY, name), (EMAIL_KEY, email), (AGE_KEY, age)])?;
    info!("profile saved");

    Ok(Profile {
        name: Some(name.into()),
        email: Some(email.into()),
        age: Some(age.into()),
    })
}
