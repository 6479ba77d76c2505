use log::{info, warn};

use crate::backend::Storage;
use crate::user::{load_users, save_users, User};
use crate::wellness::{Error, Result, View};

pub const ADMIN_USERNAME: &str = "admin";
const ADMIN_PASSWORD: &str = "admin123";

pub const SIGNUP_OK: &str = "Signup successful! You can login now.";

/// A username/password pair as typed, with surrounding whitespace removed.
#[derive(Debug, Clone)]
pub struct Credentials {
    user: String,
    pass: String,
}

impl Credentials {
    pub fn new(user: &str, pass: &str) -> Self {
        Self {
            user: user.trim().into(),
            pass: pass.trim().into(),
        }
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    fn is_empty(&self) -> bool {
        self.user.is_empty() || self.pass.is_empty()
    }

    fn is_admin(&self) -> bool {
        self.user == ADMIN_USERNAME && self.pass == ADMIN_PASSWORD
    }

    fn matches(&self, user: &User) -> bool {
        user.username == self.user && user.password == self.pass
    }
}

/// Decide which dashboard a login attempt lands on.
///
/// The admin pair is checked before the stored users, so nothing in storage can
/// shadow it.
pub fn login(store: &impl Storage, creds: &Credentials) -> Result<View> {
    if creds.is_empty() {
        return Err(Error::MissingCredentials);
    }

    let username = creds.user();
    if creds.is_admin() {
        info!("{username} login: admin");
        return Ok(View::Admin);
    }

    let users = load_users(store)?;
    if !users.iter().any(|u| creds.matches(u)) {
        warn!("{username} login: invalid credentials");
        return Err(Error::InvalidCredentials);
    }

    info!("{username} login: student");
    Ok(View::Student)
}

/// Register a student account. Usernames are compared exactly, case included.
pub fn signup(store: &mut impl Storage, creds: Credentials) -> Result<&'static str> {
    if creds.is_empty() {
        return Err(Error::MissingSignupFields);
    }

    if creds.user() == ADMIN_USERNAME {
        warn!("signup: refusing reserved username");
        return Err(Error::ReservedUsername);
    }

    let mut users = load_users(store)?;
    if users.iter().any(|u| u.username == creds.user()) {
        warn!("{} signup: already exists", creds.user());
        return Err(Error::DuplicateUsername);
    }

    let Credentials { user, pass } = creds;
    info!("{user} signup: created");
    users.push(User {
        username: user,
        password: pass,
    });
    save_users(store, &users)?;

    Ok(SIGNUP_OK)
}
