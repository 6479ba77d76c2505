use std::{fmt, result};

use log::{debug, info, trace};
use thiserror::Error;

use crate::auth::{self, Credentials};
use crate::backend::{Storage, StoreError};
use crate::profile::{self, Profile};
use crate::program;
use crate::progress::Progress;

/// The screen currently shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum View {
    #[default]
    Login,
    Signup,
    Student,
    Admin,
}

impl fmt::Display for View {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.write_str(match self {
            Self::Login => "login",
            Self::Signup => "signup",
            Self::Student => "student",
            Self::Admin => "admin",
        })
    }
}

/// Everything an operation can be turned down for. The message is what the user sees.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Please enter username and password.")]
    MissingCredentials,
    #[error("Please fill out both fields.")]
    MissingSignupFields,
    #[error("Please fill out all fields before saving.")]
    MissingProfileFields,
    #[error("Username \"admin\" is reserved.")]
    ReservedUsername,
    #[error("Username already exists. Please choose another one.")]
    DuplicateUsername,
    #[error("Invalid username or password.")]
    InvalidCredentials,
    #[error("You already joined this program!")]
    AlreadyJoined,
    #[error("There's no program called \"{0}\".")]
    UnknownProgram(String),
    #[error("That isn't available from the {0} screen.")]
    WrongView(View),
    #[error("internal storage error")]
    Internal,
}

pub type Result<T> = result::Result<T, Error>;

impl From<StoreError> for Error {
    fn from(e: StoreError) -> Self {
        // the backend has already logged the details
        debug!("storage failure: {e}");
        Self::Internal
    }
}

/// State of the student dashboard, loaded from storage each time it's entered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentDashboard {
    pub profile: Profile,
    pub progress: Progress,
    pub joined: Vec<String>,
}

impl StudentDashboard {
    fn load(store: &impl Storage) -> result::Result<Self, StoreError> {
        Ok(Self {
            profile: Profile::load(store)?,
            progress: Progress::default(),
            joined: program::joined_programs(store)?,
        })
    }

    pub fn has_joined(&self, title: &str) -> bool {
        self.joined.iter().any(|p| p == title)
    }
}

pub struct Wellness<S> {
    store: S,
    view: View,
    login_error: Option<String>,
    signup_message: Option<String>,
    dashboard: Option<StudentDashboard>,
}

impl<S: Storage> Wellness<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            view: View::default(),
            login_error: None,
            signup_message: None,
            dashboard: None,
        }
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn login_error(&self) -> Option<&str> {
        self.login_error.as_deref()
    }

    pub fn signup_message(&self) -> Option<&str> {
        self.signup_message.as_deref()
    }

    pub fn dashboard(&self) -> Option<&StudentDashboard> {
        self.dashboard.as_ref()
    }

    fn require(&self, views: &[View]) -> Result<()> {
        if views.contains(&self.view) {
            Ok(())
        } else {
            debug!("rejecting operation from the {} view", self.view);
            Err(Error::WrongView(self.view))
        }
    }

    fn dashboard_mut(&mut self) -> Result<&mut StudentDashboard> {
        let view = self.view;
        self.dashboard.as_mut().ok_or(Error::WrongView(view))
    }

    pub fn switch_to_signup(&mut self) -> Result<()> {
        self.require(&[View::Login])?;
        self.signup_message = None;
        self.view = View::Signup;
        Ok(())
    }

    pub fn switch_to_login(&mut self) -> Result<()> {
        self.require(&[View::Signup])?;
        self.login_error = None;
        self.view = View::Login;
        Ok(())
    }

    /// Attempt a login from the login screen, moving to whichever dashboard the
    /// credentials open. A failure is also kept for the login screen to show.
    pub fn login(&mut self, username: &str, password: &str) -> Result<View> {
        self.require(&[View::Login])?;
        self.login_error = None;

        let creds = Credentials::new(username, password);
        let entered = auth::login(&self.store, &creds).and_then(|view| {
            let dashboard = match view {
                View::Student => Some(StudentDashboard::load(&self.store)?),
                _ => None,
            };
            Ok((view, dashboard))
        });

        match entered {
            Ok((view, dashboard)) => {
                trace!("{} entering {view} view", creds.user());
                self.view = view;
                self.dashboard = dashboard;
                Ok(view)
            }
            Err(e) => {
                self.login_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    pub fn signup(&mut self, username: &str, password: &str) -> Result<&'static str> {
        self.require(&[View::Signup])?;

        let result = auth::signup(&mut self.store, Credentials::new(username, password));
        self.signup_message = Some(match &result {
            Ok(msg) => msg.to_string(),
            Err(e) => e.to_string(),
        });
        result
    }

    pub fn logout(&mut self) -> Result<()> {
        self.require(&[View::Student, View::Admin])?;
        info!("logout from the {} view", self.view);
        self.view = View::Login;
        self.dashboard = None;
        Ok(())
    }

    pub fn save_profile(&mut self, name: &str, email: &str, age: &str) -> Result<()> {
        self.dashboard_mut()?;

        let saved = profile::save_profile(&mut self.store, name, email, age)?;
        self.dashboard_mut()?.profile = saved;
        Ok(())
    }

    pub fn update_progress(&mut self) -> Result<()> {
        self.dashboard_mut()?.progress.update();
        Ok(())
    }

    /// Join one of the catalogue's programs, by title or catalogue number.
    pub fn join_program(&mut self, name_or_number: &str) -> Result<&'static str> {
        self.dashboard_mut()?;

        let Some(found) = program::find(name_or_number) else {
            return Err(Error::UnknownProgram(name_or_number.into()));
        };

        let joined = program::join_program(&mut self.store, found.title)?;
        self.dashboard_mut()?.joined = joined;
        Ok(found.title)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use crate::backend::MemoryStore;
    use crate::program::JOINED_KEY;

    fn signed_up(users: &[(&str, &str)]) -> Wellness<MemoryStore> {
        let mut app = Wellness::new(MemoryStore::new());
        app.switch_to_signup().unwrap();
        for (user, pass) in users {
            app.signup(user, pass).unwrap();
        }
        app.switch_to_login().unwrap();
        app
    }

    #[test]
    fn starts_on_login() {
        let app = Wellness::new(MemoryStore::new());

        assert_eq!(app.view(), View::Login);
        assert!(app.dashboard().is_none());
    }

    #[test]
    fn alice_scenario() {
        let mut app = Wellness::new(MemoryStore::new());
        app.switch_to_signup().unwrap();

        assert_eq!(app.signup("alice", "pw1").unwrap(), auth::SIGNUP_OK);
        assert_eq!(app.signup_message(), Some(auth::SIGNUP_OK));
        assert_eq!(app.view(), View::Signup);

        app.switch_to_login().unwrap();
        assert_eq!(app.login("alice", "pw1").unwrap(), View::Student);
        assert!(app.dashboard().is_some());

        app.logout().unwrap();
        assert!(matches!(
            app.login("alice", "wrong"),
            Err(Error::InvalidCredentials)
        ));
        assert_eq!(app.view(), View::Login);
        assert_eq!(app.login_error(), Some("Invalid username or password."));
    }

    #[test]
    fn login_error_is_cleared() {
        let mut app = signed_up(&[("alice", "pw1")]);

        assert!(app.login("", "").is_err());
        assert_eq!(app.login_error(), Some("Please enter username and password."));

        app.switch_to_signup().unwrap();
        app.switch_to_login().unwrap();
        assert_eq!(app.login_error(), None);

        assert!(app.login("alice", "nope").is_err());
        assert_eq!(app.login("alice", "pw1").unwrap(), View::Student);
        assert_eq!(app.login_error(), None);
    }

    #[test]
    fn signup_message_tracks_last_attempt() {
        let mut app = signed_up(&[("alice", "pw1")]);
        app.switch_to_signup().unwrap();
        assert_eq!(app.signup_message(), None);

        assert!(matches!(app.signup("admin", "x"), Err(Error::ReservedUsername)));
        assert_eq!(app.signup_message(), Some("Username \"admin\" is reserved."));

        assert!(matches!(app.signup("alice", "x"), Err(Error::DuplicateUsername)));
        assert_eq!(
            app.signup_message(),
            Some("Username already exists. Please choose another one.")
        );
    }

    #[test]
    fn admin_dashboard() {
        let mut app = signed_up(&[]);

        assert_eq!(app.login("admin", "admin123").unwrap(), View::Admin);
        assert!(app.dashboard().is_none());
        assert!(matches!(app.update_progress(), Err(Error::WrongView(View::Admin))));

        app.logout().unwrap();
        assert_eq!(app.view(), View::Login);
    }

    #[test]
    fn wrong_view_changes_nothing() {
        let mut app = Wellness::new(MemoryStore::new());

        assert!(matches!(app.logout(), Err(Error::WrongView(View::Login))));
        assert!(matches!(app.signup("bob", "pw"), Err(Error::WrongView(View::Login))));
        assert!(matches!(app.switch_to_login(), Err(Error::WrongView(View::Login))));
        assert!(matches!(
            app.save_profile("a", "b", "c"),
            Err(Error::WrongView(View::Login))
        ));
        assert!(matches!(
            app.join_program("1"),
            Err(Error::WrongView(View::Login))
        ));

        assert_eq!(app.view(), View::Login);
        assert_eq!(app.signup_message(), None);
        assert_eq!(app.store.get(JOINED_KEY).unwrap(), None);
    }

    #[test]
    fn dashboard_state() {
        let mut app = signed_up(&[("alice", "pw1")]);
        app.login("alice", "pw1").unwrap();

        let dash = app.dashboard().unwrap();
        assert_eq!(dash.profile.name(), profile::PLACEHOLDER);
        assert_eq!(dash.progress, Progress::default());
        assert!(dash.joined.is_empty());

        app.save_profile("Alice", "alice@uni.edu", "20").unwrap();
        app.update_progress().unwrap();
        assert_eq!(app.join_program("Fitness Challenge").unwrap(), "Fitness Challenge");
        assert!(matches!(app.join_program("1"), Err(Error::AlreadyJoined)));
        assert!(matches!(
            app.join_program("Yoga"),
            Err(Error::UnknownProgram(_))
        ));

        let dash = app.dashboard().unwrap();
        assert_eq!(dash.profile.name(), "Alice");
        assert_eq!(dash.progress.fitness, 100);
        assert_eq!(dash.joined, vec!["Fitness Challenge"]);
        assert!(dash.has_joined("Fitness Challenge"));

        // progress is forgotten, the rest comes back from storage
        app.logout().unwrap();
        app.login("alice", "pw1").unwrap();

        let dash = app.dashboard().unwrap();
        assert_eq!(dash.profile.email(), "alice@uni.edu");
        assert_eq!(dash.progress, Progress::default());
        assert_eq!(dash.joined, vec!["Fitness Challenge"]);
    }

    #[test]
    fn profile_is_shared_between_students() {
        let mut app = signed_up(&[("alice", "pw1"), ("bob", "pw2")]);

        app.login("alice", "pw1").unwrap();
        app.save_profile("Alice", "alice@uni.edu", "20").unwrap();
        app.logout().unwrap();

        app.login("bob", "pw2").unwrap();
        assert_eq!(app.dashboard().unwrap().profile.name(), "Alice");
    }

    #[test]
    fn rejected_profile_keeps_saved_one() {
        let mut app = signed_up(&[("alice", "pw1")]);
        app.login("alice", "pw1").unwrap();
        app.save_profile("Alice", "alice@uni.edu", "20").unwrap();

        assert!(matches!(
            app.save_profile("Alice", "", "21"),
            Err(Error::MissingProfileFields)
        ));

        assert_eq!(app.dashboard().unwrap().profile.age(), "20");
        assert_eq!(Profile::load(&app.store).unwrap().age(), "20");
    }
}
