use std::io::{self, BufRead, Write};

use clap::{Parser, Subcommand};
use log::{debug, trace};

use crate::backend::Storage;
use crate::profile;
use crate::program::{self, CATALOGUE};
use crate::progress;
use crate::wellness::{View, Wellness};

#[derive(Parser, Debug)]
#[command(no_binary_name = true, disable_version_flag = true)]
struct Line {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in as a student, or as the admin.
    Login { username: String, password: String },
    /// Create a student account.
    Signup { username: String, password: String },
    /// Go to the signup screen.
    ToSignup,
    /// Go back to the login screen.
    ToLogin,
    /// Leave the dashboard.
    Logout,
    /// Save your profile. Quote values containing spaces.
    Profile {
        name: String,
        email: String,
        age: String,
    },
    /// Mark every wellness area as complete.
    Progress,
    /// Join a wellness program, by name or number.
    Join {
        #[arg(required = true, num_args = 1..)]
        program: Vec<String>,
    },
    /// Show the current screen again.
    Show,
    /// Leave.
    Quit,
}

/// Split a command line on whitespace, keeping double-quoted runs together.
fn split_words(line: &str) -> Result<Vec<String>, &'static str> {
    let mut words = vec![];
    let mut word: Option<String> = None;
    let mut quoted = false;

    for c in line.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                word.get_or_insert_with(String::new);
            }
            c if c.is_whitespace() && !quoted => {
                words.extend(word.take());
            }
            c => word.get_or_insert_with(String::new).push(c),
        }
    }

    if quoted {
        return Err("unterminated quote");
    }
    words.extend(word);
    Ok(words)
}

enum Outcome {
    Render,
    Notice(String),
    Quit,
}

fn dispatch<S: Storage>(app: &mut Wellness<S>, command: Command) -> Outcome {
    use Outcome::*;

    let result = match command {
        Command::Login { username, password } => app.login(&username, &password).map(|_| Render),
        Command::Signup { username, password } => app
            .signup(&username, &password)
            .map(|msg| Notice(msg.into())),
        Command::ToSignup => app.switch_to_signup().map(|()| Render),
        Command::ToLogin => app.switch_to_login().map(|()| Render),
        Command::Logout => app.logout().map(|()| Render),
        Command::Profile { name, email, age } => app
            .save_profile(&name, &email, &age)
            .map(|()| Notice(profile::SAVED.into())),
        Command::Progress => app
            .update_progress()
            .map(|()| Notice(progress::UPDATED.into())),
        Command::Join { program: words } => app
            .join_program(&words.join(" "))
            .map(|title| Notice(program::joined_message(title))),
        Command::Show => Ok(Render),
        Command::Quit => Ok(Quit),
    };

    result.unwrap_or_else(|e| Notice(format!("! {e}")))
}

fn render<S: Storage>(app: &Wellness<S>, mut out: impl Write) -> io::Result<()> {
    match app.view() {
        View::Login => {
            writeln!(out, "== Login ==")?;
            writeln!(out, "login <username> <password>")?;
            writeln!(out, "Don't have an account? `to-signup` to create one.")?;
            if let Some(e) = app.login_error() {
                writeln!(out, "! {e}")?;
            }
        }
        View::Signup => {
            writeln!(out, "== Student Signup ==")?;
            writeln!(out, "signup <username> <password>")?;
            writeln!(out, "Already have an account? `to-login` to login.")?;
            if let Some(msg) = app.signup_message() {
                writeln!(out, "{msg}")?;
            }
        }
        View::Student => {
            let Some(dash) = app.dashboard() else {
                return Ok(());
            };
            let (profile, progress) = (&dash.profile, &dash.progress);

            writeln!(out, "== Student Health & Wellness Dashboard ==")?;
            writeln!(out)?;
            writeln!(out, "My Profile (profile <name> <email> <age>)")?;
            writeln!(out, "  Name:  {}", profile.name())?;
            writeln!(out, "  Email: {}", profile.email())?;
            writeln!(out, "  Age:   {}", profile.age())?;
            writeln!(out)?;
            writeln!(out, "My Wellness Progress (progress)")?;
            writeln!(out, "  Mental Wellness: {}%", progress.mental)?;
            writeln!(out, "  Fitness:         {}%", progress.fitness)?;
            writeln!(out, "  Nutrition:       {}%", progress.nutrition)?;
            writeln!(out)?;
            writeln!(out, "Wellness Programs (join <name|number>)")?;
            for (i, program) in CATALOGUE.iter().enumerate() {
                let mark = if dash.has_joined(program.title) { "Joined" } else { "Join" };
                writeln!(out, "  {}. {} [{mark}]", i + 1, program.title)?;
                writeln!(out, "     {}", program.description)?;
            }
            writeln!(out)?;
            writeln!(out, "My Joined Programs:")?;
            if dash.joined.is_empty() {
                writeln!(out, "  No programs joined yet.")?;
            }
            for program in &dash.joined {
                writeln!(out, "  - {program}")?;
            }
            writeln!(out)?;
            writeln!(out, "`logout` to leave")?;
        }
        View::Admin => {
            writeln!(out, "== Admin Dashboard ==")?;
            writeln!(out, "Welcome, Admin!")?;
            writeln!(
                out,
                "Manage wellness programs, update health resources, and track student engagement here."
            )?;
            writeln!(out)?;
            writeln!(out, "Manage Resources")?;
            writeln!(out, "  Upload or update health articles, videos, and program links.")?;
            writeln!(out, "View Usage Metrics")?;
            writeln!(
                out,
                "  Check how many students accessed mental health, fitness, or nutrition resources."
            )?;
            writeln!(out)?;
            writeln!(out, "`logout` to leave")?;
        }
    }
    Ok(())
}

/// Read commands from `input` until it ends or the user quits, rendering to `out`.
pub fn run<S: Storage>(
    app: &mut Wellness<S>,
    input: impl BufRead,
    mut out: impl Write,
) -> io::Result<()> {
    render(&*app, &mut out)?;

    let mut lines = input.lines();
    loop {
        write!(out, "{}> ", app.view())?;
        out.flush()?;

        let Some(line) = lines.next() else {
            writeln!(out)?;
            break;
        };
        let line = line?;
        trace!("read {line:?}");

        let words = match split_words(&line) {
            Ok(words) if words.is_empty() => continue,
            Ok(words) => words,
            Err(e) => {
                writeln!(out, "! {e}")?;
                continue;
            }
        };

        let command = match Line::try_parse_from(words) {
            Ok(Line { command }) => command,
            Err(e) => {
                // includes `help`
                write!(out, "{e}")?;
                continue;
            }
        };
        debug!("{command:?} from the {} view", app.view());

        match dispatch(app, command) {
            Outcome::Render => render(&*app, &mut out)?,
            Outcome::Notice(msg) => writeln!(out, "{msg}")?,
            Outcome::Quit => break,
        }
    }

    Ok(())
}
