use log::{debug, error, info, warn};

use crate::backend::{Storage, StoreError};
use crate::wellness::{Error, Result};

pub const JOINED_KEY: &str = "joinedPrograms";

#[derive(Debug, PartialEq, Eq)]
pub struct Program {
    pub title: &'static str,
    pub description: &'static str,
}

pub const CATALOGUE: [Program; 3] = [
    Program {
        title: "Fitness Challenge",
        description: "Join our 30-day fitness challenge to boost your physical health.",
    },
    Program {
        title: "Mindfulness Program",
        description: "Daily meditation and breathing exercises to improve mental focus.",
    },
    Program {
        title: "Nutrition Guide",
        description: "Get weekly meal plans and nutrition tips to maintain a balanced diet.",
    },
];

/// Look a program up by its title, or by its 1-based position in the catalogue.
pub fn find(name_or_number: &str) -> Option<&'static Program> {
    if let Ok(n) = name_or_number.parse::<usize>() {
        return n.checked_sub(1).and_then(|i| CATALOGUE.get(i));
    }
    CATALOGUE.iter().find(|p| p.title == name_or_number)
}

pub fn joined_message(name: &str) -> String {
    format!("You have joined the {name}!")
}

/// Programs joined so far, in the order they were joined. A missing, empty or `null`
/// value means nothing's been joined.
pub fn joined_programs(store: &impl Storage) -> std::result::Result<Vec<String>, StoreError> {
    let Some(raw) = store.get(JOINED_KEY)?.filter(|raw| !raw.is_empty()) else {
        return Ok(vec![]);
    };

    let joined: Option<Vec<String>> = serde_json::from_str(&raw).map_err(|e| {
        error!("couldn't parse joined programs: {e}");
        StoreError::Malformed(format!("{JOINED_KEY}: {e}"))
    })?;

    Ok(joined.unwrap_or_default())
}

/// Add `name` to the joined set. Joining is one-way; there's nothing to leave with.
pub fn join_program(store: &mut impl Storage, name: &str) -> Result<Vec<String>> {
    let mut joined = joined_programs(store)?;

    if joined.iter().any(|p| p == name) {
        warn!("already joined {name:?}");
        return Err(Error::AlreadyJoined);
    }

    joined.push(name.into());
    let json = serde_json::to_string(&joined).map_err(|e| {
        error!("couldn't convert joined programs to json: {e:?}");
        Error::Internal
    })?;
    store.set(JOINED_KEY, &json)?;

    info!("joined {name:?}");
    debug!("{} programs joined", joined.len());
    Ok(joined)
}
