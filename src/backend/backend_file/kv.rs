use std::collections::BTreeMap;
use std::io::{self, BufRead, BufReader, Read, Write};

use log::error;

use crate::backend::StoreError;

pub type KeyValues = BTreeMap<String, String>;

pub fn read(input: impl Read) -> Result<KeyValues, StoreError> {
    let mut kv = BTreeMap::new();

    for (lineno, line) in BufReader::new(input).lines().enumerate() {
        let line = line.map_err(|e| {
            error!("couldn't read line {}: {e}", lineno + 1);
            StoreError::Io(e)
        })?;

        let (k, v) = line.split_once(':').ok_or_else(|| {
            error!("invalid line {}, can't split", lineno + 1);
            StoreError::Malformed(format!("line {}: no colon", lineno + 1))
        })?;

        let Some(v) = v.strip_prefix(' ') else {
            error!("invalid line {} - no whitespace after colon", lineno + 1);
            return Err(StoreError::Malformed(format!(
                "line {}: no space after colon",
                lineno + 1
            )));
        };
        kv.insert(k.into(), v.into());
    }

    Ok(kv)
}

pub fn write(mut output: impl Write, keyvalues: &KeyValues) -> Result<(), StoreError> {
    for (k, v) in keyvalues {
        if k.contains([':', '\n', '\r']) || v.contains(['\n', '\r']) {
            error!("refusing to write entry for {k:?}: would break the line format");
            return Err(StoreError::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("entry {k:?} can't be stored on a single line"),
            )));
        }
        writeln!(output, "{}: {}", k, v)?;
    }
    Ok(())
}
