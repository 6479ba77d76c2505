use std::path::{Path, PathBuf};

use clap::Parser;

#[derive(Parser, Debug)]
pub struct Args {
    /// Where wellsync keeps its accounts, profile and joined programs.
    #[arg(short, long, default_value = "wellsync-data")]
    data_dir: PathBuf,

    /// Keep everything in memory. Nothing is saved on exit.
    #[arg(short, long)]
    ephemeral: bool,
}

impl Args {
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn ephemeral(&self) -> bool {
        self.ephemeral
    }
}
