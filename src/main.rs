use std::io;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info};

mod args;
use args::Args;

mod auth;
mod backend;
mod profile;
mod program;
mod progress;
mod shell;
mod user;

mod wellness;
use wellness::Wellness;

use backend::{FileStore, MemoryStore, Storage};

fn main() -> ExitCode {
    pretty_env_logger::init();

    let args = Args::parse();

    let store: Box<dyn Storage> = if args.ephemeral() {
        info!("using in-memory storage");
        Box::new(MemoryStore::new())
    } else {
        info!("using storage in {:?}", args.data_dir());
        Box::new(FileStore::new(args.data_dir()))
    };

    let mut app = Wellness::new(store);
    let stdin = io::stdin();

    match shell::run(&mut app, stdin.lock(), io::stdout()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("terminal i/o: {e}");
            ExitCode::FAILURE
        }
    }
}
