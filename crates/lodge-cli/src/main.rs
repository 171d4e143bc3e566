//! Lodge CLI
//!
//! Interactive console for typed records backed by a JSON file store.

use std::io;
use std::path::PathBuf;

use clap::Parser;

use lodge_core::logging::{self, Profile};
use lodge_store::FileStore;

mod console;
mod parse;

use console::Console;

#[derive(Debug, Parser)]
#[command(name = "lodge")]
#[command(about = "Lodge - interactive record console", long_about = None)]
struct Cli {
    /// Path of the persisted record file
    #[arg(long, default_value = "file.json")]
    file: PathBuf,

    /// Emit JSON structured logs instead of human-readable output
    #[arg(long)]
    log_json: bool,
}

fn main() {
    let cli = Cli::parse();
    logging::init(if cli.log_json {
        Profile::Production
    } else {
        Profile::Development
    });

    let files = FileStore::new(&cli.file);
    let store = files.load();

    let stdin = io::stdin();
    let mut console = Console::new(store, files, io::stdout());
    // All exits use code 0; errors surface as printed messages
    if let Err(err) = console.run(stdin.lock()) {
        eprintln!("Error: {}", err);
    }
}
