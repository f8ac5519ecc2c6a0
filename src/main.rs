use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::Parser;

use daymark::io::Storage;

/// A today-forward timeline for tasks and calendar events in the terminal.
#[derive(Parser)]
#[command(name = "dym", version, about)]
struct Cli {
    /// Delete all stored data (asks for confirmation)
    #[arg(long)]
    purge: bool,

    /// Use this directory instead of the platform config directory
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    if cli.purge {
        if let Err(e) = purge(cli.data_dir.as_deref()) {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
        return;
    }

    if let Err(e) = daymark::tui::run(cli.data_dir.as_deref()) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn purge(data_dir: Option<&std::path::Path>) -> Result<(), Box<dyn std::error::Error>> {
    let storage = Storage::new(data_dir)?;
    print!(
        "Delete everything under {}? [y/N] ",
        storage.config_dir().display()
    );
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    if answer.trim().eq_ignore_ascii_case("y") {
        storage.purge()?;
        println!("Removed.");
    } else {
        println!("Kept.");
    }
    Ok(())
}
